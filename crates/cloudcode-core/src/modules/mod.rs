pub mod config;
pub mod logger;
pub mod oauth;

pub use config::{apply_env_overrides, get_data_dir, load_config_from, resolve_credentials_path};
pub use logger::init_logging;
pub use oauth::refresh_access_token;
