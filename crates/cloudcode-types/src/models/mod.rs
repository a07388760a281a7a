//! Domain models.

pub mod config;
pub mod credentials;
pub mod model_family;

pub use config::{GatewayConfig, LogConfig, OAuthClientConfig};
pub use credentials::{Credentials, TokenRefreshResponse};
pub use model_family::ModelFamily;
