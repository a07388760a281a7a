// proxy module - API gateway

pub mod common;
pub mod credentials;
pub mod handlers;
pub mod mappers;
pub mod middleware;
pub mod project_resolver;
pub mod server;
pub mod upstream;

pub use credentials::{
    CredentialProvider, CredentialStatus, FileCredentialProvider, MemoryCredentialProvider,
};
pub use project_resolver::ProjectResolver;
pub use server::{build_proxy_router, AppState, AxumServer, ServerStartConfig};
pub use upstream::UpstreamClient;
