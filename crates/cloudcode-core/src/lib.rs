//! # CloudCode Core
//!
//! Translation and resilience core of CloudCode Gateway.
//!
//! ## Layout
//!
//! ```text
//! cloudcode-core/src/
//! ├── proxy/
//! │   ├── mappers/           # OpenAI + Gemini inbound translation, request preparation
//! │   ├── common/            # JSON Schema conversion, ids, tool-name sanitizing
//! │   ├── upstream/          # authenticated v1internal client with endpoint failover
//! │   ├── credentials/       # CredentialProvider capability and backends
//! │   ├── project_resolver.rs# project discovery and onboarding
//! │   ├── handlers/          # axum handlers
//! │   └── server.rs          # router + AxumServer
//! ├── modules/               # config file, logging, OAuth refresh
//! └── utils/                 # HTTP client, atomic JSON writes
//! ```

#![allow(
    clippy::significant_drop_tightening,
    reason = "Mutex guards in async code require careful lifetime management"
)]
#![allow(
    clippy::wildcard_enum_match_arm,
    reason = "Error mapping falls through to a generic api_error"
)]
#![allow(clippy::map_err_ignore, reason = "Error context is provided in the replacement message")]
#![allow(
    clippy::derive_partial_eq_without_eq,
    reason = "Wire types carrying serde_json::Value cannot implement Eq"
)]
// Test-only lints: allow panic!, unwrap, etc. in test code
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::assertions_on_result_states
    )
)]

pub mod error;
pub mod modules;
pub mod proxy;
pub mod utils;

// Re-export commonly used types
pub use error::{AppError, AppResult, UpstreamError};
pub use proxy::{
    build_proxy_router, AppState, AxumServer, CredentialProvider, FileCredentialProvider,
    MemoryCredentialProvider, ProjectResolver, ServerStartConfig, UpstreamClient,
};
