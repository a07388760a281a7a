//! # CloudCode Types
//!
//! Wire types, models, and error definitions for CloudCode Gateway.
//!
//! - **`error`** - Typed errors for request translation and configuration
//! - **`models`** - Domain models (Credentials, GatewayConfig, ModelFamily)
//! - **`protocol`** - OpenAI chat types and the internal Gemini/CloudCode wire shapes
//!
//! ## Architecture Role
//!
//! ```text
//!     cloudcode-types (this crate)
//!             │
//!             ▼
//!      cloudcode-core
//!             │
//!             ▼
//!     cloudcode-server
//! ```

pub mod error;
pub mod models;
pub mod protocol;

pub use error::{ConfigError, TranslateError};
pub use models::{Credentials, GatewayConfig, ModelFamily};
