//! Credential capability consumed by the upstream client.
//!
//! The core only ever asks for the current record and for a refresh; which
//! backend stores the record is invisible to it.

mod file;
mod memory;
mod status;

pub use file::FileCredentialProvider;
pub use memory::MemoryCredentialProvider;
pub use status::CredentialStatus;

use async_trait::async_trait;
use cloudcode_types::Credentials;

use crate::error::AppResult;

/// Source of OAuth credentials.
///
/// Backends may coordinate concurrent refreshes but are not required to.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current credential record.
    async fn get_credentials(&self) -> AppResult<Credentials>;

    /// Obtain a new access token and make it visible to later `get_credentials` calls.
    async fn refresh_token(&self) -> AppResult<()>;

    /// Replace the stored record.
    async fn save_credentials(&self, credentials: Credentials) -> AppResult<()>;

    /// Short backend name for status output.
    fn describe(&self) -> &'static str;
}

pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
