//! Inbound request translation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while turning a client request into the internal shape.
///
/// These are always caller mistakes: they map to a 4xx and are never retried.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum TranslateError {
    /// A tool-role message whose function name cannot be discovered
    #[error("tool message is missing a function name (tool_call_id: {tool_call_id:?})")]
    MissingFunctionName {
        /// The tool_call_id the message carried, possibly empty
        tool_call_id: String,
    },

    /// Body is not valid JSON or does not match the expected shape
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TranslateError {
    /// Create an invalid-request error from a serde_json error.
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}
