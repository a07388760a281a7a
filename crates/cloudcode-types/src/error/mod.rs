//! Typed error definitions.
//!
//! Errors here are plain data: serializable for API responses, displayable
//! for logging and matchable by callers.

mod config;
mod translate;

pub use config::ConfigError;
pub use translate::TranslateError;
