//! Common utilities module
//!
//! Shared helpers for proxy handlers and mappers.

pub mod json_schema;
pub mod random_id;
pub mod tool_names;

pub use json_schema::convert_schema;
