//! Gemini-style inbound mapping: lenient request parsing and envelope unwrapping.

pub mod request;
pub mod wrapper;

pub use request::parse_internal_request;
pub use wrapper::{transform_sse_line, unwrap_response, SSE_DATA_PREFIX};
