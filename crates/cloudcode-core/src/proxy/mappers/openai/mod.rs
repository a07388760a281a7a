// OpenAI mapper module
// Handles OpenAI ↔ CloudCode protocol conversion

pub mod request;
pub mod response;
pub mod streaming;

pub use request::{transform_openai_request, transform_tool_declarations, translate_messages};
pub use response::{map_finish_reason, transform_response, usage_from_metadata};
pub use streaming::{ChatStreamState, DONE_FRAME};
