//! OpenAI-compatible handlers.

mod chat;
mod models;

pub use chat::handle_chat_completions;
pub use models::{build_model_list, handle_get_model, handle_list_models};
