// Handlers - API endpoint handlers

pub mod admin;
pub mod common;
pub mod errors;
pub mod gemini;
pub mod openai;

pub use errors::ApiError;
