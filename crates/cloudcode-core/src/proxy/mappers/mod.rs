// Mappers module - protocol converters

pub mod gemini;
pub mod openai;
pub mod request_prep;
