//! Protocol message types.
//!
//! - `gemini` - the Gemini request shape nested inside CloudCode calls
//! - `cloudcode` - `v1internal` envelopes (generate, discovery, onboarding, models)
//! - `openai` - OpenAI chat completion request/response types

pub mod cloudcode;
pub mod gemini;
pub mod openai;

pub use cloudcode::{
    AvailableModel, ClientMetadata, FetchAvailableModelsResponse, GenerateContentRequest,
    LoadCodeAssistRequest, LoadCodeAssistResponse, OnboardOperation, OnboardUserRequest, Tier,
};
pub use gemini::{
    Content, ContentPart, FunctionCall, FunctionDeclaration, FunctionResponse,
    GeminiInternalRequest, GenerationConfig, ParameterSchema, PartPayload, Role, SystemInstruction,
    ThinkingConfig, Tool,
};
