//! OpenAI chat request → CloudCode `GenerateContentRequest`.

mod message_transform;
mod tool_declarations;

#[cfg(test)]
mod tests;

pub use message_transform::translate_messages;
pub use tool_declarations::transform_tool_declarations;

use cloudcode_types::protocol::openai::ChatCompletionRequest;
use cloudcode_types::protocol::{GeminiInternalRequest, GenerateContentRequest, GenerationConfig};
use cloudcode_types::TranslateError;

/// Build the internal request for `project`. The result still needs request preparation.
pub fn transform_openai_request(
    request: &ChatCompletionRequest,
    project: &str,
) -> Result<GenerateContentRequest, TranslateError> {
    let (contents, system_instruction) = translate_messages(&request.messages)?;
    let tools = request.tools.as_deref().map(transform_tool_declarations).unwrap_or_default();

    let inner = GeminiInternalRequest {
        contents,
        system_instruction,
        tools,
        generation_config: build_generation_config(request),
        ..GeminiInternalRequest::default()
    };

    Ok(GenerateContentRequest::new(&request.model, project, inner))
}

/// Only emitted when the client set something meaningful.
fn build_generation_config(request: &ChatCompletionRequest) -> Option<GenerationConfig> {
    let temperature = request.temperature.filter(|t| *t > 0.0);
    let max_output_tokens = request.max_tokens.filter(|m| *m > 0);
    if temperature.is_none() && max_output_tokens.is_none() && request.top_p.is_none() {
        return None;
    }
    Some(GenerationConfig {
        temperature,
        top_p: request.top_p,
        max_output_tokens,
        ..GenerationConfig::default()
    })
}
