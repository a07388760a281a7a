// Unwrapped CloudCode response → OpenAI `chat.completion`.

use cloudcode_types::protocol::openai::{
    ChatCompletionResponse, Choice, ResponseMessage, ToolCall, ToolCallFunction, Usage,
};
use serde_json::Value;

use crate::proxy::common::random_id;

/// Map a Gemini `finishReason` onto the OpenAI vocabulary.
pub fn map_finish_reason(reason: &str) -> &'static str {
    match reason {
        "MAX_TOKENS" => "length",
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => "content_filter",
        _ => "stop",
    }
}

/// `usageMetadata` → OpenAI usage. Missing counters read as zero.
pub fn usage_from_metadata(metadata: &Value) -> Option<Usage> {
    let counters = metadata.as_object()?;
    let count = |key: &str| counters.get(key).and_then(Value::as_u64).unwrap_or(0);
    let prompt_tokens = count("promptTokenCount");
    let completion_tokens = count("candidatesTokenCount") + count("thoughtsTokenCount");
    let total_tokens = match count("totalTokenCount") {
        0 => prompt_tokens + completion_tokens,
        total => total,
    };
    Some(Usage { prompt_tokens, completion_tokens, total_tokens })
}

/// Convert a model function call into an OpenAI tool call with JSON-string arguments.
pub(super) fn tool_call_from_part(call: &Value) -> Option<ToolCall> {
    let name = call.get("name").and_then(Value::as_str)?;
    let id = call
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map_or_else(random_id::tool_call_id, str::to_string);
    let args = call.get("args").cloned().unwrap_or_else(|| Value::Object(Default::default()));
    Some(ToolCall {
        id,
        call_type: "function".to_string(),
        function: ToolCallFunction { name: name.to_string(), arguments: Value::String(args.to_string()) },
    })
}

/// Build the non-streaming response from an already unwrapped upstream payload.
pub fn transform_response(response: &Value, model: &str) -> ChatCompletionResponse {
    let candidate = response.get("candidates").and_then(|c| c.get(0));
    let parts = candidate
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array);

    let mut text = String::new();
    let mut tool_calls = Vec::new();
    for part in parts.into_iter().flatten() {
        let is_thought = part.get("thought").and_then(Value::as_bool).unwrap_or(false);
        if let Some(t) = part.get("text").and_then(Value::as_str) {
            if !is_thought {
                text.push_str(t);
            }
        }
        if let Some(call) = part.get("functionCall").and_then(tool_call_from_part) {
            tool_calls.push(call);
        }
    }

    let finish_reason = if tool_calls.is_empty() {
        candidate
            .and_then(|c| c.get("finishReason"))
            .and_then(Value::as_str)
            .map(|r| map_finish_reason(r).to_string())
    } else {
        Some("tool_calls".to_string())
    };

    let content = if text.is_empty() && !tool_calls.is_empty() { None } else { Some(text) };

    ChatCompletionResponse {
        id: random_id::completion_id(),
        object: "chat.completion".to_string(),
        created: chrono::Utc::now().timestamp(),
        model: model.to_string(),
        choices: vec![Choice {
            index: 0,
            message: ResponseMessage {
                role: "assistant".to_string(),
                content,
                tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
            },
            finish_reason,
        }],
        usage: response.get("usageMetadata").and_then(usage_from_metadata),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_response_skips_thoughts() {
        let upstream = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "Hello"},
                    {"text": " world"}
                ]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 2, "totalTokenCount": 7}
        });
        let resp = transform_response(&upstream, "gemini-3-pro");
        assert!(resp.id.starts_with("chatcmpl-"));
        assert_eq!(resp.object, "chat.completion");
        let choice = &resp.choices[0];
        assert_eq!(choice.message.content.as_deref(), Some("Hello world"));
        assert_eq!(choice.finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage, Some(Usage { prompt_tokens: 5, completion_tokens: 2, total_tokens: 7 }));
    }

    #[test]
    fn test_function_call_forces_tool_calls_reason() {
        let upstream = json!({
            "candidates": [{
                "content": {"parts": [{"functionCall": {"id": "toolu_9", "name": "read", "args": {"path": "a"}}}]},
                "finishReason": "STOP"
            }]
        });
        let resp = transform_response(&upstream, "claude-sonnet-4-5");
        let choice = &resp.choices[0];
        assert_eq!(choice.finish_reason.as_deref(), Some("tool_calls"));
        assert!(choice.message.content.is_none());
        let calls = choice.message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].id, "toolu_9");
        let args: Value = serde_json::from_str(calls[0].function.arguments.as_str().unwrap()).unwrap();
        assert_eq!(args, json!({"path": "a"}));
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(map_finish_reason("STOP"), "stop");
        assert_eq!(map_finish_reason("MAX_TOKENS"), "length");
        assert_eq!(map_finish_reason("SAFETY"), "content_filter");
        assert_eq!(map_finish_reason("RECITATION"), "content_filter");
        assert_eq!(map_finish_reason("OTHER"), "stop");
    }

    #[test]
    fn test_missing_call_id_is_generated() {
        let call = tool_call_from_part(&json!({"name": "ls"})).unwrap();
        assert!(call.id.starts_with("toolu_"));
        assert_eq!(call.function.arguments, json!("{}"));
    }

    #[test]
    fn test_usage_total_falls_back_to_sum() {
        let usage = usage_from_metadata(&json!({"promptTokenCount": 3, "candidatesTokenCount": 4})).unwrap();
        assert_eq!(usage.total_tokens, 7);
    }
}
