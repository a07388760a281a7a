// CloudCode SSE lines → OpenAI `chat.completion.chunk` frames.

use cloudcode_types::protocol::openai::{ChatCompletionChunk, ChunkChoice, Delta, ToolCallDelta, Usage};
use serde_json::Value;

use super::response::{map_finish_reason, tool_call_from_part, usage_from_metadata};
use crate::proxy::common::random_id;
use crate::proxy::mappers::gemini::{unwrap_response, SSE_DATA_PREFIX};

/// Terminal frame of every OpenAI stream.
pub const DONE_FRAME: &str = "data: [DONE]\n\n";

/// Per-stream conversion state. One instance per client request.
pub struct ChatStreamState {
    id: String,
    created: i64,
    model: String,
    role_sent: bool,
    next_tool_index: u32,
    finished: bool,
}

impl ChatStreamState {
    pub fn new(model: &str) -> Self {
        Self {
            id: random_id::completion_id(),
            created: chrono::Utc::now().timestamp(),
            model: model.to_string(),
            role_sent: false,
            next_tool_index: 0,
            finished: false,
        }
    }

    /// Convert one upstream line into zero or more `data: ...\n\n` frames.
    /// Non-data lines and unparsable payloads produce nothing.
    pub fn process_line(&mut self, line: &str) -> Vec<String> {
        let Some(payload) = line.strip_prefix(SSE_DATA_PREFIX) else {
            return Vec::new();
        };
        let payload = match serde_json::from_str::<Value>(payload.trim()) {
            Ok(v) => unwrap_response(v),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unparsable SSE payload");
                return Vec::new();
            },
        };

        let Some(candidate) = payload.get("candidates").and_then(|c| c.get(0)) else {
            return Vec::new();
        };
        let parts = candidate
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(Value::as_array);

        let mut frames = Vec::new();
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
                tool_calls.push(ToolCallDelta {
                    index: self.next_tool_index,
                    id: call.id,
                    call_type: call.call_type,
                    function: call.function,
                });
                self.next_tool_index += 1;
            }
        }

        if !text.is_empty() || !tool_calls.is_empty() {
            let delta = Delta {
                role: self.take_role(),
                content: (!text.is_empty()).then_some(text),
                tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
            };
            frames.push(self.frame(delta, None, None));
        }

        if let Some(reason) = candidate.get("finishReason").and_then(Value::as_str) {
            let reason = if self.next_tool_index > 0 { "tool_calls" } else { map_finish_reason(reason) };
            let usage = payload.get("usageMetadata").and_then(usage_from_metadata);
            let delta = Delta { role: self.take_role(), ..Delta::default() };
            frames.push(self.frame(delta, Some(reason), usage));
            self.finished = true;
        }

        frames
    }

    /// Whether a finish chunk has been emitted.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn take_role(&mut self) -> Option<String> {
        if self.role_sent {
            return None;
        }
        self.role_sent = true;
        Some("assistant".to_string())
    }

    fn frame(&self, delta: Delta, finish_reason: Option<&str>, usage: Option<Usage>) -> String {
        let chunk = ChatCompletionChunk {
            id: self.id.clone(),
            object: "chat.completion.chunk".to_string(),
            created: self.created,
            model: self.model.clone(),
            choices: vec![ChunkChoice {
                index: 0,
                delta,
                finish_reason: finish_reason.map(str::to_string),
            }],
            usage,
        };
        match serde_json::to_string(&chunk) {
            Ok(json) => format!("data: {}\n\n", json),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize stream chunk");
                String::new()
            },
        }
    }
}
