use cloudcode_types::protocol::openai::{ChatMessage, MessageContent, ToolCall};
use cloudcode_types::protocol::{
    Content, ContentPart, FunctionCall, FunctionResponse, Role, SystemInstruction,
};
use cloudcode_types::TranslateError;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::proxy::common::random_id;

/// Name/ID bookkeeping shared across one message list.
#[derive(Default)]
struct ToolCallRegistry {
    name_by_id: HashMap<String, String>,
    /// Unanswered call ids per function name, oldest first.
    pending_by_name: HashMap<String, Vec<String>>,
}

impl ToolCallRegistry {
    /// Seed id -> name from every explicit assistant call id up front.
    fn prescan(messages: &[ChatMessage]) -> Self {
        let mut registry = Self::default();
        for call in messages
            .iter()
            .filter(|m| m.role == "assistant")
            .filter_map(|m| m.tool_calls.as_ref())
            .flatten()
        {
            let id = call.id.trim();
            if !id.is_empty() && !call.function.name.is_empty() {
                registry.name_by_id.insert(id.to_string(), call.function.name.clone());
            }
        }
        registry
    }

    fn record_call(&mut self, id: &str, name: &str) {
        if name.is_empty() {
            return;
        }
        self.name_by_id.insert(id.to_string(), name.to_string());
        self.pending_by_name.entry(name.to_string()).or_default().push(id.to_string());
    }

    fn resolve_name(&self, msg: &ChatMessage, tool_call_id: &str) -> Option<String> {
        msg.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| self.name_by_id.get(tool_call_id).cloned())
    }

    /// Explicit ids are consumed; otherwise the most recent unanswered call of `name` is used.
    fn resolve_id(&mut self, name: &str, tool_call_id: &str) -> String {
        let pending = self.pending_by_name.entry(name.to_string()).or_default();
        if !tool_call_id.is_empty() {
            if let Some(pos) = pending.iter().position(|id| id == tool_call_id) {
                pending.remove(pos);
            }
            return tool_call_id.to_string();
        }
        pending.pop().unwrap_or_default()
    }
}

/// Convert OpenAI messages into internal contents plus the extracted system instruction.
///
/// Tool results never interleave: every `tool` message is deferred and the
/// resulting function responses are appended as one trailing `user` turn.
pub fn translate_messages(
    messages: &[ChatMessage],
) -> Result<(Vec<Content>, Option<SystemInstruction>), TranslateError> {
    let mut registry = ToolCallRegistry::prescan(messages);
    let mut contents = Vec::new();
    let mut system: Option<SystemInstruction> = None;
    let mut deferred_tool_parts = Vec::new();

    for msg in messages {
        match msg.role.as_str() {
            "system" => {
                let instruction = system.get_or_insert_with(SystemInstruction::default);
                if let Some(content) = &msg.content {
                    instruction.parts.extend(
                        content.texts().into_iter().filter(|t| !t.is_empty()).map(ContentPart::text),
                    );
                }
            },
            "tool" => deferred_tool_parts.push(transform_tool_response(msg, &mut registry)?),
            _ => {
                let role = if msg.role == "assistant" { Role::Model } else { Role::User };
                let mut parts: Vec<ContentPart> = msg
                    .content
                    .as_ref()
                    .map(|c| c.texts().into_iter().map(ContentPart::text).collect())
                    .unwrap_or_default();

                if msg.role == "assistant" {
                    for call in msg.tool_calls.iter().flatten() {
                        parts.push(transform_tool_call(call, &mut registry));
                    }
                }

                if !parts.is_empty() {
                    contents.push(Content::new(role, parts));
                }
            },
        }
    }

    if !deferred_tool_parts.is_empty() {
        contents.push(Content::new(Role::User, deferred_tool_parts));
    }

    Ok((contents, system))
}

fn transform_tool_call(call: &ToolCall, registry: &mut ToolCallRegistry) -> ContentPart {
    let id = match call.id.trim() {
        "" => random_id::tool_call_id(),
        explicit => explicit.to_string(),
    };
    registry.record_call(&id, &call.function.name);

    ContentPart::function_call(FunctionCall {
        id,
        name: call.function.name.clone(),
        args: parse_arguments(&call.function.arguments),
    })
}

/// Arguments arrive JSON-encoded; anything unparsable becomes `{}`.
fn parse_arguments(raw: &Value) -> Map<String, Value> {
    match raw {
        Value::Object(map) => map.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

fn transform_tool_response(
    msg: &ChatMessage,
    registry: &mut ToolCallRegistry,
) -> Result<ContentPart, TranslateError> {
    let tool_call_id = msg.tool_call_id.as_deref().map(str::trim).unwrap_or_default();
    let name = registry.resolve_name(msg, tool_call_id).ok_or_else(|| {
        TranslateError::MissingFunctionName { tool_call_id: tool_call_id.to_string() }
    })?;
    let id = registry.resolve_id(&name, tool_call_id);
    let output = tool_output(msg.content.as_ref());

    tracing::debug!(
        function = %name,
        tool_call_id = %id,
        response_len = output.len(),
        "Forwarding tool response"
    );

    let mut response = Map::new();
    response.insert("output".to_string(), Value::String(output));
    Ok(ContentPart::function_response(FunctionResponse { id, name, response }))
}

/// String content verbatim; block content joins non-empty text blocks with newlines.
fn tool_output(content: Option<&MessageContent>) -> String {
    match content {
        Some(MessageContent::Text(t)) => t.clone(),
        Some(blocks) => {
            blocks.texts().into_iter().filter(|t| !t.is_empty()).collect::<Vec<_>>().join("\n")
        },
        None => String::new(),
    }
}
