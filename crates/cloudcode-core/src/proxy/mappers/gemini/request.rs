//! Lenient parsing of Gemini-style request bodies.
//!
//! Clients send a mix of camelCase, snake_case and non-Gemini tool shapes.
//! Each logical field has a fixed alias list, tried in order; the first
//! present, non-null spelling wins.

use cloudcode_types::protocol::{
    Content, ContentPart, FunctionDeclaration, GeminiInternalRequest, ParameterSchema, Role,
    SystemInstruction, Tool,
};
use cloudcode_types::TranslateError;
use serde_json::{Map, Value};

use crate::proxy::common::json_schema::convert_schema;
use crate::proxy::common::tool_names::sanitize_tool_name;

const SYSTEM_INSTRUCTION: &[&str] = &["systemInstruction", "system_instruction"];
const GENERATION_CONFIG: &[&str] = &["generationConfig", "generation_config"];
const TOOL_CONFIG: &[&str] = &["toolConfig", "tool_config"];
const SAFETY_SETTINGS: &[&str] = &["safetySettings", "safety_settings"];
const SESSION_ID: &[&str] = &["sessionId", "session_id"];
const FUNCTION_DECLARATIONS: &[&str] = &["functionDeclarations", "function_declarations"];
const PARAMETER_SCHEMA: &[&str] =
    &["parameters", "parametersJsonSchema", "parameters_json_schema", "input_schema", "inputSchema"];
const NESTED_TOOL: &[&str] = &["custom", "function"];

/// First non-null value among `aliases`.
fn pick<'a>(obj: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|key| obj.get(*key).filter(|v| !v.is_null()))
}

fn pick_str<'a>(obj: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a str> {
    pick(obj, aliases).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a Gemini `generateContent` body into the internal request shape.
pub fn parse_internal_request(body: &Value) -> Result<GeminiInternalRequest, TranslateError> {
    let obj = body.as_object().ok_or_else(|| {
        TranslateError::InvalidRequest("request body must be a JSON object".to_string())
    })?;

    let generation_config = pick(obj, GENERATION_CONFIG)
        .map(|v| serde_json::from_value(v.clone()))
        .transpose()
        .map_err(|e| TranslateError::InvalidRequest(format!("generationConfig: {}", e)))?;

    Ok(GeminiInternalRequest {
        contents: parse_contents(obj.get("contents"))?,
        system_instruction: pick(obj, SYSTEM_INSTRUCTION).map(parse_system_instruction),
        tools: parse_tools(obj.get("tools")),
        tool_config: pick(obj, TOOL_CONFIG).cloned(),
        generation_config,
        safety_settings: pick(obj, SAFETY_SETTINGS).cloned(),
        session_id: pick_str(obj, SESSION_ID).map(str::to_string),
    })
}

fn parse_contents(raw: Option<&Value>) -> Result<Vec<Content>, TranslateError> {
    let items = match raw {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(TranslateError::InvalidRequest("contents must be an array".to_string()))
        },
    };

    items
        .iter()
        .map(|item| {
            let obj = item.as_object().ok_or_else(|| {
                TranslateError::InvalidRequest("each content must be an object".to_string())
            })?;
            let role = obj.get("role").and_then(Value::as_str).map(Role::parse).unwrap_or_default();
            Ok(Content::new(role, parse_parts(obj.get("parts"))))
        })
        .collect()
}

/// Parts without a text or function payload (inline data, bare signatures) are dropped.
fn parse_parts(raw: Option<&Value>) -> Vec<ContentPart> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<ContentPart>(item.clone()) {
            Ok(part) => parts.push(part),
            Err(e) => tracing::debug!(error = %e, "Dropping unsupported content part"),
        }
    }
    parts
}

fn parse_system_instruction(raw: &Value) -> SystemInstruction {
    match raw {
        Value::String(text) => {
            SystemInstruction { role: Role::User, parts: vec![ContentPart::text(text.clone())] }
        },
        Value::Object(obj) => SystemInstruction { role: Role::User, parts: parse_parts(obj.get("parts")) },
        _ => SystemInstruction::default(),
    }
}

/// `tools` may be one object or an array. Declaration groups are kept as
/// groups; loose tool objects are collected into one extra group.
fn parse_tools(raw: Option<&Value>) -> Vec<Tool> {
    let items: Vec<&Map<String, Value>> = match raw {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        Some(Value::Object(obj)) => vec![obj],
        _ => return Vec::new(),
    };

    let mut tools = Vec::new();
    let mut loose = Vec::new();
    let mut skipped = 0usize;

    for item in items {
        if let Some(decls) = pick(item, FUNCTION_DECLARATIONS).and_then(Value::as_array) {
            let function_declarations: Vec<_> =
                decls.iter().filter_map(Value::as_object).filter_map(parse_declaration).collect();
            if !function_declarations.is_empty() {
                tools.push(Tool { function_declarations });
            }
        } else if let Some(decl) = parse_loose_tool(item) {
            loose.push(decl);
        } else {
            skipped += 1;
        }
    }

    if !loose.is_empty() {
        tracing::debug!(
            converted = loose.len(),
            names = %preview_names(&loose),
            "Converted loose tool definitions to function declarations"
        );
        tools.push(Tool { function_declarations: loose });
    }
    if skipped > 0 {
        tracing::warn!(skipped, "Ignored tool entries without a usable function name");
    }
    tools
}

fn parse_declaration(obj: &Map<String, Value>) -> Option<FunctionDeclaration> {
    let name = pick_str(obj, &["name"])?;
    Some(FunctionDeclaration {
        name: name.to_string(),
        description: pick_str(obj, &["description"]).map(str::to_string),
        parameters: pick(obj, PARAMETER_SCHEMA).and_then(convert_schema),
    })
}

/// A tool object in some other vendor's shape: fields on the object itself,
/// or under `custom` / `function`. Top-level fields win.
fn parse_loose_tool(item: &Map<String, Value>) -> Option<FunctionDeclaration> {
    let nested: Vec<&Map<String, Value>> =
        NESTED_TOOL.iter().filter_map(|key| item.get(*key).and_then(Value::as_object)).collect();
    let sources = std::iter::once(item).chain(nested);

    let mut name = None;
    let mut description = None;
    let mut schema = None;
    for source in sources {
        name = name.or_else(|| pick_str(source, &["name"]));
        description = description.or_else(|| pick_str(source, &["description"]));
        schema = schema.or_else(|| {
            pick(source, &["input_schema", "inputSchema", "parameters"]).filter(|v| v.is_object())
        });
    }

    let name = sanitize_tool_name(name?);
    if name.is_empty() {
        return None;
    }
    Some(FunctionDeclaration {
        name,
        description: description.map(str::to_string),
        parameters: Some(schema.and_then(convert_schema).unwrap_or_else(ParameterSchema::object)),
    })
}

fn preview_names(decls: &[FunctionDeclaration]) -> String {
    decls.iter().take(6).map(|d| d.name.as_str()).collect::<Vec<_>>().join(",")
}
