//! Tests for OpenAI → CloudCode request transformation

use super::*;
use cloudcode_types::protocol::openai::{
    ChatMessage, ChatTool, FunctionDefinition, ToolCall, ToolCallFunction,
};
use cloudcode_types::protocol::{PartPayload, Role};
use serde_json::json;

fn assistant_calls(calls: Vec<(&str, &str, &str)>) -> ChatMessage {
    ChatMessage {
        role: "assistant".to_string(),
        content: None,
        tool_calls: Some(
            calls
                .into_iter()
                .map(|(id, name, args)| ToolCall {
                    id: id.to_string(),
                    call_type: "function".to_string(),
                    function: ToolCallFunction { name: name.to_string(), arguments: json!(args) },
                })
                .collect(),
        ),
        ..ChatMessage::default()
    }
}

fn tool_result(tool_call_id: Option<&str>, name: Option<&str>, content: &str) -> ChatMessage {
    ChatMessage {
        role: "tool".to_string(),
        content: Some(cloudcode_types::protocol::openai::MessageContent::Text(content.to_string())),
        name: name.map(str::to_string),
        tool_call_id: tool_call_id.map(str::to_string),
        ..ChatMessage::default()
    }
}

fn response_of(part: &cloudcode_types::protocol::ContentPart) -> &cloudcode_types::protocol::FunctionResponse {
    match &part.payload {
        PartPayload::FunctionResponse(r) => r,
        other => panic!("expected functionResponse, got {:?}", other),
    }
}

#[test]
fn test_system_messages_are_extracted_and_concatenated() {
    let messages = vec![
        ChatMessage::new("system", "be brief"),
        ChatMessage::new("user", "hi"),
        ChatMessage::new("system", ""),
        ChatMessage::new("system", "be kind"),
    ];
    let (contents, system) = translate_messages(&messages).unwrap();

    assert_eq!(contents.len(), 1);
    let system = system.unwrap();
    let texts: Vec<_> = system.parts.iter().filter_map(|p| p.as_text()).collect();
    assert_eq!(texts, vec!["be brief", "be kind"]);
}

#[test]
fn test_role_mapping() {
    let messages = vec![
        ChatMessage::new("user", "q"),
        ChatMessage::new("assistant", "a"),
        ChatMessage::new("developer", "d"),
    ];
    let (contents, system) = translate_messages(&messages).unwrap();
    assert!(system.is_none());
    let roles: Vec<_> = contents.iter().map(|c| c.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Model, Role::User]);
}

#[test]
fn test_tool_calls_become_function_calls() {
    let messages = vec![
        ChatMessage::new("user", "read it"),
        assistant_calls(vec![("call_1", "read", "{\"path\":\"a.txt\"}"), ("", "list", "not json")]),
    ];
    let (contents, _) = translate_messages(&messages).unwrap();

    let parts = &contents[1].parts;
    assert_eq!(contents[1].role, Role::Model);
    assert_eq!(parts.len(), 2);
    match (&parts[0].payload, &parts[1].payload) {
        (PartPayload::FunctionCall(a), PartPayload::FunctionCall(b)) => {
            assert_eq!(a.id, "call_1");
            assert_eq!(a.args.get("path"), Some(&json!("a.txt")));
            assert!(b.id.starts_with("toolu_"));
            assert!(b.args.is_empty());
        },
        other => panic!("unexpected parts {:?}", other),
    }
}

#[test]
fn test_tool_results_are_deferred_to_one_trailing_user_turn() {
    let messages = vec![
        ChatMessage::new("user", "go"),
        assistant_calls(vec![("call_1", "read", "{}"), ("call_2", "write", "{}")]),
        tool_result(Some("call_1"), None, "file body"),
        ChatMessage::new("assistant", "thinking"),
        tool_result(Some("call_2"), Some("write"), "ok"),
    ];
    let (contents, _) = translate_messages(&messages).unwrap();

    assert_eq!(contents.len(), 4);
    let last = contents.last().unwrap();
    assert_eq!(last.role, Role::User);
    assert_eq!(last.parts.len(), 2);

    let first = response_of(&last.parts[0]);
    assert_eq!(first.name, "read");
    assert_eq!(first.id, "call_1");
    assert_eq!(first.response.get("output"), Some(&json!("file body")));
    assert_eq!(response_of(&last.parts[1]).id, "call_2");
}

#[test]
fn test_tool_result_without_id_takes_latest_call_of_same_name() {
    let messages = vec![
        assistant_calls(vec![("", "read", "{}")]),
        tool_result(None, Some("read"), "x"),
    ];
    let (contents, _) = translate_messages(&messages).unwrap();

    let call_id = match &contents[0].parts[0].payload {
        PartPayload::FunctionCall(c) => c.id.clone(),
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(response_of(&contents[1].parts[0]).id, call_id);
}

#[test]
fn test_tool_result_ids_are_not_reused() {
    let messages = vec![
        assistant_calls(vec![("a", "read", "{}"), ("b", "read", "{}")]),
        tool_result(Some("b"), None, "1"),
        tool_result(None, Some("read"), "2"),
        tool_result(None, Some("read"), "3"),
    ];
    let (contents, _) = translate_messages(&messages).unwrap();
    let parts = &contents.last().unwrap().parts;
    assert_eq!(response_of(&parts[0]).id, "b");
    assert_eq!(response_of(&parts[1]).id, "a");
    assert_eq!(response_of(&parts[2]).id, "");
}

#[test]
fn test_tool_result_without_name_is_an_error() {
    let messages = vec![ChatMessage::new("user", "x"), tool_result(Some("ghost"), None, "?")];
    let err = translate_messages(&messages).unwrap_err();
    assert_eq!(err, TranslateError::MissingFunctionName { tool_call_id: "ghost".to_string() });
}

#[test]
fn test_tool_block_content_is_joined_with_newlines() {
    let mut msg = tool_result(None, Some("read"), "");
    msg.content = Some(
        serde_json::from_value(json!([
            {"type": "text", "text": "line1"},
            {"type": "text", "text": ""},
            {"type": "text", "text": "line2"}
        ]))
        .unwrap(),
    );
    let (contents, _) = translate_messages(&[msg]).unwrap();
    assert_eq!(response_of(&contents[0].parts[0]).response["output"], json!("line1\nline2"));
}

#[test]
fn test_only_function_tools_are_declared() {
    let tools = vec![
        ChatTool {
            tool_type: "function".to_string(),
            function: Some(FunctionDefinition {
                name: "get_weather".to_string(),
                description: Some("Weather".to_string()),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"city": {"type": "string"}},
                    "required": ["city"]
                })),
            }),
        },
        ChatTool {
            tool_type: "web_search".to_string(),
            function: Some(FunctionDefinition { name: "search".to_string(), ..Default::default() }),
        },
        ChatTool {
            tool_type: "function".to_string(),
            function: Some(FunctionDefinition { name: "noop".to_string(), ..Default::default() }),
        },
    ];

    let declared = transform_tool_declarations(&tools);
    assert_eq!(declared.len(), 1);
    let fns = &declared[0].function_declarations;
    assert_eq!(fns.len(), 2);
    assert_eq!(fns[0].name, "get_weather");
    let params = fns[0].parameters.as_ref().unwrap();
    assert_eq!(params.schema_type, "OBJECT");
    assert_eq!(params.properties["city"].schema_type, "STRING");
    assert!(fns[1].parameters.is_none());

    assert!(transform_tool_declarations(&tools[1..2]).is_empty());
}

#[test]
fn test_transform_openai_request_envelope() {
    let req = ChatCompletionRequest {
        model: "gemini-3-pro-high".to_string(),
        messages: vec![ChatMessage::new("user", "hello")],
        temperature: Some(0.5),
        max_tokens: Some(256),
        ..ChatCompletionRequest::default()
    };
    let out = transform_openai_request(&req, "proj-1").unwrap();
    assert_eq!(out.model, "gemini-3-pro-high");
    assert_eq!(out.project, "proj-1");
    let cfg = out.request.generation_config.unwrap();
    assert_eq!(cfg.temperature, Some(0.5));
    assert_eq!(cfg.max_output_tokens, Some(256));

    let bare = ChatCompletionRequest { temperature: Some(0.0), ..req };
    let bare = ChatCompletionRequest { max_tokens: None, ..bare };
    assert!(transform_openai_request(&bare, "p").unwrap().request.generation_config.is_none());
}
