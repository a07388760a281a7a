use super::*;
use cloudcode_types::protocol::{
    Content, ContentPart, FunctionCall, FunctionDeclaration, FunctionResponse, GeminiInternalRequest,
    GenerationConfig, PartPayload, Role, SystemInstruction, ThinkingConfig,
};
use serde_json::Map;

fn call(id: &str, name: &str) -> ContentPart {
    ContentPart::function_call(FunctionCall { id: id.to_string(), name: name.to_string(), args: Map::new() })
}

fn response(id: &str, name: &str) -> ContentPart {
    ContentPart::function_response(FunctionResponse {
        id: id.to_string(),
        name: name.to_string(),
        response: Map::new(),
    })
}

fn response_ids(contents: &[Content]) -> Vec<String> {
    contents
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| match &p.payload {
            PartPayload::FunctionResponse(r) => Some(r.id.clone()),
            _ => None,
        })
        .collect()
}

fn user(text: &str) -> Content {
    Content::new(Role::User, vec![ContentPart::text(text)])
}

#[test]
fn test_response_ids_prefer_same_name() {
    let mut contents = vec![
        Content::new(Role::Model, vec![call("1", "x"), call("2", "y")]),
        Content::new(Role::User, vec![response("", "y"), response("", "x")]),
    ];
    assert_eq!(reconcile_response_ids(&mut contents), 2);
    assert_eq!(response_ids(&contents), vec!["2", "1"]);
}

#[test]
fn test_response_ids_fall_back_to_global_order() {
    let mut contents = vec![
        Content::new(Role::Model, vec![call("a", "read"), call("b", "write")]),
        Content::new(Role::User, vec![response("", "unknown"), response("", "write")]),
    ];
    reconcile_response_ids(&mut contents);
    // "unknown" takes the oldest call; "write" still finds its own.
    assert_eq!(response_ids(&contents), vec!["a", "b"]);
}

#[test]
fn test_global_fallback_consumes_name_queue() {
    let mut contents = vec![
        Content::new(Role::Model, vec![call("a", "read"), call("b", "read")]),
        Content::new(Role::User, vec![response("", "other"), response("", "read"), response("", "read")]),
    ];
    assert_eq!(reconcile_response_ids(&mut contents), 2);
    assert_eq!(response_ids(&contents), vec!["a", "b", ""]);
}

#[test]
fn test_explicit_response_id_is_not_reused() {
    let mut contents = vec![
        Content::new(Role::Model, vec![call("1", "x"), call("2", "x")]),
        Content::new(Role::User, vec![response("1", "x"), response("", "x")]),
    ];
    assert_eq!(reconcile_response_ids(&mut contents), 1);
    assert_eq!(response_ids(&contents), vec!["1", "2"]);
}

#[test]
fn test_repeated_call_id_is_tracked_per_call() {
    let mut contents = vec![
        Content::new(Role::Model, vec![call("dup", "read"), call("dup", "write")]),
        Content::new(
            Role::User,
            vec![response("dup", "read"), response("", "write"), response("", "read")],
        ),
    ];
    // Each call answers once; nothing is left for the trailing response.
    assert_eq!(reconcile_response_ids(&mut contents), 1);
    assert_eq!(response_ids(&contents), vec!["dup", "dup", ""]);
}

#[test]
fn test_explicit_response_id_under_other_name_frees_owner_queue() {
    let mut contents = vec![
        Content::new(Role::Model, vec![call("1", "x"), call("2", "x")]),
        Content::new(Role::User, vec![response("1", "renamed"), response("", "x")]),
    ];
    assert_eq!(reconcile_response_ids(&mut contents), 1);
    assert_eq!(response_ids(&contents), vec!["1", "2"]);
}

#[test]
fn test_backfill_call_ids() {
    let mut contents = vec![Content::new(Role::Model, vec![call("  ", "x"), call("keep", "y")])];
    assert_eq!(backfill_call_ids(&mut contents), 1);
    match &contents[0].parts[0].payload {
        PartPayload::FunctionCall(c) => assert!(c.id.starts_with("toolu_")),
        other => panic!("unexpected payload {:?}", other),
    }
    match &contents[0].parts[1].payload {
        PartPayload::FunctionCall(c) => assert_eq!(c.id, "keep"),
        other => panic!("unexpected payload {:?}", other),
    }
}

#[test]
fn test_sanitize_drops_empty_parts_and_contents() {
    let mut contents = vec![
        Content::new(Role::User, vec![ContentPart::text("")]),
        Content::new(Role::Model, vec![call("", "x")]),
        Content::new(Role::User, vec![ContentPart::text(""), ContentPart::text("hi")]),
        Content::new(Role::User, vec![]),
    ];
    assert_eq!(sanitize_contents(&mut contents), (2, 2));
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0].role, Role::Model);
    assert_eq!(contents[1].parts.len(), 1);
}

#[test]
fn test_session_id_is_deterministic() {
    let a = vec![Content::new(Role::Model, vec![ContentPart::text("preface")]), user("hello")];
    let b = vec![user("hello"), user("different later turn")];
    let id_a = derive_session_id(&a);
    assert_eq!(id_a.len(), 32);
    assert!(id_a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(id_a, derive_session_id(&b));
    assert_ne!(id_a, derive_session_id(&[user("hello!")]));
}

#[test]
fn test_session_id_joins_text_parts_with_newline() {
    let split = vec![Content::new(Role::User, vec![ContentPart::text("a"), ContentPart::text("b")])];
    assert_eq!(derive_session_id(&split), derive_session_id(&[user("a\nb")]));
}

#[test]
fn test_session_id_random_without_user_text() {
    let contents = vec![Content::new(Role::User, vec![call("1", "x")])];
    assert_ne!(derive_session_id(&contents), derive_session_id(&contents));
    assert_ne!(derive_session_id(&[]), derive_session_id(&[]));
}

#[test]
fn test_thinking_preset() {
    let mut config = Some(GenerationConfig {
        thinking_config: Some(ThinkingConfig { thinking_budget: Some(0), ..ThinkingConfig::default() }),
        ..GenerationConfig::default()
    });
    apply_thinking_preset("Gemini-3-Pro-High", &mut config);
    let thinking = config.unwrap().thinking_config.unwrap();
    assert_eq!(thinking.thinking_level.as_deref(), Some("high"));
    assert_eq!(thinking.thinking_budget, None);

    let mut config = None;
    apply_thinking_preset("gemini-3-pro-low", &mut config);
    assert_eq!(config.unwrap().thinking_config.unwrap().thinking_level.as_deref(), Some("low"));

    let mut config = None;
    apply_thinking_preset("claude-opus-4-5-high", &mut config);
    assert!(config.is_none());
    apply_thinking_preset("gemini-3-pro", &mut config);
    assert!(config.is_none());
}

#[test]
fn test_system_instruction_layout() {
    let existing = SystemInstruction {
        role: Role::Model,
        parts: vec![ContentPart::text("be brief"), ContentPart::text(""), call("1", "x")],
    };
    let built = build_system_instruction(Some(existing));
    assert_eq!(built.role, Role::User);
    let texts: Vec<_> = built.parts.iter().filter_map(ContentPart::as_text).collect();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0], SYSTEM_PREAMBLE);
    assert_eq!(texts[1], format!("Please ignore the following [ignore]{}[/ignore]", SYSTEM_PREAMBLE));
    assert_eq!(texts[2], "be brief");

    assert_eq!(build_system_instruction(None).parts.len(), 2);
}

#[test]
fn test_prepare_request_applies_all_steps() {
    let inner = GeminiInternalRequest {
        contents: vec![
            user("start"),
            Content::new(Role::User, vec![ContentPart::text("")]),
            Content::new(Role::Model, vec![call("", "read")]),
            Content::new(Role::User, vec![response("", "read")]),
        ],
        tools: vec![Tool {
            function_declarations: vec![FunctionDeclaration { name: "read".to_string(), ..Default::default() }],
        }],
        ..GeminiInternalRequest::default()
    };
    let mut req = GenerateContentRequest::new("gemini-3-pro-low", "proj", inner);
    prepare_request(&mut req);

    assert_eq!(req.user_agent, "antigravity");
    assert_eq!(req.request_type, "agent");
    assert!(req.request_id.starts_with("agent-"));
    assert_eq!(req.request.session_id, Some(derive_session_id(&[user("start")])));
    assert_eq!(req.request.contents.len(), 3);
    assert_eq!(req.request.tools[0].function_declarations[0].parameters, Some(ParameterSchema::object()));

    let call_id = match &req.request.contents[1].parts[0].payload {
        PartPayload::FunctionCall(c) => c.id.clone(),
        other => panic!("unexpected payload {:?}", other),
    };
    assert!(call_id.starts_with("toolu_"));
    assert_eq!(response_ids(&req.request.contents), vec![call_id]);

    let thinking = req.request.generation_config.unwrap().thinking_config.unwrap();
    assert_eq!(thinking.thinking_level.as_deref(), Some("low"));
    assert_eq!(req.request.system_instruction.unwrap().parts.len(), 2);
}

#[test]
fn test_prepare_request_keeps_explicit_ids() {
    let inner = GeminiInternalRequest {
        contents: vec![user("hi")],
        session_id: Some("client-session".to_string()),
        ..GeminiInternalRequest::default()
    };
    let mut req = GenerateContentRequest::new("claude-sonnet-4-5", "proj", inner);
    req.request_id = "agent-fixed".to_string();
    prepare_request(&mut req);
    assert_eq!(req.request_id, "agent-fixed");
    assert_eq!(req.request.session_id.as_deref(), Some("client-session"));
    assert!(req.request.generation_config.is_none());
}
