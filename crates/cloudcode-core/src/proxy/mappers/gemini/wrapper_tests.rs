use super::*;
use serde_json::json;

#[test]
fn test_unwrap_merges_nested_over_top_level() {
    let out = unwrap_response(json!({"a": 1, "response": {"a": 2, "b": 3}}));
    assert_eq!(out, json!({"a": 2, "b": 3}));
}

#[test]
fn test_unwrap_keeps_sibling_keys() {
    let out = unwrap_response(json!({"traceId": "t1", "response": {"candidates": []}}));
    assert_eq!(out, json!({"traceId": "t1", "candidates": []}));
}

#[test]
fn test_unwrap_is_idempotent_on_flat_payloads() {
    let flat = json!({"candidates": [{"content": {"parts": [{"text": "hi"}]}}]});
    assert_eq!(unwrap_response(flat.clone()), flat);
    assert_eq!(unwrap_response(unwrap_response(flat.clone())), flat);

    let odd = json!({"response": "not an object"});
    assert_eq!(unwrap_response(odd.clone()), odd);
}

#[test]
fn test_sse_data_line_is_flattened() {
    let line = r#"data: {"a":1,"response":{"a":2,"b":3}}"#;
    let out = transform_sse_line(line);
    let payload: Value = serde_json::from_str(out.strip_prefix("data: ").unwrap()).unwrap();
    assert_eq!(payload, json!({"a": 2, "b": 3}));
}

#[test]
fn test_non_data_lines_pass_through() {
    for line in ["", "event: message", ": keepalive", "id: 7"] {
        assert_eq!(transform_sse_line(line), line);
    }
}

#[test]
fn test_unparsable_data_line_passes_through() {
    assert_eq!(transform_sse_line("data: [DONE]"), "data: [DONE]");
    assert_eq!(transform_sse_line("data: {broken"), "data: {broken");
}
