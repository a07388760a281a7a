use serde_json::{Map, Value};

/// Sub-schemas of an `anyOf`/`oneOf` union, `anyOf` first.
pub(super) fn union_branches(schema: &Map<String, Value>) -> Option<&Vec<Value>> {
    schema
        .get("anyOf")
        .and_then(Value::as_array)
        .or_else(|| schema.get("oneOf").and_then(Value::as_array))
}

/// Pick the branch to keep: the first array-typed branch, else the first object branch.
pub(super) fn select_branch(branches: &[Value]) -> Option<&Map<String, Value>> {
    let objects = || branches.iter().filter_map(Value::as_object);
    objects().find(|b| is_array_branch(b)).or_else(|| objects().next())
}

fn is_array_branch(branch: &Map<String, Value>) -> bool {
    match branch.get("type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("array"),
        _ => false,
    }
}
