use cloudcode_types::protocol::ParameterSchema;
use serde_json::{Map, Value};

use super::union::{select_branch, union_branches};

/// Convert a JSON Schema value into a [`ParameterSchema`].
///
/// Returns `None` for anything that is not a JSON object (including `null`).
/// Unions collapse to a single branch; array branches win because unions are
/// mostly "value or list of values".
pub fn convert_schema(schema: &Value) -> Option<ParameterSchema> {
    schema.as_object().map(convert_object)
}

fn convert_object(schema: &Map<String, Value>) -> ParameterSchema {
    if let Some(branch) = union_branches(schema).and_then(|b| select_branch(b)) {
        let mut converted = convert_object(branch);
        if converted.description.is_none() {
            converted.description = string_field(schema, "description");
        }
        return converted;
    }

    let mut out = ParameterSchema {
        schema_type: schema_type(schema.get("type")),
        description: string_field(schema, "description"),
        required: string_items(schema.get("required")),
        enum_values: string_items(schema.get("enum")),
        ..ParameterSchema::default()
    };

    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        for (name, prop) in props {
            if let Some(p) = prop.as_object() {
                out.properties.insert(name.clone(), convert_object(p));
            }
        }
    }

    if let Some(items) = schema.get("items").and_then(Value::as_object) {
        out.items = Some(Box::new(convert_object(items)));
    }

    out
}

/// Upper-cased type. For `["string", "null"]` style lists the first non-null entry is used.
fn schema_type(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(t)) => t.to_uppercase(),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| !t.eq_ignore_ascii_case("null"))
            .map(str::to_uppercase)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn string_field(schema: &Map<String, Value>, key: &str) -> Option<String> {
    schema.get(key).and_then(Value::as_str).map(str::to_string)
}

fn string_items(raw: Option<&Value>) -> Vec<String> {
    raw.and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}
