// v1internal envelope unwrapping for unary bodies and SSE data lines.
use serde_json::Value;

/// SSE data line marker.
pub const SSE_DATA_PREFIX: &str = "data: ";

/// Flatten a CloudCode envelope: top-level keys except `response`, then every
/// key of the nested `response` object on top. Values without a nested
/// `response` object are returned unchanged.
pub fn unwrap_response(payload: Value) -> Value {
    match payload {
        Value::Object(mut outer) if outer.get("response").is_some_and(Value::is_object) => {
            if let Some(Value::Object(inner)) = outer.remove("response") {
                outer.extend(inner);
            }
            Value::Object(outer)
        },
        other => other,
    }
}

/// Rewrite one SSE line for Gemini-style clients.
///
/// Non-data lines and data lines whose payload is not JSON pass through verbatim.
pub fn transform_sse_line(line: &str) -> String {
    let Some(payload) = line.strip_prefix(SSE_DATA_PREFIX) else {
        return line.to_string();
    };
    match serde_json::from_str::<Value>(payload) {
        Ok(value) => match serde_json::to_string(&unwrap_response(value)) {
            Ok(json) => format!("{}{}", SSE_DATA_PREFIX, json),
            Err(_) => line.to_string(),
        },
        Err(e) => {
            tracing::debug!(error = %e, "SSE data line is not JSON, forwarding unchanged");
            line.to_string()
        },
    }
}

#[cfg(test)]
#[path = "wrapper_tests.rs"]
mod wrapper_tests;
