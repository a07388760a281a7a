// Identifier generators. Prefixes are part of the upstream contract.

use uuid::Uuid;

/// Tool-call id for calls that arrive without one.
pub fn tool_call_id() -> String {
    format!("toolu_{}", Uuid::new_v4())
}

/// CloudCode request id.
pub fn agent_request_id() -> String {
    format!("agent-{}", Uuid::new_v4())
}

/// OpenAI completion id.
pub fn completion_id() -> String {
    format!("chatcmpl-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_and_uniqueness() {
        let a = tool_call_id();
        let b = tool_call_id();
        assert!(a.starts_with("toolu_"));
        assert_ne!(a, b);
        assert!(agent_request_id().starts_with("agent-"));
        assert!(completion_id().starts_with("chatcmpl-"));
    }
}
