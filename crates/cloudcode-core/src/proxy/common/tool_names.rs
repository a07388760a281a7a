//! Tool name normalization for declarations built from loosely shaped tool payloads.

/// Upstream limit on function declaration names.
pub const MAX_TOOL_NAME_LEN: usize = 64;

/// Trim, replace anything outside `[A-Za-z0-9_-]` with `_`, cap at 64 chars.
pub fn sanitize_tool_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .take(MAX_TOOL_NAME_LEN)
        .collect()
}
