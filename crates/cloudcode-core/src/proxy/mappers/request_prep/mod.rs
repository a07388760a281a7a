//! Outbound request preparation.
//!
//! Every `GenerateContentRequest` passes through [`prepare_request`] right
//! before dispatch, whichever inbound API produced it. The steps run in a
//! fixed order:
//!
//! 1. agent tags and request id
//! 2. session id
//! 3. empty part / content pruning
//! 4. Gemini thinking preset
//! 5. default tool parameter schemas
//! 6. function call id backfill
//! 7. function response id reconciliation
//! 8. system instruction synthesis

mod sanitize;
mod session;
mod system_instruction;
mod thinking;
mod tool_ids;

#[cfg(test)]
mod tests;

pub use sanitize::sanitize_contents;
pub use session::derive_session_id;
pub use system_instruction::{build_system_instruction, SYSTEM_PREAMBLE};
pub use thinking::apply_thinking_preset;
pub use tool_ids::{backfill_call_ids, reconcile_response_ids};

use cloudcode_types::protocol::{GenerateContentRequest, ParameterSchema, Tool};

use crate::proxy::common::random_id;

/// Value of the envelope `userAgent` field.
pub const REQUEST_USER_AGENT: &str = "antigravity";
/// Value of the envelope `requestType` field.
pub const REQUEST_TYPE_AGENT: &str = "agent";

/// Apply all preparation steps in place.
pub fn prepare_request(req: &mut GenerateContentRequest) {
    req.user_agent = REQUEST_USER_AGENT.to_string();
    req.request_type = REQUEST_TYPE_AGENT.to_string();
    if req.request_id.is_empty() {
        req.request_id = random_id::agent_request_id();
    }

    let inner = &mut req.request;
    if inner.session_id.as_deref().map_or(true, str::is_empty) {
        inner.session_id = Some(derive_session_id(&inner.contents));
    }

    let (pruned_parts, pruned_contents) = sanitize_contents(&mut inner.contents);
    if pruned_parts > 0 || pruned_contents > 0 {
        tracing::warn!(pruned_parts, pruned_contents, "Removed empty content parts from request");
    }

    apply_thinking_preset(&req.model, &mut req.request.generation_config);

    let inner = &mut req.request;
    let defaulted = fill_missing_parameters(&mut inner.tools);
    if !defaulted.is_empty() {
        tracing::warn!(
            missing_parameters = defaulted.len(),
            missing_names = %defaulted.iter().take(6).cloned().collect::<Vec<_>>().join(","),
            "Defaulted missing parameters in request tools"
        );
    }

    let missing_calls = backfill_call_ids(&mut inner.contents);
    if missing_calls > 0 {
        tracing::warn!(missing_ids = missing_calls, "Defaulted missing functionCall IDs");
    }

    let missing_responses = reconcile_response_ids(&mut inner.contents);
    if missing_responses > 0 {
        tracing::warn!(missing_ids = missing_responses, "Defaulted missing functionResponse IDs");
    }

    inner.system_instruction = Some(build_system_instruction(inner.system_instruction.take()));
}

/// Give every declaration without parameters `{type: OBJECT}`; returns the affected names.
fn fill_missing_parameters(tools: &mut [Tool]) -> Vec<String> {
    let mut defaulted = Vec::new();
    for decl in tools.iter_mut().flat_map(|t| t.function_declarations.iter_mut()) {
        if decl.parameters.is_none() {
            decl.parameters = Some(ParameterSchema::object());
            defaulted.push(decl.name.clone());
        }
    }
    defaulted
}
