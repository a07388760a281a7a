use cloudcode_types::protocol::openai::ChatTool;
use cloudcode_types::protocol::{FunctionDeclaration, Tool};

use crate::proxy::common::json_schema::convert_schema;

/// Convert OpenAI tool definitions. Only `function` tools survive; all of them
/// land in a single [`Tool`] group.
pub fn transform_tool_declarations(tools: &[ChatTool]) -> Vec<Tool> {
    let declarations: Vec<FunctionDeclaration> = tools
        .iter()
        .filter(|t| t.tool_type.eq_ignore_ascii_case("function"))
        .filter_map(|t| t.function.as_ref())
        .map(|f| FunctionDeclaration {
            name: f.name.clone(),
            description: f.description.clone().filter(|d| !d.is_empty()),
            parameters: f.parameters.as_ref().and_then(convert_schema),
        })
        .collect();

    if declarations.is_empty() {
        tracing::debug!(tools = tools.len(), "No function tools to forward");
        return Vec::new();
    }
    vec![Tool { function_declarations: declarations }]
}
