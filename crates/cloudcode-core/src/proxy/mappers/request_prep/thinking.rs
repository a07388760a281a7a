use cloudcode_types::protocol::{GenerationConfig, ThinkingConfig};

/// Gemini models named `*-low` / `*-high` get a matching `thinkingLevel`.
///
/// `thinkingBudget` is cleared whenever a level is set: upstream rejects the pair.
pub fn apply_thinking_preset(model: &str, config: &mut Option<GenerationConfig>) {
    let model_lower = model.to_lowercase();
    if !model_lower.contains("gemini") {
        return;
    }
    let level = if model_lower.contains("-low") {
        "low"
    } else if model_lower.contains("-high") {
        "high"
    } else {
        return;
    };

    tracing::info!(model, thinking_level = level, "Applied Gemini thinking preset");

    let thinking = config
        .get_or_insert_with(GenerationConfig::default)
        .thinking_config
        .get_or_insert_with(ThinkingConfig::default);
    thinking.thinking_level = Some(level.to_string());
    thinking.thinking_budget = None;
}
