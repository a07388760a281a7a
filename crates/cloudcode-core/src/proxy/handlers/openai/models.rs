// OpenAI models listing
use axum::{
    extract::{Path, State},
    Json,
};
use cloudcode_types::protocol::openai::{ModelList, ModelObject};
use cloudcode_types::protocol::FetchAvailableModelsResponse;
use cloudcode_types::ModelFamily;

use crate::proxy::handlers::errors::ApiError;
use crate::proxy::server::AppState;

/// Claude and Gemini models only, sorted by id.
pub fn build_model_list(available: &FetchAvailableModelsResponse) -> ModelList {
    let mut data: Vec<ModelObject> = available
        .models
        .iter()
        .filter_map(|(id, model)| {
            let family = ModelFamily::from_model_name(id);
            family.is_supported().then(|| ModelObject {
                id: id.clone(),
                object: "model".to_string(),
                created: 0,
                owned_by: family.owner().to_string(),
                description: model.display_name.clone(),
            })
        })
        .collect();
    data.sort_by(|a, b| a.id.cmp(&b.id));
    ModelList { object: "list".to_string(), data }
}

pub async fn handle_list_models(State(state): State<AppState>) -> Result<Json<ModelList>, ApiError> {
    let available = state.upstream.fetch_available_models().await?;
    let list = build_model_list(&available);
    tracing::debug!(
        upstream = available.models.len(),
        listed = list.data.len(),
        "Listed models"
    );
    Ok(Json(list))
}

pub async fn handle_get_model(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
) -> Result<Json<ModelObject>, ApiError> {
    let available = state.upstream.fetch_available_models().await?;
    build_model_list(&available)
        .data
        .into_iter()
        .find(|m| m.id == model_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("The model '{}' does not exist", model_id)))
}
