// OpenAI chat completions
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use cloudcode_types::protocol::openai::ChatCompletionRequest;
use std::convert::Infallible;
use tracing::{debug, info};

use crate::error::AppError;
use crate::proxy::handlers::common::{event_stream_response, open_line_stream};
use crate::proxy::handlers::errors::ApiError;
use crate::proxy::mappers::openai::{
    transform_openai_request, transform_response, ChatStreamState, DONE_FRAME,
};
use crate::proxy::server::AppState;

pub async fn handle_chat_completions(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let chat: ChatCompletionRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid_request(format!("Invalid request: {}", e)))?;
    if chat.model.trim().is_empty() {
        return Err(ApiError::invalid_request("model is required"));
    }

    info!(
        model = %chat.model,
        messages = chat.messages.len(),
        tools = chat.tools.as_ref().map_or(0, Vec::len),
        stream = chat.stream,
        "OpenAI chat request"
    );

    // Input errors surface before any discovery traffic.
    let mut request = transform_openai_request(&chat, "").map_err(AppError::from)?;
    request.project = state.resolver.project_id().await?;

    if !chat.stream {
        let raw = state.upstream.generate_content(request).await?;
        return Ok(Json(transform_response(&raw, &chat.model)).into_response());
    }

    let mut lines = open_line_stream(&state.upstream, request).await?;
    let mut converter = ChatStreamState::new(&chat.model);

    let stream = async_stream::stream! {
        while let Some(line) = lines.next_line().await {
            for frame in converter.process_line(&line) {
                yield Ok::<Bytes, Infallible>(Bytes::from(frame));
            }
        }
        if !converter.is_finished() {
            debug!("Upstream stream ended without a finish reason");
        }
        lines.finish().await;
        yield Ok::<Bytes, Infallible>(Bytes::from_static(DONE_FRAME.as_bytes()));
    };

    event_stream_response(stream)
}
