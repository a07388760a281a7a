//! Gemini SSE pass-through with envelope unwrapping.

use axum::response::Response;
use bytes::Bytes;
use cloudcode_types::protocol::GenerateContentRequest;
use std::convert::Infallible;

use crate::proxy::handlers::common::{event_stream_response, open_line_stream};
use crate::proxy::handlers::errors::ApiError;
use crate::proxy::mappers::gemini::transform_sse_line;
use crate::proxy::server::AppState;

/// Every upstream line is re-emitted, data lines unwrapped, each with a `\n` terminator.
pub(super) async fn stream_generate(
    state: &AppState,
    request: GenerateContentRequest,
) -> Result<Response, ApiError> {
    let mut lines = open_line_stream(&state.upstream, request).await?;

    let stream = async_stream::stream! {
        while let Some(line) = lines.next_line().await {
            let mut out = transform_sse_line(&line);
            out.push('\n');
            yield Ok::<Bytes, Infallible>(Bytes::from(out));
        }
        lines.finish().await;
    };

    event_stream_response(stream)
}
