//! Plumbing shared by the streaming handlers.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use bytes::Bytes;
use cloudcode_types::protocol::GenerateContentRequest;
use futures::Stream;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::errors::ApiError;
use crate::proxy::upstream::UpstreamClient;

/// Buffered upstream lines per stream.
pub const STREAM_CHANNEL_CAPACITY: usize = 64;

/// An open upstream stream owned by one client response.
///
/// Dropping `guard` cancels the producer, so whoever owns this value
/// (normally the response body) bounds the producer's lifetime.
pub struct LineStream {
    pub lines: mpsc::Receiver<String>,
    pub guard: DropGuard,
    pub producer: JoinHandle<()>,
}

impl LineStream {
    /// Next raw upstream line, `None` once the producer is done.
    pub async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }

    /// Wait for the producer after the channel closed.
    pub async fn finish(self) {
        let Self { lines, guard, producer } = self;
        drop(lines);
        if let Err(e) = producer.await {
            tracing::warn!(error = %e, "Stream producer task failed");
        }
        drop(guard);
    }
}

/// Open `streamGenerateContent` and hand back the receiving side.
pub async fn open_line_stream(
    upstream: &UpstreamClient,
    request: GenerateContentRequest,
) -> Result<LineStream, ApiError> {
    let (tx, lines) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();
    let producer = upstream.stream_generate_content(request, tx, cancel.clone()).await?;
    Ok(LineStream { lines, guard: cancel.drop_guard(), producer })
}

/// Wrap a byte stream as a `text/event-stream` response.
pub fn event_stream_response<S>(stream: S) -> Result<Response, ApiError>
where
    S: Stream<Item = Result<Bytes, Infallible>> + Send + 'static,
{
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(stream))
        .map_err(|e| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                super::errors::API_ERROR,
                format!("Response build error: {}", e),
            )
        })
}
