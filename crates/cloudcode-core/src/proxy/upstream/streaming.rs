use bytes::BytesMut;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Forward the body of a live upstream response line by line.
///
/// Lines are sent without their terminator and otherwise untouched. The loop
/// ends when the body closes, a read fails, the receiver goes away or `cancel`
/// fires; the sender is dropped on exit, which closes the channel.
pub(crate) async fn forward_lines(
    response: reqwest::Response,
    tx: mpsc::Sender<String>,
    cancel: CancellationToken,
) {
    let endpoint = response.url().origin().ascii_serialization();
    let mut body = response.bytes_stream();
    let mut buffer = BytesMut::new();
    let mut forwarded = 0usize;

    loop {
        let next = tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!(%endpoint, forwarded, "Upstream stream cancelled by client");
                return;
            },
            next = body.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                buffer.extend_from_slice(&chunk);
                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line = buffer.split_to(pos + 1);
                    if !send_line(&tx, &cancel, decode_line(&line[..pos])).await {
                        return;
                    }
                    forwarded += 1;
                }
            },
            Some(Err(e)) => {
                tracing::warn!(%endpoint, forwarded, error = %e, "Upstream stream read failed");
                break;
            },
            None => break,
        }
    }

    if !buffer.is_empty() {
        let line = decode_line(&buffer);
        if send_line(&tx, &cancel, line).await {
            forwarded += 1;
        }
    }
    tracing::debug!(%endpoint, forwarded, "Upstream stream finished");
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

async fn send_line(tx: &mpsc::Sender<String>, cancel: &CancellationToken, line: String) -> bool {
    tokio::select! {
        () = cancel.cancelled() => false,
        () = tx.closed() => false,
        sent = tx.send(line) => sent.is_ok(),
    }
}
