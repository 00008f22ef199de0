//! Streamed free-form review.
//!
//! The provider produces [`StreamChunk`]s on an mpsc channel from a spawned
//! task; the caller consumes them, handing each text chunk to a sink as it
//! arrives. A closed channel means success, an error chunk means failure.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::providers::{CompletionProvider, CompletionRequest, StreamChunk};

use super::ReviewError;

/// Buffered chunks between producer and consumer.
const STREAM_BUFFER: usize = 32;

/// Drain `rx`, passing each text chunk to `on_chunk`.
///
/// Returns the concatenated text once the producer closes the channel, or
/// [`ReviewError::Stream`] on the first error chunk.
pub async fn consume_stream<F>(
    mut rx: mpsc::Receiver<StreamChunk>,
    mut on_chunk: F,
) -> Result<String, ReviewError>
where
    F: FnMut(&str),
{
    let mut full = String::new();
    while let Some(chunk) = rx.recv().await {
        match chunk {
            StreamChunk::Text(text) => {
                on_chunk(&text);
                full.push_str(&text);
            }
            StreamChunk::Error(reason) => return Err(ReviewError::Stream(reason)),
        }
    }
    Ok(full)
}

/// Run `request` as a stream and feed it to `on_chunk`.
pub async fn stream_review<F>(
    provider: Arc<dyn CompletionProvider>,
    request: CompletionRequest,
    on_chunk: F,
) -> Result<String, ReviewError>
where
    F: FnMut(&str),
{
    let (tx, rx) = mpsc::channel(STREAM_BUFFER);
    let producer = tokio::spawn(async move {
        provider.complete_streaming(&request, tx).await;
    });

    let result = consume_stream(rx, on_chunk).await;
    if let Err(e) = producer.await {
        tracing::warn!(error = %e, "stream producer panicked");
        if result.is_ok() {
            return Err(ReviewError::Stream(format!("stream producer failed: {e}")));
        }
    }
    result
}
