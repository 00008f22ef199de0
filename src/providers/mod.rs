//! Completion provider trait and LLM integration.
//!
//! Provides an abstraction layer over rig-core so the commit and review
//! workflows only see "prompt in, text out" and can be driven by mocks.

pub mod rig;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from the completion provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Shape the caller expects the response text to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free-form text.
    Text,
    /// A JSON object with a `comments` array; providers that support
    /// schema-constrained output should request it.
    ReviewComments,
}

/// A single-turn completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    /// System prompt.
    pub preamble: String,
    /// User prompt.
    pub prompt: String,
    pub temperature: f64,
    pub format: ResponseFormat,
}

/// One message on a streaming channel.
///
/// The producer closes the channel to signal success; an [`StreamChunk::Error`]
/// is the last message of a failed stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// Text to append to what has been received so far.
    Text(String),
    /// The stream failed with this description.
    Error(String),
}

/// Text-completion collaborator.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send `request` and return the full response text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Send `request` and deliver the response on `tx` as it arrives.
    ///
    /// Default: performs [`complete`](Self::complete) and emits the whole
    /// response as a single chunk. Dropping `tx` on return closes the stream.
    async fn complete_streaming(&self, request: &CompletionRequest, tx: mpsc::Sender<StreamChunk>) {
        let chunk = match self.complete(request).await {
            Ok(text) => StreamChunk::Text(text),
            Err(e) => StreamChunk::Error(e.to_string()),
        };
        if tx.send(chunk).await.is_err() {
            tracing::debug!("stream consumer went away before the response arrived");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl CompletionProvider for Echo {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
            if request.prompt == "fail" {
                return Err(ProviderError::ApiError("boom".into()));
            }
            Ok(request.prompt.to_uppercase())
        }
    }

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: "m".into(),
            preamble: String::new(),
            prompt: prompt.into(),
            temperature: 0.0,
            format: ResponseFormat::Text,
        }
    }

    #[tokio::test]
    async fn default_streaming_sends_one_chunk_then_closes() {
        let (tx, mut rx) = mpsc::channel(4);
        Echo.complete_streaming(&request("hi"), tx).await;
        assert_eq!(rx.recv().await, Some(StreamChunk::Text("HI".into())));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn default_streaming_reports_errors_as_chunk() {
        let (tx, mut rx) = mpsc::channel(4);
        Echo.complete_streaming(&request("fail"), tx).await;
        match rx.recv().await {
            Some(StreamChunk::Error(msg)) => assert!(msg.contains("boom")),
            other => panic!("expected error chunk, got {other:?}"),
        }
        assert_eq!(rx.recv().await, None);
    }
}
