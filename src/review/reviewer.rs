//! Review of a single file segment.

use std::sync::Arc;

use crate::models::{FileDiffSegment, FileReview};
use crate::providers::CompletionProvider;

use super::parser::parse_review_response;
use super::prompt::file_review_request;
use super::ReviewError;

/// Sends one review request per file and parses the answer.
#[derive(Clone)]
pub struct FileReviewer {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    language: String,
}

impl FileReviewer {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: &str, language: &str) -> Self {
        Self {
            provider,
            model: model.to_string(),
            language: language.to_string(),
        }
    }

    /// Review `segment` with exactly one provider call.
    pub async fn review(&self, segment: &FileDiffSegment) -> Result<FileReview, ReviewError> {
        let request = file_review_request(&self.model, segment, &self.language);
        tracing::debug!(file = %segment.file_name, model = %self.model, "requesting file review");

        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|source| ReviewError::Provider {
                file: segment.file_name.clone(),
                source,
            })?;

        let comments = parse_review_response(&segment.file_name, &response)?;
        tracing::debug!(file = %segment.file_name, comments = comments.len(), "file reviewed");

        Ok(FileReview {
            file_name: segment.file_name.clone(),
            diff_text: segment.diff_text.clone(),
            comments,
        })
    }
}
