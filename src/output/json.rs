//! JSON output renderer.
//!
//! Outputs `{"summary": ..., "fileReviews": [...], "counts": {...}, "failedFiles": [...]}`.

use crate::models::{FailedFile, StructuredReview};
use crate::output::ReviewRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl ReviewRenderer for JsonRenderer {
    fn render(&self, review: &StructuredReview, failed: &[FailedFile]) -> String {
        let output = serde_json::json!({
            "summary": review.summary,
            "fileReviews": review.file_reviews,
            "counts": review.counts(),
            "failedFiles": failed,
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
