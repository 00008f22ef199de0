//! Structured code review: per-file requests, response parsing, fan-out
//! across files, and the streamed free-form review.

pub mod aggregator;
pub mod input;
pub mod parser;
pub mod prompt;
pub mod reviewer;
pub mod stream;

use thiserror::Error;

use crate::providers::ProviderError;

pub use aggregator::{ReviewAggregator, ReviewOutcome};
pub use input::{ReviewInput, load_review_input};
pub use reviewer::FileReviewer;
pub use stream::{consume_stream, stream_review};

/// Summary used when the review produced no comments at all.
pub const NO_ISSUES_SUMMARY: &str = "No significant issues found in the code changes.";

/// Summary used when the summary request fails or returns nothing.
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable.";

/// Errors from the review workflow.
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("review of {file} failed: {source}")]
    Provider {
        file: String,
        #[source]
        source: ProviderError,
    },

    #[error("could not parse review response for {file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("all {0} file review(s) failed")]
    AllFilesFailed(usize),

    #[error("review stream failed: {0}")]
    Stream(String),
}

impl ReviewError {
    /// Short, single-line reason suitable for a failed-file listing.
    pub fn short_reason(&self) -> String {
        match self {
            ReviewError::Provider { source, .. } => source.to_string(),
            ReviewError::Parse { .. } => "unparseable response".to_string(),
            other => other.to_string(),
        }
    }
}
