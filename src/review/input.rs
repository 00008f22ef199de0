//! Loading the diff under review and deciding whether there is anything to
//! send to the model.

use crate::diff::{DiffError, DiffSource, VersionControl, load_diff, segment_diff};
use crate::models::FileDiffSegment;

/// Warning shown when the diff is empty.
pub const NO_CHANGES_WARNING: &str = "No changes to review";

/// Warning shown when the diff has content but no per-file sections.
pub const NO_FILE_SECTIONS_WARNING: &str = "no file sections (diff --git) found in the diff";

/// The loaded diff, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewInput {
    /// Nothing but whitespace.
    Empty,
    /// Text without any `diff --git` marker, e.g. plain `diff -u` output.
    /// Only a streamed review can use it.
    Unsegmented(String),
    /// A git diff split into files, in diff order.
    Files {
        diff: String,
        segments: Vec<FileDiffSegment>,
    },
}

impl ReviewInput {
    /// Classify raw diff text.
    pub fn from_diff(diff: String) -> Self {
        if diff.trim().is_empty() {
            return ReviewInput::Empty;
        }
        let segments = segment_diff(&diff);
        if segments.is_empty() {
            ReviewInput::Unsegmented(diff)
        } else {
            ReviewInput::Files { diff, segments }
        }
    }

    /// Diff text for a streamed review; `None` when empty.
    pub fn stream_text(&self) -> Option<&str> {
        match self {
            ReviewInput::Empty => None,
            ReviewInput::Unsegmented(diff) | ReviewInput::Files { diff, .. } => Some(diff),
        }
    }

    /// The per-file segments for a structured review, or the warning to
    /// show instead.
    pub fn into_segments(self) -> Result<Vec<FileDiffSegment>, &'static str> {
        match self {
            ReviewInput::Empty => Err(NO_CHANGES_WARNING),
            ReviewInput::Unsegmented(_) => Err(NO_FILE_SECTIONS_WARNING),
            ReviewInput::Files { segments, .. } => Ok(segments),
        }
    }
}

/// Load the diff for `source` and classify it.
pub async fn load_review_input(
    source: &DiffSource,
    vcs: &dyn VersionControl,
) -> Result<ReviewInput, DiffError> {
    let diff = load_diff(source, vcs).await?;
    let input = ReviewInput::from_diff(diff);
    if let ReviewInput::Files { ref segments, .. } = input {
        tracing::debug!(files = segments.len(), "diff loaded");
    }
    Ok(input)
}
