//! Review comment types and the aggregated review.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;

/// Maximum number of comments kept per file.
pub const MAX_COMMENTS_PER_FILE: usize = 5;

/// Category tag of a review comment.
///
/// The set is closed: strings the model invents are folded into one of the
/// five values when deserialized (see [`Category::normalize`]).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    JsonSchema,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Must be fixed before merging (bugs, security problems).
    Must,
    /// Should be addressed; a clear improvement.
    Want,
    /// Minor style or naming issue.
    Nits,
    /// Informational note, no action required.
    #[default]
    Fyi,
    /// Reviewer opinion or preference.
    Imo,
}

impl Category {
    /// Map a free-form category string onto the closed set.
    ///
    /// Exact names and common synonyms are matched case-insensitively.
    /// Anything else becomes [`Category::Fyi`].
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "must" | "blocker" | "critical" | "error" | "bug" | "security" | "required" => {
                Category::Must
            }
            "want" | "should" | "suggestion" | "warning" | "improvement" => Category::Want,
            "nits" | "nit" | "style" | "minor" | "cosmetic" => Category::Nits,
            "imo" | "opinion" | "preference" => Category::Imo,
            "fyi" | "info" | "note" | "information" => Category::Fyi,
            _ => Category::Fyi,
        }
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Must => "must",
            Category::Want => "want",
            Category::Nits => "nits",
            Category::Fyi => "fyi",
            Category::Imo => "imo",
        }
    }

    /// Uppercase label used by the terminal renderer.
    pub fn label(self) -> &'static str {
        match self {
            Category::Must => "MUST",
            Category::Want => "WANT",
            Category::Nits => "NITS",
            Category::Fyi => "FYI",
            Category::Imo => "IMO",
        }
    }

    /// Short human description, also used in the review prompt.
    pub fn description(self) -> &'static str {
        match self {
            Category::Must => "critical issues that must be fixed (bugs, security, data loss)",
            Category::Want => "important improvements that should be made",
            Category::Nits => "minor style or naming issues",
            Category::Fyi => "informational notes",
            Category::Imo => "opinions or alternative approaches",
        }
    }
}

/// Lenient deserializer: model output is folded into the closed set rather
/// than rejected.
impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.as_deref().map(Category::normalize).unwrap_or_default())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single review finding for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewComment {
    pub file_name: String,
    /// New-file line number; `None` for file-level comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_no: Option<u32>,
    pub category: Category,
    pub message: String,
}

/// The review of one file. Only produced for files whose review succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReview {
    pub file_name: String,
    /// Retained for context extraction at render time.
    #[serde(skip)]
    pub diff_text: String,
    pub comments: Vec<ReviewComment>,
}

impl FileReview {
    pub fn has_issues(&self) -> bool {
        !self.comments.is_empty()
    }

    /// Line numbers anchored by this file's comments, deduplicated and sorted.
    pub fn target_lines(&self) -> Vec<u32> {
        let mut lines: Vec<u32> = self.comments.iter().filter_map(|c| c.line_no).collect();
        lines.sort_unstable();
        lines.dedup();
        lines
    }
}

/// The aggregated review handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredReview {
    pub summary: String,
    /// In original diff order.
    pub file_reviews: Vec<FileReview>,
}

impl StructuredReview {
    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts::from_reviews(&self.file_reviews)
    }
}

/// A file whose review was dropped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedFile {
    pub file_name: String,
    pub reason: String,
}

/// Comment counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub must: usize,
    pub want: usize,
    pub nits: usize,
    pub fyi: usize,
    pub imo: usize,
}

impl CategoryCounts {
    /// Count comments across all file reviews.
    pub fn from_reviews(reviews: &[FileReview]) -> Self {
        let mut counts = CategoryCounts::default();
        for comment in reviews.iter().flat_map(|r| &r.comments) {
            match comment.category {
                Category::Must => counts.must += 1,
                Category::Want => counts.want += 1,
                Category::Nits => counts.nits += 1,
                Category::Fyi => counts.fyi += 1,
                Category::Imo => counts.imo += 1,
            }
        }
        counts
    }

    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Must => self.must,
            Category::Want => self.want,
            Category::Nits => self.nits,
            Category::Fyi => self.fyi,
            Category::Imo => self.imo,
        }
    }

    pub fn total(&self) -> usize {
        self.must + self.want + self.nits + self.fyi + self.imo
    }

    /// `(category, count)` pairs in severity order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::iter().map(move |c| (c, self.get(c)))
    }
}
