//! Concurrent review of every file segment and the overall summary.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::models::{CategoryCounts, FailedFile, FileDiffSegment, FileReview, StructuredReview};
use crate::progress::{ProgressTracker, TaskStatus};
use crate::providers::CompletionProvider;

use super::prompt::summary_request;
use super::reviewer::FileReviewer;
use super::{NO_ISSUES_SUMMARY, ReviewError, SUMMARY_UNAVAILABLE};

/// Default number of file reviews in flight at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Result of a review run, including the files that could not be reviewed.
#[derive(Debug)]
pub struct ReviewOutcome {
    pub review: StructuredReview,
    /// Files omitted from `review`, in diff order.
    pub failed_files: Vec<FailedFile>,
}

/// Fans out per-file reviews and folds them into a [`StructuredReview`].
pub struct ReviewAggregator {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    language: String,
    max_concurrent: usize,
    progress: Arc<ProgressTracker>,
}

impl ReviewAggregator {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: &str, language: &str) -> Self {
        Self {
            provider,
            model: model.to_string(),
            language: language.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            progress: Arc::new(ProgressTracker::disabled()),
        }
    }

    /// Cap on concurrent file reviews; values below 1 are raised to 1.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn with_progress(mut self, progress: Arc<ProgressTracker>) -> Self {
        self.progress = progress;
        self
    }

    /// Review all `segments` and summarize the result.
    ///
    /// File reviews are returned in segment order. Per-file failures are
    /// reported in [`ReviewOutcome::failed_files`]; the run only fails when
    /// every file failed.
    pub async fn run(&self, segments: Vec<FileDiffSegment>) -> Result<ReviewOutcome, ReviewError> {
        if segments.is_empty() {
            return Ok(ReviewOutcome {
                review: StructuredReview {
                    summary: NO_ISSUES_SUMMARY.to_string(),
                    file_reviews: Vec::new(),
                },
                failed_files: Vec::new(),
            });
        }

        let names: Vec<String> = segments.iter().map(|s| s.file_name.clone()).collect();
        let total = segments.len();
        tracing::info!(files = total, max_concurrent = self.max_concurrent, "starting review");

        let reviewer = FileReviewer::new(Arc::clone(&self.provider), &self.model, &self.language);
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut join_set = JoinSet::new();

        self.progress.start();
        for (index, segment) in segments.into_iter().enumerate() {
            let reviewer = reviewer.clone();
            let sem = Arc::clone(&semaphore);
            let progress = Arc::clone(&self.progress);

            join_set.spawn(async move {
                let result: Result<FileReview, String> = async {
                    let _permit = sem.acquire().await.map_err(|e| e.to_string())?;
                    progress.update(&segment.file_name, TaskStatus::InProgress);
                    match reviewer.review(&segment).await {
                        Ok(review) => {
                            progress.update(&segment.file_name, TaskStatus::Done);
                            Ok(review)
                        }
                        Err(e) => {
                            tracing::warn!(file = %segment.file_name, error = %e, "file review failed");
                            let reason = e.short_reason();
                            progress.update(&segment.file_name, TaskStatus::Failed(reason.clone()));
                            Err(reason)
                        }
                    }
                }
                .await;
                (index, result)
            });
        }

        // Fan in by index so completion order does not leak into the output.
        // A panicked task leaves its slot empty.
        let mut slots: Vec<Option<Result<FileReview, String>>> = (0..total).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => tracing::warn!(error = %e, "review task panicked"),
            }
        }
        self.progress.finish();

        let mut file_reviews = Vec::with_capacity(total);
        let mut failed_files = Vec::new();
        for (file_name, slot) in names.into_iter().zip(slots) {
            match slot {
                Some(Ok(review)) => file_reviews.push(review),
                Some(Err(reason)) => failed_files.push(FailedFile { file_name, reason }),
                None => failed_files.push(FailedFile {
                    file_name,
                    reason: "review task panicked".to_string(),
                }),
            }
        }

        if file_reviews.is_empty() {
            return Err(ReviewError::AllFilesFailed(failed_files.len()));
        }

        let counts = CategoryCounts::from_reviews(&file_reviews);
        let summary = self.summarize(&counts).await;

        Ok(ReviewOutcome {
            review: StructuredReview {
                summary,
                file_reviews,
            },
            failed_files,
        })
    }

    /// One summary call when there is something to summarize.
    async fn summarize(&self, counts: &CategoryCounts) -> String {
        if counts.total() == 0 {
            return NO_ISSUES_SUMMARY.to_string();
        }

        let request = summary_request(&self.model, counts, &self.language);
        match self.provider.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("summary response was empty");
                SUMMARY_UNAVAILABLE.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "summary request failed");
                SUMMARY_UNAVAILABLE.to_string()
            }
        }
    }
}
