//! Integration tests for the review pipeline with a scripted provider.
//!
//! Exercises segmentation, concurrent per-file review, parsing, summary,
//! and rendering end-to-end without real API calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use gelf::diff::{DiffError, DiffSource, VersionControl, segment_diff};
use gelf::models::{Category, FileDiffSegment};
use gelf::output::{JsonRenderer, RenderStyle, ReviewRenderer, TerminalRenderer};
use gelf::providers::{CompletionProvider, CompletionRequest, ProviderError, ResponseFormat};
use gelf::review::input::{NO_CHANGES_WARNING, NO_FILE_SECTIONS_WARNING};
use gelf::review::{
    NO_ISSUES_SUMMARY, ReviewAggregator, ReviewError, SUMMARY_UNAVAILABLE, load_review_input,
};

/// How the mock answers a review request for one file.
#[derive(Clone)]
enum Reply {
    Json(&'static str),
    Fail(&'static str),
}

/// A scripted provider: per-file replies keyed by the file name quoted in
/// the prompt, optional per-file delays, and a call counter.
struct MockProvider {
    replies: HashMap<&'static str, Reply>,
    delays: HashMap<&'static str, Duration>,
    summary: Result<&'static str, &'static str>,
    calls: AtomicUsize,
    summary_calls: AtomicUsize,
    completion_order: Mutex<Vec<String>>,
}

impl MockProvider {
    fn new() -> Self {
        Self {
            replies: HashMap::new(),
            delays: HashMap::new(),
            summary: Ok("One critical issue in a.go."),
            calls: AtomicUsize::new(0),
            summary_calls: AtomicUsize::new(0),
            completion_order: Mutex::new(Vec::new()),
        }
    }

    fn reply(mut self, file: &'static str, reply: Reply) -> Self {
        self.replies.insert(file, reply);
        self
    }

    fn delay(mut self, file: &'static str, millis: u64) -> Self {
        self.delays.insert(file, Duration::from_millis(millis));
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if request.format == ResponseFormat::Text {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            return self
                .summary
                .map(str::to_string)
                .map_err(|e| ProviderError::ApiError(e.to_string()));
        }

        let (file, reply) = self
            .replies
            .iter()
            .find(|(file, _)| request.prompt.contains(&format!("for file \"{file}\"")))
            .map(|(file, reply)| (*file, reply.clone()))
            .unwrap_or(("<unscripted>", Reply::Json(r#"{"comments":[]}"#)));

        if let Some(delay) = self.delays.get(file) {
            tokio::time::sleep(*delay).await;
        }
        self.completion_order.lock().unwrap().push(file.to_string());

        match reply {
            Reply::Json(body) => Ok(body.to_string()),
            Reply::Fail(reason) => Err(ProviderError::ApiError(reason.to_string())),
        }
    }
}

fn file_diff(name: &str, line: u32) -> String {
    format!(
        "diff --git a/{name} b/{name}\n\
         index 1111111..2222222 100644\n\
         --- a/{name}\n\
         +++ b/{name}\n\
         @@ -{line},3 +{line},3 @@\n \
         func before() {{}}\n\
         -\treturn nil\n\
         +\treturn err\n \
         func after() {{}}\n"
    )
}

fn two_file_diff() -> String {
    format!("{}{}", file_diff("a.go", 9), file_diff("b.go", 1))
}

const A_GO_MUST: &str =
    r#"{"comments":[{"fileName":"a.go","lineNo":10,"type":"must","message":"fix X"}]}"#;
const NO_COMMENTS: &str = r#"{"comments":[]}"#;

#[tokio::test]
async fn two_file_scenario() {
    let provider = Arc::new(
        MockProvider::new()
            .reply("a.go", Reply::Json(A_GO_MUST))
            .reply("b.go", Reply::Json(NO_COMMENTS)),
    );

    let outcome = ReviewAggregator::new(provider.clone(), "gemini-2.5-pro", "english")
        .run(segment_diff(&two_file_diff()))
        .await
        .expect("review should succeed");

    let review = &outcome.review;
    assert_eq!(review.file_reviews.len(), 2);
    assert_eq!(review.file_reviews[0].file_name, "a.go");
    assert_eq!(review.file_reviews[0].comments.len(), 1);
    assert_eq!(review.file_reviews[0].comments[0].category, Category::Must);
    assert_eq!(review.file_reviews[0].comments[0].line_no, Some(10));
    assert_eq!(review.file_reviews[1].file_name, "b.go");
    assert!(!review.file_reviews[1].has_issues());
    assert_eq!(review.summary, "One critical issue in a.go.");
    assert!(outcome.failed_files.is_empty());

    // Two file reviews plus one summary.
    assert_eq!(provider.calls(), 3);
    assert_eq!(provider.summary_calls.load(Ordering::SeqCst), 1);

    let rendered = TerminalRenderer::new(RenderStyle::plain()).render(review, &outcome.failed_files);
    assert!(rendered.contains("a.go\n  [MUST] L10: fix X\n"));
    assert!(rendered.contains("      +\treturn err\n"));
    assert!(rendered.contains("b.go\n  No issues found.\n"));
    assert!(rendered.contains(" 1 comment(s): must 1, want 0, nits 0, fyi 0, imo 0\n"));
}

#[tokio::test]
async fn zero_comments_make_no_summary_call() {
    let provider = Arc::new(
        MockProvider::new()
            .reply("a.go", Reply::Json(NO_COMMENTS))
            .reply("b.go", Reply::Json("```json\n{\"comments\": []}\n```")),
    );

    let outcome = ReviewAggregator::new(provider.clone(), "m", "english")
        .run(segment_diff(&two_file_diff()))
        .await
        .unwrap();

    assert_eq!(outcome.review.summary, NO_ISSUES_SUMMARY);
    assert_eq!(provider.calls(), 2);
    assert_eq!(provider.summary_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn one_of_three_failing_keeps_order() {
    let diff = format!(
        "{}{}{}",
        file_diff("first.go", 1),
        file_diff("second.go", 1),
        file_diff("third.go", 1)
    );
    let provider = Arc::new(
        MockProvider::new()
            .reply("first.go", Reply::Json(NO_COMMENTS))
            .reply("second.go", Reply::Fail("503 Service Unavailable"))
            .reply("third.go", Reply::Json(NO_COMMENTS)),
    );

    let outcome = ReviewAggregator::new(provider.clone(), "m", "english")
        .run(segment_diff(&diff))
        .await
        .unwrap();

    let names: Vec<&str> = outcome
        .review
        .file_reviews
        .iter()
        .map(|r| r.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["first.go", "third.go"]);
    assert_eq!(outcome.failed_files.len(), 1);
    assert_eq!(outcome.failed_files[0].file_name, "second.go");
    assert!(outcome.failed_files[0].reason.contains("503"));
    // Every file was attempted exactly once.
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn out_of_order_completion_keeps_diff_order() {
    let diff = format!(
        "{}{}{}",
        file_diff("slow.go", 1),
        file_diff("medium.go", 1),
        file_diff("fast.go", 1)
    );
    let provider = Arc::new(
        MockProvider::new()
            .reply("slow.go", Reply::Json(NO_COMMENTS))
            .reply("medium.go", Reply::Json(NO_COMMENTS))
            .reply("fast.go", Reply::Json(NO_COMMENTS))
            .delay("slow.go", 120)
            .delay("medium.go", 60),
    );

    let outcome = ReviewAggregator::new(provider.clone(), "m", "english")
        .with_max_concurrent(3)
        .run(segment_diff(&diff))
        .await
        .unwrap();

    let completed = provider.completion_order.lock().unwrap().clone();
    assert_eq!(completed, vec!["fast.go", "medium.go", "slow.go"]);

    let names: Vec<&str> = outcome
        .review
        .file_reviews
        .iter()
        .map(|r| r.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["slow.go", "medium.go", "fast.go"]);
}

#[tokio::test]
async fn empty_diff_makes_no_calls() {
    let provider = Arc::new(MockProvider::new());
    let segments: Vec<FileDiffSegment> = segment_diff("");
    assert!(segments.is_empty());

    let outcome = ReviewAggregator::new(provider.clone(), "m", "english")
        .run(segments)
        .await
        .unwrap();
    assert_eq!(provider.calls(), 0);
    assert!(outcome.review.file_reviews.is_empty());
    assert_eq!(outcome.review.summary, NO_ISSUES_SUMMARY);
}

#[tokio::test]
async fn categories_are_normalized_end_to_end() {
    let provider = Arc::new(MockProvider::new().reply(
        "a.go",
        Reply::Json(
            r#"{"comments":[
                {"fileName":"a.go","lineNo":10,"type":"MUST","message":"upper"},
                {"fileName":"a.go","lineNo":10,"type":"blocker","message":"synonym"},
                {"fileName":"a.go","lineNo":10,"type":"whatever","message":"unknown"}
            ]}"#,
        ),
    ));

    let outcome = ReviewAggregator::new(provider, "m", "english")
        .run(segment_diff(&file_diff("a.go", 9)))
        .await
        .unwrap();

    let categories: Vec<Category> = outcome.review.file_reviews[0]
        .comments
        .iter()
        .map(|c| c.category)
        .collect();
    assert_eq!(categories, vec![Category::Must, Category::Must, Category::Fyi]);
    assert_eq!(outcome.review.counts().must, 2);
    assert_eq!(outcome.review.counts().fyi, 1);
}

#[tokio::test]
async fn every_file_failing_is_fatal() {
    let provider = Arc::new(
        MockProvider::new()
            .reply("a.go", Reply::Json("I am unable to help with that."))
            .reply("b.go", Reply::Fail("401 Unauthorized")),
    );

    let err = ReviewAggregator::new(provider.clone(), "m", "english")
        .run(segment_diff(&two_file_diff()))
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::AllFilesFailed(2)));
    assert_eq!(provider.summary_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn summary_failure_keeps_the_review() {
    let mut mock = MockProvider::new()
        .reply("a.go", Reply::Json(A_GO_MUST))
        .reply("b.go", Reply::Json(NO_COMMENTS));
    mock.summary = Err("timeout");

    let outcome = ReviewAggregator::new(Arc::new(mock), "m", "english")
        .run(segment_diff(&two_file_diff()))
        .await
        .unwrap();
    assert_eq!(outcome.review.summary, SUMMARY_UNAVAILABLE);
    assert_eq!(outcome.review.counts().must, 1);
}

#[tokio::test]
async fn json_output_of_the_pipeline() {
    let provider = Arc::new(
        MockProvider::new()
            .reply("a.go", Reply::Json(A_GO_MUST))
            .reply("b.go", Reply::Fail("overloaded")),
    );

    let outcome = ReviewAggregator::new(provider, "m", "english")
        .run(segment_diff(&two_file_diff()))
        .await
        .unwrap();
    let json = JsonRenderer.render(&outcome.review, &outcome.failed_files);
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["fileReviews"].as_array().unwrap().len(), 1);
    assert_eq!(parsed["fileReviews"][0]["comments"][0]["category"], "must");
    assert_eq!(parsed["failedFiles"][0]["fileName"], "b.go");
    assert_eq!(parsed["counts"]["must"], 1);
}

/// Version control double serving a fixed working-tree diff.
struct FixedDiff(String);

#[async_trait]
impl VersionControl for FixedDiff {
    async fn diff(&self, _staged: bool) -> Result<String, DiffError> {
        Ok(self.0.clone())
    }

    async fn commit(&self, _message: &str) -> Result<(), DiffError> {
        unreachable!("review never commits")
    }
}

/// Load, classify, and review only when there are file sections.
async fn review_source(
    source: &DiffSource,
    vcs: &dyn VersionControl,
    provider: Arc<MockProvider>,
) -> Result<usize, &'static str> {
    let input = load_review_input(source, vcs).await.unwrap();
    let segments = input.into_segments()?;
    let outcome = ReviewAggregator::new(provider, "m", "english")
        .run(segments)
        .await
        .unwrap();
    Ok(outcome.review.file_reviews.len())
}

#[tokio::test]
async fn empty_git_diff_warns_without_calls() {
    let provider = Arc::new(MockProvider::new());
    let result = review_source(
        &DiffSource::Git { staged: false },
        &FixedDiff("   \n".into()),
        provider.clone(),
    )
    .await;

    assert_eq!(result, Err(NO_CHANGES_WARNING));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn plain_unified_diff_is_not_reported_clean() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("change.diff");
    std::fs::write(
        &path,
        "--- a/notes.txt\n+++ b/notes.txt\n@@ -1 +1 @@\n-old\n+new\n",
    )
    .unwrap();

    let provider = Arc::new(MockProvider::new());
    let result = review_source(&DiffSource::File(path), &FixedDiff(String::new()), provider.clone()).await;

    assert_eq!(result, Err(NO_FILE_SECTIONS_WARNING));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn git_diff_source_is_reviewed() {
    let provider = Arc::new(MockProvider::new().reply("a.go", Reply::Json(NO_COMMENTS)));
    let vcs = FixedDiff(file_diff("a.go", 1));
    let result = review_source(&DiffSource::Git { staged: true }, &vcs, provider.clone()).await;

    assert_eq!(result, Ok(1));
    assert_eq!(provider.calls(), 1);
}
