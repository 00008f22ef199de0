//! Commit message generation from a staged diff.

use thiserror::Error;

use crate::diff::{DiffError, VersionControl, parse_diff_summary};
use crate::models::DiffFileStat;
use crate::providers::{CompletionProvider, CompletionRequest, ProviderError, ResponseFormat};

/// Temperature for commit message generation.
pub const COMMIT_TEMPERATURE: f64 = 0.3;

/// Errors from commit message generation.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("failed to generate commit message: {0}")]
    Provider(#[from] ProviderError),

    #[error("the model returned an empty commit message")]
    EmptyResponse,
}

const COMMIT_PREAMBLE: &str = "You write concise git commit messages.";

/// Build the Conventional Commits request for `diff`.
pub fn commit_request(model: &str, diff: &str, language: &str) -> CompletionRequest {
    let prompt = format!(
        "Analyze the following git diff and generate a precise commit message following \
         the Conventional Commits specification.\n\n\
         DIFF ANALYSIS GUIDE:\n\
         1. Look at file paths to understand what parts of the codebase are affected\n\
         2. Examine +/- lines to understand what was added, removed, or modified\n\
         3. Pay attention to function names, variable names, and code structure changes\n\
         4. Consider the context lines (prefixed with space) to understand the surrounding code\n\
         5. Identify the primary purpose: new feature, bug fix, refactoring, etc.\n\n\
         COMMIT MESSAGE REQUIREMENTS:\n\
         1. Use {language} language\n\
         2. Follow format: <type>[optional scope]: <description>\n\
         3. Valid types: feat, fix, docs, style, refactor, test, chore, perf, ci, build, revert\n\
         4. Keep under 72 characters total\n\
         5. Use imperative mood (\"add\" not \"added\")\n\
         6. Start description with lowercase letter\n\
         7. No period at the end\n\
         8. If multiple changes, focus on the most significant one\n\
         9. Use scope when it helps clarify the area of change (e.g., auth, api, ui)\n\n\
         EXAMPLES:\n\
         - feat(auth): add JWT token validation\n\
         - fix(api): resolve null pointer in user service\n\
         - refactor(db): simplify connection pooling logic\n\n\
         Git diff:\n{diff}\n\n\
         Respond with only the commit message, no additional text or formatting."
    );

    CompletionRequest {
        model: model.to_string(),
        preamble: COMMIT_PREAMBLE.to_string(),
        prompt,
        temperature: COMMIT_TEMPERATURE,
        format: ResponseFormat::Text,
    }
}

/// Generate a commit message for `diff` with a single provider call.
///
/// The response is trimmed and otherwise returned as-is.
pub async fn generate_commit_message(
    provider: &dyn CompletionProvider,
    model: &str,
    diff: &str,
    language: &str,
) -> Result<String, CommitError> {
    let request = commit_request(model, diff, language);
    tracing::debug!(model, diff_bytes = diff.len(), "requesting commit message");

    let message = provider.complete(&request).await?;
    let message = message.trim();
    if message.is_empty() {
        return Err(CommitError::EmptyResponse);
    }
    Ok(message.to_string())
}

/// The staged diff and its per-file line counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedChanges {
    pub diff: String,
    pub stats: Vec<DiffFileStat>,
}

/// Read the staged diff; `None` when nothing is staged.
pub async fn staged_changes(vcs: &dyn VersionControl) -> Result<Option<StagedChanges>, DiffError> {
    let diff = vcs.diff(true).await?;
    if diff.trim().is_empty() {
        return Ok(None);
    }
    let stats = parse_diff_summary(&diff);
    Ok(Some(StagedChanges { diff, stats }))
}

/// Render per-file line counts as `name (+N, -M)` lines.
pub fn format_file_stats(stats: &[DiffFileStat]) -> String {
    stats
        .iter()
        .map(|s| format!("{} (+{}, -{})", s.file_name, s.added_lines, s.deleted_lines))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text written to stderr before generating a message, if any.
///
/// `quiet` suppresses it entirely. A dry run adds the full diff under the
/// changed-file list.
pub fn preview(staged: &StagedChanges, dry_run: bool, quiet: bool) -> Option<String> {
    if quiet {
        return None;
    }
    if staged.stats.is_empty() {
        return dry_run.then(|| format!("=== Staged Changes ===\n{}\n", staged.diff));
    }

    let mut text = format!("=== Changed Files ===\n{}\n", format_file_stats(&staged.stats));
    if dry_run {
        text.push_str(&format!("\n=== Full Diff ===\n{}\n", staged.diff));
    }
    Some(text)
}
