//! Git CLI wrapper for producing diffs and committing.
//!
//! Shells out to `git` via `tokio::process::Command`. The [`VersionControl`]
//! trait is the seam the commit and review workflows depend on, so tests can
//! substitute a scripted implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::DiffError;

/// Lines of unchanged context requested from `git diff`.
pub const DIFF_CONTEXT_LINES: u32 = 5;

/// Version-control operations used by the workflows.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Unified diff of the working tree (`staged = false`) or the index.
    async fn diff(&self, staged: bool) -> Result<String, DiffError>;

    /// Record a commit with `message`.
    async fn commit(&self, message: &str) -> Result<(), DiffError>;
}

/// [`VersionControl`] backed by the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
}

impl GitCli {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output, DiffError> {
        tracing::debug!(?args, repo = %self.repo_root.display(), "running git");
        tokio::process::Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .await
            .map_err(|e| DiffError::GitError(format!("failed to run git: {e}")))
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn diff(&self, staged: bool) -> Result<String, DiffError> {
        let context = format!("-U{DIFF_CONTEXT_LINES}");
        // quotePath=false keeps non-ASCII names readable instead of octal-escaped.
        let mut args = vec![
            "-c",
            "core.quotePath=false",
            "--no-pager",
            "diff",
            "--src-prefix=a/",
            "--dst-prefix=b/",
        ];
        if staged {
            args.push("--staged");
        }
        args.push(&context);

        let output = self.run(&args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DiffError::GitError(format!(
                "git diff failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let diff = String::from_utf8(output.stdout)
            .map_err(|e| DiffError::GitError(format!("git output is not valid UTF-8: {e}")))?;
        Ok(diff.trim().to_string())
    }

    async fn commit(&self, message: &str) -> Result<(), DiffError> {
        let output = self.run(&["commit", "-m", message]).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(DiffError::CommitFailed(detail));
        }
        Ok(())
    }
}

/// Find the root of the git repository containing `start_dir`.
pub async fn find_repo_root(start_dir: &Path) -> Result<PathBuf, DiffError> {
    let output = tokio::process::Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(start_dir)
        .output()
        .await
        .map_err(|e| DiffError::GitError(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DiffError::GitError(format!(
            "not a git repository: {}",
            stderr.trim()
        )));
    }

    Ok(PathBuf::from(
        String::from_utf8_lossy(&output.stdout).trim(),
    ))
}
