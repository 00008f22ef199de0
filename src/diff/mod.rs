//! Diff engine: git CLI wrapper, per-file segmentation, line statistics,
//! and context extraction around review comments.

pub mod context;
pub mod file;
pub mod git;
pub mod parser;
pub mod segment;
pub mod summary;

use std::path::PathBuf;

use thiserror::Error;

pub use context::{DEFAULT_CONTEXT_WINDOW, extract_context};
pub use git::{GitCli, VersionControl};
pub use segment::segment_diff;
pub use summary::parse_diff_summary;

/// Errors from the diff engine and the version-control collaborator.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("git command failed: {0}")]
    GitError(String),

    #[error("git commit failed: {0}")]
    CommitFailed(String),

    #[error("failed to read diff: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("diff file not found: {0}")]
    PathNotFound(String),
}

/// Where the diff under review comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    /// `git diff` of the working tree, or of the index when `staged`.
    Git { staged: bool },
    /// A pre-computed unified diff file.
    File(PathBuf),
    /// A unified diff piped on stdin.
    Stdin,
}

/// Load the diff text for `source`.
pub async fn load_diff(source: &DiffSource, vcs: &dyn VersionControl) -> Result<String, DiffError> {
    match source {
        DiffSource::Git { staged } => vcs.diff(*staged).await,
        DiffSource::File(path) => file::read_diff_file(path).await,
        DiffSource::Stdin => file::read_diff_stdin().await,
    }
}
