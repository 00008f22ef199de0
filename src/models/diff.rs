//! Diff-related types: per-file segments, line stats, and context snippets.

use serde::Serialize;

/// The slice of a unified diff that belongs to one file.
///
/// `diff_text` starts at the file's `diff --git` marker and keeps the
/// original line endings, so segments concatenate back into the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiffSegment {
    pub file_name: String,
    pub diff_text: String,
}

/// Added/deleted line counts for one file, used for "changed files" listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffFileStat {
    pub file_name: String,
    pub added_lines: usize,
    pub deleted_lines: usize,
}

/// Classification of a line inside a file's diff text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// File header (`diff --git`, `index`, `---`, `+++`, mode lines).
    Header,
    /// `@@ -a,b +c,d @@` hunk header.
    HunkHeader,
    Added,
    Removed,
    Context,
    /// `\ No newline at end of file` and similar.
    Marker,
}

/// One line of extracted context, as rendered under a review comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetLine {
    pub kind: LineKind,
    /// The raw diff line, prefix included, line ending stripped.
    pub text: String,
    /// New-file line number for added and context lines.
    pub new_line_no: Option<u32>,
}
