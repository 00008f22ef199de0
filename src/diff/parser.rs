//! Line-level helpers for unified diff text.
//!
//! Used by the segmenter, the summary parser, and the context extractor,
//! which all scan raw diff lines rather than building a full parse tree.

use crate::models::LineKind;

/// Prefix of the line that opens each file's section in a git diff.
pub const FILE_MARKER: &str = "diff --git ";

/// Name used when a marker line carries no usable path.
pub const UNKNOWN_FILE: &str = "<unknown>";

/// Old and new line ranges of a `@@ -a,b +c,d @@` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
}

/// Drop a trailing `\n` or `\r\n`.
pub fn trim_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Extract the new-side file name from a `diff --git a/<x> b/<y>` line.
///
/// Returns `None` if the line is not a marker or carries no path at all.
/// When the `b/` separator cannot be located the whole remainder is used.
///
/// Paths git quoted (non-ASCII or special characters, `"b/\346\227\245.txt"`)
/// are unquoted and their escapes decoded.
pub fn marker_file_name(line: &str) -> Option<String> {
    let rest = trim_eol(line).strip_prefix(FILE_MARKER)?.trim();
    let name = if let Some(quoted) = quoted_new_path(rest) {
        let unquoted = unquote_c_style(quoted);
        strip_diff_prefix(&unquoted).to_string()
    } else {
        let name = match find_second_prefix(rest) {
            Some(idx) => strip_diff_prefix(&rest[idx + 1..]),
            None => strip_diff_prefix(rest),
        };
        name.trim_matches('"').to_string()
    };
    if name.is_empty() { None } else { Some(name) }
}

/// The inside of a trailing `"..."` path token, if the new path is quoted.
fn quoted_new_path(rest: &str) -> Option<&str> {
    let body = rest.strip_suffix('"')?;
    let start = match body.rfind(" \"") {
        Some(idx) => idx + 2,
        None => body.strip_prefix('"').map(|_| 1)?,
    };
    let inner = &body[start..];
    (inner.len() >= 2).then_some(inner)
}

/// Decode git's C-style path quoting: `\\`, `\"`, `\t`, `\n` and octal bytes.
fn unquote_c_style(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 >= bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let next = bytes[i + 1];
        let octal = bytes
            .get(i + 1..i + 4)
            .filter(|d| d.iter().all(|b| (b'0'..=b'7').contains(b)));
        match (next, octal) {
            (_, Some(digits)) => {
                let value = digits.iter().fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                out.push(value as u8);
                i += 4;
            }
            (b't', None) => {
                out.push(b'\t');
                i += 2;
            }
            (b'n', None) => {
                out.push(b'\n');
                i += 2;
            }
            (other, None) => {
                out.push(other);
                i += 2;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Strip a single-character git diff prefix (`a/`, `b/`, `c/`, `w/`, `i/`, `o/`).
///
/// `c/`, `w/`, `i/` and `o/` show up when `diff.mnemonicPrefix` is enabled.
pub fn strip_diff_prefix(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 2
        && bytes[1] == b'/'
        && matches!(bytes[0], b'a' | b'b' | b'c' | b'w' | b'i' | b'o')
    {
        return &path[2..];
    }
    path
}

/// Position of the space before the second path prefix (` b/` and friends).
///
/// Scans from the right so paths containing ` a/` segments still split at
/// the last separator.
fn find_second_prefix(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    (1..bytes.len().saturating_sub(2)).rev().find(|&i| {
        bytes[i] == b' '
            && bytes[i + 2] == b'/'
            && matches!(bytes[i + 1], b'b' | b'w' | b'i' | b'o' | b'c')
    })
}

/// Parse a `@@ -old_start,old_count +new_start,new_count @@ ...` line.
pub fn parse_hunk_header(line: &str) -> Option<HunkRange> {
    let line = trim_eol(line).strip_prefix("@@ ")?;
    let end = line.find(" @@")?;
    let (old, new) = line[..end].split_once(' ')?;

    let (old_start, old_count) = parse_range(old.strip_prefix('-')?)?;
    let (new_start, new_count) = parse_range(new.strip_prefix('+')?)?;

    Some(HunkRange {
        old_start,
        old_count,
        new_start,
        new_count,
    })
}

/// Parse "start,count" or "start" (count defaults to 1).
fn parse_range(s: &str) -> Option<(u32, u32)> {
    match s.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((s.parse().ok()?, 1)),
    }
}

/// Classify a line that appears after a file's first hunk header.
pub fn classify_body_line(line: &str) -> LineKind {
    let line = trim_eol(line);
    if line.starts_with("@@") {
        LineKind::HunkHeader
    } else if line.starts_with('+') {
        LineKind::Added
    } else if line.starts_with('-') {
        LineKind::Removed
    } else if line.starts_with(' ') || line.is_empty() {
        LineKind::Context
    } else {
        LineKind::Marker
    }
}
