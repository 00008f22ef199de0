//! Windowed context extraction around commented lines.
//!
//! Given one file's diff text and a set of new-file line numbers, keep the
//! diff lines within `window` lines of any target, the hunk headers that own
//! them, and the file header. With no targets the extractor shows every
//! changed line with a one-line margin instead.

use crate::models::{LineKind, SnippetLine};

use super::parser::{classify_body_line, parse_hunk_header, trim_eol};

/// Lines shown before and after a commented line.
pub const DEFAULT_CONTEXT_WINDOW: u32 = 3;

/// Margin around changed lines when no comment carries a line number.
pub const FALLBACK_WINDOW: u32 = 1;

/// A diff line annotated with its position in the new file.
struct Annotated<'a> {
    kind: LineKind,
    text: &'a str,
    /// Counter value at this line. Removed lines share the position of the
    /// next surviving line.
    position: Option<u32>,
    /// Index of the owning hunk header.
    hunk: Option<usize>,
}

/// Extract the diff lines relevant to `targets`.
pub fn extract_context(diff_text: &str, targets: &[u32], window: u32) -> Vec<SnippetLine> {
    let lines = annotate(diff_text);

    let (targets, window) = if targets.is_empty() {
        (changed_positions(&lines), FALLBACK_WINDOW)
    } else {
        (targets.to_vec(), window)
    };
    if targets.is_empty() {
        return Vec::new();
    }

    let mut include = vec![false; lines.len()];
    for (idx, line) in lines.iter().enumerate() {
        include[idx] = match line.kind {
            LineKind::Added | LineKind::Removed | LineKind::Context => line
                .position
                .is_some_and(|pos| targets.iter().any(|&t| pos.abs_diff(t) <= window)),
            LineKind::Marker => idx > 0 && include[idx - 1],
            LineKind::Header | LineKind::HunkHeader => false,
        };
    }

    let mut any_body = false;
    for idx in 0..lines.len() {
        if include[idx] {
            any_body = true;
            if let Some(hunk) = lines[idx].hunk {
                include[hunk] = true;
            }
        }
    }
    if !any_body {
        return Vec::new();
    }

    lines
        .iter()
        .zip(include)
        .filter(|(line, keep)| *keep || line.kind == LineKind::Header)
        .map(|(line, _)| SnippetLine {
            kind: line.kind,
            text: line.text.to_string(),
            new_line_no: match line.kind {
                LineKind::Added | LineKind::Context => line.position,
                _ => None,
            },
        })
        .collect()
}

/// Walk the diff once, tracking the new-file line counter.
fn annotate(diff_text: &str) -> Vec<Annotated<'_>> {
    let mut out = Vec::new();
    let mut counter: u32 = 1;
    let mut hunk: Option<usize> = None;

    for raw in diff_text.lines() {
        let text = trim_eol(raw);
        let kind = if text.starts_with("@@") {
            LineKind::HunkHeader
        } else if hunk.is_none() {
            LineKind::Header
        } else {
            classify_body_line(text)
        };

        let position = match kind {
            LineKind::HunkHeader => {
                counter = parse_hunk_header(text).map_or(1, |range| range.new_start);
                hunk = Some(out.len());
                None
            }
            LineKind::Added | LineKind::Context => {
                let pos = counter;
                counter = counter.saturating_add(1);
                Some(pos)
            }
            LineKind::Removed => Some(counter),
            LineKind::Header | LineKind::Marker => None,
        };

        out.push(Annotated {
            kind,
            text,
            position,
            hunk: if kind == LineKind::HunkHeader { None } else { hunk },
        });
    }

    out
}

fn changed_positions(lines: &[Annotated<'_>]) -> Vec<u32> {
    lines
        .iter()
        .filter(|l| matches!(l.kind, LineKind::Added | LineKind::Removed))
        .filter_map(|l| l.position)
        .collect()
}
