//! Split a unified diff into per-file segments.

use crate::models::FileDiffSegment;

use super::parser::{FILE_MARKER, UNKNOWN_FILE, marker_file_name};

/// Split `diff` at every `diff --git` marker.
///
/// Each segment's text is a byte-exact slice of the input, line endings
/// included. Text before the first marker belongs to no file and is skipped.
/// A diff without markers yields no segments.
pub fn segment_diff(diff: &str) -> Vec<FileDiffSegment> {
    let mut segments = Vec::new();
    let mut open: Option<(String, usize)> = None;
    let mut offset = 0;

    for line in diff.split_inclusive('\n') {
        if line.starts_with(FILE_MARKER) {
            if let Some((file_name, start)) = open.take() {
                segments.push(FileDiffSegment {
                    file_name,
                    diff_text: diff[start..offset].to_string(),
                });
            }
            let file_name = marker_file_name(line).unwrap_or_else(|| UNKNOWN_FILE.to_string());
            open = Some((file_name, offset));
        }
        offset += line.len();
    }

    if let Some((file_name, start)) = open {
        segments.push(FileDiffSegment {
            file_name,
            diff_text: diff[start..].to_string(),
        });
    }

    segments
}
