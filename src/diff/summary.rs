//! Per-file added/deleted line counts.

use crate::models::DiffFileStat;

use super::parser::{FILE_MARKER, UNKNOWN_FILE, marker_file_name, trim_eol};

/// Count added and deleted lines per file.
///
/// Only lines inside hunks are counted, so the `---`/`+++` file headers never
/// contribute. Lines starting with a doubled `++` or `--` are not counted
/// either.
pub fn parse_diff_summary(diff: &str) -> Vec<DiffFileStat> {
    let mut stats: Vec<DiffFileStat> = Vec::new();
    let mut in_hunks = false;

    for line in diff.lines() {
        let line = trim_eol(line);
        if line.starts_with(FILE_MARKER) {
            stats.push(DiffFileStat {
                file_name: marker_file_name(line).unwrap_or_else(|| UNKNOWN_FILE.to_string()),
                added_lines: 0,
                deleted_lines: 0,
            });
            in_hunks = false;
            continue;
        }

        let Some(current) = stats.last_mut() else {
            continue;
        };
        if line.starts_with("@@") {
            in_hunks = true;
            continue;
        }
        if !in_hunks {
            continue;
        }

        if line.starts_with('+') && !line.starts_with("++") {
            current.added_lines += 1;
        } else if line.starts_with('-') && !line.starts_with("--") {
            current.deleted_lines += 1;
        }
    }

    stats
}
