//! Live per-file review status on stderr.
//!
//! Redraws a small block of lines (one per file) as reviews start, finish,
//! or fail. Disabled when stderr is not a terminal or output is quiet.

use std::io::{self, Write};
use std::sync::Mutex;

use colored::Colorize;

use crate::output::paint;

/// Status of a single file review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Queued, waiting for a concurrency slot.
    Pending,
    /// Request in flight.
    InProgress,
    Done,
    /// Failed with a short reason.
    Failed(String),
}

/// Tracks and renders live progress for file reviews.
///
/// Shared across review tasks via `Arc`.
pub struct ProgressTracker {
    inner: Mutex<ProgressState>,
    /// If false, all output is suppressed.
    enabled: bool,
    /// ANSI styling of the status lines.
    color: bool,
}

struct ProgressState {
    /// Files in diff order with their status.
    files: Vec<(String, TaskStatus)>,
    /// Model name for the header.
    model: String,
    /// Number of lines we last printed (for clearing).
    rendered_lines: usize,
}

impl ProgressTracker {
    pub fn new(files: &[String], model: &str, enabled: bool) -> Self {
        Self {
            inner: Mutex::new(ProgressState {
                files: files
                    .iter()
                    .map(|f| (f.clone(), TaskStatus::Pending))
                    .collect(),
                model: model.to_string(),
                rendered_lines: 0,
            }),
            enabled,
            color: false,
        }
    }

    /// Style status lines; off by default.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// A tracker that records state but never prints.
    pub fn disabled() -> Self {
        Self::new(&[], "", false)
    }

    /// Update the status of a file and re-render.
    ///
    /// Files not known to the tracker are appended.
    pub fn update(&self, file: &str, status: TaskStatus) {
        let Ok(mut state) = self.inner.lock() else {
            return;
        };
        match state.files.iter_mut().find(|(name, _)| name == file) {
            Some(entry) => entry.1 = status,
            None => state.files.push((file.to_string(), status)),
        }
        if self.enabled {
            self.render(&mut state);
        }
    }

    /// Print the initial header and file listing.
    pub fn start(&self) {
        if !self.enabled {
            return;
        }
        if let Ok(mut state) = self.inner.lock() {
            self.render(&mut state);
        }
    }

    /// Clear the live block and leave one final line per file.
    pub fn finish(&self) {
        if !self.enabled {
            return;
        }
        let Ok(mut state) = self.inner.lock() else {
            return;
        };
        Self::clear_lines(state.rendered_lines);
        state.rendered_lines = 0;

        let stderr = io::stderr();
        let mut handle = stderr.lock();
        for line in self.final_lines(&state) {
            let _ = writeln!(handle, "{line}");
        }
        let _ = writeln!(handle);
        let _ = handle.flush();
    }

    /// Current status of `file`, if tracked.
    pub fn status(&self, file: &str) -> Option<TaskStatus> {
        let state = self.inner.lock().ok()?;
        state
            .files
            .iter()
            .find(|(name, _)| name == file)
            .map(|(_, status)| status.clone())
    }

    /// Render the current state to stderr, clearing previous output.
    fn render(&self, state: &mut ProgressState) {
        Self::clear_lines(state.rendered_lines);

        let lines = self.live_lines(state);
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        for line in &lines {
            let _ = writeln!(handle, "{line}");
        }
        let _ = handle.flush();
        state.rendered_lines = lines.len();
    }

    /// Header plus one line per file, as redrawn while reviews run.
    fn live_lines(&self, state: &ProgressState) -> Vec<String> {
        let c = self.color;
        let mut lines = vec![format!(
            "  {} Reviewing {} file(s) with {}",
            paint(c, "▸", |s| s.cyan().bold()),
            state.files.len(),
            paint(c, &state.model, |s| s.dimmed()),
        )];
        for (file, status) in &state.files {
            let (icon, text) = match status {
                TaskStatus::Pending => (
                    paint(c, "○", |s| s.dimmed()),
                    paint(c, "waiting", |s| s.dimmed()),
                ),
                TaskStatus::InProgress => (
                    paint(c, "◌", |s| s.cyan().bold()),
                    paint(c, "reviewing…", |s| s.cyan()),
                ),
                TaskStatus::Done => (
                    paint(c, "✔", |s| s.green().bold()),
                    paint(c, "done", |s| s.green()),
                ),
                TaskStatus::Failed(reason) => (
                    paint(c, "✖", |s| s.red().bold()),
                    paint(c, reason, |s| s.red()),
                ),
            };
            lines.push(format!("    {icon} {} {text}", paint(c, file, |s| s.dimmed())));
        }
        lines
    }

    /// One settled line per file, left behind by [`ProgressTracker::finish`].
    fn final_lines(&self, state: &ProgressState) -> Vec<String> {
        let c = self.color;
        state
            .files
            .iter()
            .map(|(file, status)| {
                let (icon, text) = match status {
                    TaskStatus::Failed(reason) => {
                        (paint(c, "✖", |s| s.red().bold()), paint(c, reason, |s| s.red()))
                    }
                    _ => (paint(c, "✔", |s| s.green().bold()), paint(c, "done", |s| s.green())),
                };
                format!("  {icon} {} {text}", paint(c, file, |s| s.dimmed()))
            })
            .collect()
    }

    /// Move cursor up and clear `n` lines.
    fn clear_lines(n: usize) {
        if n == 0 {
            return;
        }
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        for _ in 0..n {
            let _ = write!(handle, "\x1b[1A\x1b[2K");
        }
        let _ = handle.flush();
    }
}
