//! CLI command definitions and small terminal helpers.
//!
//! Uses clap derive macros for argument definitions.

pub mod args;

use std::io::{self, BufRead, Write};

use colored::Colorize;

use gelf::models::FailedFile;
use gelf::output::paint;

/// Print `Warning: {message}` to stderr.
pub fn print_warning(message: &str, color: bool) {
    let label = paint(color, "Warning:", |s| s.yellow().bold());
    eprintln!("{label} {message}");
}

/// Warning text for files left out of the review, if any.
pub fn failed_files_warning(failed: &[FailedFile]) -> Option<String> {
    if failed.is_empty() {
        return None;
    }
    let names: Vec<&str> = failed.iter().map(|f| f.file_name.as_str()).collect();
    Some(format!(
        "{} file(s) could not be reviewed: {}",
        failed.len(),
        names.join(", ")
    ))
}

/// Ask a yes/no question; only `y` or `yes` (any case) confirms.
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
