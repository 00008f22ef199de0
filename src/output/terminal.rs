//! Terminal renderer: per-file comments with diff context, then totals.

use colored::{ColoredString, Colorize};

use crate::diff::extract_context;
use crate::models::{Category, FailedFile, FileReview, LineKind, ReviewComment, SnippetLine, StructuredReview};
use crate::output::{RenderStyle, ReviewRenderer};

/// Terminal output renderer.
pub struct TerminalRenderer {
    style: RenderStyle,
}

impl TerminalRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    /// Apply `style` only when colour is enabled.
    fn paint(&self, text: &str, style: impl FnOnce(ColoredString) -> ColoredString) -> String {
        crate::output::paint(self.style.color, text, style)
    }

    fn category_label(&self, category: Category) -> String {
        let label = format!("[{}]", category.label());
        self.paint(&label, |s| match category {
            Category::Must => s.red().bold(),
            Category::Want => s.yellow().bold(),
            Category::Nits => s.blue(),
            Category::Fyi => s.cyan(),
            Category::Imo => s.magenta(),
        })
    }

    fn render_file(&self, review: &FileReview, out: &mut String) {
        let header = if self.style.rich {
            format!("▸ {}", review.file_name)
        } else {
            review.file_name.clone()
        };
        out.push_str(&self.paint(&header, |s| s.bold()));
        out.push('\n');

        if !review.has_issues() {
            out.push_str(&format!("  {}\n\n", self.paint("No issues found.", |s| s.green())));
            return;
        }

        for comment in &review.comments {
            self.render_comment(review, comment, out);
        }
    }

    fn render_comment(&self, review: &FileReview, comment: &ReviewComment, out: &mut String) {
        let location = match comment.line_no {
            Some(line) => format!("L{line}: "),
            None => String::new(),
        };
        out.push_str(&format!(
            "  {} {}{}\n",
            self.category_label(comment.category),
            self.paint(&location, |s| s.bold()),
            comment.message
        ));

        let targets: Vec<u32> = comment.line_no.into_iter().collect();
        let snippet = extract_context(&review.diff_text, &targets, self.style.context_window);
        for line in snippet.iter().filter(|l| l.kind != LineKind::Header) {
            out.push_str(&self.render_snippet_line(line, comment.line_no));
            out.push('\n');
        }
        out.push('\n');
    }

    fn render_snippet_line(&self, line: &SnippetLine, target: Option<u32>) -> String {
        if !self.style.rich {
            return format!("      {}", line.text);
        }

        let is_target = target.is_some() && line.new_line_no == target;
        let gutter = match line.new_line_no {
            Some(n) => format!("{n:>5}"),
            None => " ".repeat(5),
        };
        let marker = if is_target { ">" } else { " " };
        let text = self.paint(&line.text, |s| match line.kind {
            LineKind::Added => s.green(),
            LineKind::Removed => s.red(),
            LineKind::HunkHeader => s.cyan(),
            LineKind::Marker => s.dimmed(),
            LineKind::Context | LineKind::Header => s,
        });
        let text = if is_target {
            self.paint(&text, |s| s.bold())
        } else {
            text
        };
        format!(
            "  {}{} {} {text}",
            self.paint(marker, |s| s.yellow().bold()),
            self.paint(&gutter, |s| s.dimmed()),
            self.paint("│", |s| s.dimmed()),
        )
    }
}

impl ReviewRenderer for TerminalRenderer {
    fn render(&self, review: &StructuredReview, failed: &[FailedFile]) -> String {
        let mut output = String::new();

        for file in &review.file_reviews {
            self.render_file(file, &mut output);
        }

        if !failed.is_empty() {
            output.push_str(&self.paint("Not reviewed:", |s| s.yellow().bold()));
            output.push('\n');
            for file in failed {
                output.push_str(&format!("  {} ({})\n", file.file_name, file.reason));
            }
            output.push('\n');
        }

        let counts = review.counts();
        let breakdown: Vec<String> = counts
            .iter()
            .map(|(category, n)| format!("{} {n}", category.as_str()))
            .collect();
        output.push_str(&self.paint("───────────────────────────────────", |s| s.dimmed()));
        output.push('\n');
        output.push_str(&format!(
            " {} comment(s): {}\n",
            self.paint(&counts.total().to_string(), |s| s.bold()),
            breakdown.join(", ")
        ));
        output.push_str(&format!(" {} {}\n", self.paint("Summary:", |s| s.bold()), review.summary));

        output
    }
}
