//! Output renderers: terminal and JSON.

pub mod json;
pub mod terminal;

use colored::{ColoredString, Colorize};

use crate::diff::DEFAULT_CONTEXT_WINDOW;
use crate::models::{FailedFile, StructuredReview};

pub use json::JsonRenderer;
pub use terminal::TerminalRenderer;

/// Apply `style` to `text` only when `color` is set.
///
/// The binary forces `colored` on globally, so this flag is the only switch.
pub fn paint(color: bool, text: &str, style: impl FnOnce(ColoredString) -> ColoredString) -> String {
    if color {
        style(text.normal()).to_string()
    } else {
        text.to_string()
    }
}

/// Trait for rendering a finished review to an output format.
pub trait ReviewRenderer {
    /// Render `review`, noting the files that could not be reviewed.
    fn render(&self, review: &StructuredReview, failed: &[FailedFile]) -> String;
}

/// Presentation options, resolved once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    /// Emit ANSI colours.
    pub color: bool,
    /// Decorate snippets with a line-number gutter and per-line styling.
    pub rich: bool,
    /// Lines of context around each commented line.
    pub context_window: u32,
}

impl RenderStyle {
    /// No colour, no decoration.
    pub fn plain() -> Self {
        Self {
            color: false,
            rich: false,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            color: true,
            rich: true,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}
