//! Clap argument types and input validation.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use gelf::diff::DiffSource;
use gelf::models::{FailedFile, StructuredReview};
use gelf::output::{JsonRenderer, RenderStyle, ReviewRenderer, TerminalRenderer};

/// AI-assisted commit messages and code review for git diffs.
#[derive(Parser, Debug)]
#[command(name = "gelf", version = gelf::constants::VERSION)]
pub struct Cli {
    /// Enable debug logging on stderr (GELF_LOG takes precedence).
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    /// Use this config file instead of searching for one.
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Generate a commit message for the staged changes and commit.
    Commit(CommitArgs),

    /// Print only the generated commit message (for editors and hooks).
    Message(MessageArgs),

    /// Review a diff and print per-file comments.
    Review(Box<ReviewArgs>),

    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print version and build information.
    Version,
}

/// Config subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved configuration (API key redacted).
    List,
}

/// Arguments for the `commit` subcommand.
#[derive(Parser, Debug)]
pub struct CommitArgs {
    /// Show the changed files, the diff and the message without committing.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Suppress the file list and the success line.
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,

    /// Commit without asking for confirmation.
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,

    /// Model alias ("flash", "pro") or model id.
    #[arg(long)]
    pub model: Option<String>,

    /// Language for the commit message (e.g. english, japanese).
    #[arg(long)]
    pub language: Option<String>,
}

/// Arguments for the `message` subcommand.
#[derive(Parser, Debug)]
pub struct MessageArgs {
    /// Also write the staged diff to stderr.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Model alias ("flash", "pro") or model id.
    #[arg(long)]
    pub model: Option<String>,

    /// Language for the commit message.
    #[arg(long)]
    pub language: Option<String>,
}

/// Arguments for the `review` subcommand.
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    // --- Input ---
    /// Review staged changes instead of the working tree.
    #[arg(long, default_value_t = false, conflicts_with_all = ["diff_file", "diff_stdin"])]
    pub staged: bool,

    /// Pre-computed unified diff file.
    #[arg(long, conflicts_with = "diff_stdin")]
    pub diff_file: Option<PathBuf>,

    /// Read unified diff from stdin.
    #[arg(long, default_value_t = false)]
    pub diff_stdin: bool,

    // --- Model ---
    /// Model alias ("flash", "pro") or model id.
    #[arg(long)]
    pub model: Option<String>,

    /// Language for review comments.
    #[arg(long)]
    pub language: Option<String>,

    // --- Output ---
    /// Output format.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Plain snippets: no gutter, no per-line styling.
    #[arg(long, default_value_t = false)]
    pub no_style: bool,

    /// Stream a free-form review as it is generated instead of the
    /// structured per-file review.
    #[arg(long, default_value_t = false, conflicts_with = "format")]
    pub stream: bool,

    // --- Performance ---
    /// Max concurrent file reviews (default from config).
    #[arg(long)]
    pub max_concurrent: Option<usize>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Render a review using the renderer for this format.
    pub fn render(&self, review: &StructuredReview, failed: &[FailedFile], style: RenderStyle) -> String {
        match self {
            OutputFormat::Terminal => TerminalRenderer::new(style).render(review, failed),
            OutputFormat::Json => JsonRenderer.render(review, failed),
        }
    }
}

impl ReviewArgs {
    /// Where the diff comes from; clap already rejects conflicting flags.
    pub fn diff_source(&self) -> DiffSource {
        if let Some(ref path) = self.diff_file {
            DiffSource::File(path.clone())
        } else if self.diff_stdin {
            DiffSource::Stdin
        } else {
            DiffSource::Git {
                staged: self.staged,
            }
        }
    }
}
