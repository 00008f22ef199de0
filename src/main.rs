//! gelf: AI commit messages and code review for git diffs.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use gelf::commit;
use gelf::config;
use gelf::constants;
use gelf::diff;
use gelf::env;
use gelf::logging;
use gelf::output;
use gelf::progress;
use gelf::providers;
use gelf::review;

use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Command, CommitArgs, ConfigAction, MessageArgs, OutputFormat, ReviewArgs};
use cli::print_warning;
use config::{ColorMode, Config};
use diff::{GitCli, VersionControl};
use env::Env;
use output::{RenderStyle, paint};
use progress::ProgressTracker;
use providers::CompletionProvider;
use providers::rig::RigProvider;
use review::ReviewAggregator;

/// Exit code after Ctrl-C, following the 128 + SIGINT convention.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let env = Env::real();
    logging::init(cli.verbose, &env);
    // Styling is decided per stream from config; `colored`'s own tty check
    // only looks at stdout.
    colored::control::set_override(true);
    let stderr_color = ColorMode::Auto.enabled(io::stderr().is_terminal(), &env);

    // Resolves only on an actual Ctrl-C; a handler that fails to install never fires.
    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = run(cli, env) => {
            if let Err(err) = result {
                eprintln!("Error: {err:#}");
                process::exit(1);
            }
        }
        _ = interrupted => {
            eprintln!();
            print_warning("interrupted", stderr_color);
            process::exit(EXIT_INTERRUPTED);
        }
    }
}

/// Colour decisions for the two output streams.
#[derive(Debug, Clone, Copy)]
struct Colors {
    stdout: bool,
    stderr: bool,
}

async fn run(cli: Cli, env: Env) -> Result<()> {
    if let Command::Version = cli.command {
        return run_version(ColorMode::Auto.enabled(io::stdout().is_terminal(), &env));
    }

    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let config = Config::load(&cwd, cli.config_file.as_deref(), &env)
        .context("failed to load configuration")?;
    if let Some(ref source) = config.source {
        tracing::debug!(path = %source.display(), "loaded config");
    }

    let colors = Colors {
        stdout: config.color.enabled(io::stdout().is_terminal(), &env),
        stderr: config.color.enabled(io::stderr().is_terminal(), &env),
    };

    match cli.command {
        Command::Commit(args) => run_commit(args, &config, &cwd, colors).await,
        Command::Message(args) => run_message(args, &config, &cwd, colors).await,
        Command::Review(args) => run_review(*args, &config, &cwd, colors).await,
        Command::Config {
            action: ConfigAction::List,
        } => run_config_list(&config),
        Command::Version => run_version(colors.stdout),
    }
}

/// Print version and build information.
fn run_version(color: bool) -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        paint(color, constants::APP_NAME, |s| s.bold()),
        paint(color, constants::VERSION, |s| s.green().bold())
    );
    println!("{}     {}", paint(color, "target:", |s| s.dimmed()), constants::BUILD_TARGET);
    Ok(())
}

/// Print the resolved configuration with the API key redacted.
fn run_config_list(config: &Config) -> Result<()> {
    match config.source {
        Some(ref path) => println!("# source: {}", path.display()),
        None => println!("# no config file found, using defaults"),
    }
    print!("{}", config.to_display_yaml());
    Ok(())
}

/// Open the git repository containing `cwd`.
async fn open_repo(cwd: &Path) -> Result<GitCli> {
    let root = diff::git::find_repo_root(cwd)
        .await
        .context("not inside a git repository")?;
    Ok(GitCli::new(root))
}

fn build_provider(config: &Config) -> Result<RigProvider> {
    RigProvider::new(config.provider.clone()).context("failed to set up the AI provider")
}

/// Generate a commit message for the staged changes and commit it.
async fn run_commit(args: CommitArgs, config: &Config, cwd: &Path, colors: Colors) -> Result<()> {
    use colored::Colorize;

    let vcs = open_repo(cwd).await?;
    let Some(staged) = commit::staged_changes(&vcs)
        .await
        .context("failed to read staged changes")?
    else {
        print_warning("No staged changes to commit", colors.stderr);
        return Ok(());
    };

    let model = args
        .model
        .as_deref()
        .map(|m| config.model.resolve(m))
        .unwrap_or_else(|| config.commit_model());
    let language = args.language.unwrap_or_else(|| config.commit.language.clone());

    if let Some(text) = commit::preview(&staged, args.dry_run, args.quiet) {
        eprintln!("{text}");
    }

    let provider = build_provider(config)?;
    if !args.quiet {
        eprintln!("Generating commit message with {model}...");
    }
    let message = commit::generate_commit_message(&provider, &model, &staged.diff, &language).await?;

    if args.dry_run {
        println!("{message}");
        return Ok(());
    }

    eprintln!("\nGenerated commit message:\n\n  {message}\n");
    if !args.yes && !ask_to_commit().await? {
        eprintln!("Commit cancelled.");
        return Ok(());
    }

    vcs.commit(&message).await.context("failed to commit")?;
    if !args.quiet {
        let tick = paint(colors.stderr, "✔", |s| s.green().bold());
        eprintln!("{tick} Committed: {message}");
    }
    Ok(())
}

/// Prompt on stderr and read the answer without blocking the runtime.
async fn ask_to_commit() -> Result<bool> {
    tokio::task::spawn_blocking(|| {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stderr();
        cli::confirm("Commit with this message?", &mut input, &mut output)
    })
    .await
    .context("confirmation prompt failed")?
    .context("failed to read confirmation")
}

/// Print only the generated commit message.
async fn run_message(args: MessageArgs, config: &Config, cwd: &Path, colors: Colors) -> Result<()> {
    let vcs = open_repo(cwd).await?;
    let Some(staged) = commit::staged_changes(&vcs)
        .await
        .context("failed to read staged changes")?
    else {
        print_warning("No staged changes to commit", colors.stderr);
        return Ok(());
    };

    if args.dry_run {
        eprintln!("=== Staged Changes ===\n{}\n", staged.diff);
    }

    let model = args
        .model
        .as_deref()
        .map(|m| config.model.resolve(m))
        .unwrap_or_else(|| config.commit_model());
    let language = args.language.unwrap_or_else(|| config.commit.language.clone());

    let provider = build_provider(config)?;
    let message = commit::generate_commit_message(&provider, &model, &staged.diff, &language).await?;

    print!("{message}");
    io::stdout().flush().context("failed to write message")?;
    Ok(())
}

/// Run a structured or streamed review of a diff.
async fn run_review(args: ReviewArgs, config: &Config, cwd: &Path, colors: Colors) -> Result<()> {
    let source = args.diff_source();
    // File and stdin input work outside a repository.
    let root = diff::git::find_repo_root(cwd)
        .await
        .unwrap_or_else(|_| cwd.to_path_buf());
    let vcs = GitCli::new(root);
    let input = review::load_review_input(&source, &vcs)
        .await
        .context("failed to load diff")?;

    let model = args
        .model
        .as_deref()
        .map(|m| config.model.resolve(m))
        .unwrap_or_else(|| config.review_model());
    let language = args
        .language
        .clone()
        .unwrap_or_else(|| config.review.language.clone());

    if args.stream {
        let Some(diff_text) = input.stream_text() else {
            print_warning(review::input::NO_CHANGES_WARNING, colors.stderr);
            return Ok(());
        };
        let provider: Arc<dyn CompletionProvider> = Arc::new(build_provider(config)?);
        let request = review::prompt::streaming_review_request(&model, diff_text, &language);
        let mut stdout = io::stdout();
        review::stream_review(provider, request, |chunk| {
            let _ = write!(stdout, "{chunk}");
            let _ = stdout.flush();
        })
        .await
        .context("streamed review failed")?;
        println!();
        return Ok(());
    }

    let segments = match input.into_segments() {
        Ok(segments) => segments,
        Err(warning) => {
            print_warning(warning, colors.stderr);
            return Ok(());
        }
    };
    let provider: Arc<dyn CompletionProvider> = Arc::new(build_provider(config)?);

    let names: Vec<String> = segments.iter().map(|s| s.file_name.clone()).collect();
    let show_progress = args.format == OutputFormat::Terminal && io::stderr().is_terminal();
    let tracker =
        Arc::new(ProgressTracker::new(&names, &model, show_progress).with_color(colors.stderr));

    let outcome = ReviewAggregator::new(provider, &model, &language)
        .with_max_concurrent(args.max_concurrent.unwrap_or(config.review.max_concurrent))
        .with_progress(tracker)
        .run(segments)
        .await
        .context("review failed")?;

    let style = RenderStyle {
        color: colors.stdout && args.format == OutputFormat::Terminal,
        rich: !args.no_style,
        context_window: config.review.context_lines,
    };
    let rendered = args.format.render(&outcome.review, &outcome.failed_files, style);
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }

    if let Some(warning) = cli::failed_files_warning(&outcome.failed_files) {
        print_warning(&warning, colors.stderr);
    }
    Ok(())
}
