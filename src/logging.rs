//! Diagnostic logging setup.
//!
//! Logs go to stderr so stdout stays reserved for the commit message or the
//! rendered review.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::constants::ENV_LOG;
use crate::env::Env;

/// Pick the filter directive: `GELF_LOG`, else `debug` when verbose, else `warn`.
pub fn filter_directive(verbose: bool, env: &Env) -> String {
    match env.non_empty(ENV_LOG) {
        Some(directive) => directive,
        None if verbose => "debug".to_string(),
        None => "warn".to_string(),
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(verbose: bool, env: &Env) {
    let directive = filter_directive(verbose, env);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
