//! gelf: AI commit messages and structured code review for git diffs
//! (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod commit;
pub mod config;
pub mod constants;
pub mod diff;
pub mod env;
pub mod logging;
pub mod models;
pub mod output;
pub mod progress;
pub mod providers;
pub mod review;
