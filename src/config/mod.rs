//! Configuration loading and layering.
//!
//! Handles `gelf.yml` discovery, environment variable resolution,
//! and the model alias table.

pub mod loader;

pub use loader::{ColorMode, CommitConfig, Config, ConfigError, ModelConfig, ProviderConfig, ReviewConfig};
