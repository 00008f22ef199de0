//! App-wide constants.
//!
//! Centralises the tool name, config paths, and environment variable names
//! so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "gelf";

/// Crate version, as reported by `gelf version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target triple the binary was built for.
pub const BUILD_TARGET: &str = env!("GELF_BUILD_TARGET");

/// Config filenames searched in the working directory, in order.
pub const CONFIG_FILENAMES: [&str; 2] = ["gelf.yml", "gelf.yaml"];

/// Directory name under the XDG config home (`~/.config/gelf/`).
pub const CONFIG_DIR: &str = "gelf";

/// Dotfile fallback in the home directory.
pub const HOME_CONFIG_FILENAME: &str = ".gelf.yml";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_PROVIDER: &str = "GELF_PROVIDER";
pub const ENV_API_KEY: &str = "GELF_API_KEY";
pub const ENV_BASE_URL: &str = "GELF_BASE_URL";
pub const ENV_CREDENTIALS: &str = "GELF_CREDENTIALS";
pub const ENV_LOG: &str = "GELF_LOG";
pub const ENV_XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";
pub const ENV_HOME: &str = "HOME";
pub const ENV_NO_COLOR: &str = "NO_COLOR";
