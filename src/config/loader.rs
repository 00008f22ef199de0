//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags (applied by the caller)
//! 2. Environment variables
//! 3. The first config file found: `./gelf.yml`, `./gelf.yaml`,
//!    `$XDG_CONFIG_HOME/gelf/gelf.yml` (`~/.config/gelf/…`), `~/.gelf.yml`
//! 4. Built-in defaults
//!
//! Files are not merged: the first one found wins.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    CONFIG_DIR, CONFIG_FILENAMES, ENV_API_KEY, ENV_BASE_URL, ENV_CREDENTIALS, ENV_HOME,
    ENV_NO_COLOR, ENV_PROVIDER, ENV_XDG_CONFIG_HOME, HOME_CONFIG_FILENAME,
};
use crate::env::Env;
use crate::models::ProviderName;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    #[error("failed to read credentials file {path}: {source}")]
    Credentials {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid value for {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub model: ModelConfig,
    pub commit: CommitConfig,
    pub review: ReviewConfig,
    pub color: ColorMode,
    /// File the config was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// LLM provider configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub name: ProviderName,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Upper bound on a single request attempt.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: ProviderName::default(),
            api_key: None,
            base_url: None,
            timeout_secs: 120,
        }
    }
}

/// The two model tiers that `commit.model` / `review.model` may refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub flash: String,
    pub pro: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            flash: "gemini-2.5-flash".to_string(),
            pro: "gemini-2.5-pro".to_string(),
        }
    }
}

impl ModelConfig {
    /// Resolve `flash`/`pro` aliases; anything else is a literal model id.
    pub fn resolve(&self, name: &str) -> String {
        match name.trim() {
            "flash" => self.flash.clone(),
            "pro" => self.pro.clone(),
            other => other.to_string(),
        }
    }
}

/// Commit-message generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    pub model: String,
    pub language: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            model: "flash".to_string(),
            language: "english".to_string(),
        }
    }
}

/// Code review settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub model: String,
    pub language: String,
    /// Max concurrent per-file review calls.
    pub max_concurrent: usize,
    /// Lines of context shown around a commented line.
    pub context_lines: u32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            model: "pro".to_string(),
            language: "english".to_string(),
            max_concurrent: 5,
            context_lines: crate::diff::DEFAULT_CONTEXT_WINDOW,
        }
    }
}

/// When to emit ANSI colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour when writing to a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Decide whether to colour output for a stream with the given terminal status.
    pub fn enabled(self, is_terminal: bool, env: &Env) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => is_terminal && !env.is_set(ENV_NO_COLOR),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// `explicit` (from `--config`) skips discovery. Otherwise the first
    /// existing candidate from [`Config::candidate_paths`] is used.
    pub fn load(cwd: &Path, explicit: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::candidate_paths(cwd, env)
                .into_iter()
                .find(|p| p.is_file()),
        };

        let mut config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                let mut config = Self::load_file(&path)?;
                config.source = Some(path);
                config
            }
            None => Config::default(),
        };

        config.apply_env_vars(env)?;
        Ok(config)
    }

    /// Config file locations in search order.
    pub fn candidate_paths(cwd: &Path, env: &Env) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = CONFIG_FILENAMES.iter().map(|f| cwd.join(f)).collect();

        let home = env
            .non_empty(ENV_HOME)
            .map(PathBuf::from)
            .or_else(dirs::home_dir);

        let config_home = env
            .non_empty(ENV_XDG_CONFIG_HOME)
            .map(PathBuf::from)
            .or_else(|| home.as_ref().map(|h| h.join(".config")));
        if let Some(dir) = config_home {
            paths.extend(CONFIG_FILENAMES.iter().map(|f| dir.join(CONFIG_DIR).join(f)));
        }

        if let Some(home) = home {
            paths.push(home.join(HOME_CONFIG_FILENAME));
        }
        paths
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml_ng::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Apply environment variable overrides.
    ///
    /// API key sources, first match wins: `GELF_API_KEY`, the file named by
    /// `GELF_CREDENTIALS`, the key from the config file, the provider's own
    /// variable (e.g. `GEMINI_API_KEY`).
    fn apply_env_vars(&mut self, env: &Env) -> Result<(), ConfigError> {
        if let Some(val) = env.non_empty(ENV_PROVIDER) {
            self.provider.name = val
                .parse::<ProviderName>()
                .map_err(|reason| ConfigError::InvalidEnv {
                    name: ENV_PROVIDER,
                    reason,
                })?;
        }
        if let Some(val) = env.non_empty(ENV_BASE_URL) {
            self.provider.base_url = Some(val);
        }

        // Blank keys from any source count as missing.
        if self.provider.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            self.provider.api_key = None;
        }

        if let Some(key) = env.non_empty(ENV_API_KEY) {
            self.provider.api_key = Some(key);
        } else if let Some(key) = Self::read_credentials(env)? {
            self.provider.api_key = Some(key);
        } else if self.provider.api_key.is_none() {
            self.provider.api_key = env.non_empty(self.provider.name.api_key_env_var());
        }
        Ok(())
    }

    /// Trimmed contents of the `GELF_CREDENTIALS` file; `None` if unset or blank.
    fn read_credentials(env: &Env) -> Result<Option<String>, ConfigError> {
        let Some(path) = env.non_empty(ENV_CREDENTIALS) else {
            return Ok(None);
        };
        let path = PathBuf::from(path);
        let key = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Credentials { path, source: e })?;
        let key = key.trim();
        Ok((!key.is_empty()).then(|| key.to_string()))
    }

    /// Resolved model id for commit messages.
    pub fn commit_model(&self) -> String {
        self.model.resolve(&self.commit.model)
    }

    /// Resolved model id for reviews.
    pub fn review_model(&self) -> String {
        self.model.resolve(&self.review.model)
    }

    /// YAML dump of the effective configuration with the API key redacted.
    pub fn to_display_yaml(&self) -> String {
        let mut shown = self.clone();
        if shown.provider.api_key.is_some() {
            shown.provider.api_key = Some("[REDACTED]".to_string());
        }
        serde_yaml_ng::to_string(&shown).unwrap_or_else(|e| format!("# failed to render: {e}\n"))
    }
}
