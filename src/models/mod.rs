//! Shared types used across all modules.
//!
//! Diff segments and stats live in [`diff`], review comments and the
//! aggregated review in [`review`]. Other modules import from here rather
//! than reaching into each other's internals.

pub mod diff;
pub mod review;

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

pub use diff::{DiffFileStat, FileDiffSegment, LineKind, SnippetLine};
pub use review::{
    Category, CategoryCounts, FailedFile, FileReview, ReviewComment, StructuredReview,
};

/// Supported LLM provider backends.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderName {
    Anthropic,
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAI,
    Cohere,
    #[default]
    Gemini,
    Perplexity,
    #[serde(rename = "deepseek")]
    #[strum(serialize = "deepseek")]
    DeepSeek,
    #[serde(rename = "xai")]
    #[strum(serialize = "xai")]
    XAI,
    Groq,
    /// Any OpenAI-compatible API (e.g. Ollama, Together, local servers).
    #[serde(rename = "openai-compatible")]
    #[strum(serialize = "openai-compatible")]
    OpenAICompatible,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.into())
    }
}

impl std::str::FromStr for ProviderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ProviderName::iter()
            .find(|p| <&'static str>::from(*p) == wanted)
            .ok_or_else(|| {
                let supported: Vec<&'static str> = ProviderName::iter().map(Into::into).collect();
                format!(
                    "unsupported provider: '{s}'. Supported: {}",
                    supported.join(", ")
                )
            })
    }
}

impl ProviderName {
    /// Provider-specific environment variable holding the API key.
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            ProviderName::Anthropic => "ANTHROPIC_API_KEY",
            ProviderName::OpenAI | ProviderName::OpenAICompatible => "OPENAI_API_KEY",
            ProviderName::Cohere => "COHERE_API_KEY",
            ProviderName::Gemini => "GEMINI_API_KEY",
            ProviderName::Perplexity => "PERPLEXITY_API_KEY",
            ProviderName::DeepSeek => "DEEPSEEK_API_KEY",
            ProviderName::XAI => "XAI_API_KEY",
            ProviderName::Groq => "GROQ_API_KEY",
        }
    }

    /// Whether `base_url` must be configured for this provider.
    pub fn requires_base_url(self) -> bool {
        matches!(self, ProviderName::OpenAICompatible)
    }
}
