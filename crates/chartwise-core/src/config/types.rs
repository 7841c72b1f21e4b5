//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Input limits checked before anything is sent to a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum chart image size in bytes
    pub max_image_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Google Gemini (chart analysis) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API base URL (without the `/models/...` path)
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum output tokens
    pub max_output_tokens: u32,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// API key fallback when none is stored (supports ${ENV_VAR} syntax)
    pub api_key: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.4,
            max_output_tokens: 4096,
            timeout_ms: 60_000,
            api_key: "${GEMINI_API_KEY}".to_string(),
        }
    }
}

/// Perplexity Sonar (news search) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerplexityConfig {
    /// API base URL (without `/chat/completions`)
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling threshold
    pub top_p: f32,

    /// Maximum output tokens
    pub max_tokens: u32,

    /// Search recency window: hour, day, week, month, or year
    pub search_recency_filter: String,

    /// Web search context size: low, medium, or high
    pub search_context_size: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// API key fallback when none is stored (supports ${ENV_VAR} syntax)
    pub api_key: String,
}

impl Default for PerplexityConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.perplexity.ai".to_string(),
            model: "sonar".to_string(),
            temperature: 0.2,
            top_p: 0.9,
            max_tokens: 2000,
            search_recency_filter: "month".to_string(),
            search_context_size: "medium".to_string(),
            timeout_ms: 30_000,
            api_key: "${PERPLEXITY_API_KEY}".to_string(),
        }
    }
}

/// Ticker validation bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Minimum length after trimming
    pub min_length: usize,

    /// Maximum length after trimming
    pub max_length: usize,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            min_length: 2,
            max_length: 10,
        }
    }
}

/// Credential storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Credentials file override (supports ~). Defaults next to config.toml.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("text", "json", or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
