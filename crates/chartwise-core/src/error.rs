//! Error types for Chartwise.
//!
//! Errors are organized by concern: configuration, credential storage, and
//! the analysis/search request lifecycle. Each carries enough context (the
//! provider, the HTTP status, the timeout) to produce an actionable message.

use crate::keys::ProviderKind;
use thiserror::Error;

/// Top-level error type for Chartwise operations.
#[derive(Error, Debug)]
pub enum ChartwiseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Credential validation or storage errors
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    /// Chart analysis or news search errors
    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Credential errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The submitted key was blank
    #[error("{} API key cannot be empty", display_name(.provider))]
    Empty { provider: ProviderKind },

    /// The submitted key does not match the provider's format
    #[error("Invalid format: a {} API key must start with \"{prefix}\"", display_name(.provider))]
    InvalidFormat {
        provider: ProviderKind,
        prefix: &'static str,
    },

    /// The credentials backend could not be written
    #[error("Credential storage failed: {0}")]
    Storage(String),
}

/// Errors from a chart-analysis or news-search call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Bad user input (image payload, ticker). Never sent to a provider.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No usable credential configured for the provider
    #[error("{provider} API key not configured. Run `chartwise keys set {provider}`.")]
    MissingKey { provider: ProviderKind },

    /// Provider rejected the credential
    #[error("{} rejected the API key", display_name(.provider))]
    Auth { provider: ProviderKind },

    /// Provider quota or rate limit hit
    #[error("{} rate limit exceeded", display_name(.provider))]
    RateLimit { provider: ProviderKind },

    /// The call did not complete within its deadline
    #[error("{} request timed out after {timeout_ms}ms", display_name(.provider))]
    Timeout {
        provider: ProviderKind,
        timeout_ms: u64,
    },

    /// The call was cancelled by the caller before it completed
    #[error("Request cancelled")]
    Cancelled,

    /// Provider safety filter blocked the request
    #[error("Content rejected: {0}")]
    ContentRejected(String),

    /// The extractor could not recover the required structure
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Any other network or HTTP failure
    #[error("{} request failed: {message}", display_name(.provider))]
    Transport {
        provider: ProviderKind,
        message: String,
        /// HTTP status code, if the failure was an HTTP response
        status_code: Option<u16>,
    },
}

impl AnalysisError {
    /// Message suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::MissingKey { provider } => format!(
                "{} API key not configured. Add one with `chartwise keys set {provider}`.",
                provider.spec().name
            ),
            Self::Auth { provider } => format!(
                "Invalid {} API key. Check your configuration.",
                provider.spec().name
            ),
            Self::RateLimit { .. } => "Too many requests. Try again later.".to_string(),
            Self::Timeout { .. } => "The request took too long. Try again.".to_string(),
            Self::Cancelled => "Request cancelled.".to_string(),
            Self::ContentRejected(msg) => msg.clone(),
            Self::MalformedResponse(_) => {
                "The model returned a response that could not be read.".to_string()
            }
            Self::Transport {
                provider,
                status_code: Some(code),
                ..
            } => format!("{} API error: {code}", provider.spec().name),
            Self::Transport { message, .. } => message.clone(),
        }
    }
}

fn display_name(provider: &ProviderKind) -> &'static str {
    provider.spec().name
}

/// Convenience type alias for Chartwise results.
pub type Result<T> = std::result::Result<T, ChartwiseError>;

/// Convenience type alias for request-lifecycle results.
pub type RequestResult<T> = std::result::Result<T, AnalysisError>;
