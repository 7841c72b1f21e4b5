//! Provider traits and shared request plumbing.
//!
//! Each provider returns the raw model text; turning that text into
//! structured results is the extractor's job.

use super::image::ChartImage;
use crate::error::{AnalysisError, RequestResult};
use crate::keys::ProviderKind;
use crate::ticker::Ticker;
use async_trait::async_trait;
use std::time::Duration;

/// Raw text returned by a provider call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Model output text
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// A vision model that analyzes chart images.
///
/// Uses `async_trait` so the facade can hold `Box<dyn ChartAnalyzer>`.
#[async_trait]
pub trait ChartAnalyzer: Send + Sync {
    /// Model name for logging.
    fn model(&self) -> &str;

    /// Send the chart to the model and return its raw answer.
    async fn analyze(&self, image: &ChartImage, api_key: &str) -> RequestResult<ProviderResponse>;

    /// Deadline for one call.
    fn timeout(&self) -> Duration;
}

/// A web-search model that finds news about a ticker.
#[async_trait]
pub trait NewsSearcher: Send + Sync {
    /// Model name for logging.
    fn model(&self) -> &str;

    /// Ask the model for recent news and return its raw answer.
    async fn search(&self, ticker: &Ticker, api_key: &str) -> RequestResult<ProviderResponse>;

    /// Deadline for one call.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.trim().is_empty())
    } else if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Map a reqwest failure (no HTTP response) to the request error taxonomy.
pub(crate) fn network_error(
    provider: ProviderKind,
    timeout: Duration,
    err: reqwest::Error,
) -> AnalysisError {
    if err.is_timeout() {
        AnalysisError::Timeout {
            provider,
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        AnalysisError::Transport {
            provider,
            message: err.to_string(),
            status_code: None,
        }
    }
}

/// First part of an error body, for messages and logs.
pub(crate) fn body_snippet(body: &str) -> &str {
    const MAX: usize = 200;
    let body = body.trim();
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Join a configured base URL and a path without doubling slashes.
pub(crate) fn join_url(endpoint: &str, path: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        assert_eq!(resolve_env_var("   "), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_body_snippet_truncates_on_char_boundary() {
        let body = "é".repeat(300);
        assert_eq!(body_snippet(&body).chars().count(), 200);
        assert_eq!(body_snippet("  short  "), "short");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://api.perplexity.ai/", "/chat/completions"),
            "https://api.perplexity.ai/chat/completions"
        );
        assert_eq!(join_url("http://127.0.0.1:9000", "models/x"), "http://127.0.0.1:9000/models/x");
    }
}
