//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

const RECENCY_FILTERS: &[&str] = &["hour", "day", "week", "month", "year"];
const CONTEXT_SIZES: &[&str] = &["low", "medium", "high"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_image_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_bytes must be > 0".into(),
            ));
        }
        if self.gemini.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "gemini.timeout_ms must be > 0".into(),
            ));
        }
        if self.perplexity.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "perplexity.timeout_ms must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            return Err(ConfigError::ValidationError(
                "gemini.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.perplexity.temperature) {
            return Err(ConfigError::ValidationError(
                "perplexity.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.perplexity.top_p <= 0.0 || self.perplexity.top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "perplexity.top_p must be in (0.0, 1.0]".into(),
            ));
        }
        if !RECENCY_FILTERS.contains(&self.perplexity.search_recency_filter.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "perplexity.search_recency_filter must be one of: {}",
                RECENCY_FILTERS.join(", ")
            )));
        }
        if !CONTEXT_SIZES.contains(&self.perplexity.search_context_size.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "perplexity.search_context_size must be one of: {}",
                CONTEXT_SIZES.join(", ")
            )));
        }
        if self.ticker.min_length == 0 {
            return Err(ConfigError::ValidationError(
                "ticker.min_length must be > 0".into(),
            ));
        }
        if self.ticker.min_length > self.ticker.max_length {
            return Err(ConfigError::ValidationError(
                "ticker.min_length must be <= ticker.max_length".into(),
            ));
        }
        Ok(())
    }
}
