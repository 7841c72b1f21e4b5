//! Ticker symbol normalization and validation.

use crate::config::TickerConfig;
use crate::error::AnalysisError;
use regex::Regex;
use std::sync::LazyLock;

/// Letters, digits, and the punctuation used by exchange suffixes and indices
/// (`BRK.B`, `BTC-USD`, `^GSPC`, `EURUSD=X`).
static TICKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9.\-^=]+$").expect("ticker pattern is valid"));

/// A normalized (trimmed, upper-cased) and validated ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    /// Normalize and validate user input.
    pub fn parse(input: &str, config: &TickerConfig) -> Result<Self, AnalysisError> {
        let normalized = input.trim().to_uppercase();
        let len = normalized.chars().count();

        if len < config.min_length {
            return Err(AnalysisError::InvalidInput(format!(
                "Ticker is too short (minimum {} characters)",
                config.min_length
            )));
        }
        if len > config.max_length {
            return Err(AnalysisError::InvalidInput(format!(
                "Ticker is too long (maximum {} characters)",
                config.max_length
            )));
        }
        if !TICKER_PATTERN.is_match(&normalized) {
            return Err(AnalysisError::InvalidInput(
                "Invalid ticker: use only letters, digits, and . - ^ =".to_string(),
            ));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
