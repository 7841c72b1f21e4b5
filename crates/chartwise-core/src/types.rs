//! Core data types produced by chart analysis and news search.
//!
//! Field names on the wire follow what the model is asked to emit:
//! camelCase for the analysis report, snake_case for news items.

use serde::{Deserialize, Serialize};

/// Structured technical-analysis report for one chart image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Free-text analysis sections
    pub analysis: Analysis,

    /// Trend horizons and key price levels
    pub summary: Summary,

    /// RSI and MACD readings
    pub indicators: Indicators,
}

/// Free-text analysis sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Market structure and trend strength
    pub general_trend: String,
    /// Candlestick patterns and their implications
    pub patterns: String,
    /// Breakouts, chart formations, volume confirmation
    pub signals: String,
    /// Actionable synthesis including an invalidation scenario
    pub conclusion: String,
}

/// Trend horizons plus support and resistance levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub trends: Trends,
    pub supports: Vec<PriceLevel>,
    pub resistances: Vec<PriceLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub short_term: String,
    pub medium_term: String,
    pub long_term: String,
}

/// A support or resistance level and why it matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price level as written by the model (e.g., "~150.50")
    pub level: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    pub rsi: Rsi,
    pub macd: Macd,
}

/// RSI reading.
///
/// `is_visible == false` means `value` was not observed on the chart and
/// must not be presented as a reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsi {
    pub value: f64,
    /// Overbought, oversold, or neutral (or a momentum note when not visible)
    pub status: String,
    pub is_visible: bool,
}

impl Rsi {
    /// The RSI value, only if it was actually visible on the chart.
    pub fn observed_value(&self) -> Option<f64> {
        self.is_visible.then_some(self.value)
    }
}

/// MACD reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macd {
    /// Bullish cross, bearish cross, no clear cross, or N/A
    pub status: String,
    pub comment: String,
    pub is_visible: bool,
}

/// Expected market impact of a news item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImpactLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl ImpactLevel {
    /// Match one of the exact wire values ("HIGH", "MEDIUM", "LOW").
    pub fn from_exact(value: &str) -> Option<Self> {
        match value {
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One news article about a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    pub source: String,
    pub url: String,
    pub impact_level: ImpactLevel,
    pub tags: Vec<String>,
}

/// The batch returned by one news search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSearchResult {
    /// Normalized ticker that was searched
    pub ticker: String,
    pub news: Vec<NewsItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_level_exact_match_only() {
        assert_eq!(ImpactLevel::from_exact("HIGH"), Some(ImpactLevel::High));
        assert_eq!(ImpactLevel::from_exact("high"), None);
        assert_eq!(ImpactLevel::from_exact(" LOW"), None);
    }

    #[test]
    fn test_impact_level_serializes_uppercase() {
        let json = serde_json::to_string(&ImpactLevel::Low).unwrap();
        assert_eq!(json, "\"LOW\"");
    }

    #[test]
    fn test_rsi_observed_value_respects_visibility() {
        let mut rsi = Rsi {
            value: 62.0,
            status: "Neutral".to_string(),
            is_visible: true,
        };
        assert_eq!(rsi.observed_value(), Some(62.0));
        rsi.is_visible = false;
        assert_eq!(rsi.observed_value(), None);
    }

    #[test]
    fn test_analysis_serializes_camel_case() {
        let trends = Trends {
            short_term: "Alcista".to_string(),
            medium_term: "Lateral".to_string(),
            long_term: "Bajista".to_string(),
        };
        let json = serde_json::to_value(&trends).unwrap();
        assert_eq!(json["shortTerm"], "Alcista");
        assert_eq!(json["longTerm"], "Bajista");
    }
}
