//! Chart-analysis extraction: one JSON object with three required sections.

use super::coerce::{bool_or_false, field, finite_number_or, string_or};
use super::fence::strip_code_fences;
use super::{Extraction, MalformedResponse};
use crate::types::{Analysis, AnalysisResult, Indicators, Macd, PriceLevel, Rsi, Summary, Trends};
use serde_json::{Map, Value};

const NOT_DETERMINED: &str = "Not determined";
const NOT_AVAILABLE: &str = "N/A";

/// Parse a chart-analysis response.
///
/// Fails if the text (after fence stripping) is not a JSON object or lacks
/// any of the `analysis`, `summary`, or `indicators` sections. Every field
/// inside the sections is coerced with its own default.
pub fn extract_analysis(text: &str) -> Extraction<AnalysisResult> {
    let cleaned = strip_code_fences(text);
    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| MalformedResponse::new(format!("response is not valid JSON: {e}")))?;
    let root = value
        .as_object()
        .ok_or_else(|| MalformedResponse::new("response is not a JSON object"))?;

    let analysis = section(root, "analysis")?;
    let summary = section(root, "summary")?;
    let indicators = section(root, "indicators")?;

    Ok(AnalysisResult {
        analysis: parse_analysis(analysis),
        summary: parse_summary(summary),
        indicators: parse_indicators(indicators),
    })
}

fn section<'a>(root: &'a Map<String, Value>, name: &str) -> Extraction<&'a Map<String, Value>> {
    root.get(name)
        .and_then(Value::as_object)
        .ok_or_else(|| MalformedResponse::new(format!("missing `{name}` section")))
}

fn parse_analysis(obj: &Map<String, Value>) -> Analysis {
    Analysis {
        general_trend: string_or(
            field(obj, &["generalTrend", "general_trend", "trend"]),
            NOT_DETERMINED,
        ),
        patterns: string_or(
            field(obj, &["patterns", "candlestickPatterns"]),
            "No relevant patterns identified",
        ),
        signals: string_or(field(obj, &["signals"]), "No additional signals"),
        conclusion: string_or(field(obj, &["conclusion"]), "No conclusion provided"),
    }
}

fn parse_summary(obj: &Map<String, Value>) -> Summary {
    let empty = Map::new();
    let trends = field(obj, &["trends"])
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    Summary {
        trends: Trends {
            short_term: string_or(field(trends, &["shortTerm", "short_term"]), NOT_DETERMINED),
            medium_term: string_or(
                field(trends, &["mediumTerm", "medium_term"]),
                NOT_DETERMINED,
            ),
            long_term: string_or(field(trends, &["longTerm", "long_term"]), NOT_DETERMINED),
        },
        supports: price_levels(field(obj, &["supports", "support"])),
        resistances: price_levels(field(obj, &["resistances", "resistance"])),
    }
}

/// Object entries become levels; anything else in the list is dropped.
fn price_levels(value: Option<&Value>) -> Vec<PriceLevel> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| PriceLevel {
            level: string_or(field(entry, &["level", "price"]), NOT_AVAILABLE),
            reason: string_or(field(entry, &["reason"]), "No reason given"),
        })
        .collect()
}

fn parse_indicators(obj: &Map<String, Value>) -> Indicators {
    let empty = Map::new();
    let rsi = field(obj, &["rsi", "RSI"])
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let macd = field(obj, &["macd", "MACD"])
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    Indicators {
        rsi: Rsi {
            value: finite_number_or(field(rsi, &["value"]), 0.0),
            status: string_or(field(rsi, &["status"]), NOT_AVAILABLE),
            is_visible: bool_or_false(field(rsi, &["isVisible", "is_visible", "visible"])),
        },
        macd: Macd {
            status: string_or(field(macd, &["status"]), NOT_AVAILABLE),
            comment: string_or(field(macd, &["comment"]), "No comment"),
            is_visible: bool_or_false(field(macd, &["isVisible", "is_visible", "visible"])),
        },
    }
}
