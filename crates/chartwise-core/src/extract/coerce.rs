//! Field-level coercions. Each takes the raw value (if any) and declares its own default.

use crate::types::ImpactLevel;
use serde_json::{Map, Value};

/// Look up the first present key among `names` (canonical name first, then aliases).
pub(crate) fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| obj.get(*name))
}

/// A non-blank string, or a scalar rendered as one; otherwise `default`.
pub(crate) fn string_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

/// A boolean, accepting "true"/"false" strings. Anything else is `false`.
pub(crate) fn bool_or_false(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// A finite number, accepting numeric strings like "~45" or "62.5%".
pub(crate) fn finite_number_or(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s
            .trim()
            .trim_start_matches(['~', '≈'])
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(default)
}

/// The string entries of an array, in order. Non-arrays become empty.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    }
}

/// An exact impact level, otherwise `MEDIUM`.
pub(crate) fn impact_level(value: Option<&Value>) -> ImpactLevel {
    value
        .and_then(Value::as_str)
        .and_then(ImpactLevel::from_exact)
        .unwrap_or_default()
}
