//! News-search extraction: a JSON array of records, tolerating surrounding text.

use super::coerce::{field, impact_level, string_list, string_or};
use super::fence::{balanced_spans, strip_code_fences};
use crate::types::NewsItem;
use serde_json::{Map, Value};

/// Source shown when the record names none.
pub const UNKNOWN_SOURCE: &str = "Unknown source";
/// URL used when the record has no link.
pub const PLACEHOLDER_URL: &str = "#";

/// Extract news items, defaulting missing dates to today (UTC).
///
/// Never fails: a payload with no recoverable JSON yields an empty list.
pub fn extract_news(text: &str) -> Vec<NewsItem> {
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    extract_news_on(text, &today)
}

/// Extract news items, using `today` as the default date.
pub fn extract_news_on(text: &str, today: &str) -> Vec<NewsItem> {
    let cleaned = strip_code_fences(text);

    let Some(records) = find_records(cleaned) else {
        tracing::warn!("No JSON found in news response ({} chars)", cleaned.len());
        return Vec::new();
    };

    let total = records.len();
    let items: Vec<NewsItem> = records
        .iter()
        .filter_map(Value::as_object)
        .filter(|obj| is_news_record(obj))
        .map(|obj| news_item(obj, today))
        .collect();

    if items.len() < total {
        tracing::debug!(
            "Dropped {} malformed news record(s) of {total}",
            total - items.len()
        );
    }
    items
}

/// Locate the record list.
///
/// Preference order: the first array holding at least one object, then the
/// first object wrapped as one record, then an empty array.
fn find_records(text: &str) -> Option<Vec<Value>> {
    let mut saw_empty_array = false;
    let array = balanced_spans(text, '[', ']').find_map(|span| {
        match serde_json::from_str::<Value>(span) {
            // Citations like "[1]" and inner lists like `"tags": []` are not record lists
            Ok(Value::Array(items)) if items.iter().any(Value::is_object) => Some(items),
            Ok(Value::Array(items)) => {
                saw_empty_array |= items.is_empty();
                None
            }
            _ => None,
        }
    });
    if array.is_some() {
        return array;
    }

    let object = balanced_spans(text, '{', '}').find_map(|span| {
        match serde_json::from_str::<Value>(span) {
            Ok(obj @ Value::Object(_)) => Some(vec![obj]),
            _ => None,
        }
    });
    if object.is_some() {
        return object;
    }

    saw_empty_array.then(Vec::new)
}

fn is_news_record(obj: &Map<String, Value>) -> bool {
    matches!(obj.get("title"), Some(Value::String(_)))
        && matches!(obj.get("summary"), Some(Value::String(_)))
}

fn news_item(obj: &Map<String, Value>, today: &str) -> NewsItem {
    NewsItem {
        title: string_or(obj.get("title"), "Untitled"),
        summary: string_or(obj.get("summary"), "No summary"),
        date: string_or(field(obj, &["date", "published_at"]), today),
        source: string_or(obj.get("source"), UNKNOWN_SOURCE),
        url: string_or(field(obj, &["url", "link"]), PLACEHOLDER_URL),
        impact_level: impact_level(field(obj, &["impact_level", "impactLevel", "impact"])),
        tags: string_list(obj.get("tags")),
    }
}
