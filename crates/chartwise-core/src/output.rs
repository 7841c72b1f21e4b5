//! Output formatting for text reports, JSON, and JSONL.
//!
//! JSON keeps every field as extracted (including the raw RSI value next to
//! its visibility flag). The text report is for people and only shows what
//! the model actually observed.

use crate::error::Result;
use crate::types::{AnalysisResult, NewsItem, NewsSearchResult, PriceLevel};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// Single JSON object
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// A writer that renders results in the chosen format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a chart analysis.
    pub fn write_analysis(&mut self, result: &AnalysisResult) -> Result<()> {
        match self.format {
            OutputFormat::Text => self.writer.write_all(render_analysis(result).as_bytes())?,
            OutputFormat::Json => self.write_json(result, self.pretty)?,
            OutputFormat::JsonLines => self.write_json(result, false)?,
        }
        Ok(())
    }

    /// Write a news search result.
    ///
    /// JSONL writes one news item per line, which suits piping into `jq`.
    pub fn write_news(&mut self, result: &NewsSearchResult) -> Result<()> {
        match self.format {
            OutputFormat::Text => self.writer.write_all(render_news(result).as_bytes())?,
            OutputFormat::Json => self.write_json(result, self.pretty)?,
            OutputFormat::JsonLines => {
                for item in &result.news {
                    self.write_json(item, false)?;
                }
            }
        }
        Ok(())
    }

    fn write_json<T: Serialize>(&mut self, item: &T, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut self.writer, item)?;
        } else {
            serde_json::to_writer(&mut self.writer, item)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Render a chart analysis as a text report.
pub fn render_analysis(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let a = &result.analysis;
    let s = &result.summary;
    let ind = &result.indicators;

    section(&mut out, "General trend", &a.general_trend);
    section(&mut out, "Patterns", &a.patterns);
    section(&mut out, "Signals", &a.signals);
    section(&mut out, "Conclusion", &a.conclusion);

    let _ = writeln!(out, "TRENDS");
    let _ = writeln!(out, "  Short term:  {}", s.trends.short_term);
    let _ = writeln!(out, "  Medium term: {}", s.trends.medium_term);
    let _ = writeln!(out, "  Long term:   {}", s.trends.long_term);
    out.push('\n');

    levels(&mut out, "SUPPORTS", &s.supports);
    levels(&mut out, "RESISTANCES", &s.resistances);

    let _ = writeln!(out, "INDICATORS");
    match ind.rsi.observed_value() {
        Some(value) => {
            let _ = writeln!(out, "  RSI:  {value:.1} ({})", ind.rsi.status);
        }
        None => {
            let _ = writeln!(out, "  RSI:  not visible on chart ({})", ind.rsi.status);
        }
    }
    if ind.macd.is_visible {
        let _ = writeln!(out, "  MACD: {} ({})", ind.macd.status, ind.macd.comment);
    } else {
        let _ = writeln!(out, "  MACD: not visible on chart ({})", ind.macd.comment);
    }
    out
}

fn section(out: &mut String, title: &str, body: &str) {
    let _ = writeln!(out, "{}", title.to_uppercase());
    let _ = writeln!(out, "  {body}\n");
}

fn levels(out: &mut String, title: &str, levels: &[PriceLevel]) {
    let _ = writeln!(out, "{title}");
    if levels.is_empty() {
        let _ = writeln!(out, "  (none identified)");
    }
    let width = levels.iter().map(|l| l.level.chars().count()).max().unwrap_or(0);
    for level in levels {
        let _ = writeln!(out, "  {:<width$}  {}", level.level, level.reason);
    }
    out.push('\n');
}

/// Render a news search result as a text report.
pub fn render_news(result: &NewsSearchResult) -> String {
    let mut out = String::new();
    if result.news.is_empty() {
        let _ = writeln!(out, "No relevant news found for {}.", result.ticker);
        return out;
    }

    let noun = if result.news.len() == 1 { "item" } else { "items" };
    let _ = writeln!(out, "News for {} ({} {noun})\n", result.ticker, result.news.len());
    for item in &result.news {
        news_entry(&mut out, item);
    }
    out
}

fn news_entry(out: &mut String, item: &NewsItem) {
    let _ = writeln!(out, "[{}] {}", item.impact_level, item.title);
    let _ = writeln!(out, "  {} | {}", item.date, item.source);
    let _ = writeln!(out, "  {}", item.summary);
    if item.url != crate::extract::PLACEHOLDER_URL {
        let _ = writeln!(out, "  {}", item.url);
    }
    if !item.tags.is_empty() {
        let _ = writeln!(out, "  Tags: {}", item.tags.join(", "));
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Analysis, ImpactLevel, Indicators, Macd, Rsi, Summary, Trends};

    fn analysis(rsi_visible: bool) -> AnalysisResult {
        AnalysisResult {
            analysis: Analysis {
                general_trend: "Bullish".to_string(),
                patterns: "Bull flag".to_string(),
                signals: "Breakout".to_string(),
                conclusion: "Long above 180".to_string(),
            },
            summary: Summary {
                trends: Trends {
                    short_term: "Up".to_string(),
                    medium_term: "Up".to_string(),
                    long_term: "Range".to_string(),
                },
                supports: vec![PriceLevel {
                    level: "180".to_string(),
                    reason: "Prior high".to_string(),
                }],
                resistances: vec![],
            },
            indicators: Indicators {
                rsi: Rsi {
                    value: 48.0,
                    status: "Neutral momentum".to_string(),
                    is_visible: rsi_visible,
                },
                macd: Macd {
                    status: "Not determined".to_string(),
                    comment: "No comment".to_string(),
                    is_visible: false,
                },
            },
        }
    }

    fn news(items: Vec<NewsItem>) -> NewsSearchResult {
        NewsSearchResult {
            ticker: "AAPL".to_string(),
            news: items,
        }
    }

    fn item(title: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            summary: "Summary".to_string(),
            date: "2026-10-01".to_string(),
            source: "Reuters".to_string(),
            url: "#".to_string(),
            impact_level: ImpactLevel::High,
            tags: vec!["earnings".to_string()],
        }
    }

    #[test]
    fn test_text_hides_rsi_number_when_not_visible() {
        let text = render_analysis(&analysis(false));
        assert!(text.contains("RSI:  not visible on chart"));
        assert!(!text.contains("48.0"));
        assert!(text.contains("MACD: not visible on chart"));
    }

    #[test]
    fn test_text_shows_rsi_number_when_visible() {
        let text = render_analysis(&analysis(true));
        assert!(text.contains("RSI:  48.0 (Neutral momentum)"));
        assert!(text.contains("(none identified)"));
        assert!(text.contains("180  Prior high"));
    }

    #[test]
    fn test_json_keeps_raw_rsi_and_flag() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write_analysis(&analysis(false)).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["indicators"]["rsi"]["value"], 48.0);
        assert_eq!(value["indicators"]["rsi"]["isVisible"], false);
    }

    #[test]
    fn test_write_news_jsonl_one_item_per_line() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);
        writer.write_news(&news(vec![item("A"), item("B")])).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"impact_level\":\"HIGH\""));
    }

    #[test]
    fn test_write_news_json_object() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, true);
        writer.write_news(&news(vec![item("A")])).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["ticker"], "AAPL");
        assert_eq!(value["news"][0]["title"], "A");
    }

    #[test]
    fn test_text_news_report() {
        let text = render_news(&news(vec![item("Apple beats")]));
        assert!(text.starts_with("News for AAPL (1 item)"));
        assert!(text.contains("[HIGH] Apple beats"));
        assert!(text.contains("Tags: earnings"));
        // Placeholder URLs are not printed
        assert!(!text.contains("  #\n"));

        assert_eq!(render_news(&news(vec![])), "No relevant news found for AAPL.\n");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("invalid"), None);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_are_reported() {
        use crate::error::ChartwiseError;

        let mut text = OutputWriter::new(BrokenPipe, OutputFormat::Text, false);
        let err = text.write_news(&news(vec![item("A")])).unwrap_err();
        assert!(matches!(err, ChartwiseError::Io(_)));

        let mut json = OutputWriter::new(BrokenPipe, OutputFormat::Json, false);
        let err = json.write_analysis(&analysis(true)).unwrap_err();
        assert!(matches!(err, ChartwiseError::Json(e) if e.is_io()));
    }
}
