//! Tolerant recovery of structured results from raw model text.
//!
//! Model output is not guaranteed to be clean JSON: it may be wrapped in
//! code fences or commentary, use slightly different field names, or ignore
//! enumerations. The extractors here recover what they can and fill every
//! missing field with a declared default, without ever claiming an indicator
//! was observed when the source did not say so.

mod analysis;
pub(crate) mod coerce;
mod fence;
mod news;

pub use analysis::extract_analysis;
pub use fence::{find_balanced, strip_code_fences};
pub use news::{extract_news, extract_news_on, PLACEHOLDER_URL, UNKNOWN_SOURCE};

use crate::error::AnalysisError;

/// The extractor could not find the required structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedResponse(pub String);

impl MalformedResponse {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl std::fmt::Display for MalformedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MalformedResponse> for AnalysisError {
    fn from(value: MalformedResponse) -> Self {
        AnalysisError::MalformedResponse(value.0)
    }
}

/// Outcome of an extraction: the parsed value or why it could not be recovered.
pub type Extraction<T> = Result<T, MalformedResponse>;
