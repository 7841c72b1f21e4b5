//! Provider integration for chart analysis and news search.
//!
//! Two providers sit behind small traits: Gemini analyzes chart images and
//! Perplexity searches news. Both return raw model text, which the facade
//! hands to the extractor.

pub(crate) mod gemini;
pub(crate) mod image;
pub(crate) mod perplexity;
pub mod prompt;
pub(crate) mod provider;

pub use gemini::GeminiClient;
pub use image::ChartImage;
pub use perplexity::PerplexityClient;
pub use provider::{resolve_env_var, ChartAnalyzer, NewsSearcher, ProviderResponse};
