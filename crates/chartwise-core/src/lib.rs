//! Chartwise Core - chart analysis and ticker news search with your own keys.
//!
//! Chartwise sends a candlestick chart to a vision model (Google Gemini) for
//! a structured technical-analysis report, and asks a web-search model
//! (Perplexity Sonar) for recent news about a ticker. Provider keys are
//! supplied by the user and stored only on the local machine.
//!
//! # Architecture
//!
//! ```text
//! KeyStore ─┐
//!           ├→ Provider client → with_deadline → Extractor → ResultSlot
//! Input ────┘   (Gemini/Perplexity)   (timeout,     (tolerant JSON)
//!                                      cancel)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use chartwise_core::{Chartwise, Config};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> chartwise_core::Result<()> {
//!     let chartwise = Chartwise::open(Config::load()?);
//!     let result = chartwise.search_news("aapl", &CancellationToken::new()).await?;
//!     for item in &result.news {
//!         println!("[{}] {}", item.impact_level, item.title);
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod extract;
pub mod keys;
pub mod llm;
pub mod output;
pub mod ticker;
pub mod transport;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{AnalysisError, ChartwiseError, ConfigError, KeyError, RequestResult, Result};
pub use keys::{KeyStatus, KeyStore, ProviderKind};
pub use llm::{ChartAnalyzer, ChartImage, GeminiClient, NewsSearcher, PerplexityClient};
pub use output::{OutputFormat, OutputWriter};
pub use ticker::Ticker;
pub use transport::{ResultSlot, Ticket};
pub use types::{AnalysisResult, ImpactLevel, NewsItem, NewsSearchResult};

pub use tokio_util::sync::CancellationToken;

use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The main entry point: wires keys, providers, and the extractor together.
pub struct Chartwise {
    config: Config,
    keys: Arc<KeyStore>,
    analyzer: Box<dyn ChartAnalyzer>,
    searcher: Box<dyn NewsSearcher>,
    analysis: ResultSlot<AnalysisResult>,
    news: ResultSlot<NewsSearchResult>,
}

impl Chartwise {
    /// Create an instance with the credentials file named by the config.
    pub fn open(config: Config) -> Self {
        let keys = Arc::new(KeyStore::open(config.keys_path()));
        Self::new(config, keys)
    }

    /// Create an instance using the real Gemini and Perplexity clients.
    pub fn new(config: Config, keys: Arc<KeyStore>) -> Self {
        let analyzer = Box::new(GeminiClient::new(&config.gemini));
        let searcher = Box::new(PerplexityClient::new(&config.perplexity));
        Self::with_providers(config, keys, analyzer, searcher)
    }

    /// Create an instance with explicit providers.
    pub fn with_providers(
        config: Config,
        keys: Arc<KeyStore>,
        analyzer: Box<dyn ChartAnalyzer>,
        searcher: Box<dyn NewsSearcher>,
    ) -> Self {
        tracing::debug!("Initializing Chartwise v{}", VERSION);
        Self {
            config,
            keys,
            analyzer,
            searcher,
            analysis: ResultSlot::new(),
            news: ResultSlot::new(),
        }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shared key store.
    pub fn keys(&self) -> &Arc<KeyStore> {
        &self.keys
    }

    /// Find the key to use for `provider`.
    ///
    /// A stored key wins. Otherwise the config value (after `${ENV_VAR}`
    /// resolution) is used, but only if it passes format validation.
    pub fn resolve_key(&self, provider: ProviderKind) -> RequestResult<String> {
        if let Some(key) = self.keys.get(provider) {
            return Ok(key);
        }

        let configured = match provider {
            ProviderKind::Gemini => &self.config.gemini.api_key,
            ProviderKind::Perplexity => &self.config.perplexity.api_key,
        };
        llm::resolve_env_var(configured)
            .and_then(|raw| match keys::validate(provider, &raw) {
                Ok(key) => {
                    tracing::debug!("Using configured {provider} key {}", keys::mask(&key));
                    Some(key)
                }
                Err(e) => {
                    tracing::warn!("Ignoring configured {provider} key: {e}");
                    None
                }
            })
            .ok_or(AnalysisError::MissingKey { provider })
    }

    /// Analyze a candlestick chart.
    ///
    /// Fails with `MissingKey` before any network call when no Gemini key is
    /// available. The call is bounded by `gemini.timeout_ms` and by `token`.
    pub async fn analyze_chart(
        &self,
        image: &ChartImage,
        token: &CancellationToken,
    ) -> RequestResult<AnalysisResult> {
        let provider = ProviderKind::Gemini;
        let api_key = self.resolve_key(provider)?;
        let ticket = self.analysis.begin();

        let call = token.child_token();
        let outcome = transport::with_deadline(
            provider,
            &call,
            self.analyzer.timeout(),
            self.analyzer.analyze(image, &api_key),
        )
        .await
        .and_then(|resp| {
            tracing::debug!(
                model = %resp.model,
                latency_ms = resp.latency_ms,
                chars = resp.text.len(),
                "Chart analysis received"
            );
            extract::extract_analysis(&resp.text).map_err(AnalysisError::from)
        });

        match outcome {
            Ok(result) => {
                self.analysis.complete(ticket, result.clone());
                Ok(result)
            }
            Err(e) => {
                self.analysis.fail(ticket);
                Err(e)
            }
        }
    }

    /// Search recent news for a ticker.
    ///
    /// The ticker is normalized and validated first; invalid input never
    /// reaches the network. Bounded by `perplexity.timeout_ms` and by `token`.
    pub async fn search_news(
        &self,
        ticker_input: &str,
        token: &CancellationToken,
    ) -> RequestResult<NewsSearchResult> {
        let ticker = Ticker::parse(ticker_input, &self.config.ticker)?;
        let provider = ProviderKind::Perplexity;
        let api_key = self.resolve_key(provider)?;
        let ticket = self.news.begin();

        let call = token.child_token();
        let outcome = transport::with_deadline(
            provider,
            &call,
            self.searcher.timeout(),
            self.searcher.search(&ticker, &api_key),
        )
        .await
        .map(|resp| {
            let news = extract::extract_news(&resp.text);
            tracing::debug!(
                %ticker,
                model = %resp.model,
                latency_ms = resp.latency_ms,
                items = news.len(),
                "News search received"
            );
            NewsSearchResult {
                ticker: ticker.as_str().to_string(),
                news,
            }
        });

        match outcome {
            Ok(result) => {
                self.news.complete(ticket, result.clone());
                Ok(result)
            }
            Err(e) => {
                self.news.fail(ticket);
                Err(e)
            }
        }
    }

    /// The last analysis stored by the newest completed request.
    pub fn latest_analysis(&self) -> Option<AnalysisResult> {
        self.analysis.latest()
    }

    /// The last news result stored by the newest completed request.
    pub fn latest_news(&self) -> Option<NewsSearchResult> {
        self.news.latest()
    }

    /// Clear stored results and invalidate requests still in flight.
    pub fn reset(&self) {
        self.analysis.reset();
        self.news.reset();
    }
}
