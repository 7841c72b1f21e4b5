//! CLI command implementations.

pub mod analyze;
pub mod config;
pub mod keys;
pub mod news;
pub mod theme;

use chartwise_core::{AnalysisError, Config, OutputFormat};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> chartwise_core::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Output format flag shared by the result-producing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Human-readable report
    Text,
    /// A single JSON document
    Json,
    /// One JSON object per line
    Jsonl,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Jsonl => OutputFormat::JsonLines,
        }
    }
}

/// The flag if given, else `[output].format`, else text.
pub fn resolve_format(flag: Option<FormatArg>, config: &Config) -> OutputFormat {
    match flag {
        Some(flag) => flag.into(),
        None => OutputFormat::parse(&config.output.format).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown output.format '{}', using text",
                config.output.format
            );
            OutputFormat::Text
        }),
    }
}

/// Turn a request error into the message shown to the user.
pub fn user_error(err: AnalysisError) -> anyhow::Error {
    tracing::debug!("Request failed: {err}");
    anyhow::anyhow!(err.user_message())
}

/// Drive a provider call with a spinner on stderr. Ctrl+C cancels `token`.
pub async fn run_with_spinner<T, F>(message: &str, token: &CancellationToken, fut: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = create_spinner(message);

    let interrupt = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("Interrupted, cancelling request");
                token.cancel();
            }
        })
    };

    let output = fut.await;
    interrupt.abort();
    spinner.finish_and_clear();
    output
}

/// Create a spinner, hidden when stderr is not a terminal.
fn create_spinner(message: &str) -> ProgressBar {
    if !console::Term::stderr().is_term() {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
