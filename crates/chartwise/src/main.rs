//! Chartwise CLI - chart technical analysis and ticker news search.
//!
//! Chartwise sends a candlestick chart to Google Gemini for a structured
//! technical-analysis report and asks Perplexity for recent news about a
//! ticker. Bring your own API keys; they are stored only on this machine.
//!
//! # Usage
//!
//! ```bash
//! # Store your keys (prompts for hidden input)
//! chartwise keys set gemini
//! chartwise keys set perplexity
//!
//! # Analyze a chart
//! chartwise analyze ./chart.png
//!
//! # Search news, one JSON object per line
//! chartwise news AAPL --format jsonl
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Chartwise - chart technical analysis and ticker news with your own API keys.
#[derive(Parser, Debug)]
#[command(name = "chartwise")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, env = "CHARTWISE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a candlestick chart image
    Analyze(cli::analyze::AnalyzeArgs),

    /// Search recent news for a ticker
    News(cli::news::NewsArgs),

    /// Manage stored provider API keys
    Keys(cli::keys::KeysArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_none() => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `chartwise config path`."
            );
            chartwise_core::Config::default()
        }
        Err(e) => return Err(e.into()),
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Chartwise v{}", chartwise_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Analyze(args) => cli::analyze::execute(args, config).await,
        Commands::News(args) => cli::news::execute(args, config).await,
        Commands::Keys(args) => Ok(cli::keys::execute(args, config)?),
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()),
    }
}
