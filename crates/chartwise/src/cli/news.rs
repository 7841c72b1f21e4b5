//! The `chartwise news` command.

use super::{resolve_format, run_with_spinner, user_error, FormatArg};
use chartwise_core::{Chartwise, Config, OutputWriter};
use clap::Args;
use tokio_util::sync::CancellationToken;

/// Arguments for the `news` command.
#[derive(Args, Debug)]
pub struct NewsArgs {
    /// Ticker symbol (e.g. AAPL, BRK.B, ^GSPC)
    pub ticker: String,

    /// Output format [default: from config, else text]
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Request timeout in milliseconds (overrides perplexity.timeout_ms)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

/// Execute the news command.
pub async fn execute(args: NewsArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(timeout_ms) = args.timeout_ms {
        config.perplexity.timeout_ms = timeout_ms;
    }

    let format = resolve_format(args.format, &config);
    let pretty = config.output.pretty && !args.compact;
    let chartwise = Chartwise::open(config);

    let token = CancellationToken::new();
    let message = format!("Searching news for {}...", args.ticker.trim().to_uppercase());
    let result = run_with_spinner(&message, &token, chartwise.search_news(&args.ticker, &token))
        .await
        .map_err(user_error)?;

    tracing::info!("Found {} news item(s) for {}", result.news.len(), result.ticker);

    let mut writer = OutputWriter::new(std::io::stdout().lock(), format, pretty);
    writer.write_news(&result)?;
    writer.flush()?;
    Ok(())
}
