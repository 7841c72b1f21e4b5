//! The `chartwise analyze` command.

use super::{resolve_format, run_with_spinner, user_error, FormatArg};
use chartwise_core::{ChartImage, Chartwise, Config, OutputWriter};
use clap::Args;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Chart image (JPEG, PNG, WebP, or GIF)
    pub image: PathBuf,

    /// Output format [default: from config, else text]
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Request timeout in milliseconds (overrides gemini.timeout_ms)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Gemini model (overrides gemini.model)
    #[arg(long)]
    pub model: Option<String>,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(timeout_ms) = args.timeout_ms {
        config.gemini.timeout_ms = timeout_ms;
    }
    if let Some(model) = args.model {
        config.gemini.model = model;
    }

    let image = ChartImage::from_path(&args.image, &config.limits).map_err(user_error)?;
    tracing::debug!(
        path = %args.image.display(),
        media_type = image.media_type(),
        bytes = image.len(),
        "Loaded chart"
    );

    let format = resolve_format(args.format, &config);
    let pretty = config.output.pretty && !args.compact;
    let chartwise = Chartwise::open(config);

    let token = CancellationToken::new();
    let result = run_with_spinner(
        "Analyzing chart...",
        &token,
        chartwise.analyze_chart(&image, &token),
    )
    .await
    .map_err(user_error)?;

    let mut writer = OutputWriter::new(std::io::stdout().lock(), format, pretty);
    writer.write_analysis(&result)?;
    writer.flush()?;
    Ok(())
}
