//! Analyze product photos and print shareable price summaries.
//!
//! Usage: luxury-hunter [--rate <text>] [--timeout-secs N] [--json] <IMAGE>...

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use luxury_hunter::{
    run_batch, Config, ExtractionAdapter, ImageInput, OpenAIAnalyzer, Registry,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "luxury-hunter")]
#[command(about = "Read price tags off product photos and quote them in TWD")]
struct Cli {
    /// Exchange rate (EUR to TWD); unparseable text counts as 0
    #[arg(long)]
    rate: Option<String>,

    /// Per-image analysis timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the registry as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Product photos to analyze
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,luxury_hunter=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let analyzer =
        OpenAIAnalyzer::from_config(&config).context("Failed to configure vision analyzer")?;

    let mut adapter = ExtractionAdapter::new(Arc::new(analyzer));
    if let Some(timeout) = cli
        .timeout_secs
        .map(Duration::from_secs)
        .or(config.analysis_timeout)
    {
        adapter = adapter.with_timeout(timeout);
    }

    let registry = Registry::with_rules(config.rules).with_exchange_rate(config.exchange_rate);
    if let Some(rate) = &cli.rate {
        registry.set_exchange_rate_input(rate);
    }

    let mut progress = registry.watch_progress();
    let watcher = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let current = *progress.borrow_and_update();
            tracing::info!(
                completed = current.completed,
                total = current.total,
                "Analyzing photos"
            );
            if current.is_done {
                break;
            }
        }
    });

    let inputs = cli.images.into_iter().map(ImageInput::from_path).collect();
    let report = run_batch(&adapter, &registry, inputs).await;
    let _ = watcher.await;

    if cli.json {
        let snapshot = serde_json::to_string_pretty(&registry.snapshot())
            .context("Failed to serialize results")?;
        println!("{snapshot}");
        return Ok(());
    }

    for summary in registry.summaries() {
        println!("{}\n", summary.text);
    }

    let unpriced = registry.unpriced();
    if !unpriced.is_empty() {
        println!("No price tag found ({}):", unpriced.len());
        for item in unpriced {
            println!("  {}", item.image.display_name());
        }
    }

    tracing::info!(
        priced = report.priced,
        unpriced = report.unpriced,
        fallbacks = report.fallbacks,
        "Done"
    );

    Ok(())
}
