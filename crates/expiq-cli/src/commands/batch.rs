//! Batch command - categorize many merchant names in one call.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use expiq_core::{BatchOrchestrator, BatchPrediction};

use super::{model_marker, Context};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Merchant names
    merchants: Vec<String>,

    /// Read merchants from a file, one per line
    #[arg(short, long)]
    file: Option<PathBuf>,
}

pub async fn run(args: BatchArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut merchants = args.merchants;

    if let Some(path) = &args.file {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let before = merchants.len();
        merchants.extend(
            content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );
        debug!(
            "Read {} merchants from {}",
            merchants.len() - before,
            path.display()
        );
    }

    let router = ctx.router();
    let orchestrator = BatchOrchestrator::from_config(router.classifier(), &ctx.config.batch);
    let batch = orchestrator.classify(&merchants)?;

    ctx.emit(&batch, format_batch)
}

fn format_batch(batch: &BatchPrediction) -> String {
    let width = batch
        .results
        .iter()
        .map(|r| r.merchant.chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for r in &batch.results {
        output.push_str(&format!(
            "{:<width$}  {:<14} {:.4}  {}\n",
            r.merchant,
            r.category.as_str(),
            r.confidence,
            model_marker(r.used_model),
            width = width
        ));
    }
    output.push_str(&format!(
        "{} Categorized {} merchants in {:.2}ms",
        style("✓").green(),
        batch.count,
        batch.duration_ms
    ));
    output
}
