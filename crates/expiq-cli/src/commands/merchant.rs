//! Merchant command - categorize a single merchant name.

use clap::Args;
use console::style;

use expiq_core::{require_non_empty, MerchantPrediction};

use super::{model_marker, Context};

/// Arguments for the merchant command.
#[derive(Args)]
pub struct MerchantArgs {
    /// Merchant name, e.g. "Swiggy"
    name: String,
}

pub async fn run(args: MerchantArgs, ctx: &Context) -> anyhow::Result<()> {
    require_non_empty("merchant", &args.name)?;

    let prediction = ctx.router().predict_merchant(&args.name);
    ctx.emit(&prediction, format_prediction)
}

fn format_prediction(p: &MerchantPrediction) -> String {
    format!(
        "{} {} → {} ({:.2}, {})",
        style("✓").green(),
        p.merchant,
        style(p.category).cyan().bold(),
        p.confidence,
        model_marker(p.used_model)
    )
}
