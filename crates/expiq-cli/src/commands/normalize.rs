//! Normalize command - show classifier input for a text.

use clap::Args;

use expiq_core::NormalizeReport;

use super::Context;

/// Arguments for the normalize command.
#[derive(Args)]
pub struct NormalizeArgs {
    /// Text to normalize
    text: String,
}

pub async fn run(args: NormalizeArgs, ctx: &Context) -> anyhow::Result<()> {
    let report = NormalizeReport::new(&args.text);
    ctx.emit(&report, |r| {
        format!(
            "input:      {:?}\nnormalized: {:?}\ndisplay:    {:?}",
            r.input, r.normalized, r.display
        )
    })
}
