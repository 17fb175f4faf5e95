//! Model command - inspect and verify the classification model.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use expiq_core::{ModelConfig, ModelInfo, ModelStore};

use super::Context;

/// Arguments for the model command.
#[derive(Args)]
pub struct ModelArgs {
    #[command(subcommand)]
    command: ModelCommand,
}

#[derive(Subcommand)]
enum ModelCommand {
    /// Load the configured model and show its metadata
    Info,

    /// Show liveness of the configured model
    Health,

    /// Verify that a model artifact loads and predicts
    Check(CheckArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Model artifact (default: first configured location that exists)
    path: Option<PathBuf>,
}

pub async fn run(args: ModelArgs, ctx: &Context) -> anyhow::Result<()> {
    match args.command {
        ModelCommand::Info => show_info(ctx),
        ModelCommand::Health => show_health(ctx),
        ModelCommand::Check(check_args) => check_model(check_args, ctx),
    }
}

fn show_info(ctx: &Context) -> anyhow::Result<()> {
    let router = ctx.router();
    let info = router.store().info();
    ctx.emit(&info, format_info)
}

fn show_health(ctx: &Context) -> anyhow::Result<()> {
    let router = ctx.router();
    let health = router.store().health();
    ctx.emit(&health, |h| {
        let loaded = if h.model_loaded {
            style("loaded").green()
        } else {
            style("not loaded").yellow()
        };
        format!(
            "Status: {}\nModel: {} {}",
            h.status,
            loaded,
            h.model_path.as_deref().unwrap_or("")
        )
    })
}

fn check_model(args: CheckArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ModelStore::with_config(ctx.config.model.clone());
    let model = match args.path {
        Some(path) => store.load_with(ModelConfig {
            model_path: Some(path),
            search_paths: Vec::new(),
            load_on_start: true,
        })?,
        None => store.load()?,
    };

    model.predict(&["test merchant"])?;

    ctx.emit(&store.info(), |info| {
        format!(
            "{} Model OK\n{}",
            style("✓").green(),
            format_info(info)
        )
    })
}

fn format_info(info: &ModelInfo) -> String {
    if !info.loaded {
        return format!(
            "{} {}",
            style("⚠").yellow(),
            info.reason.as_deref().unwrap_or("No model loaded")
        );
    }

    let mut output = String::new();
    output.push_str(&format!(
        "Path:      {}\n",
        info.path.as_deref().unwrap_or("(in memory)")
    ));
    if let Some(ms) = info.load_time_ms {
        output.push_str(&format!("Load time: {:.1} ms\n", ms));
    }
    output.push_str(&format!("Classes:   {}\n", info.classes.join(", ")));
    output.push_str(&format!("Pipeline:  {}", info.pipeline_steps.join(" → ")));
    output
}
