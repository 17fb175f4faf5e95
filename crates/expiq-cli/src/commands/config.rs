//! Config command - inspect or create the JSON config file.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use expiq_core::ExpiqConfig;

use super::{default_config_path, Context};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a config file holding the defaults
    Init(InitArgs),

    /// Print where the config file is read from
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Destination (default: the per-user config location)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace a file that already exists
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, ctx: &Context) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Path => show_path(ctx),
    }
}

fn show_config(ctx: &Context) -> anyhow::Result<()> {
    match &ctx.config_source {
        Some(path) => eprintln!("{} {}", style("ℹ").blue(), path.display()),
        None => eprintln!("{} built-in defaults", style("ℹ").blue()),
    }
    println!("{}", serde_json::to_string_pretty(&ctx.config)?);
    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let path = args.output.unwrap_or_else(default_config_path);
    anyhow::ensure!(
        args.force || !path.exists(),
        "{} already exists, pass --force to replace it",
        path.display()
    );

    ExpiqConfig::default().save(&path)?;
    println!("{} Wrote defaults to {}", style("✓").green(), path.display());
    Ok(())
}

fn show_path(ctx: &Context) -> anyhow::Result<()> {
    let path = ctx.config_source.clone().unwrap_or_else(default_config_path);
    let state = if path.exists() {
        style("present").green()
    } else {
        style("missing, create it with `expiq config init`").yellow()
    };
    println!("{} ({})", path.display(), state);
    Ok(())
}
