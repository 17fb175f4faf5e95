//! CLI application for bank SMS expense categorization.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, merchant, model, normalize, sms, Context, OutputFormat};

/// ExpenseIQ - Categorize bank SMS transactions
#[derive(Parser)]
#[command(name = "expiq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Model artifact to load instead of the configured locations
    #[arg(long, global = true, env = "EXPIQ_MODEL_PATH")]
    model: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and categorize a bank SMS, or a CSV of them
    Sms(sms::SmsArgs),

    /// Categorize a merchant name
    Merchant(merchant::MerchantArgs),

    /// Categorize many merchant names at once
    Batch(batch::BatchArgs),

    /// Show how text is normalized before classification
    Normalize(normalize::NormalizeArgs),

    /// Inspect the classification model
    Model(model::ModelArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let ctx = Context::load(cli.config.as_deref(), cli.model, cli.format)?;

    match cli.command {
        Commands::Sms(args) => sms::run(args, &ctx).await,
        Commands::Merchant(args) => merchant::run(args, &ctx).await,
        Commands::Batch(args) => batch::run(args, &ctx).await,
        Commands::Normalize(args) => normalize::run(args, &ctx).await,
        Commands::Model(args) => model::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
