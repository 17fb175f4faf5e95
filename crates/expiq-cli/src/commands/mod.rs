//! Subcommands and the context they share.

pub mod batch;
pub mod config;
pub mod merchant;
pub mod model;
pub mod normalize;
pub mod sms;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use expiq_core::{ExpiqConfig, TransactionRouter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Plain text summary
    Text,
}

/// Settings resolved once from global flags.
pub struct Context {
    pub config: ExpiqConfig,
    /// File the configuration was read from, if any.
    pub config_source: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Context {
    /// Read configuration from `config_path`, else the default location if
    /// it exists, else defaults. `model` replaces the configured model path.
    pub fn load(
        config_path: Option<&Path>,
        model: Option<PathBuf>,
        format: OutputFormat,
    ) -> anyhow::Result<Self> {
        let source = match config_path {
            Some(path) if !path.exists() => {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(default_config_path()).filter(|p| p.exists()),
        };

        let mut config = match &source {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                ExpiqConfig::from_file(path).map_err(|e| {
                    anyhow::anyhow!("Failed to read config {}: {}", path.display(), e)
                })?
            }
            None => ExpiqConfig::default(),
        };

        if let Some(path) = model {
            config.model.model_path = Some(path);
        }

        Ok(Self {
            config,
            config_source: source,
            format,
        })
    }

    /// Router over a freshly loaded model, or the rule-based path if none loads.
    pub fn router(&self) -> TransactionRouter {
        TransactionRouter::from_config(&self.config)
    }

    /// Print `value` as JSON, or through `text` for the text format.
    pub fn emit<T, F>(&self, value: &T, text: F) -> anyhow::Result<()>
    where
        T: Serialize,
        F: FnOnce(&T) -> String,
    {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => println!("{}", text(value)),
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("expiq")
        .join("config.json")
}

fn model_marker(used_model: bool) -> &'static str {
    if used_model { "model" } else { "rules" }
}
