//! Configuration structures for the categorization pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Hard upper bound on merchants per batch request.
pub const MAX_BATCH_SIZE: usize = 500;

/// Main configuration for expiq.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpiqConfig {
    /// Model location configuration.
    pub model: ModelConfig,

    /// Batch categorization configuration.
    pub batch: BatchConfig,

    /// SMS field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Where to find the trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Explicit model path, tried before `search_paths`.
    pub model_path: Option<PathBuf>,

    /// Fallback locations, tried in order.
    pub search_paths: Vec<PathBuf>,

    /// Load the model when the router is built.
    pub load_on_start: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            search_paths: vec![
                PathBuf::from("expense_model.json"),
                PathBuf::from("artifacts/models/latest_model.json"),
            ],
            load_on_start: true,
        }
    }
}

impl ModelConfig {
    /// Candidate paths in resolution order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.model_path
            .iter()
            .chain(self.search_paths.iter())
            .cloned()
            .collect()
    }
}

/// Batch categorization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum merchants per batch. Clamped to `MAX_BATCH_SIZE`.
    pub max_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_size: MAX_BATCH_SIZE,
        }
    }
}

impl BatchConfig {
    pub fn effective_max(&self) -> usize {
        self.max_size.clamp(1, MAX_BATCH_SIZE)
    }
}

/// SMS field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Longest merchant candidate considered, in characters.
    pub max_merchant_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_merchant_len: 36,
        }
    }
}

impl ExpiqConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExpiqError;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ExpiqConfig =
            serde_json::from_str(r#"{"model": {"model_path": "m.json"}}"#).unwrap();

        assert_eq!(config.model.model_path, Some(PathBuf::from("m.json")));
        assert!(config.model.load_on_start);
        assert_eq!(config.batch.max_size, MAX_BATCH_SIZE);
        assert_eq!(config.extraction.max_merchant_len, 36);
    }

    #[test]
    fn test_candidates_put_explicit_path_first() {
        let config = ModelConfig {
            model_path: Some(PathBuf::from("custom.json")),
            ..Default::default()
        };
        let candidates = config.candidates();
        assert_eq!(candidates[0], PathBuf::from("custom.json"));
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_batch_max_is_clamped() {
        let config = BatchConfig { max_size: 10_000 };
        assert_eq!(config.effective_max(), MAX_BATCH_SIZE);
        assert_eq!(BatchConfig { max_size: 0 }.effective_max(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ExpiqConfig::default();
        config.batch.max_size = 100;
        config.save(&path).unwrap();

        let loaded = ExpiqConfig::from_file(&path).unwrap();
        assert_eq!(loaded.batch.max_size, 100);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/expiq/config.json");

        ExpiqConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"batch": {"max_size": "lots"}}"#).unwrap();

        let err = ExpiqConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ExpiqError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_missing_config_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExpiqConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ExpiqError::Io(_)), "got {err:?}");
    }
}
