//! Shared, atomically replaceable model handle.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use expiq_inference::{argmax, LinearTextModel, TextModel};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::ModelError;
use crate::models::category::Category;
use crate::models::config::ModelConfig;

/// A fully constructed model and where it came from. Never mutated after
/// construction.
pub struct LoadedModel {
    backend: Box<dyn TextModel>,
    path: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
    load_time_ms: f64,
}

impl LoadedModel {
    /// Wrap an in-memory backend.
    pub fn new<M: TextModel + 'static>(backend: M) -> Self {
        Self {
            backend: Box::new(backend),
            path: None,
            loaded_at: Utc::now(),
            load_time_ms: 0.0,
        }
    }

    /// Load a linear text model artifact.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let start = Instant::now();
        let backend = LinearTextModel::from_file(path)?;

        Ok(Self {
            backend: Box::new(backend),
            path: Some(path.to_path_buf()),
            loaded_at: Utc::now(),
            load_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn load_time_ms(&self) -> f64 {
        self.load_time_ms
    }

    pub fn classes(&self) -> &[String] {
        self.backend.classes()
    }

    /// Most probable category and its probability for each text, in one
    /// inference call.
    pub fn predict(&self, texts: &[&str]) -> Result<Vec<(Category, f32)>, ModelError> {
        let proba = self.backend.predict_proba(texts)?;
        let classes = self.backend.classes();

        if proba.nrows() != texts.len() || proba.ncols() != classes.len() {
            return Err(ModelError::ShapeMismatch {
                expected: format!("{}x{}", texts.len(), classes.len()),
                actual: format!("{}x{}", proba.nrows(), proba.ncols()),
            });
        }

        proba
            .rows()
            .into_iter()
            .map(|row| {
                let (idx, p) = argmax(row).ok_or_else(|| ModelError::ShapeMismatch {
                    expected: "finite probabilities".to_string(),
                    actual: "empty or NaN row".to_string(),
                })?;
                let label = &classes[idx];
                let category = Category::from_str(label)
                    .map_err(|_| ModelError::UnknownLabel(label.clone()))?;
                Ok((category, p))
            })
            .collect()
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("path", &self.path)
            .field("classes", &self.backend.classes())
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

/// Model metadata for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_time_ms: Option<f64>,
    pub classes: Vec<String>,
    pub pipeline_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub model_path: Option<String>,
    pub uptime_seconds: f64,
}

/// Holder of the current model.
///
/// Readers clone the `Arc` and release the lock immediately; a reload builds
/// the replacement outside the lock and only takes the write side to swap the
/// pointer. In-flight requests keep whichever model they already cloned.
pub struct ModelStore {
    current: RwLock<Option<Arc<LoadedModel>>>,
    config: RwLock<ModelConfig>,
}

impl ModelStore {
    /// Create an empty store with default model locations.
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    /// Create an empty store that loads from the given locations.
    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            current: RwLock::new(None),
            config: RwLock::new(config),
        }
    }

    /// The currently published model.
    pub fn current(&self) -> Option<Arc<LoadedModel>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    /// Publish a model, returning the one it replaced.
    pub fn publish(&self, model: LoadedModel) -> Option<Arc<LoadedModel>> {
        self.swap(Arc::new(model))
    }

    fn swap(&self, model: Arc<LoadedModel>) -> Option<Arc<LoadedModel>> {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(model)
    }

    /// Unpublish the current model. Later requests use the rule-based path.
    pub fn clear(&self) -> Option<Arc<LoadedModel>> {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Load from the configured locations and publish. On failure the
    /// previously published model, if any, stays live.
    pub fn load(&self) -> Result<Arc<LoadedModel>, ModelError> {
        let candidates = self
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .candidates();

        let found = candidates.iter().find(|p| p.exists()).cloned();
        let Some(path) = found else {
            error!("No model file found, predictions will use rule-based fallback");
            return Err(ModelError::NotFound { tried: candidates });
        };

        let model = LoadedModel::from_file(&path).inspect_err(|e| {
            error!("Failed to load model from {}: {}", path.display(), e);
        })?;

        info!(
            "Model loaded from {} ({:.1} ms)",
            path.display(),
            model.load_time_ms()
        );

        let model = Arc::new(model);
        self.swap(Arc::clone(&model));
        Ok(model)
    }

    /// Replace the model locations, then load.
    pub fn load_with(&self, config: ModelConfig) -> Result<Arc<LoadedModel>, ModelError> {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        self.load()
    }

    /// Hot-reload from the last used locations.
    pub fn reload(&self) -> Result<Arc<LoadedModel>, ModelError> {
        self.load()
    }

    pub fn info(&self) -> ModelInfo {
        match self.current() {
            Some(model) => ModelInfo {
                loaded: true,
                path: model.path().map(|p| p.display().to_string()),
                loaded_at: Some(model.loaded_at()),
                load_time_ms: Some((model.load_time_ms() * 10.0).round() / 10.0),
                classes: model.classes().to_vec(),
                pipeline_steps: model.backend.steps(),
                reason: None,
            },
            None => ModelInfo {
                loaded: false,
                path: None,
                loaded_at: None,
                load_time_ms: None,
                classes: Vec::new(),
                pipeline_steps: Vec::new(),
                reason: Some("No model loaded".to_string()),
            },
        }
    }

    pub fn health(&self) -> HealthStatus {
        let model = self.current();
        let uptime_seconds = model
            .as_ref()
            .map(|m| {
                let ms = (Utc::now() - m.loaded_at()).num_milliseconds().max(0);
                (ms as f64 / 100.0).round() / 10.0
            })
            .unwrap_or(0.0);

        HealthStatus {
            status: "ok".to_string(),
            model_loaded: model.is_some(),
            model_path: model.and_then(|m| m.path().map(|p| p.display().to_string())),
            uptime_seconds,
        }
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expiq_inference::InferenceError;
    use ndarray::Array2;

    struct FixedModel {
        classes: Vec<String>,
        row: Vec<f32>,
    }

    impl TextModel for FixedModel {
        fn predict_proba(&self, texts: &[&str]) -> expiq_inference::Result<Array2<f32>> {
            let mut out = Array2::zeros((texts.len(), self.row.len()));
            for mut r in out.rows_mut() {
                r.assign(&ndarray::ArrayView1::from(&self.row));
            }
            Ok(out)
        }

        fn classes(&self) -> &[String] {
            &self.classes
        }
    }

    struct FailingModel(Vec<String>);

    impl TextModel for FailingModel {
        fn predict_proba(&self, _texts: &[&str]) -> expiq_inference::Result<Array2<f32>> {
            Err(InferenceError::InferenceFailed("boom".to_string()))
        }

        fn classes(&self) -> &[String] {
            &self.0
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_predict_argmax() {
        let model = LoadedModel::new(FixedModel {
            classes: labels(&["Food", "Travel"]),
            row: vec![0.3, 0.7],
        });
        assert_eq!(model.predict(&["a", "b"]).unwrap(), vec![(Category::Travel, 0.7); 2]);
    }

    #[test]
    fn test_predict_unknown_label() {
        let model = LoadedModel::new(FixedModel {
            classes: labels(&["Food", "Groceries"]),
            row: vec![0.1, 0.9],
        });
        assert!(matches!(model.predict(&["x"]), Err(ModelError::UnknownLabel(l)) if l == "Groceries"));
    }

    #[test]
    fn test_predict_shape_mismatch() {
        let model = LoadedModel::new(FixedModel {
            classes: labels(&["Food", "Travel", "Other"]),
            row: vec![0.5, 0.5],
        });
        assert!(matches!(model.predict(&["x"]), Err(ModelError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_predict_propagates_backend_error() {
        let model = LoadedModel::new(FailingModel(labels(&["Food", "Other"])));
        assert!(matches!(model.predict(&["x"]), Err(ModelError::Inference(_))));
    }

    #[test]
    fn test_publish_and_clear() {
        let store = ModelStore::new();
        assert!(!store.is_loaded());
        assert!(!store.info().loaded);

        let previous = store.publish(LoadedModel::new(FailingModel(labels(&["Food", "Other"]))));
        assert!(previous.is_none());
        assert!(store.is_loaded());
        assert_eq!(store.info().classes, labels(&["Food", "Other"]));

        assert!(store.clear().is_some());
        assert!(!store.health().model_loaded);
    }

    #[test]
    fn test_in_flight_reader_keeps_old_model() {
        let store = ModelStore::new();
        store.publish(LoadedModel::new(FixedModel {
            classes: labels(&["Food", "Travel"]),
            row: vec![0.9, 0.1],
        }));

        let held = store.current().unwrap();
        store.publish(LoadedModel::new(FixedModel {
            classes: labels(&["Food", "Travel"]),
            row: vec![0.1, 0.9],
        }));

        assert_eq!(held.predict(&["x"]).unwrap()[0].0, Category::Food);
        assert_eq!(store.current().unwrap().predict(&["x"]).unwrap()[0].0, Category::Travel);
    }

    #[test]
    fn test_load_not_found_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::with_config(ModelConfig {
            model_path: Some(dir.path().join("missing.json")),
            search_paths: Vec::new(),
            load_on_start: true,
        });
        store.publish(LoadedModel::new(FailingModel(labels(&["Food", "Other"]))));

        let err = store.reload().unwrap_err();
        assert!(matches!(err, ModelError::NotFound { ref tried } if tried.len() == 1));
        assert!(store.is_loaded());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{
                "classes": ["Food", "Travel"],
                "vocabulary": {"swiggy": 0, "uber": 1},
                "idf": [1.0, 1.0],
                "coef": [[2.0, -2.0], [-2.0, 2.0]],
                "intercept": [0.0, 0.0]
            }"#,
        )
        .unwrap();

        let store = ModelStore::with_config(ModelConfig {
            model_path: None,
            search_paths: vec![dir.path().join("missing.json"), path.clone()],
            load_on_start: true,
        });

        let model = store.load().unwrap();
        assert_eq!(model.path(), Some(path.as_path()));
        assert_eq!(model.predict(&["uber"]).unwrap()[0].0, Category::Travel);

        let info = store.info();
        assert!(info.loaded);
        assert_eq!(info.pipeline_steps, labels(&["tfidf", "logistic_regression"]));
        assert_eq!(store.health().model_path, Some(path.display().to_string()));
    }

    #[test]
    fn test_load_invalid_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = ModelStore::new();
        let err = store
            .load_with(ModelConfig {
                model_path: Some(path),
                search_paths: Vec::new(),
                load_on_start: true,
            })
            .unwrap_err();
        assert!(matches!(err, ModelError::Inference(InferenceError::Json(_))));
        assert!(!store.is_loaded());
    }
}
