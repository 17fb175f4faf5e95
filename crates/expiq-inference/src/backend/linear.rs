//! TF-IDF + logistic regression backend loaded from a JSON artifact.

use std::collections::HashMap;
use std::path::Path;

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InferenceError;
use crate::{Result, TextModel};

/// Inclusive word n-gram range, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramRange(pub usize, pub usize);

impl Default for NgramRange {
    fn default() -> Self {
        NgramRange(1, 1)
    }
}

/// On-disk layout of a linear text model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    /// Class labels, in the row order of `coef`.
    pub classes: Vec<String>,
    /// Term (or space-joined n-gram) to feature column.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature column.
    pub idf: Vec<f32>,
    #[serde(default)]
    pub ngram_range: NgramRange,
    /// Use `1 + ln(tf)` instead of raw term counts.
    #[serde(default)]
    pub sublinear_tf: bool,
    /// `n_classes x n_features`, or a single row for binary models.
    pub coef: Vec<Vec<f32>>,
    pub intercept: Vec<f32>,
}

/// Linear text classifier over TF-IDF features.
#[derive(Debug, Clone)]
pub struct LinearTextModel {
    classes: Vec<String>,
    vocabulary: HashMap<String, usize>,
    idf: Array1<f32>,
    ngram_range: NgramRange,
    sublinear_tf: bool,
    weights: Array2<f32>,
    intercept: Array1<f32>,
}

impl LinearTextModel {
    /// Load a model from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading linear text model from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .map_err(|e| InferenceError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Load a model from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: LinearArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    /// Build a model from an already-parsed artifact, validating its shape.
    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self> {
        let n_classes = artifact.classes.len();
        let n_features = artifact.idf.len();

        if n_classes < 2 {
            return Err(InferenceError::InvalidArtifact(format!(
                "expected at least 2 classes, got {}",
                n_classes
            )));
        }

        let NgramRange(min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(InferenceError::InvalidArtifact(format!(
                "invalid ngram range ({}, {})",
                min_n, max_n
            )));
        }

        let n_rows = artifact.coef.len();
        let binary = n_classes == 2 && n_rows == 1;
        if n_rows != n_classes && !binary {
            return Err(InferenceError::InvalidArtifact(format!(
                "coef has {} rows for {} classes",
                n_rows, n_classes
            )));
        }

        if artifact.intercept.len() != n_rows {
            return Err(InferenceError::InvalidArtifact(format!(
                "intercept has {} entries, expected {}",
                artifact.intercept.len(),
                n_rows
            )));
        }

        if let Some(row) = artifact.coef.iter().find(|r| r.len() != n_features) {
            return Err(InferenceError::InvalidArtifact(format!(
                "coef row has {} columns, expected {}",
                row.len(),
                n_features
            )));
        }

        if let Some((term, idx)) = artifact.vocabulary.iter().find(|(_, i)| **i >= n_features) {
            return Err(InferenceError::InvalidArtifact(format!(
                "vocabulary term '{}' maps to column {} of {}",
                term, idx, n_features
            )));
        }

        let flat: Vec<f32> = artifact.coef.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((n_rows, n_features), flat)
            .map_err(|e| InferenceError::InvalidArtifact(e.to_string()))?;

        debug!(
            "Linear model: {} classes, {} features, ngrams {}..={}",
            n_classes, n_features, min_n, max_n
        );

        Ok(Self {
            classes: artifact.classes,
            vocabulary: artifact.vocabulary,
            idf: Array1::from(artifact.idf),
            ngram_range: artifact.ngram_range,
            sublinear_tf: artifact.sublinear_tf,
            weights,
            intercept: Array1::from(artifact.intercept),
        })
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Word n-grams of the text. Tokens shorter than two characters are dropped
    /// before n-grams are formed.
    fn terms(&self, text: &str) -> Vec<String> {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .filter(|t| t.chars().count() >= 2)
            .collect();

        let NgramRange(min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    fn vectorize(&self, texts: &[&str]) -> Array2<f32> {
        let mut features = Array2::<f32>::zeros((texts.len(), self.n_features()));

        for (row_idx, text) in texts.iter().enumerate() {
            let mut counts: HashMap<usize, f32> = HashMap::new();
            for term in self.terms(text) {
                if let Some(&col) = self.vocabulary.get(&term) {
                    *counts.entry(col).or_insert(0.0) += 1.0;
                }
            }

            let mut row = features.row_mut(row_idx);
            for (col, tf) in counts {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                row[col] = tf * self.idf[col];
            }

            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }

        features
    }
}

impl TextModel for LinearTextModel {
    fn predict_proba(&self, texts: &[&str]) -> Result<Array2<f32>> {
        let features = self.vectorize(texts);
        let mut scores = features.dot(&self.weights.t());
        scores += &self.intercept;

        let proba = if scores.ncols() == 1 {
            let mut proba = Array2::<f32>::zeros((texts.len(), 2));
            for (i, s) in scores.column(0).iter().enumerate() {
                let p = 1.0 / (1.0 + (-s).exp());
                proba[[i, 0]] = 1.0 - p;
                proba[[i, 1]] = p;
            }
            proba
        } else {
            for mut row in scores.axis_iter_mut(Axis(0)) {
                let max = row.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
                row.mapv_inplace(|v| (v - max).exp());
                let sum = row.sum();
                row.mapv_inplace(|v| v / sum);
            }
            scores
        };

        if proba.iter().any(|p| !p.is_finite()) {
            return Err(InferenceError::InferenceFailed(
                "non-finite probability in model output".to_string(),
            ));
        }

        Ok(proba)
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn steps(&self) -> Vec<String> {
        vec!["tfidf".to_string(), "logistic_regression".to_string()]
    }
}
