//! Text model backend implementations.

pub mod linear;

use ndarray::{Array2, ArrayView1};

use crate::Result;

/// Trait for text classification backends.
///
/// A backend is read-only once constructed; callers share it across threads
/// and replace it wholesale instead of mutating it.
pub trait TextModel: Send + Sync {
    /// Class probabilities for each input.
    ///
    /// # Arguments
    /// * `texts` - Normalized input texts
    ///
    /// # Returns
    /// A `texts.len() x classes().len()` matrix, rows index-aligned with `texts`
    fn predict_proba(&self, texts: &[&str]) -> Result<Array2<f32>>;

    /// Class labels in column order of `predict_proba`.
    fn classes(&self) -> &[String];

    /// Short description of the pipeline steps, for diagnostics.
    fn steps(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Index and value of the largest entry. Ties resolve to the lowest index.
pub fn argmax(row: ArrayView1<'_, f32>) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &p) in row.iter().enumerate() {
        match best {
            Some((_, b)) if p <= b => {}
            _ if p.is_nan() => {}
            _ => best = Some((idx, p)),
        }
    }
    best
}
