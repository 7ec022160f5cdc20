//! Contrastive loss on cosine distance

use candle_core::{Result, Tensor};

/// Keeps the cosine denominator away from zero
const NORM_EPSILON: f64 = 1e-8;

/// Row-wise cosine similarity of two `[batch, dim]` tensors
pub fn pairwise_cosine(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    let dot = (a * b)?.sum(1)?;
    let norm_a = a.sqr()?.sum(1)?.sqrt()?;
    let norm_b = b.sqr()?.sum(1)?.sqrt()?;
    let denominator = (norm_a * norm_b)?.affine(1.0, NORM_EPSILON)?;
    dot / denominator
}

/// Mean of `0.5 * (y * d^2 + (1 - y) * relu(margin - d)^2)` with `d = 1 - cos(a, b)`.
///
/// `labels` is a `[batch]` tensor of target similarities in [0, 1].
pub fn contrastive_loss(a: &Tensor, b: &Tensor, labels: &Tensor, margin: f64) -> Result<Tensor> {
    let distance = pairwise_cosine(a, b)?.affine(-1.0, 1.0)?;

    let positive = (labels * distance.sqr()?)?;
    let negative = (labels.affine(-1.0, 1.0)? * distance.affine(-1.0, margin)?.relu()?.sqr()?)?;

    (positive + negative)?.affine(0.5, 0.0)?.mean_all()
}
