//! KL-divergence split statistics.
//!
//! For each split: take the column-wise mean of its rows (the split's
//! marginal class distribution), compute each row's KL divergence
//! against that marginal, average across rows, and exponentiate. The
//! final score is the mean and population standard deviation of the
//! per-split values.
//!
//! # Zero probabilities
//!
//! Probabilities are never clamped. A term with `p = 0` contributes
//! its limit value 0 to the divergence (the usual KL continuity
//! convention), so exact one-hot rows are well-defined and score 1.
//! A term with `p > 0` always has `marginal >= p / rows > 0`, so the
//! logs stay finite. NaN or infinite classifier output still poisons
//! the split score and is reported as [`ScoreError::NonFinite`]
//! rather than silently swallowed.

use crate::error::ScoreError;
use crate::probs::ProbMatrix;
use crate::split::split_ranges;

/// Score one split given its rows as a flat row-major slice.
///
/// `part.len()` must be a whole number of length-`classes` rows.
/// Accumulation is in `f64`; each score is derived solely from its own
/// split's rows.
pub fn split_score(part: &[f32], classes: usize) -> f64 {
    debug_assert!(classes > 0 && part.len() % classes == 0);
    let rows = part.len() / classes;
    debug_assert!(rows > 0, "a split must contain at least one row");

    // Column-wise marginal across the split's rows.
    let mut marginal = vec![0.0f64; classes];
    for row in part.chunks_exact(classes) {
        for (m, &p) in marginal.iter_mut().zip(row) {
            *m += p as f64;
        }
    }
    for m in &mut marginal {
        *m /= rows as f64;
    }

    // Mean over rows of sum_c p * (ln p - ln marginal), with the
    // p = 0 terms taken at their limit (0) instead of 0 * -inf.
    // The guard is `!= 0.0` rather than `> 0.0` so that NaN and
    // negative entries poison the sum instead of being skipped.
    let mut kl_sum = 0.0f64;
    for row in part.chunks_exact(classes) {
        for (&p, &m) in row.iter().zip(&marginal) {
            let p = p as f64;
            if p != 0.0 {
                kl_sum += p * (p.ln() - m.ln());
            }
        }
    }

    (kl_sum / rows as f64).exp()
}

/// Score every split of a filled probability matrix.
///
/// Fails with [`ScoreError::NonFinite`] if any split score is NaN or
/// infinite (non-finite classifier output, see module docs).
pub fn split_scores(probs: &ProbMatrix, splits: usize) -> Result<Vec<f64>, ScoreError> {
    let ranges = split_ranges(probs.num_rows(), splits);
    let mut scores = Vec::with_capacity(splits);
    for (s, range) in ranges.into_iter().enumerate() {
        let score = split_score(probs.rows(range.start, range.end), probs.num_classes());
        if !score.is_finite() {
            return Err(ScoreError::NonFinite { split: s, value: score });
        }
        scores.push(score);
    }
    Ok(scores)
}

/// Arithmetic mean and population standard deviation.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    debug_assert!(!values.is_empty());
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}
