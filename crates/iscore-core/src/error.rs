//! Typed errors for the scoring pipeline.
//!
//! Configuration problems are rejected before any inference starts;
//! shape and numeric problems abort the whole computation with no
//! partial result.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("image batch is empty")]
    EmptyBatch,

    #[error("batch_size must be at least 1")]
    ZeroBatchSize,

    #[error("invalid split count {splits} for {images} images: every split must receive at least one row")]
    InvalidSplits { splits: usize, images: usize },

    #[error("shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("row {row} is not a probability distribution (sum = {sum})")]
    InvalidDistribution { row: usize, sum: f32 },

    #[error("split {split} produced a non-finite score ({value}): probability matrix contains zeros or non-finite entries")]
    NonFinite { split: usize, value: f64 },
}
