//! Core types and math for Inception Score computation: image batch
//! tensor, bilinear resize, probability matrix, batch/split range
//! computation, and the KL-divergence split statistics.

pub mod error;
pub mod image;
pub mod probs;
pub mod split;
pub mod stats;

pub use error::ScoreError;
pub use image::ImageBatch;
pub use probs::ProbMatrix;
pub use split::{batch_ranges, split_ranges};
pub use stats::{mean_std, split_score, split_scores};
