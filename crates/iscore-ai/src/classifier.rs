//! The classifier seam: a black-box function from image batches to
//! class-probability rows.
//!
//! The score engine treats the network as an external collaborator; its
//! layer topology, weights, and execution device are entirely its own
//! business. The engine only needs the output class count (to allocate
//! the probability matrix), the required input resolution (to resize),
//! and a way to run a batch in inference mode.

use iscore_core::ImageBatch;

/// Execution mode for a single classify call.
///
/// This replaces ambient train/no-grad toggles with an explicit
/// per-call parameter: an implementation that carries mutable training
/// state must apply `mode` for the duration of the call and restore
/// its previous state before returning, whether the call succeeds or
/// fails. The score engine always passes [`ExecMode::Inference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    Train,
    Inference,
}

/// A pretrained image classifier with a softmax output head.
pub trait Classifier {
    /// Size of the output class space (1008 for the reference
    /// Inception graph).
    fn num_classes(&self) -> usize;

    /// Required square input resolution in pixels (299 for the
    /// reference Inception graph). Batches of any other size are
    /// resized by the engine before the call.
    fn input_size(&self) -> usize;

    /// Classify a batch, returning one probability distribution per
    /// image as a flat row-major buffer of
    /// `batch.len() * num_classes()` values.
    ///
    /// Any failure (malformed shape, backend error) is fatal to the
    /// whole scoring run; there are no retries.
    fn classify(&mut self, batch: &ImageBatch, mode: ExecMode) -> anyhow::Result<Vec<f32>>;
}
