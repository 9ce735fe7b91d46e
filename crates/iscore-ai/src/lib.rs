//! Inference layer: the classifier seam, the batched score engine, and
//! an ONNX Runtime classifier backend.

mod classifier;
mod engine;
#[cfg(feature = "onnx")]
mod onnx;

pub use classifier::{Classifier, ExecMode};
pub use engine::{inception_score, InceptionScore, ScoreConfig};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
