//! ONNX Runtime classifier backend.
//!
//! Wraps an exported Inception-style graph with a softmax output head.
//! The model file must take one NCHW `f32` input and produce one
//! `[batch, classes]` probability output. Class count and input
//! resolution are read from the model's tensor shapes, falling back to
//! the reference graph's 1008 classes at 299 × 299.

use std::path::Path;

use ort::session::Session;
use ort::value::Tensor;
use tracing::info;

use iscore_core::image::CHANNELS;
use iscore_core::ImageBatch;

use crate::classifier::{Classifier, ExecMode};

/// Output class count of the reference Inception graph.
const DEFAULT_CLASSES: usize = 1008;

/// Input resolution of the reference Inception graph.
const DEFAULT_INPUT_SIZE: usize = 299;

/// Image classifier backed by an ONNX Runtime session.
pub struct OnnxClassifier {
    session: Session,
    input_name: String,
    classes: usize,
    input_size: usize,
}

impl OnnxClassifier {
    /// Load a classifier from an `.onnx` model file.
    pub fn load(model_path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(
            model_path.exists(),
            "model file not found: {model_path:?}"
        );

        let session = Session::builder()?.commit_from_file(model_path)?;

        let input_name = session.inputs()[0].name().to_string();
        let classes = last_dim(session.outputs()[0].dtype()).unwrap_or(DEFAULT_CLASSES);
        let input_size = last_dim(session.inputs()[0].dtype()).unwrap_or(DEFAULT_INPUT_SIZE);

        info!(
            classes,
            input_size,
            model = %model_path.display(),
            "loaded classifier model"
        );
        Ok(Self {
            session,
            input_name,
            classes,
            input_size,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn num_classes(&self) -> usize {
        self.classes
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn classify(&mut self, batch: &ImageBatch, mode: ExecMode) -> anyhow::Result<Vec<f32>> {
        // An ONNX session has no training state to toggle or restore.
        anyhow::ensure!(
            mode == ExecMode::Inference,
            "ONNX sessions are inference-only"
        );
        if batch.is_empty() {
            return Ok(vec![]);
        }
        anyhow::ensure!(
            batch.height() == self.input_size && batch.width() == self.input_size,
            "batch is {}x{}, model expects {}x{}",
            batch.height(),
            batch.width(),
            self.input_size,
            self.input_size
        );

        let n = batch.len();
        let shape = [
            n as i64,
            CHANNELS as i64,
            self.input_size as i64,
            self.input_size as i64,
        ];
        let input = Tensor::from_array((shape, batch.data().to_vec().into_boxed_slice()))?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input])?;

        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 2 && dims[0] as usize == n && dims[1] as usize == self.classes,
            "unexpected output shape {dims:?}, expected [{n}, {}]",
            self.classes
        );

        Ok(output_data.to_vec())
    }
}

/// Last dimension of a tensor-valued model input/output, if static.
fn last_dim(value_type: &ort::value::ValueType) -> Option<usize> {
    match value_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{inception_score, ScoreConfig};
    use std::path::PathBuf;

    fn model_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
            .join("inception.onnx")
    }

    /// Integration tests need a converted model on disk; skip quietly
    /// when it is absent so the suite stays runnable everywhere.
    fn model_if_present() -> Option<PathBuf> {
        let path = model_path();
        if path.exists() {
            Some(path)
        } else {
            eprintln!("models/inception.onnx not found, skipping");
            None
        }
    }

    #[test]
    fn load_model_reads_shapes() {
        let Some(path) = model_if_present() else { return };
        let clf = OnnxClassifier::load(&path).unwrap();
        assert_eq!(clf.num_classes(), 1008);
        assert_eq!(clf.input_size(), 299);
    }

    #[test]
    fn score_random_noise_end_to_end() {
        let Some(path) = model_if_present() else { return };
        let mut clf = OnnxClassifier::load(&path).unwrap();

        // Deterministic pseudo-noise in [0, 255]; quality of the
        // "images" is irrelevant, only pipeline behavior matters.
        let n = 20;
        let size = clf.input_size();
        let mut state = 0x2545f49_u64;
        let data: Vec<f32> = (0..n * CHANNELS * size * size)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (state >> 56) as f32
            })
            .collect();
        let images = ImageBatch::new(n, size, size, data).unwrap();

        let cfg = ScoreConfig {
            batch_size: 8,
            splits: 4,
        };
        let result = inception_score(&mut clf, &images, &cfg).unwrap();
        assert!(result.mean.is_finite() && result.mean >= 1.0 - 1e-6);
        assert!(result.std.is_finite() && result.std >= 0.0);
    }

    #[test]
    fn train_mode_is_rejected() {
        let Some(path) = model_if_present() else { return };
        let mut clf = OnnxClassifier::load(&path).unwrap();
        let images = ImageBatch::new(1, 299, 299, vec![0.0; CHANNELS * 299 * 299]).unwrap();
        let err = clf.classify(&images, ExecMode::Train).unwrap_err();
        assert!(err.to_string().contains("inference-only"));
    }
}
