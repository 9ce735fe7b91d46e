//! The N × C probability matrix accumulated during inference.
//!
//! Allocated once per scoring run, filled batch-by-batch (each row is
//! written exactly once), then consumed by the split aggregator. Flat
//! row-major `f32` storage; C is small (~1000) so the whole matrix
//! stays cheap even for tens of thousands of images.

use crate::error::ScoreError;

/// Row-major N × C matrix of per-image class distributions.
#[derive(Debug, Clone)]
pub struct ProbMatrix {
    data: Vec<f32>,
    rows: usize,
    classes: usize,
}

impl ProbMatrix {
    /// Allocate a zeroed N × C matrix.
    pub fn new(rows: usize, classes: usize) -> Self {
        Self {
            data: vec![0.0; rows * classes],
            rows,
            classes,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_classes(&self) -> usize {
        self.classes
    }

    /// Row `i` as a length-C slice.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.classes..(i + 1) * self.classes]
    }

    /// Contiguous rows `[start, end)` as one flat slice.
    pub fn rows(&self, start: usize, end: usize) -> &[f32] {
        &self.data[start * self.classes..end * self.classes]
    }

    /// Write classifier output rows starting at row `start`.
    ///
    /// `values` must hold a whole number of rows and fit within the
    /// matrix; a wrong-sized buffer is a fatal shape mismatch.
    pub fn write_rows(&mut self, start: usize, values: &[f32]) -> Result<(), ScoreError> {
        if values.len() % self.classes != 0 {
            return Err(ScoreError::ShapeMismatch {
                expected: self.classes,
                got: values.len(),
            });
        }
        let n = values.len() / self.classes;
        if start + n > self.rows {
            return Err(ScoreError::ShapeMismatch {
                expected: (self.rows - start) * self.classes,
                got: values.len(),
            });
        }
        self.data[start * self.classes..(start + n) * self.classes].copy_from_slice(values);
        Ok(())
    }

    /// Check that every row is a valid distribution: non-negative
    /// entries summing to 1 within `tolerance`.
    pub fn validate_rows(&self, tolerance: f32) -> Result<(), ScoreError> {
        for i in 0..self.rows {
            let row = self.row(i);
            let sum: f32 = row.iter().sum();
            if row.iter().any(|&p| p < 0.0) || (sum - 1.0).abs() > tolerance {
                return Err(ScoreError::InvalidDistribution { row: i, sum });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_rows_fills_the_right_slice() {
        let mut m = ProbMatrix::new(4, 3);
        m.write_rows(1, &[0.2, 0.3, 0.5, 0.1, 0.1, 0.8]).unwrap();
        assert_eq!(m.row(0), &[0.0, 0.0, 0.0]);
        assert_eq!(m.row(1), &[0.2, 0.3, 0.5]);
        assert_eq!(m.row(2), &[0.1, 0.1, 0.8]);
        assert_eq!(m.row(3), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn write_rows_rejects_partial_row() {
        let mut m = ProbMatrix::new(2, 3);
        let err = m.write_rows(0, &[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, ScoreError::ShapeMismatch { .. }));
    }

    #[test]
    fn write_rows_rejects_overflow() {
        let mut m = ProbMatrix::new(2, 2);
        let err = m.write_rows(1, &[0.5, 0.5, 0.5, 0.5]).unwrap_err();
        assert!(matches!(err, ScoreError::ShapeMismatch { .. }));
    }

    #[test]
    fn validate_rows_accepts_softmax_like_output() {
        let mut m = ProbMatrix::new(2, 4);
        m.write_rows(0, &[0.25, 0.25, 0.25, 0.25, 0.7, 0.1, 0.1, 0.1])
            .unwrap();
        m.validate_rows(1e-5).unwrap();
    }

    #[test]
    fn validate_rows_rejects_logits() {
        let mut m = ProbMatrix::new(1, 3);
        m.write_rows(0, &[2.0, -1.0, 0.5]).unwrap();
        let err = m.validate_rows(1e-5).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidDistribution { row: 0, .. }));
    }

    #[test]
    fn rows_returns_contiguous_span() {
        let mut m = ProbMatrix::new(3, 2);
        m.write_rows(0, &[0.1, 0.9, 0.2, 0.8, 0.3, 0.7]).unwrap();
        assert_eq!(m.rows(1, 3), &[0.2, 0.8, 0.3, 0.7]);
    }
}
