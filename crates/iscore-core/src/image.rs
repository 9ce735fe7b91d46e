//! NCHW image batch tensor with bilinear resizing.
//!
//! Images are stored as one flat `f32` buffer in NCHW order: image,
//! then channel, then row, then column. Channel count is fixed at 3.
//! Pixel value range is the classifier's concern; the batch only ever
//! changes spatial size, never values.

use crate::error::ScoreError;

/// Number of channels per image. The classifier's input space is RGB.
pub const CHANNELS: usize = 3;

/// An ordered batch of N same-sized RGB images in NCHW layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    data: Vec<f32>,
    n: usize,
    height: usize,
    width: usize,
}

impl ImageBatch {
    /// Wrap a flat NCHW buffer. `data.len()` must equal
    /// `n * 3 * height * width`.
    pub fn new(n: usize, height: usize, width: usize, data: Vec<f32>) -> Result<Self, ScoreError> {
        let expected = n * CHANNELS * height * width;
        if data.len() != expected {
            return Err(ScoreError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            n,
            height,
            width,
        })
    }

    /// Number of images in the batch.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Flat NCHW buffer, `len * 3 * height * width` values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Pixel value for image `i`, channel `c`, row `y`, column `x`.
    #[inline]
    pub fn pixel(&self, i: usize, c: usize, y: usize, x: usize) -> f32 {
        let hw = self.height * self.width;
        self.data[((i * CHANNELS + c) * hw) + y * self.width + x]
    }

    /// Copy out the contiguous sub-batch `[start, end)`.
    ///
    /// This is the transient per-batch slice handed to the classifier;
    /// it is dropped after each inference call.
    pub fn slice(&self, start: usize, end: usize) -> ImageBatch {
        debug_assert!(start <= end && end <= self.n);
        let stride = CHANNELS * self.height * self.width;
        ImageBatch {
            data: self.data[start * stride..end * stride].to_vec(),
            n: end - start,
            height: self.height,
            width: self.width,
        }
    }

    /// Resize every image to `target` × `target` with align-corners
    /// bilinear interpolation (source coordinate `dst * (in-1)/(out-1)`).
    ///
    /// Returns a clone when the batch is already the target size.
    pub fn resize_bilinear(&self, target: usize) -> ImageBatch {
        if self.height == target && self.width == target {
            return self.clone();
        }

        let scale_y = axis_scale(self.height, target);
        let scale_x = axis_scale(self.width, target);

        let mut out = vec![0.0f32; self.n * CHANNELS * target * target];
        let src_hw = self.height * self.width;
        let dst_hw = target * target;

        for i in 0..self.n {
            for c in 0..CHANNELS {
                let src_plane = &self.data[(i * CHANNELS + c) * src_hw..][..src_hw];
                let dst_plane = &mut out[(i * CHANNELS + c) * dst_hw..][..dst_hw];

                for y in 0..target {
                    let src_y = y as f32 * scale_y;
                    let y0 = src_y.floor() as usize;
                    let y1 = (y0 + 1).min(self.height - 1);
                    let dy = src_y - y0 as f32;

                    for x in 0..target {
                        let src_x = x as f32 * scale_x;
                        let x0 = src_x.floor() as usize;
                        let x1 = (x0 + 1).min(self.width - 1);
                        let dx = src_x - x0 as f32;

                        let p00 = src_plane[y0 * self.width + x0];
                        let p01 = src_plane[y0 * self.width + x1];
                        let p10 = src_plane[y1 * self.width + x0];
                        let p11 = src_plane[y1 * self.width + x1];

                        let top = p00 + (p01 - p00) * dx;
                        let bottom = p10 + (p11 - p10) * dx;
                        dst_plane[y * target + x] = top + (bottom - top) * dy;
                    }
                }
            }
        }

        ImageBatch {
            data: out,
            n: self.n,
            height: target,
            width: target,
        }
    }
}

/// Align-corners scale factor: extreme output pixels sample the
/// extreme source pixels exactly.
fn axis_scale(src: usize, dst: usize) -> f32 {
    if dst <= 1 {
        0.0
    } else {
        (src - 1) as f32 / (dst - 1) as f32
    }
}
