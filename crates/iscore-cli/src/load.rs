//! Image directory loading: PNG/JPEG files → one NCHW `f32` batch.
//!
//! Files are sorted by name so the batch order (and therefore the
//! split assignment) is deterministic across runs and filesystems.
//! Pixel values are kept in `[0, 255]`; the reference classifier graph
//! normalizes internally.

use std::path::{Path, PathBuf};

use anyhow::Context;

use iscore_core::image::CHANNELS;
use iscore_core::ImageBatch;

/// Load every PNG/JPEG in `dir` into a single image batch.
///
/// All images must share the same dimensions; decoding is done one
/// file at a time so peak memory stays one decoded image plus the
/// output buffer.
pub fn load_dir(dir: &Path) -> anyhow::Result<ImageBatch> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_supported(p))
        .collect();
    paths.sort();

    anyhow::ensure!(!paths.is_empty(), "no PNG/JPEG images in {}", dir.display());

    let mut data: Vec<f32> = Vec::new();
    let mut dims: Option<(u32, u32)> = None;

    for path in &paths {
        let rgb = image::open(path)
            .with_context(|| format!("decoding {}", path.display()))?
            .to_rgb8();
        let (w, h) = rgb.dimensions();

        match dims {
            None => {
                dims = Some((w, h));
                data.reserve(paths.len() * CHANNELS * (w * h) as usize);
            }
            Some(expected) => anyhow::ensure!(
                (w, h) == expected,
                "{} is {w}x{h}, expected {}x{} (all images must share dimensions)",
                path.display(),
                expected.0,
                expected.1
            ),
        }

        // HWC u8 → NCHW f32, one channel plane at a time.
        for c in 0..CHANNELS {
            for y in 0..h {
                for x in 0..w {
                    data.push(rgb.get_pixel(x, y).0[c] as f32);
                }
            }
        }
    }

    let (w, h) = dims.unwrap();
    Ok(ImageBatch::new(paths.len(), h as usize, w as usize, data)?)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
}
