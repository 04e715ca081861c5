use glam::Vec2;

use crate::core::rng::Rng;
use crate::error::{FxError, FxResult};

/// Single-channel coverage raster, row-major, one byte per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width as usize * height as usize],
        }
    }

    /// Keep the alpha channel of an RGBA buffer (e.g. Canvas `ImageData`).
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> FxResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(FxError::MaskSize {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            alpha: rgba.chunks_exact(4).map(|px| px[3]).collect(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, alpha: u8) {
        if x < self.width && y < self.height {
            self.alpha[(y * self.width + x) as usize] = alpha;
        }
    }

    /// Pixels with non-zero alpha.
    pub fn coverage(&self) -> usize {
        self.alpha.iter().filter(|a| **a > 0).count()
    }
}

/// Target points for a text mask.
///
/// Walks every `step`-th pixel in raster order, shuffles the candidates so
/// particles don't fill the word left to right, and keeps those with alpha
/// above `threshold`.
pub fn sample_targets(mask: &AlphaMask, step: usize, threshold: u8, rng: &mut Rng) -> Vec<Vec2> {
    if mask.is_empty() {
        return Vec::new();
    }
    let width = mask.width as usize;
    let mut candidates: Vec<usize> = (0..mask.len()).step_by(step.max(1)).collect();
    rng.shuffle(&mut candidates);
    candidates
        .into_iter()
        .filter(|&i| mask.alpha[i] > threshold)
        .map(|i| Vec2::new((i % width) as f32, (i / width) as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> AlphaMask {
        // 10x10 with a solid 4x4 square at (3..7, 3..7).
        let mut mask = AlphaMask::new(10, 10);
        for y in 3..7 {
            for x in 3..7 {
                mask.set(x, y, 255);
            }
        }
        mask
    }

    #[test]
    fn stride_one_finds_every_opaque_pixel() {
        let mut rng = Rng::new(1);
        let targets = sample_targets(&block(), 1, 0, &mut rng);
        assert_eq!(targets.len(), 16);
        for t in &targets {
            assert!((3.0..7.0).contains(&t.x) && (3.0..7.0).contains(&t.y));
        }
    }

    #[test]
    fn stride_skips_raster_positions() {
        let mut rng = Rng::new(1);
        // Indices 0, 2, 4, ... : even x on even rows, even x on odd rows too (width 10).
        let targets = sample_targets(&block(), 2, 0, &mut rng);
        assert_eq!(targets.len(), 8);
        assert!(targets.iter().all(|t| t.x as u32 % 2 == 0));
    }

    #[test]
    fn empty_mask_has_no_targets() {
        let mut rng = Rng::new(1);
        assert!(sample_targets(&AlphaMask::new(0, 0), 10, 0, &mut rng).is_empty());
        assert!(sample_targets(&AlphaMask::new(8, 8), 10, 0, &mut rng).is_empty());
    }

    #[test]
    fn rgba_import_checks_length() {
        let rgba = [0u8, 0, 0, 7, 0, 0, 0, 0];
        let mask = AlphaMask::from_rgba(2, 1, &rgba).unwrap();
        assert_eq!(mask.get(0, 0), 7);
        assert!(matches!(
            AlphaMask::from_rgba(3, 1, &rgba),
            Err(FxError::MaskSize { expected: 12, actual: 8 })
        ));
    }
}
