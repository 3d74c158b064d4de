//! Height samples and height blobs.

use glam::Vec2;

use crate::biome::Biome;
use crate::interpolation::{linear, smooth6};

/// An immutable height sample tagged with the biome it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightData {
    pub position: Vec2,
    pub height: f32,
    pub biome: Biome,
}

impl HeightData {
    pub fn new(position: Vec2, height: f32, biome: Biome) -> Self {
        Self {
            position,
            height,
            biome,
        }
    }
}

/// A localized height contribution centered on a point.
///
/// Mountain and peak blobs fall off linearly for crisp ridges; every other
/// biome falls off with the smooth kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBlob {
    pub position: Vec2,
    pub height: f32,
    pub biome: Biome,
    pub scale: f32,
}

impl HeightBlob {
    pub fn new(position: Vec2, height: f32, biome: Biome, scale: f32) -> Self {
        Self {
            position,
            height,
            biome,
            scale,
        }
    }

    /// Height contributed at `pos` for a blob of radius `size`.
    pub fn eval_height(&self, pos: Vec2, size: f32) -> f32 {
        let distance = self.position.distance(pos);
        let weight = if matches!(self.biome, Biome::Mountain | Biome::Peak) {
            linear(distance, size, self.scale)
        } else {
            smooth6(distance, size, self.scale)
        };
        self.height * weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_full_height_at_center() {
        let blob = HeightBlob::new(Vec2::new(10.0, 10.0), 50.0, Biome::Mountain, 2.0);
        assert_eq!(blob.eval_height(Vec2::new(10.0, 10.0), 5.0), 50.0);
    }

    #[test]
    fn test_blob_zero_beyond_scale() {
        let blob = HeightBlob::new(Vec2::ZERO, 50.0, Biome::Plains, 1.5);
        assert_eq!(blob.eval_height(Vec2::new(8.0, 0.0), 5.0), 0.0);
        let blob = HeightBlob::new(Vec2::ZERO, 50.0, Biome::Peak, 1.5);
        assert_eq!(blob.eval_height(Vec2::new(0.0, 7.5), 5.0), 0.0);
    }

    #[test]
    fn test_sharp_blob_is_linear() {
        let blob = HeightBlob::new(Vec2::ZERO, 40.0, Biome::Mountain, 1.0);
        let h = blob.eval_height(Vec2::new(2.5, 0.0), 10.0);
        assert!((h - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_smooth_blob_keeps_more_height_near_center() {
        let smooth = HeightBlob::new(Vec2::ZERO, 40.0, Biome::Plains, 1.0);
        let sharp = HeightBlob::new(Vec2::ZERO, 40.0, Biome::Mountain, 1.0);
        let p = Vec2::new(2.0, 0.0);
        assert!(smooth.eval_height(p, 10.0) > sharp.eval_height(p, 10.0));
    }
}
