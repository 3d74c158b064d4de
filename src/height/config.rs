//! Configuration for the height field.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::biome::Biome;

/// A closed height interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightBand {
    pub min: f32,
    pub max: f32,
}

impl HeightBand {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f32 {
        (self.min + self.max) * 0.5
    }
}

/// Height band of every biome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightBands {
    pub sea: HeightBand,
    pub lake: HeightBand,
    pub beach: HeightBand,
    pub plains: HeightBand,
    pub mountain: HeightBand,
    pub peak: HeightBand,
}

impl Default for HeightBands {
    fn default() -> Self {
        Self {
            sea: HeightBand::new(-12.0, -6.0),
            lake: HeightBand::new(-4.0, -2.0),
            beach: HeightBand::new(0.5, 1.5),
            plains: HeightBand::new(2.0, 6.0),
            mountain: HeightBand::new(40.0, 60.0),
            peak: HeightBand::new(70.0, 90.0),
        }
    }
}

impl HeightBands {
    /// Band of a biome; `Undefined` sits at zero.
    pub fn band(&self, biome: Biome) -> HeightBand {
        match biome {
            Biome::Undefined => HeightBand::new(0.0, 0.0),
            Biome::Sea => self.sea,
            Biome::Lake => self.lake,
            Biome::Beach => self.beach,
            Biome::Plains => self.plains,
            Biome::Mountain => self.mountain,
            Biome::Peak => self.peak,
        }
    }

    /// Height of a biome: a uniform draw from its band, or the band midpoint.
    pub fn biome_height<R: Rng + ?Sized>(&self, biome: Biome, randomize: bool, rng: &mut R) -> f32 {
        let band = self.band(biome);
        if randomize && band.max > band.min {
            rng.random_range(band.min..=band.max)
        } else {
            band.midpoint()
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Biome, HeightBand)> + '_ {
        Biome::ALL
            .into_iter()
            .filter(|b| *b != Biome::Undefined)
            .map(move |b| (b, self.band(b)))
    }
}

/// Parameters of the height quadtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightConfig {
    pub bands: HeightBands,
    /// Fraction of an edge a sharp biome influences when it meets a smooth one (0-1].
    pub scale_limit_influence: f32,
    /// Nodes shallower than this are always subdivided.
    pub depth_min: u32,
    /// Nodes at this depth are never subdivided.
    pub depth_max: u32,
    /// Between the two depths, subdivide only where corner biomes disagree.
    pub refine_biome_boundaries: bool,
    /// Distance under which two vertices are considered the same point.
    pub detection_threshold: f32,
    /// Weight of each child level relative to its parent.
    pub blending_coefficient: f32,
    /// Draw vertex heights from the biome band instead of using its midpoint.
    pub random_heights: bool,
    /// Falloff radius, in cell radii, of sharp-biome height blobs.
    pub sharp_blob_scale: f32,
    /// Falloff radius, in cell radii, of smooth-biome height blobs.
    pub smooth_blob_scale: f32,
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            bands: HeightBands::default(),
            scale_limit_influence: 0.5,
            depth_min: 5,
            depth_max: 8,
            refine_biome_boundaries: true,
            detection_threshold: 0.01,
            blending_coefficient: 0.8,
            random_heights: true,
            sharp_blob_scale: 2.0,
            smooth_blob_scale: 3.0,
        }
    }
}

impl HeightConfig {
    /// Blob falloff scale for a biome.
    pub fn blob_scale(&self, biome: Biome) -> f32 {
        if matches!(biome, Biome::Mountain | Biome::Peak) {
            self.sharp_blob_scale
        } else {
            self.smooth_blob_scale
        }
    }
}
