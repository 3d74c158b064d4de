//! Top-level map parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::height::HeightConfig;
use crate::repartition::RepartitionConfig;
use crate::seeds::SeedConfig;

/// Deepest quadtree the parameters may ask for.
pub const MAX_TREE_DEPTH: u32 = 16;

/// Errors raised while loading or validating parameters.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid parameter '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Every tunable of a map.
///
/// All sections use `#[serde(default)]`, so a JSON file only needs the
/// fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapParameters {
    /// Side length of the square map, in world units.
    pub map_size: f32,
    /// Seed of the single RNG threaded through generation.
    pub seed: u64,
    /// Samples per world unit of the approximate biome grid; `None` disables it.
    pub biome_map_scale: Option<f32>,
    pub seeds: SeedConfig,
    pub repartition: RepartitionConfig,
    pub height: HeightConfig,
}

impl Default for MapParameters {
    fn default() -> Self {
        Self {
            map_size: 500.0,
            seed: 42,
            biome_map_scale: Some(0.5),
            seeds: SeedConfig::default(),
            repartition: RepartitionConfig::default(),
            height: HeightConfig::default(),
        }
    }
}

impl MapParameters {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// A small, shallow map that generates quickly.
    pub fn small(seed: u64) -> Self {
        Self {
            map_size: 200.0,
            seed,
            biome_map_scale: Some(0.25),
            seeds: SeedConfig {
                count: 80,
                subdivisions_w: 6,
                subdivisions_h: 6,
                max_per_cell: 6,
                min_distance: 6.0,
                ..Default::default()
            },
            repartition: RepartitionConfig {
                lake_min_skip: 4,
                lake_skip_max: 12,
                ..Default::default()
            },
            height: HeightConfig {
                depth_min: 4,
                depth_max: 6,
                ..Default::default()
            },
        }
    }

    /// Default map with larger mountain ranges.
    pub fn rugged(seed: u64) -> Self {
        Self {
            seed,
            repartition: RepartitionConfig::rugged(),
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.map_size.is_finite() && self.map_size > 0.0) {
            return Err(invalid("map_size", format!("{} must be positive", self.map_size)));
        }
        if let Some(scale) = self.biome_map_scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(invalid("biome_map_scale", format!("{scale} must be positive")));
            }
        }

        let seeds = &self.seeds;
        if seeds.count < 3 {
            return Err(invalid("seeds.count", format!("{} is below the minimum of 3", seeds.count)));
        }
        if seeds.count > seeds.capacity() {
            return Err(invalid(
                "seeds.count",
                format!("{} exceeds the bucket grid capacity of {}", seeds.count, seeds.capacity()),
            ));
        }

        let r = &self.repartition;
        for (field, p) in [
            ("repartition.land_blend_coefficient", r.land_blend_coefficient),
            ("repartition.lake_skip_probability", r.lake_skip_probability),
            ("repartition.lake_probability", r.lake_probability),
            ("repartition.mountain_pick_probability", r.mountain_pick_probability),
            ("repartition.mountain_growth_probability", r.mountain_growth_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(field, format!("{p} is not a probability")));
            }
        }
        if !(r.land_radius_scale > 0.0) {
            return Err(invalid("repartition.land_radius_scale", "must be positive"));
        }

        let h = &self.height;
        if h.depth_min > h.depth_max {
            return Err(invalid(
                "height.depth_min",
                format!("{} is above depth_max {}", h.depth_min, h.depth_max),
            ));
        }
        if h.depth_max > MAX_TREE_DEPTH {
            return Err(invalid(
                "height.depth_max",
                format!("{} is above the limit of {MAX_TREE_DEPTH}", h.depth_max),
            ));
        }
        // Vertices of the deepest level are this far apart; the reuse
        // tolerance must not merge two of them.
        let spacing = self.map_size / 2f32.powi(h.depth_max as i32 + 1);
        if !(h.detection_threshold > 0.0 && h.detection_threshold < spacing) {
            return Err(invalid(
                "height.detection_threshold",
                format!("{} must be in (0, {spacing})", h.detection_threshold),
            ));
        }
        if !(h.scale_limit_influence > 0.0 && h.scale_limit_influence <= 1.0) {
            return Err(invalid(
                "height.scale_limit_influence",
                format!("{} must be in (0, 1]", h.scale_limit_influence),
            ));
        }
        if !(0.0..=1.0).contains(&h.blending_coefficient) {
            return Err(invalid(
                "height.blending_coefficient",
                format!("{} must be in [0, 1]", h.blending_coefficient),
            ));
        }
        if !(h.sharp_blob_scale > 0.0 && h.smooth_blob_scale > 0.0) {
            return Err(invalid("height.blob_scale", "blob scales must be positive"));
        }
        for (biome, band) in h.bands.iter() {
            if !(band.min <= band.max) {
                return Err(invalid(
                    "height.bands",
                    format!("{biome} band [{}, {}] is reversed", band.min, band.max),
                ));
            }
        }
        Ok(())
    }
}
