//! Configuration for biome repartition.

use serde::{Deserialize, Serialize};

/// Probabilities and bounds driving the repartition passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepartitionConfig {
    /// Radial land falloff reaches zero at `land_radius_scale * map_size / 2`.
    pub land_radius_scale: f32,
    /// Weight of the neighbors' plains fraction against the radial falloff (0-1).
    pub land_blend_coefficient: f32,

    /// Seeds always skipped (from the center) before lakes may appear.
    pub lake_min_skip: usize,
    /// Probability of skipping one more seed before lakes may appear.
    pub lake_skip_probability: f32,
    /// Upper bound on the random part of the skip.
    pub lake_skip_max: usize,
    /// Probability that an eligible plains seed becomes a lake.
    pub lake_probability: f32,

    /// Probability of stepping one seed further out when picking the first mountain.
    pub mountain_pick_probability: f32,
    /// Upper bound on steps taken when picking the first mountain.
    pub mountain_pick_max_steps: usize,
    /// Growth continues with probability `mountain_growth_probability ^ mountain_count`.
    pub mountain_growth_probability: f32,
    /// Random neighbors tried before mountain growth gives up.
    pub mountain_max_tries: usize,
    /// Mountains with at least this many mountain neighbors become peaks.
    pub peak_neighbor_threshold: usize,
}

impl Default for RepartitionConfig {
    fn default() -> Self {
        Self {
            land_radius_scale: 1.0,
            land_blend_coefficient: 0.5,

            lake_min_skip: 10,
            lake_skip_probability: 0.8,
            lake_skip_max: 40,
            lake_probability: 0.1,

            mountain_pick_probability: 0.7,
            mountain_pick_max_steps: 30,
            mountain_growth_probability: 0.98,
            mountain_max_tries: 12,
            peak_neighbor_threshold: 3,
        }
    }
}

impl RepartitionConfig {
    /// Larger, more frequent mountain ranges.
    pub fn rugged() -> Self {
        Self {
            mountain_growth_probability: 0.99,
            mountain_max_tries: 16,
            peak_neighbor_threshold: 2,
            ..Default::default()
        }
    }
}
