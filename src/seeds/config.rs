//! Configuration for seed placement.

use serde::{Deserialize, Serialize};

/// Parameters of the centrally-biased, minimum-distance seed sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Number of seeds (Voronoi cells) to place.
    pub count: usize,
    /// Bucket grid columns.
    pub subdivisions_w: usize,
    /// Bucket grid rows.
    pub subdivisions_h: usize,
    /// Maximum number of seeds a single bucket may hold.
    pub max_per_cell: usize,
    /// Minimum distance between any two seeds (world units).
    pub min_distance: f32,
    /// Standard deviation of the placement Gaussian, as a fraction of the map size.
    pub spread: f32,
    /// Candidate draws allowed before giving up.
    pub max_attempts: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            count: 300,
            subdivisions_w: 10,
            subdivisions_h: 10,
            max_per_cell: 8,
            min_distance: 8.0,
            spread: 0.3,
            max_attempts: 2_000_000,
        }
    }
}

impl SeedConfig {
    /// Largest seed count the bucket grid can hold.
    pub fn capacity(&self) -> usize {
        self.subdivisions_w * self.subdivisions_h * self.max_per_cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fits_capacity() {
        let config = SeedConfig::default();
        assert_eq!(config.capacity(), 800);
        assert!(config.count <= config.capacity());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SeedConfig = serde_json::from_str(r#"{ "count": 50 }"#).unwrap();
        assert_eq!(config.count, 50);
        assert_eq!(config.subdivisions_w, SeedConfig::default().subdivisions_w);
    }
}
