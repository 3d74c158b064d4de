//! Rejection sampler producing the sorted seed set.

use glam::Vec2;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use thiserror::Error;

use super::config::SeedConfig;
use super::seed::Seed;

/// Errors raised while placing seeds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeedError {
    #[error("{requested} seeds cannot fit in a {w}x{h} grid holding {per_cell} seeds per cell")]
    CapacityExceeded {
        requested: usize,
        w: usize,
        h: usize,
        per_cell: usize,
    },
    #[error("Invalid seed parameter '{0}': {1}")]
    InvalidParameter(&'static str, String),
    #[error("Gave up after {attempts} attempts with {placed}/{requested} seeds placed")]
    Exhausted {
        attempts: usize,
        placed: usize,
        requested: usize,
    },
}

/// Bucket grid used to enforce the per-cell cap and the distance check.
struct BucketGrid {
    cols: usize,
    rows: usize,
    cell_w: f32,
    cell_h: f32,
    buckets: Vec<Vec<Vec2>>,
}

impl BucketGrid {
    fn new(width: f32, height: f32, cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cell_w: width / cols as f32,
            cell_h: height / rows as f32,
            buckets: vec![Vec::new(); cols * rows],
        }
    }

    fn coords(&self, p: Vec2) -> (usize, usize) {
        let gx = ((p.x / self.cell_w) as usize).min(self.cols - 1);
        let gy = ((p.y / self.cell_h) as usize).min(self.rows - 1);
        (gx, gy)
    }

    fn index(&self, gx: usize, gy: usize) -> usize {
        gy * self.cols + gx
    }

    /// Checks every bucket within `reach` rings of `p` for a seed closer than `min_distance`.
    fn is_far_enough(&self, p: Vec2, min_distance: f32, reach: usize) -> bool {
        let (gx, gy) = self.coords(p);
        let min_sq = min_distance * min_distance;
        let x0 = gx.saturating_sub(reach);
        let y0 = gy.saturating_sub(reach);
        let x1 = (gx + reach).min(self.cols - 1);
        let y1 = (gy + reach).min(self.rows - 1);

        for ny in y0..=y1 {
            for nx in x0..=x1 {
                let bucket = &self.buckets[self.index(nx, ny)];
                if bucket.iter().any(|q| q.distance_squared(p) < min_sq) {
                    return false;
                }
            }
        }
        true
    }
}

/// Places `config.count` seeds on a `width` x `height` map.
///
/// Candidates come from a Gaussian centered on the map, so seeds are denser
/// near the center. The result is sorted by ascending distance to the map
/// center, and every pair of seeds is at least `config.min_distance` apart.
pub fn generate_seeds<R: Rng + ?Sized>(
    width: f32,
    height: f32,
    config: &SeedConfig,
    rng: &mut R,
) -> Result<Vec<Seed>, SeedError> {
    validate(width, height, config)?;

    let center = Vec2::new(width * 0.5, height * 0.5);
    let normal_x = Normal::new(center.x, config.spread * width)
        .map_err(|e| SeedError::InvalidParameter("spread", e.to_string()))?;
    let normal_y = Normal::new(center.y, config.spread * height)
        .map_err(|e| SeedError::InvalidParameter("spread", e.to_string()))?;

    let mut grid = BucketGrid::new(width, height, config.subdivisions_w, config.subdivisions_h);
    let reach_x = (config.min_distance / grid.cell_w).ceil() as usize;
    let reach_y = (config.min_distance / grid.cell_h).ceil() as usize;
    let reach = reach_x.max(reach_y).max(1);

    // Kept sorted by squared distance to the center as seeds are accepted.
    let mut sorted: Vec<(f32, Seed)> = Vec::with_capacity(config.count);
    let mut attempts = 0usize;

    while sorted.len() < config.count {
        if attempts >= config.max_attempts {
            return Err(SeedError::Exhausted {
                attempts,
                placed: sorted.len(),
                requested: config.count,
            });
        }
        attempts += 1;

        let candidate = Vec2::new(normal_x.sample(rng), normal_y.sample(rng));
        if candidate.x < 0.0 || candidate.y < 0.0 || candidate.x >= width || candidate.y >= height {
            continue;
        }

        let (gx, gy) = grid.coords(candidate);
        let bucket_idx = grid.index(gx, gy);
        if grid.buckets[bucket_idx].len() >= config.max_per_cell {
            continue;
        }
        if !grid.is_far_enough(candidate, config.min_distance, reach) {
            continue;
        }

        grid.buckets[bucket_idx].push(candidate);
        let key = candidate.distance_squared(center);
        let at = sorted.partition_point(|(d, _)| *d <= key);
        sorted.insert(at, (key, Seed::new(candidate.x, candidate.y)));
    }

    tracing::debug!(
        seeds = sorted.len(),
        attempts,
        "seed placement finished"
    );

    Ok(sorted.into_iter().map(|(_, seed)| seed).collect())
}

fn validate(width: f32, height: f32, config: &SeedConfig) -> Result<(), SeedError> {
    if !(width > 0.0 && height > 0.0) {
        return Err(SeedError::InvalidParameter(
            "map size",
            format!("{width}x{height} must be positive"),
        ));
    }
    if config.subdivisions_w == 0 || config.subdivisions_h == 0 {
        return Err(SeedError::InvalidParameter(
            "subdivisions",
            "grid must have at least one cell".to_string(),
        ));
    }
    if config.count > config.capacity() {
        return Err(SeedError::CapacityExceeded {
            requested: config.count,
            w: config.subdivisions_w,
            h: config.subdivisions_h,
            per_cell: config.max_per_cell,
        });
    }
    if !(config.min_distance >= 0.0) {
        return Err(SeedError::InvalidParameter(
            "min_distance",
            format!("{} must be non-negative", config.min_distance),
        ));
    }
    if !(config.spread > 0.0) {
        return Err(SeedError::InvalidParameter(
            "spread",
            format!("{} must be positive", config.spread),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_config() -> SeedConfig {
        SeedConfig {
            count: 120,
            subdivisions_w: 8,
            subdivisions_h: 8,
            max_per_cell: 4,
            min_distance: 10.0,
            spread: 0.3,
            max_attempts: 1_000_000,
        }
    }

    #[test]
    fn test_exact_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let seeds = generate_seeds(400.0, 400.0, &small_config(), &mut rng).unwrap();
        assert_eq!(seeds.len(), 120);
    }

    #[test]
    fn test_minimum_distance_invariant() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let config = small_config();
        let seeds = generate_seeds(400.0, 400.0, &config, &mut rng).unwrap();
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert!(
                    a.position().distance(b.position()) >= config.min_distance,
                    "{:?} and {:?} are too close",
                    a.position(),
                    b.position()
                );
            }
        }
    }

    #[test]
    fn test_sorted_by_distance_to_center() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let seeds = generate_seeds(400.0, 300.0, &small_config(), &mut rng).unwrap();
        let center = Vec2::new(200.0, 150.0);
        for pair in seeds.windows(2) {
            assert!(pair[0].distance_squared_to(center) <= pair[1].distance_squared_to(center));
        }
    }

    #[test]
    fn test_bucket_cap_respected() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let config = small_config();
        let seeds = generate_seeds(400.0, 400.0, &config, &mut rng).unwrap();
        let mut counts = vec![0usize; 64];
        for seed in &seeds {
            let gx = ((seed.x() / 50.0) as usize).min(7);
            let gy = ((seed.y() / 50.0) as usize).min(7);
            counts[gy * 8 + gx] += 1;
        }
        assert!(counts.iter().all(|&c| c <= config.max_per_cell));
    }

    #[test]
    fn test_seeds_inside_map() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let seeds = generate_seeds(400.0, 400.0, &small_config(), &mut rng).unwrap();
        assert!(seeds
            .iter()
            .all(|s| s.x() >= 0.0 && s.x() < 400.0 && s.y() >= 0.0 && s.y() < 400.0));
    }

    #[test]
    fn test_reproducibility() {
        let config = small_config();
        let a = generate_seeds(400.0, 400.0, &config, &mut ChaCha8Rng::seed_from_u64(77)).unwrap();
        let b = generate_seeds(400.0, 400.0, &config, &mut ChaCha8Rng::seed_from_u64(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_capacity_exceeded_is_an_error() {
        let config = SeedConfig {
            count: 300,
            subdivisions_w: 4,
            subdivisions_h: 4,
            max_per_cell: 2,
            ..small_config()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let err = generate_seeds(400.0, 400.0, &config, &mut rng).unwrap_err();
        assert!(matches!(err, SeedError::CapacityExceeded { requested: 300, .. }));
    }

    #[test]
    fn test_attempt_cap_stops_impossible_packing() {
        // Capacity allows it, but the distance constraint cannot be met.
        let config = SeedConfig {
            count: 50,
            subdivisions_w: 4,
            subdivisions_h: 4,
            max_per_cell: 8,
            min_distance: 90.0,
            spread: 0.3,
            max_attempts: 20_000,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let err = generate_seeds(100.0, 100.0, &config, &mut rng).unwrap_err();
        assert!(matches!(err, SeedError::Exhausted { attempts: 20_000, requested: 50, .. }));
    }
}
