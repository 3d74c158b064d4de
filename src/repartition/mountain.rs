//! Mountain range pass.

use rand::Rng;

use super::{BiomeLayout, PassId, RepartitionConfig, RepartitionError, RepartitionPass};
use crate::biome::Biome;
use crate::voronoi::CellId;
use crate::MapRng;

/// Grows a single mountain range as a random walk over plains cells.
///
/// The range starts near the center: a truncated geometric walk from seed 0
/// that only stops on plains. Each further step happens with probability
/// `p^k` (`k` = mountains so far) and moves to a random plains neighbor of
/// the last mountain. Once grown, mountains surrounded by enough other
/// mountains are promoted to peaks.
#[derive(Debug, Clone)]
pub struct MountainPass {
    pick_probability: f32,
    pick_max_steps: usize,
    growth_probability: f32,
    max_tries: usize,
    peak_threshold: usize,
}

impl MountainPass {
    pub fn new(config: &RepartitionConfig) -> Self {
        Self {
            pick_probability: config.mountain_pick_probability,
            pick_max_steps: config.mountain_pick_max_steps,
            growth_probability: config.mountain_growth_probability,
            max_tries: config.mountain_max_tries,
            peak_threshold: config.peak_neighbor_threshold,
        }
    }

    fn next_plains(layout: &BiomeLayout<'_>, from: usize) -> Option<usize> {
        (from..layout.len()).find(|&i| layout.biome(i) == Biome::Plains)
    }

    /// First mountain: walk outward from the center, landing only on plains.
    fn pick_start(&self, layout: &BiomeLayout<'_>, rng: &mut MapRng) -> Option<CellId> {
        let mut current = Self::next_plains(layout, 0)?;
        let mut steps = 0;
        while steps < self.pick_max_steps && rng.random::<f32>() < self.pick_probability {
            match Self::next_plains(layout, current + 1) {
                Some(next) => current = next,
                None => break,
            }
            steps += 1;
        }
        Some(current)
    }

    /// A random plains neighbor of `cell`, or `None` after `max_tries` misses.
    fn pick_neighbor(&self, layout: &BiomeLayout<'_>, cell: CellId, rng: &mut MapRng) -> Option<CellId> {
        let neighbors = layout.neighbors(cell);
        if neighbors.is_empty() {
            return None;
        }
        for _ in 0..self.max_tries {
            let candidate = neighbors[rng.random_range(0..neighbors.len())];
            if layout.biome(candidate) == Biome::Plains {
                return Some(candidate);
            }
        }
        None
    }

    fn promote_peaks(&self, layout: &mut BiomeLayout<'_>, range: &[CellId]) {
        let peaks: Vec<CellId> = range
            .iter()
            .copied()
            .filter(|&cell| {
                let high = layout
                    .neighbors(cell)
                    .iter()
                    .filter(|&&n| matches!(layout.biome(n), Biome::Mountain | Biome::Peak))
                    .count();
                high >= self.peak_threshold
            })
            .collect();
        for cell in peaks {
            layout.seeds[cell].set_biome(Biome::Peak);
        }
    }
}

impl RepartitionPass for MountainPass {
    fn id(&self) -> PassId {
        PassId::Mountain
    }

    fn dependencies(&self) -> &[PassId] {
        &[PassId::Land]
    }

    fn execute(&self, layout: &mut BiomeLayout<'_>, rng: &mut MapRng) -> Result<(), RepartitionError> {
        let Some(start) = self.pick_start(layout, rng) else {
            tracing::debug!("no plains left for a mountain range");
            return Ok(());
        };
        layout.seeds[start].set_biome(Biome::Mountain);
        let mut range = vec![start];

        loop {
            let grow = self.growth_probability.powi(range.len() as i32);
            if rng.random::<f32>() >= grow {
                break;
            }
            let last = range[range.len() - 1];
            let Some(next) = self.pick_neighbor(layout, last, rng) else {
                break;
            };
            layout.seeds[next].set_biome(Biome::Mountain);
            range.push(next);
        }

        self.promote_peaks(layout, &range);
        tracing::debug!(mountains = range.len(), "mountain range grown");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fixture, SIZE};
    use super::super::LandPass;
    use super::*;

    fn run(seed: u64, config: &RepartitionConfig) -> (Vec<Biome>, Vec<Biome>, crate::voronoi::CellDiagram) {
        let (mut seeds, diagram, mut rng) = fixture(seed);
        let mut layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
        LandPass::new(config).execute(&mut layout, &mut rng).unwrap();
        let before: Vec<Biome> = layout.seeds.iter().map(|s| s.biome()).collect();
        MountainPass::new(config).execute(&mut layout, &mut rng).unwrap();
        let after: Vec<Biome> = layout.seeds.iter().map(|s| s.biome()).collect();
        (before, after, diagram)
    }

    #[test]
    fn test_mountains_only_replace_plains() {
        let (before, after, _) = run(41, &RepartitionConfig::default());
        let mut mountains = 0;
        for (b, a) in before.iter().zip(after.iter()) {
            if matches!(a, Biome::Mountain | Biome::Peak) {
                assert_eq!(*b, Biome::Plains);
                mountains += 1;
            } else {
                assert_eq!(a, b);
            }
        }
        assert!(mountains >= 1);
    }

    #[test]
    fn test_range_is_connected() {
        let config = RepartitionConfig {
            mountain_growth_probability: 1.0,
            ..Default::default()
        };
        let (_, after, diagram) = run(42, &config);
        let high: Vec<usize> = (0..after.len())
            .filter(|&i| matches!(after[i], Biome::Mountain | Biome::Peak))
            .collect();
        assert!(high.len() >= 2);
        for &cell in &high {
            assert!(
                diagram
                    .neighbors(cell)
                    .iter()
                    .any(|n| matches!(after[*n], Biome::Mountain | Biome::Peak)),
                "mountain {cell} is isolated"
            );
        }
    }

    #[test]
    fn test_default_ranges_are_visible() {
        let config = RepartitionConfig::default();
        let mut high = 0;
        let mut peaks = 0;
        for seed in 50..58 {
            let (_, after, _) = run(seed, &config);
            high += after
                .iter()
                .filter(|b| matches!(b, Biome::Mountain | Biome::Peak))
                .count();
            peaks += after.iter().filter(|b| **b == Biome::Peak).count();
        }
        // Eight ranges; a range typically runs to about eight cells.
        assert!(high >= 8 * 4, "only {high} mountain cells");
        assert!(peaks > 0);
    }

    #[test]
    fn test_zero_growth_gives_single_mountain() {
        let config = RepartitionConfig {
            mountain_growth_probability: 0.0,
            ..Default::default()
        };
        let (_, after, _) = run(43, &config);
        let high = after
            .iter()
            .filter(|b| matches!(b, Biome::Mountain | Biome::Peak))
            .count();
        assert_eq!(high, 1);
    }

    #[test]
    fn test_no_plains_no_mountains() {
        let (mut seeds, diagram, mut rng) = fixture(44);
        for seed in seeds.iter_mut() {
            seed.set_biome(Biome::Sea);
        }
        let mut layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
        MountainPass::new(&RepartitionConfig::default())
            .execute(&mut layout, &mut rng)
            .unwrap();
        assert_eq!(layout.count_biome(Biome::Mountain), 0);
    }
}
