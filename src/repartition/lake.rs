//! Inland lake pass.

use rand::Rng;

use super::{BiomeLayout, PassId, RepartitionConfig, RepartitionError, RepartitionPass};
use crate::biome::Biome;
use crate::MapRng;

/// Turns some inland plains into lakes.
///
/// Lakes are a mid-map feature: the walk skips a run of center seeds first
/// (a fixed minimum plus a truncated geometric count) and stops at the first
/// sea or beach seed it meets.
#[derive(Debug, Clone)]
pub struct LakePass {
    min_skip: usize,
    skip_probability: f32,
    skip_max: usize,
    probability: f32,
}

impl LakePass {
    pub fn new(config: &RepartitionConfig) -> Self {
        Self {
            min_skip: config.lake_min_skip,
            skip_probability: config.lake_skip_probability,
            skip_max: config.lake_skip_max,
            probability: config.lake_probability,
        }
    }

    fn skip_count(&self, rng: &mut MapRng) -> usize {
        let mut skip = 0;
        while skip < self.skip_max && rng.random::<f32>() < self.skip_probability {
            skip += 1;
        }
        self.min_skip + skip
    }

    /// A lake needs land all around it.
    fn is_eligible(layout: &BiomeLayout<'_>, i: usize) -> bool {
        layout.biome(i) == Biome::Plains
            && layout
                .neighbors(i)
                .iter()
                .all(|&n| matches!(layout.biome(n), Biome::Plains | Biome::Mountain))
    }
}

impl RepartitionPass for LakePass {
    fn id(&self) -> PassId {
        PassId::Lake
    }

    fn dependencies(&self) -> &[PassId] {
        &[PassId::Land]
    }

    fn execute(&self, layout: &mut BiomeLayout<'_>, rng: &mut MapRng) -> Result<(), RepartitionError> {
        let start = self.skip_count(rng);
        for i in start..layout.len() {
            if matches!(layout.biome(i), Biome::Sea | Biome::Beach) {
                break;
            }
            if !Self::is_eligible(layout, i) {
                continue;
            }
            if rng.random::<f32>() < self.probability {
                layout.seeds[i].set_biome(Biome::Lake);
                let centroid = layout.diagram.centroid(i);
                layout.lakes.push(centroid);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fixture, SIZE};
    use super::super::LandPass;
    use super::*;

    fn land_then_lakes(seed: u64, config: &RepartitionConfig) -> (Vec<Biome>, Vec<glam::Vec2>, Vec<usize>) {
        let (mut seeds, diagram, mut rng) = fixture(seed);
        let mut layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
        LandPass::new(config).execute(&mut layout, &mut rng).unwrap();
        let before: Vec<Biome> = layout.seeds.iter().map(|s| s.biome()).collect();
        LakePass::new(config).execute(&mut layout, &mut rng).unwrap();
        let lake_ids: Vec<usize> = (0..layout.len())
            .filter(|&i| layout.biome(i) == Biome::Lake)
            .collect();
        let lakes = layout.lakes.clone();
        (before, lakes, lake_ids)
    }

    #[test]
    fn test_lakes_replace_landlocked_plains() {
        let config = RepartitionConfig {
            lake_probability: 1.0,
            lake_min_skip: 0,
            lake_skip_max: 0,
            ..Default::default()
        };
        let (before, lakes, lake_ids) = land_then_lakes(21, &config);
        assert_eq!(lakes.len(), lake_ids.len());
        for id in lake_ids {
            assert_eq!(before[id], Biome::Plains);
        }
    }

    #[test]
    fn test_min_skip_keeps_center_dry() {
        let config = RepartitionConfig {
            lake_probability: 1.0,
            lake_min_skip: 15,
            lake_skip_max: 0,
            ..Default::default()
        };
        let (_, _, lake_ids) = land_then_lakes(22, &config);
        assert!(lake_ids.iter().all(|&id| id >= 15));
    }

    #[test]
    fn test_zero_probability_makes_no_lakes() {
        let config = RepartitionConfig {
            lake_probability: 0.0,
            ..Default::default()
        };
        let (_, lakes, lake_ids) = land_then_lakes(23, &config);
        assert!(lakes.is_empty());
        assert!(lake_ids.is_empty());
    }

    #[test]
    fn test_lakes_stop_at_first_sea() {
        let config = RepartitionConfig {
            lake_probability: 1.0,
            lake_min_skip: 0,
            lake_skip_max: 0,
            ..Default::default()
        };
        let (before, _, lake_ids) = land_then_lakes(24, &config);
        let first_sea = before.iter().position(|&b| b == Biome::Sea).unwrap();
        assert!(lake_ids.iter().all(|&id| id < first_sea));
    }
}
