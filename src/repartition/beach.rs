//! Beach pass.

use super::{BiomeLayout, PassId, RepartitionError, RepartitionPass};
use crate::biome::Biome;
use crate::MapRng;

/// Plains touching the sea become beach. Walks from the map edge inward.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeachPass;

impl RepartitionPass for BeachPass {
    fn id(&self) -> PassId {
        PassId::Beach
    }

    fn dependencies(&self) -> &[PassId] {
        &[PassId::Land]
    }

    fn execute(&self, layout: &mut BiomeLayout<'_>, _rng: &mut MapRng) -> Result<(), RepartitionError> {
        for i in (0..layout.len()).rev() {
            if layout.biome(i) == Biome::Plains && layout.any_neighbor(i, Biome::Sea) {
                layout.seeds[i].set_biome(Biome::Beach);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fixture, SIZE};
    use super::super::{LandPass, RepartitionConfig};
    use super::*;

    #[test]
    fn test_no_plains_touch_the_sea() {
        let (mut seeds, diagram, mut rng) = fixture(31);
        let mut layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
        LandPass::new(&RepartitionConfig::default())
            .execute(&mut layout, &mut rng)
            .unwrap();
        let before: Vec<Biome> = layout.seeds.iter().map(|s| s.biome()).collect();
        BeachPass.execute(&mut layout, &mut rng).unwrap();

        for i in 0..layout.len() {
            let biome = layout.biome(i);
            if biome == Biome::Plains {
                assert!(!layout.any_neighbor(i, Biome::Sea), "plains {i} borders the sea");
            }
            if biome == Biome::Beach {
                assert_eq!(before[i], Biome::Plains);
                assert!(layout.any_neighbor(i, Biome::Sea));
            }
            if before[i] == Biome::Sea {
                assert_eq!(biome, Biome::Sea);
            }
        }
        assert!(layout.count_biome(Biome::Beach) > 0);
    }
}
