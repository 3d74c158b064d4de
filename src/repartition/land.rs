//! Land/sea pass.

use rand::Rng;

use super::{BiomeLayout, PassId, RepartitionConfig, RepartitionError, RepartitionPass};
use crate::biome::Biome;
use crate::interpolation::smooth6;
use crate::MapRng;

/// Labels every seed `Plains` or `Sea`.
///
/// Cells touching the map edge are always sea. Elsewhere the land
/// probability falls off smoothly with distance to the center and is pulled
/// toward the plains share of already-labeled neighbors, so land clumps into
/// a central continent. Single forward pass: a seed only sees the labels of
/// seeds closer to the center.
#[derive(Debug, Clone)]
pub struct LandPass {
    radius_scale: f32,
    blend: f32,
}

impl LandPass {
    pub fn new(config: &RepartitionConfig) -> Self {
        Self {
            radius_scale: config.land_radius_scale,
            blend: config.land_blend_coefficient,
        }
    }

    /// Probability that seed `i` becomes land, given the current labels.
    pub fn land_probability(&self, layout: &BiomeLayout<'_>, i: usize) -> f32 {
        let distance = layout.seeds[i].position().distance(layout.center());
        let radial = smooth6(distance, layout.map_size * 0.5, self.radius_scale);

        let mut defined_volume = 0.0f64;
        let mut plains_volume = 0.0f64;
        for &n in layout.neighbors(i) {
            let biome = layout.biome(n);
            if biome == Biome::Undefined {
                continue;
            }
            let volume = layout.diagram.volume(n);
            defined_volume += volume;
            if biome == Biome::Plains {
                plains_volume += volume;
            }
        }

        if defined_volume > 0.0 {
            let plains_fraction = (plains_volume / defined_volume) as f32;
            (1.0 - self.blend) * radial + self.blend * plains_fraction
        } else {
            radial
        }
    }
}

impl RepartitionPass for LandPass {
    fn id(&self) -> PassId {
        PassId::Land
    }

    fn execute(&self, layout: &mut BiomeLayout<'_>, rng: &mut MapRng) -> Result<(), RepartitionError> {
        for i in 0..layout.len() {
            if layout.diagram.touches_border(i) {
                layout.seeds[i].set_biome(Biome::Sea);
                continue;
            }
            let probability = self.land_probability(layout, i);
            let biome = if rng.random::<f32>() < probability {
                Biome::Plains
            } else {
                Biome::Sea
            };
            layout.seeds[i].set_biome(biome);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fixture, SIZE};
    use super::*;

    #[test]
    fn test_border_cells_are_sea() {
        let (mut seeds, diagram, mut rng) = fixture(11);
        let mut layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
        LandPass::new(&RepartitionConfig::default())
            .execute(&mut layout, &mut rng)
            .unwrap();
        for id in 0..diagram.num_cells() {
            if diagram.touches_border(id) {
                assert_eq!(layout.biome(id), Biome::Sea, "border cell {id}");
            }
            assert!(matches!(layout.biome(id), Biome::Sea | Biome::Plains));
        }
    }

    #[test]
    fn test_center_is_land() {
        let (mut seeds, diagram, mut rng) = fixture(12);
        let mut layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
        LandPass::new(&RepartitionConfig::default())
            .execute(&mut layout, &mut rng)
            .unwrap();
        // The closest seed sits near the center where the land probability is ~1.
        assert_eq!(layout.biome(0), Biome::Plains);
    }

    #[test]
    fn test_probability_without_labeled_neighbors_is_radial() {
        let (mut seeds, diagram, _) = fixture(13);
        let layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
        let pass = LandPass::new(&RepartitionConfig::default());
        let distance = layout.seeds[5].position().distance(layout.center());
        let expected = smooth6(distance, SIZE * 0.5, 1.0);
        assert!((pass.land_probability(&layout, 5) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_probability_follows_plains_neighbors() {
        let (mut seeds, diagram, _) = fixture(14);
        let neighbors = diagram.neighbors(0).to_vec();
        for &n in &neighbors {
            seeds[n].set_biome(Biome::Plains);
        }
        let layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
        let config = RepartitionConfig {
            land_blend_coefficient: 1.0,
            ..Default::default()
        };
        assert!((LandPass::new(&config).land_probability(&layout, 0) - 1.0).abs() < 1e-6);
    }
}
