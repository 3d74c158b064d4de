//! Pre-sampled biome grid for constant-time approximate lookups.

use glam::Vec2;

use super::field::SeedField;
use crate::biome::Biome;
use crate::voronoi::DiagramError;

/// Square grid of biomes sampled at cell centers.
#[derive(Debug, Clone)]
pub struct BiomeGrid {
    resolution: usize,
    cell_size: f32,
    biomes: Vec<Biome>,
}

impl BiomeGrid {
    /// Samples `field` on a `ceil(map_size * scale)` square grid.
    pub(crate) fn sample(field: &SeedField<'_>, map_size: f32, scale: f32) -> Result<Self, DiagramError> {
        let resolution = ((map_size * scale).ceil() as usize).max(1);
        let cell_size = map_size / resolution as f32;

        let mut biomes = Vec::with_capacity(resolution * resolution);
        for j in 0..resolution {
            for i in 0..resolution {
                let pos = Vec2::new(i as f32 + 0.5, j as f32 + 0.5) * cell_size;
                let cell = field.cell_at(pos)?;
                biomes.push(field.seeds[cell].biome());
            }
        }

        Ok(Self {
            resolution,
            cell_size,
            biomes,
        })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Biome of the grid cell containing `pos`; out-of-range points snap to the edge.
    pub fn get(&self, pos: Vec2) -> Biome {
        let last = self.resolution - 1;
        let index = |v: f32| ((v / self.cell_size).max(0.0) as usize).min(last);
        self.biomes[index(pos.y) * self.resolution + index(pos.x)]
    }
}
