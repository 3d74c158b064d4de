use glam::Vec2;

use crate::height::{BiomeSample, BiomeSource};
use crate::seeds::Seed;
use crate::voronoi::{CellDiagram, CellId, DiagramError};

/// Labeled seeds seen through their Voronoi diagram.
pub(crate) struct SeedField<'a> {
    pub seeds: &'a [Seed],
    pub diagram: &'a CellDiagram,
}

impl SeedField<'_> {
    pub fn cell_at(&self, pos: Vec2) -> Result<CellId, DiagramError> {
        self.diagram.find_cell(pos)
    }
}

impl BiomeSource for SeedField<'_> {
    fn sample(&self, pos: Vec2) -> Result<BiomeSample, DiagramError> {
        let cell = self.cell_at(pos)?;
        Ok(BiomeSample {
            biome: self.seeds[cell].biome(),
            site: self.diagram.site(cell),
            radius: self.diagram.equivalent_radius(cell),
        })
    }
}
