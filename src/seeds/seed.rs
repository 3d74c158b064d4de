//! The labeled point driving one Voronoi cell.

use glam::Vec2;

use crate::biome::Biome;
use crate::voronoi::CellId;

/// A seed of the biome diagram.
///
/// A seed's identity is its index in the generated sequence, which is also
/// the id of the Voronoi cell it owns. Its position never changes once the
/// diagram is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Seed {
    position: Vec2,
    biome: Biome,
    cell: Option<CellId>,
    centroid: Vec2,
}

impl Seed {
    pub fn new(x: f32, y: f32) -> Self {
        let position = Vec2::new(x, y);
        Self {
            position,
            biome: Biome::Undefined,
            cell: None,
            centroid: position,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    /// Labels the seed. Labels only ever move between defined biomes.
    pub fn set_biome(&mut self, biome: Biome) {
        debug_assert_ne!(biome, Biome::Undefined, "seeds are never reset to Undefined");
        if biome != Biome::Undefined {
            self.biome = biome;
        }
    }

    /// The owning Voronoi cell, once the diagram has been built.
    pub fn cell(&self) -> Option<CellId> {
        self.cell
    }

    /// Centroid of the owning cell (the seed position until a cell is attached).
    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    pub fn attach_cell(&mut self, cell: CellId, centroid: Vec2) {
        self.cell = Some(cell);
        self.centroid = centroid;
    }

    pub fn distance_squared_to(&self, point: Vec2) -> f32 {
        self.position.distance_squared(point)
    }
}
