//! Map generator facade.
//!
//! `MapGenerator` runs the whole generation chain once per `compute()` and
//! then answers biome, height, centroid and lake queries in world
//! coordinates. Coordinates outside `[0, map_size]` are clipped.

mod field;
mod grid;

pub use grid::BiomeGrid;

use glam::Vec2;
use rand::SeedableRng;
use thiserror::Error;

use field::SeedField;

use crate::biome::Biome;
use crate::config::{ConfigError, MapParameters};
use crate::height::{HeightData, HeightError, HeightNode, HeightTree};
use crate::repartition::{BiomeLayout, Repartition, RepartitionError};
use crate::seeds::{generate_seeds, Seed, SeedError};
use crate::voronoi::{CellDiagram, DiagramError};
use crate::MapRng;

/// Errors that can occur while generating or querying a map.
#[derive(Error, Debug)]
pub enum MapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Seed placement failed: {0}")]
    Seeds(#[from] SeedError),
    #[error("Voronoi error: {0}")]
    Diagram(#[from] DiagramError),
    #[error("Biome repartition failed: {0}")]
    Repartition(#[from] RepartitionError),
    #[error("Height field failed: {0}")]
    Height(#[from] HeightError),
    #[error("Map has not been computed yet")]
    NotComputed,
}

/// Everything `compute()` produces.
struct MapState {
    seeds: Vec<Seed>,
    diagram: CellDiagram,
    tree: HeightTree,
    lakes: Vec<Vec2>,
    biome_grid: Option<BiomeGrid>,
}

/// Summary of a computed map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapStats {
    /// Seed count per biome, indexed by `Biome::as_u8`.
    pub biome_counts: [usize; Biome::COUNT],
    pub lakes: usize,
    pub tree_nodes: usize,
    pub tree_leaves: usize,
    pub tree_depth: u32,
}

impl MapStats {
    pub fn count(&self, biome: Biome) -> usize {
        self.biome_counts[biome.as_u8() as usize]
    }
}

/// Generates a map from `MapParameters` and answers point queries on it.
pub struct MapGenerator {
    params: MapParameters,
    state: Option<MapState>,
}

impl MapGenerator {
    /// Validates `params`; nothing is generated until `compute()`.
    pub fn new(params: MapParameters) -> Result<Self, MapError> {
        params.validate()?;
        Ok(Self {
            params,
            state: None,
        })
    }

    pub fn params(&self) -> &MapParameters {
        &self.params
    }

    pub fn map_size(&self) -> f32 {
        self.params.map_size
    }

    pub fn is_computed(&self) -> bool {
        self.state.is_some()
    }

    /// Runs seed placement, the Voronoi diagram, biome repartition, the
    /// height tree and the optional biome grid. Replaces any previous result.
    pub fn compute(&mut self) -> Result<(), MapError> {
        let params = &self.params;
        let size = params.map_size;
        let _span = tracing::info_span!("compute", seed = params.seed, size).entered();
        let mut rng = MapRng::seed_from_u64(params.seed);

        let mut seeds = generate_seeds(size, size, &params.seeds, &mut rng)?;
        let sites: Vec<Vec2> = seeds.iter().map(Seed::position).collect();
        let diagram = CellDiagram::build(&sites, size, size)?;
        for (id, seed) in seeds.iter_mut().enumerate() {
            seed.attach_cell(id, diagram.centroid(id));
        }
        tracing::debug!(cells = diagram.num_cells(), "diagram built");

        let mut layout = BiomeLayout::new(&mut seeds, &diagram, size)?;
        Repartition::standard(&params.repartition).run(&mut layout, &mut rng)?;
        let lakes = std::mem::take(&mut layout.lakes);

        let field = SeedField {
            seeds: &seeds,
            diagram: &diagram,
        };
        let corners = [
            Vec2::ZERO,
            Vec2::new(size, 0.0),
            Vec2::new(0.0, size),
            Vec2::splat(size),
        ]
        .map(|pos| {
            let height = params
                .height
                .bands
                .biome_height(Biome::Sea, params.height.random_heights, &mut rng);
            HeightData::new(pos, height, Biome::Sea)
        });
        let tree = HeightTree::build(&params.height, &field, HeightNode::new(corners, size), &mut rng)?;

        let biome_grid = params
            .biome_map_scale
            .map(|scale| BiomeGrid::sample(&field, size, scale))
            .transpose()?;

        tracing::info!(
            seeds = seeds.len(),
            lakes = lakes.len(),
            nodes = tree.node_count(),
            depth = tree.max_depth(),
            "map computed"
        );

        self.state = Some(MapState {
            seeds,
            diagram,
            tree,
            lakes,
            biome_grid,
        });
        Ok(())
    }

    fn state(&self) -> Result<&MapState, MapError> {
        self.state.as_ref().ok_or(MapError::NotComputed)
    }

    /// Clamps into the map; NaN goes to 0, infinities to the nearest side.
    fn clip(&self, x: f32, y: f32) -> Vec2 {
        let size = self.params.map_size;
        let axis = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, size) };
        Vec2::new(axis(x), axis(y))
    }

    /// Exact biome of the cell owning `(x, y)`.
    pub fn get_biome(&self, x: f32, y: f32) -> Result<Biome, MapError> {
        let state = self.state()?;
        let cell = state.diagram.find_cell(self.clip(x, y))?;
        Ok(state.seeds[cell].biome())
    }

    /// Biome from the pre-sampled grid, or the exact lookup when the grid is disabled.
    pub fn get_approximate_biome(&self, x: f32, y: f32) -> Result<Biome, MapError> {
        match &self.state()?.biome_grid {
            Some(grid) => Ok(grid.get(self.clip(x, y))),
            None => self.get_biome(x, y),
        }
    }

    pub fn get_height(&self, x: f32, y: f32) -> Result<f32, MapError> {
        Ok(self.state()?.tree.eval_height(self.clip(x, y)))
    }

    /// Centroid of the cell owning `(x, y)`.
    pub fn get_centroid(&self, x: f32, y: f32) -> Result<Vec2, MapError> {
        let state = self.state()?;
        let cell = state.diagram.find_cell(self.clip(x, y))?;
        Ok(state.seeds[cell].centroid())
    }

    /// Centroids of all lake cells, in creation order.
    pub fn get_lakes(&self) -> Result<&[Vec2], MapError> {
        Ok(&self.state()?.lakes)
    }

    /// Lake centroid nearest to `(x, y)`, if the map has lakes.
    pub fn get_closest_lake(&self, x: f32, y: f32) -> Result<Option<Vec2>, MapError> {
        let p = self.clip(x, y);
        Ok(self
            .state()?
            .lakes
            .iter()
            .copied()
            .min_by(|a, b| a.distance_squared(p).total_cmp(&b.distance_squared(p))))
    }

    /// Seeds sorted by distance to the map center; seed `i` owns cell `i`.
    pub fn seeds(&self) -> Result<&[Seed], MapError> {
        Ok(&self.state()?.seeds)
    }

    pub fn diagram(&self) -> Result<&CellDiagram, MapError> {
        Ok(&self.state()?.diagram)
    }

    pub fn height_tree(&self) -> Result<&HeightTree, MapError> {
        Ok(&self.state()?.tree)
    }

    pub fn biome_grid(&self) -> Result<Option<&BiomeGrid>, MapError> {
        Ok(self.state()?.biome_grid.as_ref())
    }

    pub fn stats(&self) -> Result<MapStats, MapError> {
        let state = self.state()?;
        let mut biome_counts = [0; Biome::COUNT];
        for seed in &state.seeds {
            biome_counts[seed.biome().as_u8() as usize] += 1;
        }
        Ok(MapStats {
            biome_counts,
            lakes: state.lakes.len(),
            tree_nodes: state.tree.node_count(),
            tree_leaves: state.tree.leaf_count(),
            tree_depth: state.tree.max_depth(),
        })
    }
}
