//! Biome repartition: ordered labeling passes over the Voronoi adjacency graph.
//!
//! Every pass walks the seed sequence sorted by distance to the map center
//! and mutates seed biomes in place. Later passes rely on the labels of
//! earlier ones, so the pipeline checks that each pass's prerequisites ran.

mod beach;
mod config;
mod lake;
mod land;
mod mountain;

pub use beach::BeachPass;
pub use config::RepartitionConfig;
pub use lake::LakePass;
pub use land::LandPass;
pub use mountain::MountainPass;

use glam::Vec2;
use thiserror::Error;

use crate::biome::Biome;
use crate::seeds::Seed;
use crate::voronoi::{CellDiagram, CellId};
use crate::MapRng;

/// Unique identifier for repartition passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassId {
    Land,
    Lake,
    Beach,
    Mountain,
}

impl PassId {
    /// Returns the name of the pass.
    pub fn name(&self) -> &'static str {
        match self {
            PassId::Land => "land",
            PassId::Lake => "lake",
            PassId::Beach => "beach",
            PassId::Mountain => "mountain",
        }
    }
}

/// Errors that can occur while running the passes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepartitionError {
    #[error("Missing dependency: pass '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("{seeds} seeds do not match a diagram of {cells} cells")]
    SeedCountMismatch { seeds: usize, cells: usize },
}

/// Seeds being labeled, plus the diagram and outputs shared by the passes.
pub struct BiomeLayout<'a> {
    /// Seeds sorted by distance to the map center; seed `i` owns cell `i`.
    pub seeds: &'a mut [Seed],
    pub diagram: &'a CellDiagram,
    pub map_size: f32,
    /// Centroids of the cells turned into lakes.
    pub lakes: Vec<Vec2>,
}

impl<'a> BiomeLayout<'a> {
    pub fn new(
        seeds: &'a mut [Seed],
        diagram: &'a CellDiagram,
        map_size: f32,
    ) -> Result<Self, RepartitionError> {
        if seeds.len() != diagram.num_cells() {
            return Err(RepartitionError::SeedCountMismatch {
                seeds: seeds.len(),
                cells: diagram.num_cells(),
            });
        }
        Ok(Self {
            seeds,
            diagram,
            map_size,
            lakes: Vec::new(),
        })
    }

    pub fn center(&self) -> Vec2 {
        Vec2::splat(self.map_size * 0.5)
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn biome(&self, cell: CellId) -> Biome {
        self.seeds[cell].biome()
    }

    pub fn neighbors(&self, cell: CellId) -> &'a [CellId] {
        self.diagram.neighbors(cell)
    }

    pub fn any_neighbor(&self, cell: CellId, biome: Biome) -> bool {
        self.neighbors(cell).iter().any(|&n| self.biome(n) == biome)
    }

    pub fn count_biome(&self, biome: Biome) -> usize {
        self.seeds.iter().filter(|s| s.biome() == biome).count()
    }
}

/// One labeling pass.
pub trait RepartitionPass: Send + Sync {
    /// Returns the unique identifier for this pass.
    fn id(&self) -> PassId;

    /// Returns the pass IDs that must be executed before this pass.
    fn dependencies(&self) -> &[PassId] {
        &[]
    }

    /// Labels seeds of `layout` in place.
    fn execute(&self, layout: &mut BiomeLayout<'_>, rng: &mut MapRng) -> Result<(), RepartitionError>;
}

/// Runs repartition passes in order.
pub struct Repartition {
    passes: Vec<Box<dyn RepartitionPass>>,
}

impl Repartition {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Land, lake, beach then mountain passes.
    pub fn standard(config: &RepartitionConfig) -> Self {
        let mut repartition = Self::new();
        repartition
            .add_pass(LandPass::new(config))
            .add_pass(LakePass::new(config))
            .add_pass(BeachPass)
            .add_pass(MountainPass::new(config));
        repartition
    }

    /// Adds a pass to the pipeline.
    pub fn add_pass<P: RepartitionPass + 'static>(&mut self, pass: P) -> &mut Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Returns the number of passes in the pipeline.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Executes all passes in order.
    pub fn run(&self, layout: &mut BiomeLayout<'_>, rng: &mut MapRng) -> Result<(), RepartitionError> {
        let mut completed: Vec<PassId> = Vec::new();

        for pass in &self.passes {
            for dep in pass.dependencies() {
                if !completed.contains(dep) {
                    return Err(RepartitionError::MissingDependency(
                        pass.id().name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            let _span = tracing::debug_span!("repartition", pass = pass.id().name()).entered();
            pass.execute(layout, rng)?;
            tracing::debug!(
                sea = layout.count_biome(Biome::Sea),
                plains = layout.count_biome(Biome::Plains),
                lakes = layout.lakes.len(),
                "pass complete"
            );
            completed.push(pass.id());
        }

        Ok(())
    }
}

impl Default for Repartition {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{fixture, SIZE};
    use super::*;

    #[test]
    fn test_missing_dependency() {
        let (mut seeds, diagram, mut rng) = fixture(1);
        let mut layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
        let mut repartition = Repartition::new();
        repartition.add_pass(BeachPass);
        let err = repartition.run(&mut layout, &mut rng).unwrap_err();
        assert_eq!(
            err,
            RepartitionError::MissingDependency("beach".to_string(), "land".to_string())
        );
    }

    #[test]
    fn test_seed_count_mismatch() {
        let (mut seeds, diagram, _) = fixture(2);
        seeds.pop();
        let err = BiomeLayout::new(&mut seeds, &diagram, SIZE).err().unwrap();
        assert!(matches!(err, RepartitionError::SeedCountMismatch { .. }));
    }

    #[test]
    fn test_standard_labels_everything() {
        let (mut seeds, diagram, mut rng) = fixture(3);
        let repartition = Repartition::standard(&RepartitionConfig::default());
        assert_eq!(repartition.pass_count(), 4);
        let mut layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
        repartition.run(&mut layout, &mut rng).unwrap();
        assert_eq!(layout.count_biome(Biome::Undefined), 0);
        assert!(layout.count_biome(Biome::Sea) > 0);
        assert!(layout.count_biome(Biome::Plains) > 0);
    }

    #[test]
    fn test_labels_never_return_to_undefined() {
        let (mut seeds, diagram, mut rng) = fixture(4);
        let config = RepartitionConfig::default();
        let passes: Vec<Box<dyn RepartitionPass>> = vec![
            Box::new(LandPass::new(&config)),
            Box::new(LakePass::new(&config)),
            Box::new(BeachPass),
            Box::new(MountainPass::new(&config)),
        ];
        let mut layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
        let mut previous: Vec<Biome> = layout.seeds.iter().map(|s| s.biome()).collect();
        for pass in &passes {
            pass.execute(&mut layout, &mut rng).unwrap();
            for (before, seed) in previous.iter().zip(layout.seeds.iter()) {
                if *before != Biome::Undefined {
                    assert_ne!(seed.biome(), Biome::Undefined);
                }
            }
            previous = layout.seeds.iter().map(|s| s.biome()).collect();
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let run = |seed: u64| {
            let (mut seeds, diagram, mut rng) = fixture(seed);
            let mut layout = BiomeLayout::new(&mut seeds, &diagram, SIZE).unwrap();
            Repartition::standard(&RepartitionConfig::default())
                .run(&mut layout, &mut rng)
                .unwrap();
            let lakes = layout.lakes.clone();
            (seeds.iter().map(|s| s.biome()).collect::<Vec<_>>(), lakes)
        };
        assert_eq!(run(9), run(9));
    }
}
