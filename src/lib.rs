//! Procedural 2D terrain generator.
//!
//! This crate builds a square map of biome regions (sea, beach, plains,
//! mountain, peak, lake) from a centrally-biased seed set and its Voronoi
//! diagram, then synthesizes a continuous height field over it with a
//! biome-aware quadtree.

pub mod biome;
pub mod config;
pub mod export;
pub mod height;
pub mod interpolation;
pub mod map;
pub mod repartition;
pub mod seeds;
pub mod voronoi;

/// RNG threaded explicitly through generation.
pub type MapRng = rand_chacha::ChaCha8Rng;

pub use biome::Biome;
pub use config::{ConfigError, MapParameters};
pub use height::{HeightConfig, HeightTree};
pub use map::{MapError, MapGenerator, MapStats};
pub use repartition::{Repartition, RepartitionConfig};
pub use seeds::{Seed, SeedConfig};
pub use voronoi::CellDiagram;
