//! Seed model and placement.
//!
//! Seeds are the labeled points that drive the Voronoi diagram: one seed per
//! cell, one biome per seed.

mod config;
mod generator;
mod seed;

pub use config::SeedConfig;
pub use generator::{generate_seeds, SeedError};
pub use seed::Seed;
