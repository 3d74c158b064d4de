//! Height field: per-biome height bands, height blobs and the height quadtree.
//!
//! Vertices of the quadtree sample the biome map; their heights come from a
//! blob centered on the seed that owns them. The tree then blends its levels
//! into one continuous surface.

mod config;
mod data;
mod node;
mod tree;

pub use config::{HeightBand, HeightBands, HeightConfig};
pub use data::{HeightBlob, HeightData};
pub use node::{Corner, Edge, EdgeSpan, HeightNode};
pub use tree::{BiomeSample, BiomeSource, HeightTree, NodeId, SubdivisionPolicy};

use thiserror::Error;

use crate::voronoi::DiagramError;

/// Errors that can occur while building the height tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeightError {
    #[error("Biome lookup failed: {0}")]
    Lookup(#[from] DiagramError),
    #[error("Invalid depth range: min {min} is above max {max}")]
    InvalidDepth { min: u32, max: u32 },
}
