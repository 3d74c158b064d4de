//! Export module for saving computed maps as images.
//!
//! Maps are sampled at pixel centers in parallel, then written as a 16-bit
//! grayscale heightmap or an RGB biome preview.

mod biome_map;
mod png;
mod raster;

pub use biome_map::{export_biome_png, write_biome_png, BiomeMapError, BiomeMapOptions};
pub use png::{export_height_png, write_height_png, PngExportError, PngExportOptions};
pub use raster::{sample_biomes, sample_heights, Raster};
