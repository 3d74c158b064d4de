//! Biome preview map export.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Rgb};
use thiserror::Error;

use super::raster::{sample_biomes, Raster};
use crate::biome::Biome;
use crate::map::{MapError, MapGenerator};

/// Errors that can occur during biome map export.
#[derive(Error, Debug)]
pub enum BiomeMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid resolution: {0}")]
    InvalidResolution(u32),
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Options for biome map export.
#[derive(Debug, Clone)]
pub struct BiomeMapOptions {
    pub resolution: u32,
    pub compression: CompressionType,
    pub filter: FilterType,
    /// Replaces the preview color of a biome.
    pub overrides: Vec<(Biome, [u8; 3])>,
}

impl Default for BiomeMapOptions {
    fn default() -> Self {
        Self {
            resolution: 512,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
            overrides: Vec::new(),
        }
    }
}

impl BiomeMapOptions {
    fn color(&self, biome: Biome) -> [u8; 3] {
        self.overrides
            .iter()
            .find(|(b, _)| *b == biome)
            .map(|(_, c)| *c)
            .unwrap_or_else(|| biome.preview_rgb())
    }
}

/// Writes a biome raster as an RGB PNG.
pub fn write_biome_png(
    raster: &Raster<Biome>,
    path: &Path,
    options: &BiomeMapOptions,
) -> Result<(), BiomeMapError> {
    let resolution = raster.resolution;
    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(resolution, resolution);
    for y in 0..resolution {
        for x in 0..resolution {
            img.put_pixel(x, y, Rgb(options.color(raster.get(x, y))));
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(img.as_raw(), resolution, resolution, image::ExtendedColorType::Rgb8)?;

    Ok(())
}

/// Samples the exact biomes of a computed map and exports them as an RGB PNG.
pub fn export_biome_png(
    map: &MapGenerator,
    path: &Path,
    options: &BiomeMapOptions,
) -> Result<(), BiomeMapError> {
    if options.resolution == 0 {
        return Err(BiomeMapError::InvalidResolution(options.resolution));
    }
    let raster = sample_biomes(map, options.resolution)?;
    write_biome_png(&raster, path, options)?;
    tracing::debug!(path = %path.display(), "biome map written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapParameters;
    use tempfile::tempdir;

    #[test]
    fn test_preview_colors() {
        let raster = Raster {
            resolution: 2,
            data: vec![Biome::Sea, Biome::Plains, Biome::Mountain, Biome::Lake],
        };
        let options = BiomeMapOptions {
            overrides: vec![(Biome::Lake, [1, 2, 3])],
            ..Default::default()
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("biomes.png");
        write_biome_png(&raster, &path, &options).unwrap();

        let img = image::open(&path).unwrap().into_rgb8();
        assert_eq!(img.get_pixel(0, 0).0, Biome::Sea.preview_rgb());
        assert_eq!(img.get_pixel(1, 0).0, Biome::Plains.preview_rgb());
        assert_eq!(img.get_pixel(1, 1).0, [1, 2, 3]);
    }

    #[test]
    fn export_biome_map_smoke() {
        let mut map = MapGenerator::new(MapParameters::small(6)).unwrap();
        map.compute().unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("biomes.png");
        let options = BiomeMapOptions {
            resolution: 48,
            ..Default::default()
        };
        export_biome_png(&map, &path, &options).unwrap();
        assert!(path.exists());
    }
}
