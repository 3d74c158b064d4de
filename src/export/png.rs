//! PNG export functionality for heightmaps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use super::raster::{sample_heights, Raster};
use crate::map::{MapError, MapGenerator};

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
    #[error("Invalid resolution: {0}")]
    InvalidResolution(u32),
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Output width and height in pixels.
    pub resolution: u32,
    /// Heights mapped to black and white; `None` uses the sampled range.
    pub height_range: Option<(f32, f32)>,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            resolution: 512,
            height_range: None,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

/// Writes a height raster as a 16-bit grayscale PNG, `min` black and `max` white.
pub fn write_height_png(
    raster: &Raster<f32>,
    path: &Path,
    (min, max): (f32, f32),
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    if !(min < max) {
        return Err(PngExportError::InvalidHeightRange(min, max));
    }

    let resolution = raster.resolution;
    let range = max - min;
    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(resolution, resolution);
    for y in 0..resolution {
        for x in 0..resolution {
            let normalized = ((raster.get(x, y) - min) / range).clamp(0.0, 1.0);
            img.put_pixel(x, y, Luma([(normalized * 65535.0) as u16]));
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    // Convert u16 slice to bytes for the encoder
    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, resolution, resolution, image::ExtendedColorType::L16)?;

    Ok(())
}

/// Samples a computed map and exports its height field as a 16-bit PNG.
///
/// Returns the height range that was mapped onto the gray levels.
pub fn export_height_png(
    map: &MapGenerator,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(f32, f32), PngExportError> {
    if options.resolution == 0 {
        return Err(PngExportError::InvalidResolution(options.resolution));
    }
    let raster = sample_heights(map, options.resolution)?;
    let range = options.height_range.unwrap_or_else(|| raster.range());
    write_height_png(&raster, path, range, options)?;
    tracing::debug!(path = %path.display(), min = range.0, max = range.1, "height map written");
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapParameters;
    use tempfile::tempdir;

    #[test]
    fn test_write_gradient() {
        let resolution = 32;
        let data = (0..resolution * resolution)
            .map(|i| (i % resolution) as f32 / (resolution - 1) as f32)
            .collect();
        let raster = Raster { resolution, data };

        let dir = tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        write_height_png(&raster, &path, (0.0, 1.0), &PngExportOptions::default()).unwrap();

        let img = image::open(&path).unwrap().into_luma16();
        assert_eq!(img.dimensions(), (32, 32));
        assert_eq!(img.get_pixel(0, 5).0[0], 0);
        assert_eq!(img.get_pixel(31, 5).0[0], 65535);
    }

    #[test]
    fn test_invalid_height_range() {
        let raster = Raster {
            resolution: 4,
            data: vec![0.0; 16],
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.png");
        let result = write_height_png(&raster, &path, (1.0, -1.0), &PngExportOptions::default());
        assert!(matches!(result, Err(PngExportError::InvalidHeightRange(..))));
    }

    #[test]
    fn test_export_map() {
        let mut map = MapGenerator::new(MapParameters::small(4)).unwrap();
        map.compute().unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("height.png");
        let options = PngExportOptions {
            resolution: 64,
            ..Default::default()
        };
        let (min, max) = export_height_png(&map, &path, &options).unwrap();
        assert!(min < 0.0 && max > 0.0);
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        let zero = PngExportOptions {
            resolution: 0,
            ..Default::default()
        };
        assert!(matches!(
            export_height_png(&map, &path, &zero),
            Err(PngExportError::InvalidResolution(0))
        ));
    }
}
