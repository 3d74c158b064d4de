//! Dense sampling of a computed map onto a square pixel grid.

use rayon::prelude::*;

use crate::biome::Biome;
use crate::map::{MapError, MapGenerator};

/// Row-major square grid of samples covering the whole map.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    pub resolution: u32,
    pub data: Vec<T>,
}

impl<T: Copy> Raster<T> {
    pub fn get(&self, x: u32, y: u32) -> T {
        self.data[(y * self.resolution + x) as usize]
    }
}

impl Raster<f32> {
    /// Lowest and highest sample.
    pub fn range(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }
}

/// Samples `sample` at every pixel center, rows in parallel.
fn sample_map<T, F>(map: &MapGenerator, resolution: u32, sample: F) -> Result<Raster<T>, MapError>
where
    T: Send,
    F: Fn(&MapGenerator, f32, f32) -> Result<T, MapError> + Sync,
{
    let pixel = map.map_size() / resolution as f32;
    let data = (0..(resolution * resolution))
        .into_par_iter()
        .map(|idx| {
            let x = idx % resolution;
            let y = idx / resolution;
            sample(map, (x as f32 + 0.5) * pixel, (y as f32 + 0.5) * pixel)
        })
        .collect::<Result<Vec<T>, MapError>>()?;
    Ok(Raster { resolution, data })
}

/// Heights of a computed map, one sample per pixel.
pub fn sample_heights(map: &MapGenerator, resolution: u32) -> Result<Raster<f32>, MapError> {
    sample_map(map, resolution, MapGenerator::get_height)
}

/// Exact biomes of a computed map, one sample per pixel.
pub fn sample_biomes(map: &MapGenerator, resolution: u32) -> Result<Raster<Biome>, MapError> {
    sample_map(map, resolution, MapGenerator::get_biome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapParameters;

    #[test]
    fn test_rasters_match_queries() {
        let mut map = MapGenerator::new(MapParameters::small(2)).unwrap();
        map.compute().unwrap();

        let heights = sample_heights(&map, 20).unwrap();
        let biomes = sample_biomes(&map, 20).unwrap();
        assert_eq!(heights.data.len(), 400);
        // 200 world units over 20 pixels.
        assert_eq!(heights.get(3, 7), map.get_height(35.0, 75.0).unwrap());
        assert_eq!(biomes.get(0, 0), Biome::Sea);

        let (lo, hi) = heights.range();
        assert!(lo < 0.0 && hi > lo);
    }

    #[test]
    fn test_not_computed() {
        let map = MapGenerator::new(MapParameters::small(2)).unwrap();
        assert!(matches!(sample_heights(&map, 8), Err(MapError::NotComputed)));
    }
}
