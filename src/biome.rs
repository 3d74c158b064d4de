//! Biome tags shared by the seed model, repartition passes and height field.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Categorical terrain type attached to a seed (and therefore a Voronoi cell).
///
/// `as_u8()` is stable and indexes the per-biome counts in `MapStats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Biome {
    /// Not yet labeled by any repartition pass.
    #[default]
    Undefined = 0,
    Sea = 1,
    Lake = 2,
    Beach = 3,
    Plains = 4,
    Mountain = 5,
    Peak = 6,
}

impl Biome {
    pub const COUNT: usize = 7;

    /// Every biome, in `as_u8()` order.
    pub const ALL: [Biome; Biome::COUNT] = [
        Biome::Undefined,
        Biome::Sea,
        Biome::Lake,
        Biome::Beach,
        Biome::Plains,
        Biome::Mountain,
        Biome::Peak,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Sharp biomes keep crisp, linear gradients between themselves.
    ///
    /// Sea, Mountain and Peak are sharp; everything else blends smoothly.
    pub fn is_sharp(self) -> bool {
        matches!(self, Biome::Sea | Biome::Mountain | Biome::Peak)
    }

    pub fn name(self) -> &'static str {
        match self {
            Biome::Undefined => "undefined",
            Biome::Sea => "sea",
            Biome::Lake => "lake",
            Biome::Beach => "beach",
            Biome::Plains => "plains",
            Biome::Mountain => "mountain",
            Biome::Peak => "peak",
        }
    }

    /// RGB preview color for this biome.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            Biome::Undefined => [255, 0, 255],
            Biome::Sea => [15, 40, 90],
            Biome::Lake => [60, 120, 190],
            Biome::Beach => [220, 205, 140],
            Biome::Plains => [110, 170, 80],
            Biome::Mountain => [120, 110, 100],
            Biome::Peak => [240, 248, 255],
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
