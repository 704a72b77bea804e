//! Biome classification from temperature and humidity noise.

use serde::{Deserialize, Serialize};

use crate::gradient::GradientNoise;

/// Horizontal frequency of the climate fields.
pub const BIOME_SCALE: f64 = 0.004;

/// Named terrain/climate classification of a world column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Snow,
    Desert,
    Jungle,
    Swamp,
    Savanna,
    Plains,
}

impl Biome {
    /// Classify a climate sample. Both inputs are in `[0, 1]`.
    ///
    /// Cutoffs are checked in order; the first match wins.
    pub fn classify(temperature: f64, humidity: f64) -> Self {
        if temperature < 0.25 {
            Self::Snow
        } else if temperature > 0.75 && humidity < 0.3 {
            Self::Desert
        } else if temperature > 0.6 && humidity > 0.7 {
            Self::Jungle
        } else if humidity > 0.7 && temperature > 0.3 {
            Self::Swamp
        } else if temperature > 0.6 && humidity < 0.5 {
            Self::Savanna
        } else {
            Self::Plains
        }
    }

    /// Chance per surface column of growing a tree.
    pub const fn tree_chance(self) -> f64 {
        match self {
            Self::Desert => 0.0,
            Self::Jungle => 0.08,
            Self::Swamp => 0.03,
            Self::Plains => 0.02,
            Self::Snow => 0.015,
            Self::Savanna => 0.008,
        }
    }

    /// Inclusive trunk height range.
    pub const fn trunk_height(self) -> (i32, i32) {
        match self {
            Self::Jungle => (6, 8),
            Self::Snow => (5, 6),
            _ => (4, 5),
        }
    }
}

/// The two independent climate fields that define biomes.
#[derive(Clone, Debug)]
pub struct BiomeMap {
    temperature: GradientNoise,
    humidity: GradientNoise,
}

/// Climate values at a column, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    pub temperature: f64,
    pub humidity: f64,
}

impl BiomeMap {
    /// Build both climate fields from the world seed.
    pub fn new(seed: u64) -> Self {
        Self {
            temperature: GradientNoise::new(derive_seed(seed, 0x7e3a)),
            humidity: GradientNoise::new(derive_seed(seed, 0x4b1d)),
        }
    }

    /// Sample the climate at a world column.
    pub fn climate_at(&self, x: i32, y: i32) -> Climate {
        let fx = f64::from(x) * BIOME_SCALE;
        let fy = f64::from(y) * BIOME_SCALE;
        Climate {
            temperature: to_unit(self.temperature.perlin2(fx, fy)),
            humidity: to_unit(self.humidity.perlin2(fx + 500.0, fy + 500.0)),
        }
    }

    /// Biome at a world column. Pure: depends only on the seed and `(x, y)`.
    pub fn biome_at(&self, x: i32, y: i32) -> Biome {
        let climate = self.climate_at(x, y);
        Biome::classify(climate.temperature, climate.humidity)
    }
}

/// Map noise output to `[0, 1]`.
#[inline]
fn to_unit(value: f64) -> f64 {
    ((value + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// Derive a per-field 32-bit noise seed from the 64-bit world seed.
pub(crate) fn derive_seed(seed: u64, salt: u64) -> u32 {
    let mixed =
        (seed ^ salt.wrapping_mul(0x9e37_79b9_7f4a_7c15)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    (mixed ^ (mixed >> 31)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_cutoffs() {
        assert_eq!(Biome::classify(0.1, 0.9), Biome::Snow);
        assert_eq!(Biome::classify(0.8, 0.2), Biome::Desert);
        assert_eq!(Biome::classify(0.7, 0.8), Biome::Jungle);
        assert_eq!(Biome::classify(0.5, 0.8), Biome::Swamp);
        assert_eq!(Biome::classify(0.65, 0.4), Biome::Savanna);
        assert_eq!(Biome::classify(0.5, 0.5), Biome::Plains);
        // Hot and very dry: desert wins over savanna because it is checked first.
        assert_eq!(Biome::classify(0.9, 0.1), Biome::Desert);
        // Humid but cold-ish: not swamp below 0.3.
        assert_eq!(Biome::classify(0.28, 0.9), Biome::Plains);
    }

    #[test]
    fn biome_at_is_idempotent() {
        let map = BiomeMap::new(42);
        for x in (-500..500).step_by(37) {
            for y in (-500..500).step_by(41) {
                assert_eq!(map.biome_at(x, y), map.biome_at(x, y));
            }
        }
        let other = BiomeMap::new(42);
        assert_eq!(map.biome_at(100, 100), other.biome_at(100, 100));
    }

    #[test]
    fn climate_is_normalised() {
        let map = BiomeMap::new(7);
        for i in 0..500 {
            let climate = map.climate_at(i * 13 - 3000, i * -7 + 200);
            assert!((0.0..=1.0).contains(&climate.temperature));
            assert!((0.0..=1.0).contains(&climate.humidity));
        }
    }

    #[test]
    fn desert_has_no_trees() {
        assert_eq!(Biome::Desert.tree_chance(), 0.0);
        assert!(Biome::Jungle.tree_chance() > Biome::Plains.tree_chance());
    }
}
