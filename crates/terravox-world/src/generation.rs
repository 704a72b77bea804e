//! Procedural terrain generation.

use rayon::prelude::*;
use terravox_core::constants::{CHUNK_SIZE, SEA_LEVEL, WORLD_HEIGHT};
use terravox_core::coords::ChunkPos;
use terravox_core::types::BlockId;
use tracing::debug;

use crate::biome::{derive_seed, Biome, BiomeMap};
use crate::chunk::{Chunk, CHUNK_WIDTH};
use crate::decoration;
use crate::gradient::GradientNoise;
use crate::WorldSeed;

/// A depth band in which a 3D noise field replaces stone with another block.
#[derive(Debug, Clone, Copy)]
pub struct OreBand {
    pub block: BlockId,
    /// Inclusive z range.
    pub min_z: i32,
    pub max_z: i32,
    /// Noise frequency.
    pub scale: f64,
    /// Noise value above which the block is placed.
    pub threshold: f64,
    /// Offset into the shared ore field so bands do not coincide.
    pub offset: f64,
}

impl OreBand {
    #[inline]
    fn contains(&self, z: i32) -> bool {
        (self.min_z..=self.max_z).contains(&z)
    }
}

/// Gravel pockets, checked before ores.
pub const GRAVEL_BAND: OreBand = OreBand {
    block: BlockId::GRAVEL,
    min_z: 4,
    max_z: 45,
    scale: 0.08,
    threshold: 0.5,
    offset: 900.0,
};

/// Ore veins, shallow to deep. Later bands overwrite earlier ones.
pub const ORE_BANDS: [OreBand; 4] = [
    OreBand {
        block: BlockId::COAL_ORE,
        min_z: 5,
        max_z: 45,
        scale: 0.15,
        threshold: 0.55,
        offset: 0.0,
    },
    OreBand {
        block: BlockId::IRON_ORE,
        min_z: 4,
        max_z: 30,
        scale: 0.18,
        threshold: 0.6,
        offset: 200.0,
    },
    OreBand {
        block: BlockId::GOLD_ORE,
        min_z: 3,
        max_z: 18,
        scale: 0.2,
        threshold: 0.65,
        offset: 400.0,
    },
    OreBand {
        block: BlockId::DIAMOND_ORE,
        min_z: 2,
        max_z: 12,
        scale: 0.25,
        threshold: 0.7,
        offset: 600.0,
    },
];

/// Lowest z a cave may carve (keeps the bedrock floor intact).
pub const CAVE_MIN_Z: i32 = 5;
/// Caves stop this many blocks below the surface.
pub const CAVE_SURFACE_MARGIN: i32 = 4;

/// Terrain generator configuration.
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    /// Seed for noise generation.
    pub seed: WorldSeed,
    /// Water fills open columns up to this z.
    pub sea_level: i32,
    /// Height of a column where the blended noise is zero.
    pub base_height: f64,
    /// Height change for a blended noise value of 1.
    pub height_amplitude: f64,
    /// Frequencies of the three height octaves.
    pub octave_scales: [f64; 3],
    /// Weights of the three height octaves (they sum to 1).
    pub octave_weights: [f64; 3],
    /// Layers of dirt (or clay/sand) between stone and the surface block.
    pub dirt_depth: i32,
    /// Cave noise frequency (horizontal, vertical).
    pub cave_scale: (f64, f64),
    /// Cave noise value above which a cell is carved.
    pub cave_threshold: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            sea_level: SEA_LEVEL,
            base_height: 28.0,
            height_amplitude: 16.0,
            octave_scales: [0.01, 0.03, 0.08],
            octave_weights: [0.6, 0.3, 0.1],
            dirt_depth: 3,
            cave_scale: (0.06, 0.09),
            cave_threshold: 0.42,
        }
    }
}

/// Per-column generation results, reused by decoration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnInfo {
    /// z of the surface block.
    pub height: i32,
    pub biome: Biome,
}

/// Procedural terrain generator.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    config: TerrainConfig,
    height_noise: GradientNoise,
    ore_noise: GradientNoise,
    cave_noise: GradientNoise,
    biomes: BiomeMap,
}

impl TerrainGenerator {
    /// Create a new terrain generator with the given configuration.
    pub fn new(config: TerrainConfig) -> Self {
        let seed = config.seed;
        Self {
            height_noise: GradientNoise::new(derive_seed(seed, 0x01)),
            ore_noise: GradientNoise::new(derive_seed(seed, 0x02)),
            cave_noise: GradientNoise::new(derive_seed(seed, 0x03)),
            biomes: BiomeMap::new(seed),
            config,
        }
    }

    /// Create a terrain generator with default configuration.
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self::new(TerrainConfig {
            seed,
            ..Default::default()
        })
    }

    /// Get the terrain configuration.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn biome_map(&self) -> &BiomeMap {
        &self.biomes
    }

    /// Biome at a world column.
    pub fn biome_at(&self, x: i32, y: i32) -> Biome {
        self.biomes.biome_at(x, y)
    }

    /// Weighted blend of the three height octaves, roughly in `[-1, 1]`.
    fn blended_height_noise(&self, x: i32, y: i32) -> f64 {
        let fx = f64::from(x);
        let fy = f64::from(y);
        self.config
            .octave_scales
            .iter()
            .zip(self.config.octave_weights)
            .enumerate()
            .map(|(octave, (scale, weight))| {
                // Shift each octave so they sample unrelated regions of the field.
                let shift = octave as f64 * 97.0;
                self.height_noise.perlin2(fx * scale + shift, fy * scale + shift) * weight
            })
            .sum()
    }

    /// Surface height and biome at a world column.
    pub fn column_at(&self, x: i32, y: i32) -> ColumnInfo {
        let biome = self.biome_at(x, y);
        let raw = self.config.base_height
            + self.blended_height_noise(x, y) * self.config.height_amplitude;
        let sea = f64::from(self.config.sea_level);

        let adjusted = match biome {
            Biome::Desert => sea + (raw - sea) * 0.5,
            Biome::Swamp => raw.min(sea + 1.0),
            Biome::Jungle => sea + (raw - sea) * 1.2,
            _ => raw,
        };

        let height = (adjusted.round() as i32).clamp(1, WORLD_HEIGHT as i32 - 5);
        ColumnInfo { height, biome }
    }

    /// Get terrain surface height at a world column.
    pub fn height_at(&self, x: i32, y: i32) -> i32 {
        self.column_at(x, y).height
    }

    fn band_hit(&self, band: &OreBand, x: i32, y: i32, z: i32) -> bool {
        band.contains(z)
            && self.ore_noise.perlin3(
                f64::from(x) * band.scale + band.offset,
                f64::from(y) * band.scale,
                f64::from(z) * band.scale,
            ) > band.threshold
    }

    fn is_cave(&self, x: i32, y: i32, z: i32, height: i32) -> bool {
        let (horizontal, vertical) = self.config.cave_scale;
        z >= CAVE_MIN_Z
            && z < height - CAVE_SURFACE_MARGIN
            && self.cave_noise.perlin3(
                f64::from(x) * horizontal,
                f64::from(y) * horizontal,
                f64::from(z) * vertical,
            ) > self.config.cave_threshold
    }

    /// Stone, ore, gravel or carved air for a cell deep below the surface.
    fn underground_block(&self, x: i32, y: i32, z: i32, height: i32) -> BlockId {
        if self.is_cave(x, y, z, height) {
            return BlockId::AIR;
        }
        let mut block = BlockId::STONE;
        if self.band_hit(&GRAVEL_BAND, x, y, z) {
            block = GRAVEL_BAND.block;
        }
        for band in &ORE_BANDS {
            if self.band_hit(band, x, y, z) {
                block = band.block;
            }
        }
        block
    }

    fn surface_block(&self, column: ColumnInfo) -> BlockId {
        let underwater = column.height < self.config.sea_level;
        match column.biome {
            Biome::Desert => BlockId::SAND,
            Biome::Swamp if underwater || column.height == self.config.sea_level => BlockId::CLAY,
            Biome::Swamp => BlockId::GRASS,
            _ if underwater => BlockId::SAND,
            Biome::Snow => BlockId::SNOW,
            _ => BlockId::GRASS,
        }
    }

    fn subsurface_block(biome: Biome) -> BlockId {
        match biome {
            Biome::Desert => BlockId::SAND,
            Biome::Swamp => BlockId::CLAY,
            _ => BlockId::DIRT,
        }
    }

    /// Fill one column of `chunk` at local `(lx, ly)`.
    fn fill_column(&self, chunk: &mut Chunk, lx: i32, ly: i32, x: i32, y: i32, column: ColumnInfo) {
        let height = column.height;
        let surface = self.surface_block(column);
        let subsurface = Self::subsurface_block(column.biome);
        let sea = self.config.sea_level;

        for z in 0..WORLD_HEIGHT as i32 {
            let block = if z == 0 {
                BlockId::BEDROCK
            } else if z < height - self.config.dirt_depth {
                self.underground_block(x, y, z, height)
            } else if z < height {
                subsurface
            } else if z == height {
                surface
            } else if z <= sea {
                if z == sea && column.biome == Biome::Snow {
                    BlockId::ICE
                } else {
                    BlockId::WATER
                }
            } else {
                break;
            };
            chunk.set_generated(lx, ly, z, block);
        }
    }

    /// Generate the bare terrain of a chunk (no decoration) and its column info.
    pub fn generate_terrain(&self, pos: ChunkPos) -> (Chunk, Vec<ColumnInfo>) {
        let mut chunk = Chunk::new(pos);
        let base = pos.to_world_pos();
        let mut columns = Vec::with_capacity(CHUNK_SIZE * CHUNK_SIZE);

        for ly in 0..CHUNK_WIDTH {
            for lx in 0..CHUNK_WIDTH {
                let x = base.x + lx;
                let y = base.y + ly;
                let column = self.column_at(x, y);
                self.fill_column(&mut chunk, lx, ly, x, y, column);
                columns.push(column);
            }
        }

        (chunk, columns)
    }

    /// Generate a chunk's voxel data, including decoration.
    pub fn generate_chunk(&self, pos: ChunkPos) -> Chunk {
        let (mut chunk, columns) = self.generate_terrain(pos);
        decoration::decorate(&mut chunk, &columns, self.config.seed, self.config.sea_level);
        debug!("Generated chunk ({}, {})", pos.x, pos.y);
        chunk
    }

    /// Generate multiple chunks in parallel.
    pub fn generate_chunks_parallel(&self, positions: &[ChunkPos]) -> Vec<Chunk> {
        positions
            .par_iter()
            .map(|&pos| self.generate_chunk(pos))
            .collect()
    }
}

/// Index into a chunk's column list.
#[inline]
pub(crate) fn column_index(lx: i32, ly: i32) -> usize {
    (lx + ly * CHUNK_WIDTH) as usize
}
