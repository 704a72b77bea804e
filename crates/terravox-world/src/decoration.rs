//! Surface decoration: trees, vines, cacti, tall grass, crops and shelters.
//!
//! Every chunk is decorated with its own RNG seeded from the world seed and the
//! chunk position, so regenerating a chunk always yields the same blocks.
//! Features are clipped to the chunk they start in.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use terravox_core::constants::WORLD_HEIGHT;
use terravox_core::coords::ChunkPos;
use terravox_core::types::BlockId;

use crate::biome::Biome;
use crate::chunk::{Chunk, CHUNK_WIDTH};
use crate::generation::{column_index, ColumnInfo};
use crate::WorldSeed;

/// Chance per chunk of attempting a shelter.
pub const SHELTER_CHANCE: f64 = 0.02;
/// Chance per desert sand column of a cactus.
pub const CACTUS_CHANCE: f64 = 0.01;
/// Chance per grass column of a tuft of tall grass.
pub const TALL_GRASS_CHANCE: f64 = 0.1;
/// Chance per plains grass column of a tilled wheat patch.
pub const CROP_CHANCE: f64 = 0.004;
/// Chance per bottom leaf of a hanging vine (jungle only).
pub const VINE_CHANCE: f64 = 0.3;

const SHELTER_HALF: i32 = 2;
const SHELTER_WALL_HEIGHT: i32 = 3;

/// Seed for a chunk's decoration RNG.
pub fn chunk_seed(seed: WorldSeed, pos: ChunkPos) -> u64 {
    let mut h = seed
        ^ (pos.x as i64 as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (pos.y as i64 as u64).wrapping_mul(0xc2b2_ae3d_27d4_eb4f);
    h = (h ^ (h >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    h ^ (h >> 31)
}

/// Decorate a freshly generated chunk.
///
/// `columns` holds the height and biome of each column, indexed `lx + ly*16`.
pub fn decorate(chunk: &mut Chunk, columns: &[ColumnInfo], seed: WorldSeed, sea_level: i32) {
    let mut rng = SmallRng::seed_from_u64(chunk_seed(seed, chunk.pos));

    if rng.gen_bool(SHELTER_CHANCE) {
        let lx = rng.gen_range(SHELTER_HALF + 1..CHUNK_WIDTH - SHELTER_HALF - 1);
        let ly = rng.gen_range(SHELTER_HALF + 1..CHUNK_WIDTH - SHELTER_HALF - 1);
        try_place_shelter(chunk, columns, lx, ly, sea_level);
    }

    for ly in 0..CHUNK_WIDTH {
        for lx in 0..CHUNK_WIDTH {
            let column = columns[column_index(lx, ly)];
            let surface = chunk.get(lx, ly, column.height);
            let above = column.height + 1;
            if !chunk.get(lx, ly, above).is_air() {
                continue;
            }

            match surface {
                BlockId::GRASS | BlockId::SNOW if rng.gen_bool(column.biome.tree_chance()) => {
                    place_tree(chunk, &mut rng, lx, ly, above, column.biome);
                }
                BlockId::SAND if column.biome == Biome::Desert && column.height >= sea_level => {
                    if rng.gen_bool(CACTUS_CHANCE) {
                        let height = rng.gen_range(1..=3);
                        place_cactus(chunk, lx, ly, above, height);
                    }
                }
                BlockId::GRASS => {
                    if column.biome == Biome::Plains && rng.gen_bool(CROP_CHANCE) {
                        chunk.set_generated(lx, ly, column.height, BlockId::FARMLAND);
                        chunk.set_generated(lx, ly, above, BlockId::WHEAT);
                    } else if rng.gen_bool(TALL_GRASS_CHANCE) {
                        chunk.set_generated(lx, ly, above, BlockId::TALL_GRASS);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Set `block` only where the chunk currently holds air.
fn place_if_air(chunk: &mut Chunk, x: i32, y: i32, z: i32, block: BlockId) -> bool {
    if (0..CHUNK_WIDTH).contains(&x)
        && (0..CHUNK_WIDTH).contains(&y)
        && (0..WORLD_HEIGHT as i32).contains(&z)
        && chunk.get(x, y, z).is_air()
    {
        chunk.set_generated(x, y, z, block);
        true
    } else {
        false
    }
}

fn place_tree(chunk: &mut Chunk, rng: &mut SmallRng, lx: i32, ly: i32, base_z: i32, biome: Biome) {
    let (min_trunk, max_trunk) = biome.trunk_height();
    let trunk = rng.gen_range(min_trunk..=max_trunk);
    let top = base_z + trunk - 1;
    if top + 2 >= WORLD_HEIGHT as i32 {
        return;
    }

    for z in base_z..=top {
        place_if_air(chunk, lx, ly, z, BlockId::LOG);
    }

    // Two wide layers below the top, a narrow cross above.
    let mut bottom_leaves = Vec::new();
    for z in top - 1..=top + 1 {
        let radius: i32 = if z > top { 1 } else { 2 };
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if radius == 2 && dx.abs() == 2 && dy.abs() == 2 {
                    continue;
                }
                if radius == 1 && dx != 0 && dy != 0 {
                    continue;
                }
                let placed = place_if_air(chunk, lx + dx, ly + dy, z, BlockId::LEAVES);
                if placed && z == top - 1 {
                    bottom_leaves.push((lx + dx, ly + dy));
                }
            }
        }
    }
    place_if_air(chunk, lx, ly, top + 2, BlockId::LEAVES);

    if biome == Biome::Jungle {
        for (x, y) in bottom_leaves {
            if rng.gen_bool(VINE_CHANCE) {
                let length = rng.gen_range(1..=3);
                for z in (top - 1 - length..top - 1).rev() {
                    if !place_if_air(chunk, x, y, z, BlockId::VINE) {
                        break;
                    }
                }
            }
        }
    }
}

fn place_cactus(chunk: &mut Chunk, lx: i32, ly: i32, base_z: i32, height: i32) {
    for z in base_z..base_z + height {
        if !place_if_air(chunk, lx, ly, z, BlockId::CACTUS) {
            break;
        }
    }
}

/// Build a 5x5 plank hut with a doorway and an inside torch on flat grassland.
///
/// Returns whether the hut was placed.
fn try_place_shelter(
    chunk: &mut Chunk,
    columns: &[ColumnInfo],
    cx: i32,
    cy: i32,
    sea_level: i32,
) -> bool {
    let center = columns[column_index(cx, cy)];
    if !matches!(center.biome, Biome::Plains | Biome::Savanna) || center.height < sea_level {
        return false;
    }
    let floor = center.height;
    if floor + SHELTER_WALL_HEIGHT + 1 >= WORLD_HEIGHT as i32 {
        return false;
    }

    let footprint = move || {
        (-SHELTER_HALF..=SHELTER_HALF)
            .flat_map(move |dy| (-SHELTER_HALF..=SHELTER_HALF).map(move |dx| (cx + dx, cy + dy)))
    };
    let flat = footprint().all(|(x, y)| {
        let column = columns[column_index(x, y)];
        column.height == floor && chunk.get(x, y, floor) == BlockId::GRASS
    });
    if !flat {
        return false;
    }

    for (x, y) in footprint() {
        let edge = (x - cx).abs() == SHELTER_HALF || (y - cy).abs() == SHELTER_HALF;
        let doorway = x == cx && y == cy - SHELTER_HALF;
        chunk.set_generated(x, y, floor, BlockId::PLANKS);
        for z in floor + 1..=floor + SHELTER_WALL_HEIGHT {
            let block = if edge && !(doorway && z <= floor + 2) {
                BlockId::PLANKS
            } else {
                BlockId::AIR
            };
            chunk.set_generated(x, y, z, block);
        }
        chunk.set_generated(x, y, floor + SHELTER_WALL_HEIGHT + 1, BlockId::PLANKS);
    }
    chunk.set_generated(cx + 1, cy + 1, floor + 1, BlockId::TORCH);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::TerrainGenerator;
    use terravox_core::constants::SEA_LEVEL;

    fn flat_columns(height: i32, biome: Biome) -> Vec<ColumnInfo> {
        vec![ColumnInfo { height, biome }; (CHUNK_WIDTH * CHUNK_WIDTH) as usize]
    }

    fn grass_chunk(height: i32) -> Chunk {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0));
        for y in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                for z in 0..height {
                    chunk.set_generated(x, y, z, BlockId::DIRT);
                }
                chunk.set_generated(x, y, height, BlockId::GRASS);
            }
        }
        chunk
    }

    #[test]
    fn chunk_seed_varies_with_position() {
        let a = chunk_seed(1, ChunkPos::new(0, 0));
        let b = chunk_seed(1, ChunkPos::new(1, 0));
        let c = chunk_seed(1, ChunkPos::new(0, 1));
        let d = chunk_seed(2, ChunkPos::new(0, 0));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_ne!(a, d);
    }

    #[test]
    fn shelter_has_floor_roof_door_and_torch() {
        let mut chunk = grass_chunk(30);
        let columns = flat_columns(30, Biome::Plains);
        assert!(try_place_shelter(&mut chunk, &columns, 8, 8, SEA_LEVEL));

        assert_eq!(chunk.get(8, 8, 30), BlockId::PLANKS);
        assert_eq!(chunk.get(6, 8, 32), BlockId::PLANKS);
        assert_eq!(chunk.get(8, 8, 34), BlockId::PLANKS);
        // Doorway on the low-y wall.
        assert_eq!(chunk.get(8, 6, 31), BlockId::AIR);
        assert_eq!(chunk.get(8, 6, 32), BlockId::AIR);
        assert_eq!(chunk.get(8, 6, 33), BlockId::PLANKS);
        assert_eq!(chunk.get(9, 9, 31), BlockId::TORCH);
        assert_eq!(chunk.get(8, 8, 32), BlockId::AIR);
    }

    #[test]
    fn shelter_needs_flat_grassland() {
        let mut chunk = grass_chunk(30);
        let mut columns = flat_columns(30, Biome::Plains);
        columns[column_index(9, 9)].height = 31;
        assert!(!try_place_shelter(&mut chunk, &columns, 8, 8, SEA_LEVEL));

        let desert = flat_columns(30, Biome::Desert);
        assert!(!try_place_shelter(&mut chunk, &desert, 8, 8, SEA_LEVEL));
        assert_eq!(chunk.count(BlockId::PLANKS), 0);
    }

    #[test]
    fn jungle_trees_stand_on_their_trunk() {
        let mut chunk = grass_chunk(20);
        let mut rng = SmallRng::seed_from_u64(3);
        place_tree(&mut chunk, &mut rng, 8, 8, 21, Biome::Jungle);

        let trunk = (21..WORLD_HEIGHT as i32)
            .take_while(|&z| chunk.get(8, 8, z) == BlockId::LOG)
            .count() as i32;
        assert!((6..=8).contains(&trunk), "trunk height {trunk}");
        assert!(chunk.count(BlockId::LEAVES) > 10);

        // Vines always hang from a leaf or another vine.
        for y in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                for z in 0..WORLD_HEIGHT as i32 - 1 {
                    if chunk.get(x, y, z) == BlockId::VINE {
                        let above = chunk.get(x, y, z + 1);
                        assert!(above == BlockId::LEAVES || above == BlockId::VINE);
                    }
                }
            }
        }
    }

    #[test]
    fn trees_are_clipped_at_chunk_edge() {
        let mut chunk = grass_chunk(20);
        let mut rng = SmallRng::seed_from_u64(8);
        place_tree(&mut chunk, &mut rng, 0, 0, 21, Biome::Plains);
        assert_eq!(chunk.get(0, 0, 21), BlockId::LOG);
        assert!(chunk.count(BlockId::LEAVES) > 0);
    }

    #[test]
    fn decoration_only_replaces_air_and_tilled_surfaces() {
        let gen = TerrainGenerator::with_seed(2024);
        for pos in [ChunkPos::new(0, 0), ChunkPos::new(3, -1), ChunkPos::new(-2, 6)] {
            let (bare, columns) = gen.generate_terrain(pos);
            let mut decorated = bare.clone();
            decorate(&mut decorated, &columns, 2024, SEA_LEVEL);

            for (i, (before, after)) in bare.blocks().iter().zip(decorated.blocks()).enumerate() {
                if before != after {
                    let replaced_surface = *before == BlockId::GRASS
                        && (*after == BlockId::FARMLAND || *after == BlockId::PLANKS);
                    let shelter_interior = *after == BlockId::AIR;
                    assert!(
                        before.is_air() || replaced_surface || shelter_interior,
                        "index {i}: {before:?} became {after:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn wheat_grows_on_farmland() {
        let gen = TerrainGenerator::with_seed(5);
        for cx in -4..4 {
            let chunk = gen.generate_chunk(ChunkPos::new(cx, 2));
            for y in 0..CHUNK_WIDTH {
                for x in 0..CHUNK_WIDTH {
                    for z in 1..WORLD_HEIGHT as i32 {
                        if chunk.get(x, y, z) == BlockId::WHEAT {
                            assert_eq!(chunk.get(x, y, z - 1), BlockId::FARMLAND);
                        }
                    }
                }
            }
        }
    }
}
