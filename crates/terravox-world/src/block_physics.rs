//! Per-column block updates: falling blocks, water flow, fire and farmland.

use glam::IVec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use terravox_core::constants::WORLD_HEIGHT;
use terravox_core::coords::WorldPos;
use terravox_core::types::BlockId;

use crate::chunk_manager::ChunkManager;
use crate::events::WorldEvent;
use crate::WorldSeed;

/// Chance per pass that water spreads sideways into a supported air cell.
pub const WATER_SPREAD_CHANCE: f64 = 0.1;
/// Chance per pass that a fire source ignites a neighbour.
pub const FIRE_SPREAD_CHANCE: f64 = 0.002;
/// Chance per pass that farmland without a crop turns back to dirt.
pub const FARMLAND_DECAY_CHANCE: f64 = 0.01;

/// Counts of what one or more column passes changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockPhysicsStats {
    pub columns: usize,
    pub fallen: usize,
    pub water_placed: usize,
    pub burned: usize,
    pub decayed: usize,
}

impl BlockPhysicsStats {
    fn merge(&mut self, other: Self) {
        self.columns += other.columns;
        self.fallen += other.fallen;
        self.water_placed += other.water_placed;
        self.burned += other.burned;
        self.decayed += other.decayed;
    }
}

/// Applies block rules to scheduled columns with a seeded RNG.
#[derive(Debug, Clone)]
pub struct BlockPhysics {
    rng: SmallRng,
}

impl BlockPhysics {
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed ^ 0x5eed_b10c),
        }
    }

    /// Run every rule over each column, in order.
    pub fn tick_columns(
        &mut self,
        chunks: &mut ChunkManager,
        columns: &[IVec2],
        events: &mut Vec<WorldEvent>,
    ) -> BlockPhysicsStats {
        let mut stats = BlockPhysicsStats::default();
        for &column in columns {
            stats.merge(self.tick_column(chunks, column, events));
        }
        stats
    }

    /// Run gravity, water, fire and farmland rules over one world column.
    ///
    /// Columns in unloaded chunks are skipped.
    pub fn tick_column(
        &mut self,
        chunks: &mut ChunkManager,
        column: IVec2,
        events: &mut Vec<WorldEvent>,
    ) -> BlockPhysicsStats {
        let mut stats = BlockPhysicsStats::default();
        if !chunks.contains(WorldPos::new(column.x, column.y, 0).chunk_pos()) {
            return stats;
        }
        stats.columns = 1;
        stats.fallen = apply_gravity(chunks, column);
        stats.water_placed = self.flow_water(chunks, column);

        for z in 0..WORLD_HEIGHT as i32 {
            let pos = WorldPos::new(column.x, column.y, z);
            match chunks.block_at(pos) {
                block if block.is_fire_source() => {
                    if let Some(event) = self.spread_fire(chunks, pos) {
                        events.push(event);
                        stats.burned += 1;
                    }
                }
                BlockId::FARMLAND => {
                    if !chunks.block_at(pos.above()).is_crop()
                        && self.rng.gen_bool(FARMLAND_DECAY_CHANCE)
                    {
                        chunks.set_block_at(pos, BlockId::DIRT);
                        stats.decayed += 1;
                    }
                }
                _ => {}
            }
        }
        stats
    }

    /// Water fills air directly below; otherwise it may spread to a cardinal
    /// neighbour that is air and rests on something collidable.
    ///
    /// Scans bottom-up so new water is not revisited in the same pass.
    fn flow_water(&mut self, chunks: &mut ChunkManager, column: IVec2) -> usize {
        let mut placed = 0;
        for z in 1..WORLD_HEIGHT as i32 {
            let pos = WorldPos::new(column.x, column.y, z);
            if chunks.block_at(pos) != BlockId::WATER {
                continue;
            }
            if chunks.block_at(pos.below()).is_air() {
                if chunks.set_block_at(pos.below(), BlockId::WATER) {
                    placed += 1;
                }
                continue;
            }
            for neighbor in pos.cardinal_neighbors() {
                let support = chunks.block_at(neighbor.below());
                if chunks.block_at(neighbor).is_air()
                    && support.is_collidable()
                    && self.rng.gen_bool(WATER_SPREAD_CHANCE)
                    && chunks.set_block_at(neighbor, BlockId::WATER)
                {
                    placed += 1;
                }
            }
        }
        placed
    }

    fn spread_fire(&mut self, chunks: &mut ChunkManager, source: WorldPos) -> Option<WorldEvent> {
        if !self.rng.gen_bool(FIRE_SPREAD_CHANCE) {
            return None;
        }
        let neighbors = source.face_neighbors();
        let target = neighbors[self.rng.gen_range(0..neighbors.len())];
        let block = chunks.block_at(target);
        (block.is_flammable() && chunks.set_block_at(target, BlockId::AIR))
            .then_some(WorldEvent::BlockBurned { pos: target, block })
    }
}

/// Move each gravity block above a non-solid, non-liquid cell down one cell.
///
/// Scans top-down and skips the cell a block just fell into, so a block moves
/// at most one cell per pass. Returns the number of blocks moved.
pub fn apply_gravity(chunks: &mut ChunkManager, column: IVec2) -> usize {
    let mut moved = 0;
    let mut z = WORLD_HEIGHT as i32 - 1;
    while z >= 1 {
        let pos = WorldPos::new(column.x, column.y, z);
        let block = chunks.block_at(pos);
        if block.has_gravity() {
            let below = chunks.block_at(pos.below());
            if !below.is_solid() && !below.is_liquid() {
                chunks.set_block_at(pos.below(), block);
                chunks.set_block_at(pos, BlockId::AIR);
                moved += 1;
                z -= 2;
                continue;
            }
        }
        z -= 1;
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use terravox_core::coords::ChunkPos;

    fn floor_world() -> ChunkManager {
        let mut chunks = ChunkManager::new(16);
        for cy in -1..=0 {
            for cx in -1..=0 {
                let mut chunk = Chunk::new(ChunkPos::new(cx, cy));
                for y in 0..16 {
                    for x in 0..16 {
                        chunk.set_generated(x, y, 0, BlockId::BEDROCK);
                        chunk.set_generated(x, y, 1, BlockId::STONE);
                    }
                }
                chunks.insert(chunk);
            }
        }
        chunks
    }

    fn block(chunks: &ChunkManager, x: i32, y: i32, z: i32) -> BlockId {
        chunks.block_at(WorldPos::new(x, y, z))
    }

    #[test]
    fn sand_falls_one_cell_per_pass() {
        let mut chunks = floor_world();
        chunks.set_block_at(WorldPos::new(3, 3, 10), BlockId::SAND);
        chunks.set_block_at(WorldPos::new(3, 3, 9), BlockId::GRAVEL);

        // Top-down: the sand still rests on the gravel when it is visited.
        let moved = apply_gravity(&mut chunks, IVec2::new(3, 3));
        assert_eq!(moved, 1);
        assert_eq!(block(&chunks, 3, 3, 10), BlockId::SAND);
        assert_eq!(block(&chunks, 3, 3, 9), BlockId::AIR);
        assert_eq!(block(&chunks, 3, 3, 8), BlockId::GRAVEL);

        for _ in 0..20 {
            apply_gravity(&mut chunks, IVec2::new(3, 3));
        }
        assert_eq!(block(&chunks, 3, 3, 2), BlockId::GRAVEL);
        assert_eq!(block(&chunks, 3, 3, 3), BlockId::SAND);
        assert_eq!(block(&chunks, 3, 3, 4), BlockId::AIR);
    }

    #[test]
    fn single_block_falls_one_cell() {
        let mut chunks = floor_world();
        chunks.set_block_at(WorldPos::new(-5, 2, 12), BlockId::SAND);
        assert_eq!(apply_gravity(&mut chunks, IVec2::new(-5, 2)), 1);
        assert_eq!(block(&chunks, -5, 2, 11), BlockId::SAND);
        assert_eq!(block(&chunks, -5, 2, 12), BlockId::AIR);
    }

    #[test]
    fn gravity_stops_on_water_and_solids() {
        let mut chunks = floor_world();
        chunks.set_block_at(WorldPos::new(1, 1, 3), BlockId::WATER);
        chunks.set_block_at(WorldPos::new(1, 1, 4), BlockId::SAND);
        chunks.set_block_at(WorldPos::new(2, 1, 2), BlockId::GRAVEL);
        assert_eq!(apply_gravity(&mut chunks, IVec2::new(1, 1)), 0);
        assert_eq!(apply_gravity(&mut chunks, IVec2::new(2, 1)), 0);
    }

    #[test]
    fn water_fills_air_below() {
        let mut chunks = floor_world();
        let mut physics = BlockPhysics::new(1);
        let mut events = Vec::new();
        chunks.set_block_at(WorldPos::new(4, 4, 6), BlockId::WATER);

        let stats = physics.tick_column(&mut chunks, IVec2::new(4, 4), &mut events);
        assert!(stats.water_placed >= 1);
        assert_eq!(block(&chunks, 4, 4, 5), BlockId::WATER);
        assert_eq!(block(&chunks, 4, 4, 6), BlockId::WATER);

        for _ in 0..10 {
            physics.tick_column(&mut chunks, IVec2::new(4, 4), &mut events);
        }
        for z in 2..=6 {
            assert_eq!(block(&chunks, 4, 4, z), BlockId::WATER);
        }
    }

    #[test]
    fn water_spreads_only_onto_support() {
        let mut chunks = floor_world();
        let mut physics = BlockPhysics::new(7);
        let mut events = Vec::new();
        chunks.set_block_at(WorldPos::new(8, 8, 2), BlockId::WATER);

        for _ in 0..200 {
            physics.tick_column(&mut chunks, IVec2::new(8, 8), &mut events);
        }
        let spread = WorldPos::new(8, 8, 2)
            .cardinal_neighbors()
            .iter()
            .filter(|n| chunks.block_at(**n) == BlockId::WATER)
            .count();
        assert!(spread > 0, "water never spread in 200 passes");
        // No supporting floor at z=3, so nothing appears above.
        assert_eq!(block(&chunks, 9, 8, 3), BlockId::AIR);
    }

    #[test]
    fn fire_burns_flammable_neighbours() {
        let mut chunks = floor_world();
        let mut physics = BlockPhysics::new(3);
        let mut events = Vec::new();
        chunks.set_block_at(WorldPos::new(5, 5, 2), BlockId::CAMPFIRE);
        for n in WorldPos::new(5, 5, 2).cardinal_neighbors() {
            chunks.set_block_at(n, BlockId::PLANKS);
        }
        chunks.set_block_at(WorldPos::new(5, 5, 3), BlockId::LEAVES);

        for _ in 0..20_000 {
            physics.tick_column(&mut chunks, IVec2::new(5, 5), &mut events);
        }
        assert!(!events.is_empty());
        for event in &events {
            match event {
                WorldEvent::BlockBurned { pos, block } => {
                    assert!(block.is_flammable());
                    assert_eq!(chunks.block_at(*pos), BlockId::AIR);
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        // Stone floor below never burns.
        assert_eq!(block(&chunks, 5, 5, 1), BlockId::STONE);
    }

    #[test]
    fn bare_farmland_decays_but_planted_farmland_does_not() {
        let mut chunks = floor_world();
        let mut physics = BlockPhysics::new(11);
        let mut events = Vec::new();
        chunks.set_block_at(WorldPos::new(1, 2, 1), BlockId::FARMLAND);
        chunks.set_block_at(WorldPos::new(2, 2, 1), BlockId::FARMLAND);
        chunks.set_block_at(WorldPos::new(2, 2, 2), BlockId::WHEAT);

        for _ in 0..2000 {
            physics.tick_column(&mut chunks, IVec2::new(1, 2), &mut events);
            physics.tick_column(&mut chunks, IVec2::new(2, 2), &mut events);
        }
        assert_eq!(block(&chunks, 1, 2, 1), BlockId::DIRT);
        assert_eq!(block(&chunks, 2, 2, 1), BlockId::FARMLAND);
    }

    #[test]
    fn unloaded_columns_are_skipped() {
        let mut chunks = floor_world();
        let mut physics = BlockPhysics::new(0);
        let mut events = Vec::new();
        let stats = physics.tick_columns(
            &mut chunks,
            &[IVec2::new(500, 500), IVec2::new(0, 0)],
            &mut events,
        );
        assert_eq!(stats.columns, 1);
    }

    #[test]
    fn seeded_physics_is_repeatable() {
        let run = |seed| {
            let mut chunks = floor_world();
            let mut physics = BlockPhysics::new(seed);
            let mut events = Vec::new();
            chunks.set_block_at(WorldPos::new(6, 6, 2), BlockId::WATER);
            for _ in 0..100 {
                physics.tick_column(&mut chunks, IVec2::new(6, 6), &mut events);
            }
            WorldPos::new(6, 6, 2)
                .cardinal_neighbors()
                .map(|n| chunks.block_at(n))
        };
        assert_eq!(run(99), run(99));
    }
}
