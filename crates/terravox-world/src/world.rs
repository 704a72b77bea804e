//! The world: chunks, generation, streaming, block physics, clock and spawning.

use glam::{IVec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use terravox_core::constants::{CHUNK_SIZE, WORLD_HEIGHT};
use terravox_core::coords::{ChunkPos, WorldPos};
use terravox_core::types::BlockId;
use terravox_core::{BlockAccess, BlockEdit, Error, Result};
use tracing::{info, trace};

use crate::biome::Biome;
use crate::block_physics::{BlockPhysics, BlockPhysicsStats};
use crate::chunk_manager::ChunkManager;
use crate::clock::{DayClock, DEFAULT_DAY_LENGTH};
use crate::events::WorldEvent;
use crate::generation::{TerrainConfig, TerrainGenerator};
use crate::scheduler::{RandomTickQueue, DEFAULT_TICK_QUEUE_CAPACITY};
use crate::spawning::{MobCensus, SpawnConfig, SpawnContext, Spawner};
use crate::streaming::{ChunkStreamer, StreamingConfig, StreamingReport};
use crate::WorldSeed;

/// Largest load radius (in chunks) a world accepts.
pub const MAX_LOAD_RADIUS: i32 = 32;

/// Random block-tick scheduling.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Horizontal radius (blocks) around the focus that random ticks sample.
    pub tick_radius: i32,
    /// Random columns queued per world update.
    pub random_columns_per_tick: usize,
    /// Maximum columns processed per world update.
    pub tick_budget: usize,
    /// Capacity of the column queue (rounded up to a power of two).
    pub queue_capacity: usize,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_radius: 32,
            random_columns_per_tick: 24,
            tick_budget: 32,
            queue_capacity: DEFAULT_TICK_QUEUE_CAPACITY,
        }
    }
}

/// Everything needed to build a [`World`].
#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub seed: WorldSeed,
    pub terrain: TerrainConfig,
    pub streaming: StreamingConfig,
    pub ticks: TickConfig,
    pub spawn: SpawnConfig,
    /// Seconds per full day/night cycle.
    pub day_length: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            terrain: TerrainConfig::default(),
            streaming: StreamingConfig::default(),
            ticks: TickConfig::default(),
            spawn: SpawnConfig::default(),
            day_length: DEFAULT_DAY_LENGTH,
        }
    }
}

impl WorldConfig {
    /// Set the world seed (also used by the terrain generator).
    #[must_use]
    pub fn with_seed(mut self, seed: WorldSeed) -> Self {
        self.seed = seed;
        self.terrain.seed = seed;
        self
    }

    #[must_use]
    pub fn with_streaming(mut self, streaming: StreamingConfig) -> Self {
        self.streaming = streaming;
        self
    }

    #[must_use]
    pub fn with_ticks(mut self, ticks: TickConfig) -> Self {
        self.ticks = ticks;
        self
    }

    #[must_use]
    pub fn with_spawn(mut self, spawn: SpawnConfig) -> Self {
        self.spawn = spawn;
        self
    }

    #[must_use]
    pub fn with_day_length(mut self, day_length: f32) -> Self {
        self.day_length = day_length;
        self
    }

    /// Check the configuration for values the world cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));

        if self.terrain.seed != self.seed {
            return invalid(format!(
                "terrain seed {} differs from world seed {}",
                self.terrain.seed, self.seed
            ));
        }
        if !(1..WORLD_HEIGHT as i32).contains(&self.terrain.sea_level) {
            return invalid(format!("sea level {} outside the world", self.terrain.sea_level));
        }
        let streaming = &self.streaming;
        if !(0..=MAX_LOAD_RADIUS).contains(&streaming.load_radius) {
            return invalid(format!(
                "load radius {} outside 0..={MAX_LOAD_RADIUS}",
                streaming.load_radius
            ));
        }
        if streaming.unload_radius < streaming.load_radius {
            return invalid(format!(
                "unload radius {} is below load radius {}",
                streaming.unload_radius, streaming.load_radius
            ));
        }
        let side = (2 * streaming.load_radius + 1) as usize;
        if streaming.max_chunks < side * side {
            return invalid(format!(
                "max_chunks {} cannot hold the {side}x{side} load area",
                streaming.max_chunks
            ));
        }
        if streaming.max_gen_per_update == 0 {
            return invalid("max_gen_per_update must be positive".into());
        }
        if self.ticks.tick_radius < 0 {
            return invalid(format!("negative tick radius {}", self.ticks.tick_radius));
        }
        if !(self.day_length.is_finite() && self.day_length > 0.0) {
            return invalid(format!("day length {} must be positive", self.day_length));
        }
        let spawn = &self.spawn;
        if !(spawn.interval.is_finite() && spawn.interval > 0.0) {
            return invalid(format!("spawn interval {} must be positive", spawn.interval));
        }
        if spawn.min_distance < 0.0 || spawn.max_distance < spawn.min_distance {
            return invalid(format!(
                "spawn ring {}..{} is empty or negative",
                spawn.min_distance, spawn.max_distance
            ));
        }
        if !(0.0..=1.0).contains(&spawn.boss_chance) {
            return invalid(format!("boss chance {} outside [0, 1]", spawn.boss_chance));
        }
        Ok(())
    }
}

/// Per-update input from the entity layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickContext {
    /// Position the world streams and spawns around (the player).
    pub focus: Vec3,
    /// Live mob counts.
    pub census: MobCensus,
}

/// Summary of one [`World::update`].
#[derive(Debug, Clone, Default)]
pub struct WorldUpdate {
    pub streaming: StreamingReport,
    pub physics: BlockPhysicsStats,
}

/// A chunked, procedurally generated voxel world.
pub struct World {
    config: WorldConfig,
    generator: TerrainGenerator,
    chunks: ChunkManager,
    streamer: ChunkStreamer,
    ticks: RandomTickQueue,
    physics: BlockPhysics,
    clock: DayClock,
    spawner: Spawner,
    column_rng: SmallRng,
    events: Vec<WorldEvent>,
}

impl World {
    /// Build an empty world. Chunks load on the first [`World::update`] or
    /// through [`World::ensure_chunk`].
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed;
        info!(
            "Creating world: seed {}, load radius {}, sea level {}",
            seed, config.streaming.load_radius, config.terrain.sea_level
        );

        Ok(Self {
            generator: TerrainGenerator::new(config.terrain.clone()),
            chunks: ChunkManager::new(config.streaming.max_chunks),
            streamer: ChunkStreamer::new(config.streaming.clone()),
            ticks: RandomTickQueue::new(config.ticks.queue_capacity),
            physics: BlockPhysics::new(seed),
            clock: DayClock::new(config.day_length),
            spawner: Spawner::new(config.spawn.clone(), seed),
            column_rng: SmallRng::seed_from_u64(seed ^ 0x7ac4),
            events: Vec::new(),
            config,
        })
    }

    /// Shorthand for a default world with the given seed.
    pub fn with_seed(seed: WorldSeed) -> Result<Self> {
        Self::new(WorldConfig::default().with_seed(seed))
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seed(&self) -> WorldSeed {
        self.config.seed
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn chunks(&self) -> &ChunkManager {
        &self.chunks
    }

    pub fn clock(&self) -> &DayClock {
        &self.clock
    }

    /// Columns waiting for a block-physics pass.
    pub fn pending_ticks(&self) -> usize {
        self.ticks.len()
    }

    /// Block at a world cell; air if the chunk is unloaded or `z` is outside
    /// `[0, WORLD_HEIGHT)`.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.chunks.block_at(WorldPos::new(x, y, z))
    }

    /// Set a block; no-op if the chunk is unloaded or `z` is out of range.
    ///
    /// The edited column (and, when a cell is cleared, its neighbours) is
    /// queued for a block-physics pass so unsupported sand falls and water
    /// flows into the gap.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockId) {
        self.edit(WorldPos::new(x, y, z), block);
    }

    fn edit(&mut self, pos: WorldPos, block: BlockId) -> bool {
        if !self.chunks.set_block_at(pos, block) {
            return false;
        }
        self.ticks.push(IVec2::new(pos.x, pos.y));
        if block.is_air() {
            for neighbor in pos.cardinal_neighbors() {
                self.ticks.push(IVec2::new(neighbor.x, neighbor.y));
            }
        }
        true
    }

    /// Topmost collidable z of a column; 0 if none or the chunk is unloaded.
    pub fn get_height(&self, x: i32, y: i32) -> i32 {
        let column = WorldPos::new(x, y, 0);
        match (self.chunks.get(column.chunk_pos()), column.local_pos()) {
            (Some(chunk), Some(local)) => {
                chunk.column_height(i32::from(local.x), i32::from(local.y))
            }
            _ => 0,
        }
    }

    /// Biome at a world column. Does not require the chunk to be loaded.
    pub fn get_biome_at(&self, x: i32, y: i32) -> Biome {
        self.generator.biome_at(x, y)
    }

    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains(pos)
    }

    /// Load a chunk now (restoring a parked edit or generating it).
    ///
    /// Returns `true` if the chunk was not loaded before.
    pub fn ensure_chunk(&mut self, pos: ChunkPos) -> bool {
        if self.chunks.contains(pos) {
            return false;
        }
        let chunk = self
            .chunks
            .take_parked(pos)
            .unwrap_or_else(|| self.generator.generate_chunk(pos));
        self.chunks.insert(chunk);
        true
    }

    /// A standing position above the surface at the center of chunk (0, 0).
    pub fn spawn_point(&mut self) -> Vec3 {
        let center = (CHUNK_SIZE / 2) as i32;
        self.ensure_chunk(ChunkPos::new(0, 0));
        let ground = self.get_height(center, center);
        Vec3::new(center as f32 + 0.5, center as f32 + 0.5, (ground + 1) as f32)
    }

    /// Queue `count` random columns within the tick radius of `focus`.
    fn schedule_random_columns(&mut self, focus: Vec3) {
        let r = self.config.ticks.tick_radius;
        let fx = focus.x.floor() as i32;
        let fy = focus.y.floor() as i32;
        for _ in 0..self.config.ticks.random_columns_per_tick {
            let x = fx + self.column_rng.gen_range(-r..=r);
            let y = fy + self.column_rng.gen_range(-r..=r);
            if !self.ticks.push(IVec2::new(x, y)) {
                break;
            }
        }
    }

    /// Advance the world by `dt` seconds: clock, streaming, block physics,
    /// then spawning.
    pub fn update(&mut self, dt: f32, ctx: &TickContext) -> WorldUpdate {
        self.clock.advance(dt);
        self.chunks.advance_tick();

        let streaming = self.streamer.update(ctx.focus, &mut self.chunks, &self.generator);

        self.schedule_random_columns(ctx.focus);
        let columns = self.ticks.drain_budget(self.config.ticks.tick_budget);
        let physics = self
            .physics
            .tick_columns(&mut self.chunks, &columns, &mut self.events);
        trace!(
            "Block physics: {} columns, {} fell, {} water, {} burned, {} decayed",
            physics.columns,
            physics.fallen,
            physics.water_placed,
            physics.burned,
            physics.decayed
        );

        let spawn_ctx = SpawnContext {
            focus: ctx.focus,
            clock: &self.clock,
            census: ctx.census,
            chunks: &self.chunks,
            biomes: self.generator.biome_map(),
        };
        self.spawner.update(dt, spawn_ctx, &mut self.events);

        WorldUpdate { streaming, physics }
    }

    /// Take every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }
}

impl BlockAccess for World {
    #[inline]
    fn block_at(&self, pos: WorldPos) -> BlockId {
        self.chunks.block_at(pos)
    }
}

impl BlockEdit for World {
    /// Checked [`World::set_block`]: the same edit and tick scheduling, but an
    /// unloaded or out-of-height cell is reported instead of ignored.
    fn try_set_block(&mut self, pos: WorldPos, block: BlockId) -> Result<()> {
        if self.edit(pos, block) {
            Ok(())
        } else {
            Err(Error::OutOfBounds(format!(
                "({}, {}, {}) is unloaded or outside the world height",
                pos.x, pos.y, pos.z
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world(seed: WorldSeed) -> World {
        let config = WorldConfig::default()
            .with_seed(seed)
            .with_streaming(StreamingConfig::default().with_load_radius(1).with_max_chunks(64));
        World::new(config).unwrap()
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let huge = WorldConfig::default()
            .with_streaming(StreamingConfig::default().with_load_radius(i32::MAX));
        assert!(matches!(huge.validate(), Err(Error::InvalidConfig(_))));

        let bad_radius = WorldConfig::default().with_streaming(StreamingConfig {
            load_radius: 4,
            unload_radius: 2,
            ..Default::default()
        });
        assert!(matches!(bad_radius.validate(), Err(Error::InvalidConfig(_))));

        let tiny = WorldConfig::default().with_streaming(StreamingConfig {
            max_chunks: 3,
            ..Default::default()
        });
        assert!(World::new(tiny).is_err());

        let no_day = WorldConfig::default().with_day_length(0.0);
        assert!(no_day.validate().is_err());

        let mut mismatched = WorldConfig::default().with_seed(4);
        mismatched.terrain.seed = 5;
        assert!(mismatched.validate().is_err());

        assert!(WorldConfig::default().with_seed(9).validate().is_ok());
    }

    #[test]
    fn unloaded_access_degrades_to_air() {
        let mut world = small_world(1);
        assert_eq!(world.get_block(0, 0, 0), BlockId::AIR);
        assert_eq!(world.get_height(0, 0), 0);
        world.set_block(0, 0, 10, BlockId::STONE);
        assert!(!world.is_loaded(ChunkPos::new(0, 0)));
        assert_eq!(world.pending_ticks(), 0);
    }

    #[test]
    fn checked_edits_report_unloaded_cells() {
        let mut world = small_world(2);
        let unloaded = world.try_set_block(WorldPos::new(0, 0, 10), BlockId::STONE);
        assert!(matches!(unloaded, Err(Error::OutOfBounds(_))));

        world.ensure_chunk(ChunkPos::new(0, 0));
        assert!(world.try_set_block(WorldPos::new(3, 4, 50), BlockId::PLANKS).is_ok());
        assert_eq!(world.get_block(3, 4, 50), BlockId::PLANKS);
        assert_eq!(world.pending_ticks(), 1);

        let above = WorldPos::new(3, 4, WORLD_HEIGHT as i32);
        assert!(world.try_set_block(above, BlockId::STONE).is_err());
        assert_eq!(world.pending_ticks(), 1);
    }

    #[test]
    fn set_get_round_trip() {
        let mut world = small_world(42);
        world.ensure_chunk(ChunkPos::new(0, 0));
        world.ensure_chunk(ChunkPos::new(-1, -1));

        world.set_block(5, 5, 10, BlockId::AIR);
        assert_eq!(world.get_block(5, 5, 10), BlockId::AIR);

        world.set_block(-3, -7, 40, BlockId::PLANKS);
        assert_eq!(world.get_block(-3, -7, 40), BlockId::PLANKS);

        // Out of vertical bounds: no-op and air.
        world.set_block(1, 1, WORLD_HEIGHT as i32, BlockId::STONE);
        assert_eq!(world.get_block(1, 1, WORLD_HEIGHT as i32), BlockId::AIR);
        world.set_block(1, 1, -1, BlockId::STONE);
        assert_eq!(world.get_block(1, 1, -1), BlockId::AIR);
    }

    #[test]
    fn height_is_topmost_collidable() {
        let mut world = small_world(7);
        world.ensure_chunk(ChunkPos::new(0, 0));
        for x in 0..16 {
            for y in 0..16 {
                let h = world.get_height(x, y);
                assert!(world.get_block(x, y, h).is_collidable());
                for z in h + 1..WORLD_HEIGHT as i32 {
                    assert!(!world.get_block(x, y, z).is_collidable());
                }
            }
        }
    }

    #[test]
    fn regenerated_chunk_matches() {
        let mut a = small_world(1234);
        let mut b = small_world(1234);
        a.ensure_chunk(ChunkPos::new(0, 0));
        b.ensure_chunk(ChunkPos::new(0, 0));
        for x in 0..16 {
            for y in 0..16 {
                for z in 0..WORLD_HEIGHT as i32 {
                    assert_eq!(a.get_block(x, y, z), b.get_block(x, y, z));
                }
            }
        }
        assert_eq!(a.get_biome_at(100, 100), a.get_biome_at(100, 100));
        assert_eq!(a.get_biome_at(100, 100), b.get_biome_at(100, 100));
    }

    #[test]
    fn update_streams_around_focus() {
        let mut world = small_world(5);
        let ctx = TickContext {
            focus: Vec3::new(8.0, 8.0, 40.0),
            census: MobCensus::default(),
        };
        let update = world.update(0.05, &ctx);
        assert_eq!(update.streaming.generated.len(), 9);
        for x in -1..=1 {
            for y in -1..=1 {
                assert!(world.is_loaded(ChunkPos::new(x, y)));
            }
        }
        assert!(update.physics.columns > 0);
        assert!(world.clock().time() > 0.0);
    }

    #[test]
    fn unsupported_sand_falls_after_edit() {
        let mut world = small_world(3);
        let ctx = TickContext {
            focus: Vec3::new(8.0, 8.0, 40.0),
            census: MobCensus::default(),
        };
        world.update(0.05, &ctx);

        let floor = 50;
        let top = floor + 6;
        world.set_block(4, 4, floor, BlockId::STONE);
        for z in floor + 1..top {
            world.set_block(4, 4, z, BlockId::AIR);
        }
        world.set_block(4, 4, top, BlockId::SAND);

        for _ in 0..50 {
            // Keep the column queued every update.
            world.set_block(4, 4, WORLD_HEIGHT as i32 - 1, BlockId::AIR);
            world.update(0.05, &ctx);
        }
        assert_eq!(world.get_block(4, 4, top), BlockId::AIR);
        assert_eq!(world.get_block(4, 4, floor + 1), BlockId::SAND);
    }

    #[test]
    fn spawn_point_is_above_ground() {
        let mut world = small_world(8);
        let spawn = world.spawn_point();
        let ground = world.get_height(8, 8);
        assert_eq!(spawn.z, (ground + 1) as f32);
        assert!((1..WORLD_HEIGHT as i32 - 4).contains(&ground));
    }
}
