//! Mob spawn selection around the focus.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use terravox_core::coords::WorldPos;
pub use terravox_core::mob::MobCensus;
use terravox_core::mob::MobKind;
use tracing::{debug, info};

use crate::biome::{Biome, BiomeMap};
use crate::chunk_manager::ChunkManager;
use crate::clock::DayClock;
use crate::events::WorldEvent;
use crate::WorldSeed;

/// Spawner configuration.
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    /// Seconds between spawn attempts.
    pub interval: f32,
    /// Inner radius of the spawn ring, in blocks.
    pub min_distance: f32,
    /// Outer radius of the spawn ring, in blocks.
    pub max_distance: f32,
    /// No regular mob spawns while this many hostiles are alive.
    pub max_hostile: usize,
    /// First day on which the boss may appear.
    pub boss_min_day: u32,
    /// Chance per eligible attempt of spawning the boss.
    pub boss_chance: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: 5.0,
            min_distance: 24.0,
            max_distance: 40.0,
            max_hostile: 20,
            boss_min_day: 3,
            boss_chance: 0.05,
        }
    }
}

/// Where and when a regular mob kind may appear.
#[derive(Debug, Clone, Copy)]
pub struct SpawnRule {
    pub kind: MobKind,
    /// Allowed biomes; empty means any.
    pub biomes: &'static [Biome],
    pub night_only: bool,
    /// Spawns only in water when set, only on dry ground otherwise.
    pub in_liquid: bool,
}

impl SpawnRule {
    pub fn allows(&self, biome: Biome, night: bool, in_liquid: bool) -> bool {
        (self.biomes.is_empty() || self.biomes.contains(&biome))
            && (night || !self.night_only)
            && self.in_liquid == in_liquid
    }
}

/// The regular mob table.
pub const SPAWN_TABLE: [SpawnRule; 7] = [
    SpawnRule {
        kind: MobKind::Zombie,
        biomes: &[Biome::Plains, Biome::Savanna, Biome::Jungle, Biome::Swamp],
        night_only: true,
        in_liquid: false,
    },
    SpawnRule {
        kind: MobKind::Skeleton,
        biomes: &[],
        night_only: true,
        in_liquid: false,
    },
    SpawnRule {
        kind: MobKind::Spider,
        biomes: &[Biome::Jungle, Biome::Savanna],
        night_only: false,
        in_liquid: false,
    },
    SpawnRule {
        kind: MobKind::Husk,
        biomes: &[Biome::Desert],
        night_only: true,
        in_liquid: false,
    },
    SpawnRule {
        kind: MobKind::Stray,
        biomes: &[Biome::Snow],
        night_only: true,
        in_liquid: false,
    },
    SpawnRule {
        kind: MobKind::Slime,
        biomes: &[Biome::Swamp],
        night_only: false,
        in_liquid: false,
    },
    SpawnRule {
        kind: MobKind::Drowned,
        biomes: &[],
        night_only: false,
        in_liquid: true,
    },
];

/// World state a spawn attempt reads.
#[derive(Clone, Copy)]
pub struct SpawnContext<'a> {
    pub focus: Vec3,
    pub clock: &'a DayClock,
    pub census: MobCensus,
    pub chunks: &'a ChunkManager,
    pub biomes: &'a BiomeMap,
}

/// Periodically picks a mob and a ground position near the focus.
#[derive(Debug, Clone)]
pub struct Spawner {
    config: SpawnConfig,
    timer: f32,
    rng: SmallRng,
}

impl Spawner {
    pub fn new(config: SpawnConfig, seed: WorldSeed) -> Self {
        Self {
            config,
            timer: 0.0,
            rng: SmallRng::seed_from_u64(seed ^ 0x0005_9a3e),
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// Advance the spawn timer; attempt a spawn each time it reaches the interval.
    pub fn update(&mut self, dt: f32, ctx: SpawnContext<'_>, events: &mut Vec<WorldEvent>) {
        self.timer += dt;
        if self.timer < self.config.interval {
            return;
        }
        self.timer = 0.0;

        if let Some((kind, position)) = self.attempt(ctx) {
            if kind.is_boss() {
                info!("Boss {:?} spawning at {:?} on day {}", kind, position, ctx.clock.day());
            } else {
                debug!("Spawning {:?} at {:?}", kind, position);
            }
            events.push(WorldEvent::MobSpawned { kind, position });
        }
    }

    /// One spawn attempt at a random point on the ring around the focus.
    pub fn attempt(&mut self, ctx: SpawnContext<'_>) -> Option<(MobKind, Vec3)> {
        let angle = self.rng.gen_range(0.0..TAU);
        let distance = if self.config.max_distance > self.config.min_distance {
            self.rng.gen_range(self.config.min_distance..self.config.max_distance)
        } else {
            self.config.min_distance
        };
        let x = (ctx.focus.x + angle.cos() * distance).floor() as i32;
        let y = (ctx.focus.y + angle.sin() * distance).floor() as i32;

        let column = WorldPos::new(x, y, 0);
        let chunk = ctx.chunks.get(column.chunk_pos())?;
        let local = column.local_pos()?;
        let ground = chunk.column_height(i32::from(local.x), i32::from(local.y));
        if ground == 0 {
            return None;
        }

        let feet = WorldPos::new(x, y, ground + 1);
        let in_liquid = ctx.chunks.block_at(feet).is_liquid();
        let night = ctx.clock.is_night();
        let position = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, (ground + 1) as f32);

        if night
            && ctx.clock.day() >= self.config.boss_min_day
            && !ctx.census.boss_alive
            && self.rng.gen_bool(self.config.boss_chance)
        {
            return Some((MobKind::Warden, position));
        }

        if ctx.census.hostile >= self.config.max_hostile {
            return None;
        }

        let biome = ctx.biomes.biome_at(x, y);
        let candidates: Vec<MobKind> = SPAWN_TABLE
            .iter()
            .filter(|rule| rule.allows(biome, night, in_liquid))
            .map(|rule| rule.kind)
            .collect();
        candidates.choose(&mut self.rng).map(|&kind| (kind, position))
    }
}
