//! World and entities stepped together in a fixed order.

use glam::Vec2;
use terravox_core::coords::WorldPos;
use terravox_entity::{EntityRegistry, MineOutcome, MobUpdate, Player, PlayerIntent};
use terravox_physics::{PhysicsConfig, StepOutcome};
use terravox_world::{TickContext, World, WorldConfig, WorldEvent, WorldUpdate};
use tracing::{debug, info, warn};

/// Radians per tick the autopilot turns while wandering.
const WANDER_TURN_RATE: f32 = 0.004;
/// How far below the horizon the autopilot looks.
const WANDER_LOOK_DOWN: f32 = 0.3;

/// Running totals over the life of a game.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GameStats {
    pub ticks: u64,
    pub chunks_generated: usize,
    pub chunks_evicted: usize,
    pub blocks_fallen: usize,
    pub blocks_burned: usize,
    pub blocks_mined: usize,
    pub blocks_placed: usize,
    pub mobs_spawned: usize,
    pub mobs_removed: usize,
    pub player_deaths: usize,
}

/// What one [`Game::tick`] did.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub world: WorldUpdate,
    pub player: StepOutcome,
    pub mining: MineOutcome,
    pub placed: Option<WorldPos>,
    pub mobs: MobUpdate,
}

/// Owns the world, the player and every mob.
pub struct Game {
    world: World,
    mobs: EntityRegistry,
    player: Player,
    physics: PhysicsConfig,
    stats: GameStats,
    heading: f32,
}

impl Game {
    pub fn new(config: WorldConfig, physics: PhysicsConfig) -> anyhow::Result<Self> {
        let mut world = World::new(config)?;
        let spawn = world.spawn_point();
        info!("Player spawns at {:?}", spawn);
        Ok(Self {
            world,
            mobs: EntityRegistry::new(),
            player: Player::new(spawn),
            physics,
            stats: GameStats::default(),
            heading: 0.0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn mobs(&self) -> &EntityRegistry {
        &self.mobs
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Input that walks the player in a slow circle, jumping and digging
    /// ahead when blocked.
    pub fn wander_intent(&mut self, last: &StepOutcome) -> PlayerIntent {
        self.heading += WANDER_TURN_RATE;
        let forward = Vec2::from_angle(self.heading);
        PlayerIntent {
            movement: forward,
            jump: last.blocked,
            look: forward.extend(-WANDER_LOOK_DOWN),
            mine: last.blocked,
            place: None,
        }
    }

    /// One tick: world, then spawned mobs, then the player and its block
    /// actions, then mobs.
    pub fn tick(&mut self, dt: f32, intent: PlayerIntent) -> TickReport {
        let ctx = TickContext {
            focus: self.player.position(),
            census: self.mobs.census(),
        };
        let world = self.world.update(dt, &ctx);
        self.stats.chunks_generated += world.streaming.generated.len();
        self.stats.chunks_evicted += world.streaming.evicted.len();
        self.stats.blocks_fallen += world.physics.fallen;

        let events = self.world.drain_events();
        self.apply_events(events);

        let player = self.player.update(dt, &self.world, intent, &self.physics);
        let (mining, placed) = self.block_actions(dt, &intent);
        let mobs = self
            .mobs
            .update(dt, &self.world, self.player.position(), &self.physics);
        self.stats.mobs_removed += mobs.removed;
        if mobs.player_damage > 0.0 {
            self.player.take_damage(mobs.player_damage);
        }

        if self.player.is_dead {
            self.stats.player_deaths += 1;
            info!(
                "Player died on day {}, respawning",
                self.world.clock().day()
            );
            self.player.respawn();
        }

        self.stats.ticks += 1;
        TickReport {
            world,
            player,
            mining,
            placed,
            mobs,
        }
    }

    /// Mine and place for the player. Failed edits are logged and skipped.
    fn block_actions(
        &mut self,
        dt: f32,
        intent: &PlayerIntent,
    ) -> (MineOutcome, Option<WorldPos>) {
        let mining = if intent.mine {
            self.player
                .mine(&mut self.world, intent.look, dt)
                .unwrap_or_else(|err| {
                    warn!("Mining failed: {err}");
                    MineOutcome::Idle
                })
        } else {
            self.player.mining = None;
            MineOutcome::Idle
        };
        if matches!(mining, MineOutcome::Broken { .. }) {
            self.stats.blocks_mined += 1;
        }

        let placed = intent.place.and_then(|block| {
            self.player
                .place(&mut self.world, intent.look, block)
                .unwrap_or_else(|err| {
                    warn!("Placing {block:?} failed: {err}");
                    None
                })
        });
        if placed.is_some() {
            self.stats.blocks_placed += 1;
        }
        (mining, placed)
    }

    pub(crate) fn apply_events(&mut self, events: Vec<WorldEvent>) {
        for event in events {
            match event {
                WorldEvent::MobSpawned { kind, position } => {
                    self.mobs.spawn_mob(kind, position);
                    self.stats.mobs_spawned += 1;
                }
                WorldEvent::BlockBurned { pos, block } => {
                    debug!("{:?} burned at {:?}", block, pos);
                    self.stats.blocks_burned += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use terravox_core::mob::MobKind;
    use terravox_core::types::BlockId;
    use terravox_entity::WORLD_BOTTOM_THRESHOLD;

    fn game(seed: u64) -> Game {
        Game::new(WorldConfig::default().with_seed(seed), PhysicsConfig::default()).unwrap()
    }

    #[test]
    fn idle_player_settles_on_terrain() {
        let mut game = game(42);
        for _ in 0..100 {
            game.tick(0.05, PlayerIntent::default());
        }
        let pos = game.player().position();
        assert!(pos.is_finite());
        assert!(pos.z >= WORLD_BOTTOM_THRESHOLD);
        assert!(game.stats().chunks_generated > 0);
        assert!(game.world().chunks().len() > 0);
        assert_eq!(game.stats().ticks, 100);
    }

    #[test]
    fn wandering_stays_in_loaded_terrain() {
        let mut game = game(7);
        let mut last = StepOutcome::default();
        for _ in 0..400 {
            let intent = game.wander_intent(&last);
            last = game.tick(0.05, intent).player;
            assert!(game.player().position().is_finite());
        }
        let pos = game.player().position();
        assert!(game.world().is_loaded(terravox_core::ChunkPos::from_vec3(pos)));
    }

    #[test]
    fn spawn_events_become_mobs() {
        let mut game = game(3);
        let near = game.player().position() + Vec3::new(30.0, 0.0, 0.0);
        game.apply_events(vec![
            WorldEvent::MobSpawned {
                kind: MobKind::Zombie,
                position: near,
            },
            WorldEvent::MobSpawned {
                kind: MobKind::Warden,
                position: near,
            },
        ]);
        assert_eq!(game.mobs().len(), 2);
        assert_eq!(game.stats().mobs_spawned, 2);
        let census = game.mobs().census();
        assert_eq!(census.hostile, 2);
        assert!(census.boss_alive);
    }

    #[test]
    fn player_places_then_mines() {
        let mut game = game(1234);
        let world = game.world_mut();
        for x in 6..=11 {
            for y in 6..=11 {
                world.set_block(x, y, 40, BlockId::STONE);
                for z in 41..63 {
                    world.set_block(x, y, z, BlockId::AIR);
                }
            }
        }
        let player = game.player_mut();
        player.body.teleport(Vec3::new(8.5, 8.5, 41.0));
        player.inventory.add(BlockId::DIRT);

        let place = PlayerIntent {
            look: Vec3::new(1.0, 0.0, -1.0),
            place: Some(BlockId::DIRT),
            ..Default::default()
        };
        let report = game.tick(0.05, place);
        assert_eq!(report.placed, Some(WorldPos::new(10, 8, 41)));
        assert_eq!(game.world().get_block(10, 8, 41), BlockId::DIRT);
        assert_eq!(game.player().inventory.count(BlockId::DIRT), 0);
        assert_eq!(game.stats().blocks_placed, 1);

        let dig = PlayerIntent {
            look: Vec3::NEG_Z,
            mine: true,
            ..Default::default()
        };
        let mut broken = None;
        for _ in 0..60 {
            if let MineOutcome::Broken { pos, block, .. } = game.tick(0.05, dig).mining {
                broken = Some((pos, block));
                break;
            }
        }
        assert_eq!(broken, Some((WorldPos::new(8, 8, 40), BlockId::STONE)));
        assert_eq!(game.world().get_block(8, 8, 40), BlockId::AIR);
        assert_eq!(game.player().inventory.count(BlockId::COBBLESTONE), 1);
        assert_eq!(game.stats().blocks_mined, 1);
    }

    #[test]
    fn end_to_end_scenario() {
        let mut game = game(1234);

        let biome = game.world().get_biome_at(100, 100);
        assert_eq!(game.world().get_biome_at(100, 100), biome);

        game.world_mut().set_block(5, 5, 10, BlockId::AIR);
        assert_eq!(game.world().get_block(5, 5, 10), BlockId::AIR);

        // A stone ledge at z = 40 with open air above, then a 20-block drop onto it.
        let world = game.world_mut();
        world.set_block(8, 8, 40, BlockId::STONE);
        for z in 41..63 {
            world.set_block(8, 8, z, BlockId::AIR);
        }
        game.player_mut().body.teleport(Vec3::new(8.5, 8.5, 61.0));

        let mut damage = None;
        for _ in 0..40 {
            if let Some(d) = game.tick(0.05, PlayerIntent::default()).player.fall_damage {
                damage = Some(d);
            }
        }
        let damage = damage.unwrap();
        assert!(damage > 0.0);
        assert_relative_eq!(damage, (20.0 - 4.0 + 1.0) * 1.0, epsilon = 0.01);
        assert_relative_eq!(game.player().health.current, 20.0 - damage, epsilon = 0.01);
    }
}
