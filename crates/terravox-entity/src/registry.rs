//! hecs-backed storage and behaviour for mobs.

use glam::{Vec2, Vec3};
use hecs::{Entity, World};
use terravox_core::mob::{MobCensus, MobKind};
use terravox_core::BlockAccess;
use terravox_physics::{step, Body, PhysicsConfig};
use tracing::{debug, trace};

use crate::health::Health;
use crate::mob::{AttackCooldown, Mob, MobStats};
use crate::player::WORLD_BOTTOM_THRESHOLD;

/// Mobs notice the player within this horizontal distance.
pub const AGGRO_RANGE: f32 = 16.0;
/// Horizontal distance at which a mob hits the player.
pub const ATTACK_REACH: f32 = 1.5;
/// Seconds between hits from one mob.
pub const ATTACK_INTERVAL: f32 = 1.0;
/// Mobs further than this from the player are removed.
pub const DESPAWN_DISTANCE: f32 = 128.0;
const MOB_JUMP_VELOCITY: f32 = 8.0;
const MOB_SWIM_SPEED: f32 = 2.0;

/// Result of one registry update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MobUpdate {
    /// Total damage dealt to the player this tick.
    pub player_damage: f32,
    /// Mobs removed for dying, leaving the world or straying too far.
    pub removed: usize,
}

/// Owns every mob in an ECS world.
#[derive(Default)]
pub struct EntityRegistry {
    world: World,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a mob standing at `position` with full health.
    pub fn spawn_mob(&mut self, kind: MobKind, position: Vec3) -> Entity {
        let stats = MobStats::of(kind);
        let entity = self.world.spawn((
            Mob { kind },
            Body::new(position, stats.width, stats.width, stats.height),
            Health::new(stats.health),
            AttackCooldown::default(),
        ));
        debug!("Spawned {:?} at {:?}", kind, position);
        entity
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn kind(&self, entity: Entity) -> Option<MobKind> {
        self.world.get::<&Mob>(entity).ok().map(|mob| mob.kind)
    }

    pub fn body(&self, entity: Entity) -> Option<Body> {
        self.world.get::<&Body>(entity).ok().map(|body| (*body).clone())
    }

    pub fn health(&self, entity: Entity) -> Option<Health> {
        self.world.get::<&Health>(entity).ok().map(|health| *health)
    }

    /// Damage a mob. Returns true if the hit killed it.
    pub fn damage_mob(&mut self, entity: Entity, amount: f32) -> bool {
        match self.world.query_one_mut::<&mut Health>(entity) {
            Ok(health) => {
                health.take_damage(amount);
                health.is_dead()
            }
            Err(_) => false,
        }
    }

    /// Counts read by the spawner.
    pub fn census(&self) -> MobCensus {
        let mut census = MobCensus::default();
        // Every mob kind attacks the player.
        for (_, mob) in self.world.query::<&Mob>().iter() {
            census.hostile += 1;
            census.boss_alive |= mob.kind.is_boss();
        }
        census
    }

    /// Every mob's kind and position.
    pub fn mobs(&self) -> Vec<(Entity, MobKind, Vec3)> {
        self.world
            .query::<(&Mob, &Body)>()
            .iter()
            .map(|(entity, (mob, body))| (entity, mob.kind, body.position))
            .collect()
    }

    /// Chase the player, integrate physics, attack in reach and remove the
    /// dead or lost.
    pub fn update<W: BlockAccess + ?Sized>(
        &mut self,
        dt: f32,
        world: &W,
        player_pos: Vec3,
        cfg: &PhysicsConfig,
    ) -> MobUpdate {
        let mut update = MobUpdate::default();
        let mut doomed = Vec::new();

        for (entity, (mob, body, health, cooldown)) in self
            .world
            .query_mut::<(&Mob, &mut Body, &mut Health, &mut AttackCooldown)>()
        {
            let stats = MobStats::of(mob.kind);
            let to_player = (player_pos - body.position).truncate();
            let distance = to_player.length();

            chase(body, &stats, player_pos, to_player, distance);
            let outcome = step(body, world, dt, cfg);
            if let Some(damage) = outcome.fall_damage {
                health.take_damage(damage);
            }
            if outcome.blocked && body.is_grounded() {
                body.velocity.z = MOB_JUMP_VELOCITY;
            }

            cooldown.0 = (cooldown.0 - dt.max(0.0)).max(0.0);
            let reach = (player_pos - body.position).truncate().length();
            if cooldown.0 <= 0.0
                && reach <= ATTACK_REACH
                && (player_pos.z - body.position.z).abs() < 2.0
            {
                update.player_damage += stats.attack;
                cooldown.0 = ATTACK_INTERVAL;
            }

            let lost = !body.position.is_finite()
                || body.position.z < WORLD_BOTTOM_THRESHOLD
                || distance > DESPAWN_DISTANCE;
            if health.is_dead() || lost {
                doomed.push(entity);
            }
        }

        for entity in doomed {
            if self.world.despawn(entity).is_ok() {
                update.removed += 1;
            }
        }
        if update.removed > 0 {
            trace!("Removed {} mobs, {} remain", update.removed, self.len());
        }
        update
    }
}

/// Steer toward the player when within aggro range, idle otherwise.
fn chase(body: &mut Body, stats: &MobStats, player_pos: Vec3, to_player: Vec2, distance: f32) {
    let horizontal = if distance <= AGGRO_RANGE && distance > 0.5 {
        to_player / distance * stats.speed
    } else {
        Vec2::ZERO
    };
    body.velocity.x = horizontal.x;
    body.velocity.y = horizontal.y;
    if body.is_swimming() && player_pos.z > body.position.z {
        body.velocity.z = MOB_SWIM_SPEED;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use terravox_core::coords::WorldPos;
    use terravox_core::types::BlockId;
    use terravox_physics::BlockGrid;

    fn stone_floor() -> BlockGrid {
        let mut grid = BlockGrid::new();
        grid.fill(WorldPos::new(-16, -16, 9), WorldPos::new(16, 16, 9), BlockId::STONE);
        grid
    }

    fn run(
        registry: &mut EntityRegistry,
        grid: &BlockGrid,
        player: Vec3,
        ticks: usize,
    ) -> MobUpdate {
        let cfg = PhysicsConfig::default();
        let mut total = MobUpdate::default();
        for _ in 0..ticks {
            let update = registry.update(0.05, grid, player, &cfg);
            total.player_damage += update.player_damage;
            total.removed += update.removed;
        }
        total
    }

    #[test]
    fn census_counts_hostiles_and_boss() {
        let mut registry = EntityRegistry::new();
        assert_eq!(registry.census(), MobCensus::default());
        registry.spawn_mob(MobKind::Zombie, Vec3::ZERO);
        registry.spawn_mob(MobKind::Spider, Vec3::ONE);
        assert!(!registry.census().boss_alive);

        let boss = registry.spawn_mob(MobKind::Warden, Vec3::ZERO);
        let census = registry.census();
        assert_eq!(census.hostile, 3);
        assert!(census.boss_alive);
        assert_eq!(registry.kind(boss), Some(MobKind::Warden));
        assert_eq!(registry.mobs().len(), 3);
    }

    #[test]
    fn mobs_chase_the_player() {
        let grid = stone_floor();
        let mut registry = EntityRegistry::new();
        let zombie = registry.spawn_mob(MobKind::Zombie, Vec3::new(8.5, 0.5, 10.0));
        let idle = registry.spawn_mob(MobKind::Skeleton, Vec3::new(0.5, -40.5, 10.0));
        let mut far_floor = grid.clone();
        far_floor.fill(WorldPos::new(-2, -42, 9), WorldPos::new(2, -38, 9), BlockId::STONE);

        run(&mut registry, &far_floor, Vec3::new(0.5, 0.5, 10.0), 20);

        let chased = registry.body(zombie).unwrap();
        assert!(chased.position.x < 8.0, "zombie at {:?}", chased.position);
        let rested = registry.body(idle).unwrap();
        assert_relative_eq!(rested.position.y, -40.5, epsilon = 1e-4);
    }

    #[test]
    fn attacks_respect_cooldown() {
        let grid = stone_floor();
        let mut registry = EntityRegistry::new();
        registry.spawn_mob(MobKind::Zombie, Vec3::new(1.5, 0.5, 10.0));
        let player = Vec3::new(0.5, 0.5, 10.0);
        let cfg = PhysicsConfig::default();

        let first = registry.update(0.05, &grid, player, &cfg);
        assert_relative_eq!(first.player_damage, MobStats::of(MobKind::Zombie).attack);
        let second = registry.update(0.05, &grid, player, &cfg);
        assert_eq!(second.player_damage, 0.0);

        let over_a_second = run(&mut registry, &grid, player, 21);
        assert!(over_a_second.player_damage > 0.0);
    }

    #[test]
    fn dead_and_lost_mobs_are_removed() {
        let grid = stone_floor();
        let mut registry = EntityRegistry::new();
        let victim = registry.spawn_mob(MobKind::Slime, Vec3::new(5.5, 5.5, 10.0));
        registry.spawn_mob(MobKind::Zombie, Vec3::new(40.5, 40.5, 5.0));
        assert!(!registry.damage_mob(victim, 3.0));
        assert!(registry.damage_mob(victim, 10.0));

        let update = run(&mut registry, &grid, Vec3::new(0.5, 0.5, 10.0), 60);
        assert_eq!(update.removed, 2);
        assert!(registry.is_empty());
        assert!(!registry.contains(victim));
        assert!(!registry.damage_mob(victim, 1.0));
        assert_eq!(registry.health(victim), None);
    }
}
