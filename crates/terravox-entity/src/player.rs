//! The player-controlled body.

use glam::{IVec3, Vec2, Vec3};
use terravox_core::coords::WorldPos;
use terravox_core::math::{Aabb, Ray};
use terravox_core::types::BlockId;
use terravox_core::{BlockAccess, BlockEdit, Result};
use terravox_physics::{raycast, step, Body, PhysicsConfig, RaycastHit, StepOutcome};
use tracing::{debug, info, warn};

use crate::health::Health;
use crate::inventory::Inventory;

pub const PLAYER_WIDTH: f32 = 0.6;
pub const PLAYER_HEIGHT: f32 = 1.8;
pub const PLAYER_MAX_HEALTH: f32 = 20.0;
/// Horizontal speed in blocks/s at full input.
pub const WALK_SPEED: f32 = 4.3;
pub const JUMP_VELOCITY: f32 = 8.0;
/// Upward speed while holding jump in water.
pub const SWIM_UP_SPEED: f32 = 3.0;
/// Falling below this height returns the player to spawn.
pub const WORLD_BOTTOM_THRESHOLD: f32 = -10.0;
/// Eye height above the feet.
pub const EYE_HEIGHT: f32 = 1.62;
/// Furthest block the player can mine or place against.
pub const REACH: f32 = 5.0;

/// Input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    /// Desired horizontal direction; longer than 1 is clamped.
    pub movement: Vec2,
    pub jump: bool,
    /// View direction used for mining and placing.
    pub look: Vec3,
    /// Keep breaking the block under `look`.
    pub mine: bool,
    /// Place one of these from the inventory against the face under `look`.
    pub place: Option<BlockId>,
}

/// The block being broken and the time spent on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningProgress {
    pub target: WorldPos,
    pub elapsed: f32,
    /// Seconds needed: the block's hardness.
    pub required: f32,
}

/// What one tick of mining did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum MineOutcome {
    /// Nothing breakable within reach.
    #[default]
    Idle,
    /// Still breaking; fraction done.
    Progress(f32),
    /// The block is gone. `drop` is set when it went into the inventory.
    Broken {
        pos: WorldPos,
        block: BlockId,
        drop: Option<BlockId>,
    },
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub health: Health,
    pub inventory: Inventory,
    pub mining: Option<MiningProgress>,
    pub spawn_point: Vec3,
    pub is_dead: bool,
}

impl Player {
    pub fn new(spawn_point: Vec3) -> Self {
        Self {
            body: Body::new(spawn_point, PLAYER_WIDTH, PLAYER_WIDTH, PLAYER_HEIGHT),
            health: Health::new(PLAYER_MAX_HEALTH),
            inventory: Inventory::new(),
            mining: None,
            spawn_point,
            is_dead: false,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    #[inline]
    pub fn eye_position(&self) -> Vec3 {
        self.body.position + Vec3::new(0.0, 0.0, EYE_HEIGHT)
    }

    /// First solid block along `look` within reach.
    pub fn target<W: BlockAccess + ?Sized>(&self, world: &W, look: Vec3) -> Option<RaycastHit> {
        raycast(world, &Ray::new(self.eye_position(), look), REACH)
    }

    /// Spend `dt` seconds breaking the block under `look`.
    ///
    /// A block takes its hardness in seconds; negative hardness never breaks.
    /// Progress restarts whenever the target changes. The block's drop goes
    /// into the inventory if there is room.
    pub fn mine<W: BlockEdit + ?Sized>(
        &mut self,
        world: &mut W,
        look: Vec3,
        dt: f32,
    ) -> Result<MineOutcome> {
        let target = if self.is_dead {
            None
        } else {
            self.target(world, look)
        };
        let Some((hit, data)) = target.and_then(|hit| hit.block.data().map(|data| (hit, data)))
        else {
            self.mining = None;
            return Ok(MineOutcome::Idle);
        };
        if data.hardness < 0.0 {
            self.mining = None;
            return Ok(MineOutcome::Idle);
        }

        let progress = match self.mining {
            Some(progress) if progress.target == hit.block_position => progress,
            _ => {
                debug!(
                    "Started mining {} at {:?} ({:.2}s)",
                    data.name, hit.block_position, data.hardness
                );
                MiningProgress {
                    target: hit.block_position,
                    elapsed: 0.0,
                    required: data.hardness,
                }
            }
        };
        let progress = self.mining.insert(progress);
        if dt.is_finite() && dt > 0.0 {
            progress.elapsed += dt;
        }
        if progress.elapsed < progress.required {
            return Ok(MineOutcome::Progress(progress.elapsed / progress.required));
        }

        self.mining = None;
        world.try_set_block(hit.block_position, BlockId::AIR)?;
        let drop = data.drops.filter(|&drop| self.inventory.add(drop));
        debug!("Mined {} at {:?}", data.name, hit.block_position);
        Ok(MineOutcome::Broken {
            pos: hit.block_position,
            block: hit.block,
            drop,
        })
    }

    /// Place one `block` from the inventory against the face under `look`.
    ///
    /// Returns the filled cell, or `None` when nothing is in reach, the block
    /// is not held, the cell is occupied, or a collidable block would overlap
    /// the player.
    pub fn place<W: BlockEdit + ?Sized>(
        &mut self,
        world: &mut W,
        look: Vec3,
        block: BlockId,
    ) -> Result<Option<WorldPos>> {
        if self.is_dead || block.is_air() || self.inventory.count(block) == 0 {
            return Ok(None);
        }
        let Some(hit) = self.target(world, look) else {
            return Ok(None);
        };
        let pos = hit.place_position();
        let current = world.block_at(pos);
        if !(current.is_air() || current.is_liquid()) {
            return Ok(None);
        }
        if block.is_collidable()
            && Aabb::voxel(IVec3::new(pos.x, pos.y, pos.z)).intersects(&self.body.aabb())
        {
            return Ok(None);
        }

        world.try_set_block(pos, block)?;
        self.inventory.take(block);
        Ok(Some(pos))
    }

    /// Apply `intent`, integrate physics and take any fall damage.
    pub fn update<W: BlockAccess + ?Sized>(
        &mut self,
        dt: f32,
        world: &W,
        intent: PlayerIntent,
        cfg: &PhysicsConfig,
    ) -> StepOutcome {
        if self.is_dead {
            return StepOutcome::default();
        }
        if !self.body.position.is_finite() || !self.body.velocity.is_finite() {
            warn!("Player state became non-finite, returning to spawn");
            self.body.teleport(self.spawn_point);
            return StepOutcome::default();
        }

        let movement = if intent.movement.is_finite() {
            intent.movement.clamp_length_max(1.0) * WALK_SPEED
        } else {
            Vec2::ZERO
        };
        self.body.velocity.x = movement.x;
        self.body.velocity.y = movement.y;
        if intent.jump {
            if self.body.is_grounded() {
                self.body.velocity.z = JUMP_VELOCITY;
            } else if self.body.is_swimming() {
                self.body.velocity.z = SWIM_UP_SPEED;
            }
        }

        let outcome = step(&mut self.body, world, dt, cfg);
        if let Some(damage) = outcome.fall_damage {
            self.take_damage(damage);
        }
        if self.body.position.z < WORLD_BOTTOM_THRESHOLD {
            warn!(
                "Player fell out of the world at {:?}, returning to spawn",
                self.body.position
            );
            self.body.teleport(self.spawn_point);
        }
        outcome
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health.take_damage(amount);
        if self.health.is_dead() && !self.is_dead {
            info!("Player died at {:?}", self.body.position);
            self.is_dead = true;
        }
    }

    /// Back to full health at the spawn point.
    pub fn respawn(&mut self) {
        self.health.reset();
        self.is_dead = false;
        self.body.teleport(self.spawn_point);
    }

}
