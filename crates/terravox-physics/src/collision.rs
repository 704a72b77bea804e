//! Axis-separated AABB collision against voxel terrain.

use glam::{IVec3, Vec3};
use terravox_core::coords::WorldPos;
use terravox_core::math::Aabb;
use terravox_core::BlockAccess;
use tracing::debug;

use crate::body::{Body, MotionState};
use crate::config::PhysicsConfig;

/// How far below the feet a body looks for ground.
const GROUND_CHECK_DEPTH: f32 = 0.05;
/// Gap left between a body and a wall or ceiling it runs into.
const CONTACT_EPSILON: f32 = 1e-4;
/// Longest distance moved along one axis before collisions are re-tested.
const MAX_SUBSTEP_TRAVEL: f32 = 0.5;

/// What happened during one [`step`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// Damage from landing after a long fall.
    pub fall_damage: Option<f32>,
    /// The body hit the floor while moving down.
    pub landed: bool,
    /// The body hit a ceiling while moving up.
    pub hit_ceiling: bool,
    /// Horizontal movement was stopped by a wall.
    pub blocked: bool,
    /// The body climbed a ledge.
    pub stepped: bool,
}

/// Cells inside `aabb` that an entity collides with.
fn colliding_cells<W: BlockAccess + ?Sized>(
    world: &W,
    aabb: Aabb,
) -> impl Iterator<Item = IVec3> + '_ {
    let (min, max) = aabb.voxel_range();
    (min.z..max.z)
        .flat_map(move |z| {
            (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| IVec3::new(x, y, z)))
        })
        .filter(move |cell| {
            world.is_collidable(WorldPos::from(*cell)) && aabb.intersects(&Aabb::voxel(*cell))
        })
}

/// Whether `aabb` overlaps any collidable cell. Touching faces do not count.
pub fn aabb_collides<W: BlockAccess + ?Sized>(world: &W, aabb: &Aabb) -> bool {
    colliding_cells(world, *aabb).next().is_some()
}

/// The box used for collision: the body's AABB inset horizontally by the margin.
fn collision_box(body: &Body, position: Vec3, cfg: &PhysicsConfig) -> Aabb {
    let margin = cfg.collision_margin;
    body.aabb_at(position).shrink(Vec3::new(margin, margin, 0.0))
}

fn collides_at<W: BlockAccess + ?Sized>(
    world: &W,
    body: &Body,
    position: Vec3,
    cfg: &PhysicsConfig,
) -> bool {
    aabb_collides(world, &collision_box(body, position, cfg))
}

/// Whether the feet or the middle of the body are in a liquid.
fn touches_liquid<W: BlockAccess + ?Sized>(world: &W, body: &Body) -> bool {
    let feet = body.position + Vec3::new(0.0, 0.0, 0.1);
    world.is_liquid(WorldPos::from(feet)) || world.is_liquid(WorldPos::from(body.center()))
}

/// Integrate one time step: gravity, then movement along x, y and z, each
/// stopped at the first collidable cell.
///
/// `dt` is clamped to `cfg.max_dt`. A body walking into a one-block ledge
/// while grounded (or barely falling) climbs it. Landing after a fall of at
/// least `cfg.fall_damage_min_height` reports damage; liquid resets the fall.
pub fn step<W: BlockAccess + ?Sized>(
    body: &mut Body,
    world: &W,
    dt: f32,
    cfg: &PhysicsConfig,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    let dt = if dt.is_finite() { dt.clamp(0.0, cfg.max_dt) } else { 0.0 };
    if dt <= 0.0 {
        return outcome;
    }

    let in_liquid = touches_liquid(world, body);
    let gravity_scale = if in_liquid { cfg.water_gravity_scale } else { 1.0 };
    body.velocity.z -= cfg.gravity * gravity_scale * dt;
    if in_liquid {
        body.velocity *= (1.0 - cfg.water_drag * dt).max(0.0);
    }
    body.velocity.z = body.velocity.z.max(-cfg.terminal_velocity);

    let travel = (body.velocity * dt).abs().max_element();
    let substeps = ((travel / MAX_SUBSTEP_TRAVEL).ceil() as u32).max(1);
    let sub_dt = dt / substeps as f32;

    for _ in 0..substeps {
        let can_step = body.velocity.z <= 0.0
            && (body.state == MotionState::Grounded || body.fall_distance <= cfg.step_height);
        let delta = body.velocity * sub_dt;
        move_horizontal(body, world, cfg, 0, delta.x, can_step, &mut outcome);
        move_horizontal(body, world, cfg, 1, delta.y, can_step, &mut outcome);
        move_vertical(body, world, cfg, delta.z, &mut outcome);
    }

    let on_ground = aabb_collides(
        world,
        &collision_box(body, body.position - Vec3::new(0.0, 0.0, GROUND_CHECK_DEPTH), cfg),
    );
    let in_liquid = touches_liquid(world, body);
    body.state = MotionState::resolve(on_ground, in_liquid);
    if in_liquid {
        body.fall_distance = 0.0;
    }
    outcome
}

/// Move along x (`axis == 0`) or y (`axis == 1`), climbing a ledge if allowed.
fn move_horizontal<W: BlockAccess + ?Sized>(
    body: &mut Body,
    world: &W,
    cfg: &PhysicsConfig,
    axis: usize,
    amount: f32,
    can_step: bool,
    outcome: &mut StepOutcome,
) {
    if amount == 0.0 {
        return;
    }
    let mut delta = Vec3::ZERO;
    delta[axis] = amount;

    let current = collision_box(body, body.position, cfg);
    let test = current.offset(delta);
    let contact = colliding_cells(world, test)
        .map(|cell| {
            let face = cell.as_vec3()[axis];
            if amount > 0.0 {
                face - current.max[axis]
            } else {
                face + 1.0 - current.min[axis]
            }
        })
        .reduce(|a, b| if amount > 0.0 { a.min(b) } else { a.max(b) });

    let Some(limit) = contact else {
        body.position += delta;
        return;
    };

    let lift = Vec3::new(0.0, 0.0, cfg.step_height);
    if can_step
        && cfg.step_height > 0.0
        && !collides_at(world, body, body.position + lift, cfg)
        && !collides_at(world, body, body.position + lift + delta, cfg)
    {
        body.position += lift + delta;
        body.fall_distance = 0.0;
        outcome.stepped = true;
        return;
    }

    let travel = if amount > 0.0 {
        (limit - CONTACT_EPSILON).clamp(0.0, amount)
    } else {
        (limit + CONTACT_EPSILON).clamp(amount, 0.0)
    };
    body.position[axis] += travel;
    body.velocity[axis] = 0.0;
    outcome.blocked = true;
}

fn move_vertical<W: BlockAccess + ?Sized>(
    body: &mut Body,
    world: &W,
    cfg: &PhysicsConfig,
    amount: f32,
    outcome: &mut StepOutcome,
) {
    if amount == 0.0 {
        return;
    }
    let old_z = body.position.z;
    let test = collision_box(body, body.position, cfg).offset(Vec3::new(0.0, 0.0, amount));

    if amount < 0.0 {
        let floor = colliding_cells(world, test)
            .map(|cell| cell.z as f32 + 1.0)
            .reduce(f32::max);
        match floor {
            Some(top) => {
                body.position.z = top.min(old_z);
                body.velocity.z = 0.0;
                body.fall_distance += old_z - body.position.z;
                outcome.landed = true;
                if let Some(damage) = cfg.fall_damage(body.fall_distance) {
                    debug!(
                        "Landed after falling {:.1} blocks: {:.1} damage",
                        body.fall_distance, damage
                    );
                    outcome.fall_damage = Some(damage);
                }
                body.fall_distance = 0.0;
            }
            None => {
                body.position.z += amount;
                body.fall_distance -= amount;
            }
        }
    } else {
        let ceiling = colliding_cells(world, test)
            .map(|cell| cell.z as f32)
            .reduce(f32::min);
        match ceiling {
            Some(bottom) => {
                body.position.z = (bottom - body.height - CONTACT_EPSILON).max(old_z);
                body.velocity.z = 0.0;
                outcome.hit_ceiling = true;
            }
            None => body.position.z += amount,
        }
        body.fall_distance = 0.0;
    }
}
