//! Voxel ray traversal.

use glam::{IVec3, Vec3};
use terravox_core::coords::WorldPos;
use terravox_core::math::Ray;
use terravox_core::types::BlockId;
use terravox_core::BlockAccess;

/// Result of a raycast against voxels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Point where the ray entered the block.
    pub position: Vec3,
    /// Face normal of the entered face; zero when the ray starts inside the block.
    pub normal: IVec3,
    pub distance: f32,
    pub block_position: WorldPos,
    pub block: BlockId,
}

impl RaycastHit {
    /// Cell adjacent to the hit face, where a placed block would go.
    pub fn place_position(&self) -> WorldPos {
        self.block_position.offset(self.normal.x, self.normal.y, self.normal.z)
    }
}

/// Walk the cells along `ray` (Amanatides & Woo) and return the first
/// non-air, non-liquid block within `max_distance`.
///
/// Rays with a non-finite origin or direction hit nothing.
pub fn raycast<W: BlockAccess + ?Sized>(
    world: &W,
    ray: &Ray,
    max_distance: f32,
) -> Option<RaycastHit> {
    let dir = ray.direction;
    if !ray.origin.is_finite()
        || !dir.is_finite()
        || dir == Vec3::ZERO
        || !max_distance.is_finite()
        || max_distance < 0.0
    {
        return None;
    }

    let mut cell = ray.origin.floor().as_ivec3();
    let mut step = IVec3::ZERO;
    let mut t_max = Vec3::splat(f32::INFINITY);
    let mut t_delta = Vec3::splat(f32::INFINITY);
    for axis in 0..3 {
        let d = dir[axis];
        if d > 0.0 {
            step[axis] = 1;
            t_delta[axis] = 1.0 / d;
            t_max[axis] = (cell[axis] as f32 + 1.0 - ray.origin[axis]) / d;
        } else if d < 0.0 {
            step[axis] = -1;
            t_delta[axis] = -1.0 / d;
            t_max[axis] = (ray.origin[axis] - cell[axis] as f32) / -d;
        }
    }

    // A unit ray crosses at most three cell faces per unit of travel.
    let max_cells = (max_distance.ceil() as usize + 1) * 3;
    let mut normal = IVec3::ZERO;
    let mut distance = 0.0;
    for _ in 0..=max_cells {
        let block_position = WorldPos::from(cell);
        let block = world.block_at(block_position);
        if !block.is_air() && !block.is_liquid() {
            return Some(RaycastHit {
                position: ray.at(distance),
                normal,
                distance,
                block_position,
                block,
            });
        }

        let axis = if t_max.x < t_max.y {
            if t_max.x < t_max.z { 0 } else { 2 }
        } else if t_max.y < t_max.z {
            1
        } else {
            2
        };
        distance = t_max[axis];
        if distance > max_distance {
            return None;
        }
        cell[axis] = cell[axis].saturating_add(step[axis]);
        t_max[axis] += t_delta[axis];
        normal = IVec3::ZERO;
        normal[axis] = -step[axis];
    }
    None
}
