//! Physical state of a moving entity.

use glam::Vec3;
use terravox_core::math::Aabb;

/// How a body is currently moving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MotionState {
    Grounded,
    #[default]
    Airborne,
    Swimming,
}

impl MotionState {
    /// Liquid wins over ground contact.
    #[inline]
    pub const fn resolve(on_ground: bool, in_liquid: bool) -> Self {
        if in_liquid {
            Self::Swimming
        } else if on_ground {
            Self::Grounded
        } else {
            Self::Airborne
        }
    }
}

/// An axis-aligned body standing on `position` (bottom centre).
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Extent along x.
    pub width: f32,
    /// Extent along y.
    pub depth: f32,
    /// Extent along z.
    pub height: f32,
    pub state: MotionState,
    /// Blocks fallen since last touching ground or liquid.
    pub fall_distance: f32,
}

impl Body {
    pub fn new(position: Vec3, width: f32, depth: f32, height: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            width,
            depth,
            height,
            state: MotionState::Airborne,
            fall_distance: 0.0,
        }
    }

    /// Bounding box at the current position.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.aabb_at(self.position)
    }

    /// Bounding box if the body stood at `position`.
    #[inline]
    pub fn aabb_at(&self, position: Vec3) -> Aabb {
        Aabb::from_bottom_center(position, self.width, self.depth, self.height)
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.state == MotionState::Grounded
    }

    #[inline]
    pub fn is_swimming(&self) -> bool {
        self.state == MotionState::Swimming
    }

    /// Point halfway up the body.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.position + Vec3::new(0.0, 0.0, self.height * 0.5)
    }

    /// Place the body at rest at `position`.
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.fall_distance = 0.0;
        self.state = MotionState::Airborne;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_liquid() {
        assert_eq!(MotionState::resolve(true, true), MotionState::Swimming);
        assert_eq!(MotionState::resolve(true, false), MotionState::Grounded);
        assert_eq!(MotionState::resolve(false, false), MotionState::Airborne);
    }

    #[test]
    fn aabb_stands_on_position() {
        let body = Body::new(Vec3::new(1.0, 2.0, 3.0), 0.6, 0.6, 1.8);
        let aabb = body.aabb();
        assert_eq!(aabb.min.z, 3.0);
        assert!((aabb.max.z - 4.8).abs() < 1e-6);
        assert!((aabb.min.x - 0.7).abs() < 1e-6);
        assert!((aabb.max.y - 2.3).abs() < 1e-6);
    }

    #[test]
    fn teleport_resets_motion() {
        let mut body = Body::new(Vec3::ZERO, 1.0, 1.0, 1.0);
        body.velocity = Vec3::splat(3.0);
        body.fall_distance = 9.0;
        body.state = MotionState::Grounded;
        body.teleport(Vec3::new(0.0, 0.0, 40.0));
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(body.fall_distance, 0.0);
        assert!(!body.is_grounded());
    }
}
