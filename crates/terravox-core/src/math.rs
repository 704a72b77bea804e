//! Math utilities and helpers.

use glam::{IVec3, Vec3};

/// Ray for raycasting operations.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Get a point along the ray at distance t
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-Aligned Bounding Box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box standing on `bottom_center`: `width` along x, `depth` along y, `height` along z.
    #[inline]
    pub fn from_bottom_center(bottom_center: Vec3, width: f32, depth: f32, height: f32) -> Self {
        let half = Vec3::new(width * 0.5, depth * 0.5, 0.0);
        Self {
            min: bottom_center - half,
            max: bottom_center + half + Vec3::new(0.0, 0.0, height),
        }
    }

    /// Create an AABB for a unit cube at the given voxel
    #[inline]
    pub fn voxel(cell: IVec3) -> Self {
        let min = cell.as_vec3();
        Self {
            min,
            max: min + Vec3::ONE,
        }
    }

    /// Translate by `delta`
    #[inline]
    #[must_use]
    pub fn offset(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Shrink each side inward by the per-axis margin.
    #[inline]
    #[must_use]
    pub fn shrink(&self, margin: Vec3) -> Self {
        Self {
            min: self.min + margin,
            max: self.max - margin,
        }
    }

    /// Strict overlap test: touching faces do not count.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Integer range of voxels this box overlaps, as inclusive min and exclusive max.
    #[inline]
    pub fn voxel_range(&self) -> (IVec3, IVec3) {
        (self.min.floor().as_ivec3(), self.max.ceil().as_ivec3())
    }
}
