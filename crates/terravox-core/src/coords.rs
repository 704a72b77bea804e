//! Coordinate systems for the voxel world.
//!
//! `x` and `y` are horizontal, `z` is vertical. Chunks are full-height columns,
//! so a chunk is addressed by its horizontal position only.

use crate::constants::{CHUNK_BITS, CHUNK_SIZE, WORLD_HEIGHT};
use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Position within a chunk (`x`, `y` in `0..CHUNK_SIZE`, `z` in `0..WORLD_HEIGHT`).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct LocalPos {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub _pad: u8,
}

impl LocalPos {
    /// Create a new local position
    #[inline]
    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        debug_assert!((x as usize) < CHUNK_SIZE);
        debug_assert!((y as usize) < CHUNK_SIZE);
        debug_assert!((z as usize) < WORLD_HEIGHT);
        Self { x, y, z, _pad: 0 }
    }

    /// Checked constructor from signed coordinates.
    ///
    /// Returns `None` if any component falls outside the chunk.
    #[inline]
    pub fn try_new(x: i32, y: i32, z: i32) -> Option<Self> {
        let in_range = (0..CHUNK_SIZE as i32).contains(&x)
            && (0..CHUNK_SIZE as i32).contains(&y)
            && (0..WORLD_HEIGHT as i32).contains(&z);
        in_range.then(|| Self::new(x as u8, y as u8, z as u8))
    }

    /// Convert to linear index for flat array storage
    #[inline]
    pub const fn to_index(self) -> usize {
        self.x as usize
            + (self.y as usize) * CHUNK_SIZE
            + (self.z as usize) * CHUNK_SIZE * CHUNK_SIZE
    }

    /// Create from linear index
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        let x = (index % CHUNK_SIZE) as u8;
        let y = ((index / CHUNK_SIZE) % CHUNK_SIZE) as u8;
        let z = (index / (CHUNK_SIZE * CHUNK_SIZE)) as u8;
        Self { x, y, z, _pad: 0 }
    }
}

/// Chunk column position in chunk coordinates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
}

impl ChunkPos {
    /// Create a new chunk position
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing the given horizontal world coordinates.
    #[inline]
    pub const fn from_world_xy(x: i32, y: i32) -> Self {
        Self::new(x >> CHUNK_BITS, y >> CHUNK_BITS)
    }

    /// Chunk containing a continuous position (entity or camera).
    #[inline]
    pub fn from_vec3(pos: Vec3) -> Self {
        Self::from_world_xy(pos.x.floor() as i32, pos.y.floor() as i32)
    }

    /// World position of the chunk's bottom corner (minimum x/y, z = 0).
    #[inline]
    pub const fn to_world_pos(self) -> WorldPos {
        WorldPos::new(self.x << CHUNK_BITS, self.y << CHUNK_BITS, 0)
    }

    /// Grid (Chebyshev) distance in chunks.
    #[inline]
    pub const fn chebyshev_distance(self, other: Self) -> i32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        if dx > dy {
            dx
        } else {
            dy
        }
    }

    /// Squared euclidean distance in chunks, used to order loads.
    #[inline]
    pub const fn distance_sq(self, other: Self) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// World position in voxel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPos {
    /// Create a new world position
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Get the chunk containing this position
    #[inline]
    pub const fn chunk_pos(self) -> ChunkPos {
        ChunkPos::from_world_xy(self.x, self.y)
    }

    /// Whether `z` lies inside the world's vertical extent.
    #[inline]
    pub const fn in_vertical_bounds(self) -> bool {
        self.z >= 0 && self.z < WORLD_HEIGHT as i32
    }

    /// Get the local position within the chunk, or `None` above/below the world.
    #[inline]
    pub const fn local_pos(self) -> Option<LocalPos> {
        if !self.in_vertical_bounds() {
            return None;
        }
        let mask = (CHUNK_SIZE - 1) as i32;
        Some(LocalPos::new(
            (self.x & mask) as u8,
            (self.y & mask) as u8,
            self.z as u8,
        ))
    }

    /// Split into chunk and local position
    #[inline]
    pub const fn split(self) -> Option<(ChunkPos, LocalPos)> {
        match self.local_pos() {
            Some(local) => Some((self.chunk_pos(), local)),
            None => None,
        }
    }

    /// Create from chunk and local position
    #[inline]
    pub const fn from_chunk_local(chunk: ChunkPos, local: LocalPos) -> Self {
        Self::new(
            (chunk.x << CHUNK_BITS) + local.x as i32,
            (chunk.y << CHUNK_BITS) + local.y as i32,
            local.z as i32,
        )
    }

    /// Offset by a delta
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The cell directly below
    #[inline]
    pub const fn below(self) -> Self {
        self.offset(0, 0, -1)
    }

    /// The cell directly above
    #[inline]
    pub const fn above(self) -> Self {
        self.offset(0, 0, 1)
    }

    /// The four horizontal neighbours (west, east, south, north)
    pub const fn cardinal_neighbors(self) -> [WorldPos; 4] {
        [
            self.offset(-1, 0, 0),
            self.offset(1, 0, 0),
            self.offset(0, -1, 0),
            self.offset(0, 1, 0),
        ]
    }

    /// All six face neighbours
    pub const fn face_neighbors(self) -> [WorldPos; 6] {
        [
            self.offset(-1, 0, 0),
            self.offset(1, 0, 0),
            self.offset(0, -1, 0),
            self.offset(0, 1, 0),
            self.offset(0, 0, -1),
            self.offset(0, 0, 1),
        ]
    }
}

impl From<Vec3> for WorldPos {
    fn from(v: Vec3) -> Self {
        Self::new(v.x.floor() as i32, v.y.floor() as i32, v.z.floor() as i32)
    }
}

impl From<IVec3> for WorldPos {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
