//! Core types, math, and traits for the Terravox voxel sandbox.
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Block ids and the static block table
//! - Coordinate systems (world, chunk, local)
//! - Axis-aligned bounding boxes
//! - Mob kinds shared by spawning and the entity registry
//! - The [`BlockAccess`] and [`BlockEdit`] traits and the common error type

pub mod access;
pub mod coords;
pub mod error;
pub mod math;
pub mod mob;
pub mod types;

pub use access::{BlockAccess, BlockEdit};
pub use coords::{ChunkPos, LocalPos, WorldPos};
pub use error::{Error, Result};
pub use math::Aabb;
pub use mob::{MobCensus, MobKind};
pub use types::{block_data, BlockData, BlockFlags, BlockId};

/// World-wide constants
pub mod constants {
    /// Size of a chunk in voxels along each horizontal axis
    pub const CHUNK_SIZE: usize = 16;
    /// Bits needed to represent a horizontal position within a chunk (4 bits for 0-15)
    pub const CHUNK_BITS: u32 = 4;
    /// Number of voxels in a column, bottom (bedrock) to ceiling
    pub const WORLD_HEIGHT: usize = 64;
    /// Total voxels in a chunk (16 * 16 * 64)
    pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * WORLD_HEIGHT;
    /// Water fills open columns up to and including this z
    pub const SEA_LEVEL: i32 = 24;
    /// Default chunk load radius around the player (Chebyshev, in chunks)
    pub const RENDER_DISTANCE: i32 = 3;
}
