//! Chunk data structure for voxel world storage.

use serde::{Deserialize, Serialize};
use terravox_core::constants::{CHUNK_SIZE, CHUNK_VOLUME, WORLD_HEIGHT};
use terravox_core::coords::{ChunkPos, LocalPos};
use terravox_core::types::BlockId;
use terravox_core::{Error, Result};

/// A single column of voxel data (16x16xWORLD_HEIGHT voxels).
///
/// Blocks are stored densely, indexed `x + y*W + z*W*W`.
#[derive(Clone)]
pub struct Chunk {
    /// Position in chunk coordinates.
    pub pos: ChunkPos,
    blocks: Box<[BlockId]>,
    /// Whether the chunk was edited after generation.
    pub modified: bool,
    /// Tick number when last accessed (for LRU eviction).
    pub last_access_tick: u64,
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("pos", &self.pos)
            .field("modified", &self.modified)
            .field("last_access_tick", &self.last_access_tick)
            .finish_non_exhaustive()
    }
}

/// Serialized form of a chunk, used to park edited chunks on eviction.
#[derive(Serialize, Deserialize)]
struct ChunkSnapshot {
    pos: ChunkPos,
    blocks: Vec<u8>,
}

impl Chunk {
    /// Create a new all-air chunk at the given position.
    pub fn new(pos: ChunkPos) -> Self {
        Self {
            pos,
            blocks: vec![BlockId::AIR; CHUNK_VOLUME].into_boxed_slice(),
            modified: false,
            last_access_tick: 0,
        }
    }

    #[inline]
    fn index(x: i32, y: i32, z: i32) -> Option<usize> {
        LocalPos::try_new(x, y, z).map(LocalPos::to_index)
    }

    /// Block at local coordinates; air when out of range.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockId {
        Self::index(x, y, z).map_or(BlockId::AIR, |i| self.blocks[i])
    }

    /// Set the block at local coordinates; ignored when out of range.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockId) {
        if let Some(i) = Self::index(x, y, z) {
            self.blocks[i] = block;
            self.modified = true;
        }
    }

    /// Block at a checked local position.
    #[inline]
    pub fn get_local(&self, local: LocalPos) -> BlockId {
        self.blocks[local.to_index()]
    }

    /// Set a block without marking the chunk modified (generation path).
    #[inline]
    pub(crate) fn set_generated(&mut self, x: i32, y: i32, z: i32, block: BlockId) {
        if let Some(i) = Self::index(x, y, z) {
            self.blocks[i] = block;
        }
    }

    /// Topmost z in the column holding a collidable block, or 0 if none.
    pub fn column_height(&self, x: i32, y: i32) -> i32 {
        (0..WORLD_HEIGHT as i32)
            .rev()
            .find(|&z| self.get(x, y, z).is_collidable())
            .unwrap_or(0)
    }

    /// Check if this chunk is empty (all air).
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }

    /// Count of blocks matching `block`.
    pub fn count(&self, block: BlockId) -> usize {
        self.blocks.iter().filter(|b| **b == block).count()
    }

    /// Raw block slice in storage order.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Update the last access tick for LRU tracking.
    pub fn touch(&mut self, tick: u64) {
        self.last_access_tick = tick;
    }

    /// Serialize the chunk's blocks.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        let snapshot = ChunkSnapshot {
            pos: self.pos,
            blocks: bytemuck::cast_slice::<BlockId, u8>(&self.blocks[..]).to_vec(),
        };
        bincode::serialize(&snapshot).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Rebuild a chunk from [`Chunk::snapshot`] output.
    ///
    /// The restored chunk keeps `modified` set so it is parked again if evicted.
    pub fn from_snapshot(data: &[u8]) -> Result<Self> {
        let snapshot: ChunkSnapshot =
            bincode::deserialize(data).map_err(|e| Error::Serialization(e.to_string()))?;

        let expected = CHUNK_VOLUME * std::mem::size_of::<BlockId>();
        if snapshot.blocks.len() != expected {
            return Err(Error::InvalidData(format!(
                "chunk {:?} snapshot holds {} bytes, expected {expected}",
                snapshot.pos,
                snapshot.blocks.len()
            )));
        }

        let blocks: Vec<BlockId> = snapshot
            .blocks
            .chunks_exact(2)
            .map(|pair| BlockId(u16::from_ne_bytes([pair[0], pair[1]])))
            .collect();

        Ok(Self {
            pos: snapshot.pos,
            blocks: blocks.into_boxed_slice(),
            modified: true,
            last_access_tick: 0,
        })
    }

    /// Get memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.blocks.len() * std::mem::size_of::<BlockId>()
    }
}

/// Width of a chunk as i32 for local coordinate loops.
pub(crate) const CHUNK_WIDTH: i32 = CHUNK_SIZE as i32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chunk_is_empty() {
        let chunk = Chunk::new(ChunkPos::new(0, 0));
        assert!(chunk.is_empty());
        assert!(!chunk.modified);
        assert_eq!(chunk.blocks().len(), CHUNK_VOLUME);
    }

    #[test]
    fn set_get_roundtrip() {
        let mut chunk = Chunk::new(ChunkPos::new(2, -3));
        chunk.set(3, 4, 5, BlockId::STONE);
        chunk.set(15, 15, 63, BlockId::WATER);
        assert_eq!(chunk.get(3, 4, 5), BlockId::STONE);
        assert_eq!(chunk.get(15, 15, 63), BlockId::WATER);
        assert_eq!(chunk.get(0, 0, 0), BlockId::AIR);
        assert!(chunk.modified);
    }

    #[test]
    fn out_of_range_is_silent() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0));
        chunk.set(16, 0, 0, BlockId::STONE);
        chunk.set(-1, 0, 0, BlockId::STONE);
        chunk.set(0, 0, 64, BlockId::STONE);
        assert!(chunk.is_empty());
        assert!(!chunk.modified);
        assert_eq!(chunk.get(0, 16, 0), BlockId::AIR);
        assert_eq!(chunk.get(0, 0, -1), BlockId::AIR);
    }

    #[test]
    fn column_height_finds_topmost_collidable() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0));
        assert_eq!(chunk.column_height(1, 1), 0);
        chunk.set(1, 1, 10, BlockId::STONE);
        chunk.set(1, 1, 11, BlockId::WATER);
        chunk.set(1, 1, 12, BlockId::TALL_GRASS);
        assert_eq!(chunk.column_height(1, 1), 10);
    }

    #[test]
    fn snapshot_restores_blocks() {
        let mut chunk = Chunk::new(ChunkPos::new(-4, 9));
        chunk.set(0, 0, 0, BlockId::BEDROCK);
        chunk.set(7, 8, 30, BlockId::DIAMOND_ORE);

        let bytes = chunk.snapshot().unwrap();
        let restored = Chunk::from_snapshot(&bytes).unwrap();

        assert_eq!(restored.pos, ChunkPos::new(-4, 9));
        assert_eq!(restored.blocks(), chunk.blocks());
        assert!(restored.modified);
    }

    #[test]
    fn truncated_snapshot_is_rejected() {
        let bytes = bincode::serialize(&ChunkSnapshot {
            pos: ChunkPos::new(0, 0),
            blocks: vec![0; 10],
        })
        .unwrap();
        assert!(matches!(
            Chunk::from_snapshot(&bytes),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            Chunk::from_snapshot(&[1, 2, 3]),
            Err(Error::Serialization(_))
        ));
    }
}
