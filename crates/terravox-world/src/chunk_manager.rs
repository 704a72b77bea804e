//! Chunk manager with spatial indexing and eviction.

use hashbrown::HashMap;
use terravox_core::coords::{ChunkPos, WorldPos};
use terravox_core::types::BlockId;
use tracing::{debug, warn};

use crate::chunk::Chunk;

/// Owns all loaded chunks, keyed by chunk position.
///
/// Edited chunks are parked as snapshots when evicted and handed back by
/// [`ChunkManager::take_parked`]; untouched chunks are simply dropped, since
/// they can be regenerated from the seed.
pub struct ChunkManager {
    /// All loaded chunks indexed by position.
    chunks: HashMap<ChunkPos, Chunk>,
    /// Serialized edited chunks that were evicted.
    parked: HashMap<ChunkPos, Vec<u8>>,
    /// Maximum number of chunks to keep loaded.
    max_chunks: usize,
    /// Current tick number for LRU tracking.
    current_tick: u64,
}

impl ChunkManager {
    /// Create a new chunk manager with the given capacity.
    pub fn new(max_chunks: usize) -> Self {
        Self {
            chunks: HashMap::with_capacity(max_chunks),
            parked: HashMap::new(),
            max_chunks,
            current_tick: 0,
        }
    }

    /// Get the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Advance the tick counter and return the new tick number.
    pub fn advance_tick(&mut self) -> u64 {
        self.current_tick += 1;
        self.current_tick
    }

    /// Check if a chunk exists at the given position.
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Get the number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if no chunks are loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Insert or replace a chunk at the given position.
    pub fn insert(&mut self, mut chunk: Chunk) {
        chunk.touch(self.current_tick);
        self.chunks.insert(chunk.pos, chunk);
    }

    /// Remove a chunk at the given position without parking it.
    pub fn remove(&mut self, pos: ChunkPos) -> Option<Chunk> {
        self.chunks.remove(&pos)
    }

    pub fn get(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn get_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }

    /// Block at a world position; air when the chunk is not loaded or `z` is
    /// out of range.
    pub fn block_at(&self, pos: WorldPos) -> BlockId {
        pos.split()
            .and_then(|(chunk, local)| self.chunks.get(&chunk).map(|c| c.get_local(local)))
            .unwrap_or(BlockId::AIR)
    }

    /// Set a block at a world position, marking its chunk modified.
    ///
    /// Returns `false` (and changes nothing) when the chunk is not loaded or
    /// `z` is out of range.
    pub fn set_block_at(&mut self, pos: WorldPos, block: BlockId) -> bool {
        let Some((chunk_pos, local)) = pos.split() else {
            return false;
        };
        match self.chunks.get_mut(&chunk_pos) {
            Some(chunk) => {
                chunk.set(i32::from(local.x), i32::from(local.y), i32::from(local.z), block);
                true
            }
            None => false,
        }
    }

    /// Get all loaded chunk positions.
    pub fn positions(&self) -> Vec<ChunkPos> {
        self.chunks.keys().copied().collect()
    }

    /// Get loaded chunks within a Chebyshev radius of a center position.
    pub fn chunks_in_radius(&self, center: ChunkPos, radius: i32) -> Vec<ChunkPos> {
        self.chunks
            .keys()
            .filter(|pos| pos.chebyshev_distance(center) <= radius)
            .copied()
            .collect()
    }

    /// Whether an evicted, edited chunk is waiting to be restored.
    pub fn is_parked(&self, pos: ChunkPos) -> bool {
        self.parked.contains_key(&pos)
    }

    /// Number of parked snapshots.
    pub fn parked_len(&self) -> usize {
        self.parked.len()
    }

    /// Restore a parked chunk, if one exists for `pos`.
    ///
    /// A snapshot that fails to decode is dropped with a warning and the
    /// caller falls back to regeneration.
    pub fn take_parked(&mut self, pos: ChunkPos) -> Option<Chunk> {
        let data = self.parked.remove(&pos)?;
        match Chunk::from_snapshot(&data) {
            Ok(chunk) => Some(chunk),
            Err(err) => {
                warn!("Dropping unreadable snapshot for chunk {:?}: {}", pos, err);
                None
            }
        }
    }

    /// Remove a chunk, parking it first if it was edited.
    fn evict(&mut self, pos: ChunkPos) -> bool {
        let Some(chunk) = self.chunks.remove(&pos) else {
            return false;
        };
        if chunk.modified {
            match chunk.snapshot() {
                Ok(data) => {
                    self.parked.insert(pos, data);
                }
                Err(err) => warn!("Failed to park chunk {:?}: {}", pos, err),
            }
        }
        true
    }

    /// Evict every chunk farther than `radius` (Chebyshev) from `center`.
    ///
    /// Returns the positions of evicted chunks.
    pub fn evict_outside(&mut self, center: ChunkPos, radius: i32) -> Vec<ChunkPos> {
        let distant: Vec<ChunkPos> = self
            .chunks
            .keys()
            .filter(|pos| pos.chebyshev_distance(center) > radius)
            .copied()
            .collect();

        for pos in &distant {
            self.evict(*pos);
        }
        if !distant.is_empty() {
            debug!("Evicted {} distant chunks", distant.len());
        }
        distant
    }

    /// Evict least recently touched chunks if over capacity.
    ///
    /// Returns the positions of evicted chunks.
    pub fn evict_if_needed(&mut self) -> Vec<ChunkPos> {
        let mut evicted = Vec::new();

        while self.chunks.len() > self.max_chunks {
            let oldest = self
                .chunks
                .iter()
                .min_by_key(|(_, c)| c.last_access_tick)
                .map(|(pos, _)| *pos);

            match oldest {
                Some(pos) if self.evict(pos) => evicted.push(pos),
                _ => break,
            }
        }

        evicted
    }

    /// Touch all chunks at the given positions to update their access time.
    pub fn touch_chunks(&mut self, positions: &[ChunkPos]) {
        let tick = self.current_tick;
        for pos in positions {
            if let Some(chunk) = self.chunks.get_mut(pos) {
                chunk.touch(tick);
            }
        }
    }

    /// Get total memory usage of all loaded chunks.
    pub fn memory_usage(&self) -> usize {
        self.chunks.values().map(Chunk::memory_usage).sum()
    }

    /// Get the maximum chunk capacity.
    pub fn capacity(&self) -> usize {
        self.max_chunks
    }
}

impl Default for ChunkManager {
    fn default() -> Self {
        Self::new(1024)
    }
}
