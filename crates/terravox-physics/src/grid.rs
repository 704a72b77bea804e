//! A sparse in-memory block store.

use hashbrown::HashMap;
use terravox_core::coords::WorldPos;
use terravox_core::types::BlockId;
use terravox_core::{BlockAccess, BlockEdit, Result};

/// Sparse map of non-air cells; every other cell reads as air.
///
/// Handy for physics scenarios that need no terrain generation.
#[derive(Debug, Clone, Default)]
pub struct BlockGrid {
    cells: HashMap<WorldPos, BlockId>,
}

impl BlockGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, pos: WorldPos, block: BlockId) {
        if block.is_air() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, block);
        }
    }

    /// Fill the inclusive box `min..=max` with `block`.
    pub fn fill(&mut self, min: WorldPos, max: WorldPos, block: BlockId) {
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    self.set(WorldPos::new(x, y, z), block);
                }
            }
        }
    }

    /// Number of non-air cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl BlockAccess for BlockGrid {
    fn block_at(&self, pos: WorldPos) -> BlockId {
        self.cells.get(&pos).copied().unwrap_or(BlockId::AIR)
    }
}

impl BlockEdit for BlockGrid {
    fn try_set_block(&mut self, pos: WorldPos, block: BlockId) -> Result<()> {
        self.set(pos, block);
        Ok(())
    }
}
