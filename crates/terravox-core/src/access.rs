//! Read and write access to world blocks.

use crate::coords::WorldPos;
use crate::error::Result;
use crate::types::BlockId;

/// Anything that can answer "which block is at this world cell".
///
/// Implementations must return [`BlockId::AIR`] for unloaded or out-of-range
/// cells rather than failing.
pub trait BlockAccess {
    /// Block at the given world cell.
    fn block_at(&self, pos: WorldPos) -> BlockId;

    /// Whether an entity would collide with the cell.
    #[inline]
    fn is_collidable(&self, pos: WorldPos) -> bool {
        self.block_at(pos).is_collidable()
    }

    /// Whether the cell holds a liquid.
    #[inline]
    fn is_liquid(&self, pos: WorldPos) -> bool {
        self.block_at(pos).is_liquid()
    }
}

/// Block storage that entities may edit (mining, placing).
pub trait BlockEdit: BlockAccess {
    /// Replace the block at `pos`.
    ///
    /// Fails with [`Error::OutOfBounds`](crate::Error::OutOfBounds) when the
    /// cell cannot be stored (unloaded chunk, outside the world height).
    fn try_set_block(&mut self, pos: WorldPos, block: BlockId) -> Result<()>;
}
