//! Block counts carried by the player.

use hashbrown::HashMap;
use terravox_core::types::BlockId;

/// Most blocks of one kind the inventory holds.
pub const MAX_STACK: u32 = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: HashMap<BlockId, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one block. Returns false for air or a full stack.
    pub fn add(&mut self, block: BlockId) -> bool {
        if block.is_air() {
            return false;
        }
        let count = self.counts.entry(block).or_insert(0);
        if *count >= MAX_STACK {
            return false;
        }
        *count += 1;
        true
    }

    /// Remove one block. Returns false if none is held.
    pub fn take(&mut self, block: BlockId) -> bool {
        match self.counts.get_mut(&block) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.counts.remove(&block);
                true
            }
            None => false,
        }
    }

    pub fn count(&self, block: BlockId) -> u32 {
        self.counts.get(&block).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_fill_and_drain() {
        let mut inventory = Inventory::new();
        assert!(!inventory.add(BlockId::AIR));
        for _ in 0..MAX_STACK {
            assert!(inventory.add(BlockId::DIRT));
        }
        assert!(!inventory.add(BlockId::DIRT));
        assert_eq!(inventory.count(BlockId::DIRT), MAX_STACK);

        assert!(inventory.take(BlockId::DIRT));
        assert_eq!(inventory.count(BlockId::DIRT), MAX_STACK - 1);
        assert!(!inventory.take(BlockId::SAND));
    }

    #[test]
    fn last_block_empties_the_slot() {
        let mut inventory = Inventory::new();
        inventory.add(BlockId::LOG);
        assert!(inventory.take(BlockId::LOG));
        assert!(inventory.is_empty());
        assert!(!inventory.take(BlockId::LOG));
    }
}
