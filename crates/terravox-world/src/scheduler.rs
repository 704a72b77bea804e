//! Bounded FIFO of world columns awaiting a block-physics pass.

use glam::IVec2;

/// Default capacity of the queue (must be power of 2).
pub const DEFAULT_TICK_QUEUE_CAPACITY: usize = 1024;

/// Ring buffer of world columns `(x, y)` scheduled for a physics pass.
///
/// One slot is kept free to tell a full buffer from an empty one, so the
/// queue holds at most `capacity - 1` columns. Pushes to a full queue are
/// dropped.
#[derive(Debug, Clone)]
pub struct RandomTickQueue {
    buffer: Box<[IVec2]>,
    head: usize,
    tail: usize,
}

impl Default for RandomTickQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_QUEUE_CAPACITY)
    }
}

impl RandomTickQueue {
    /// Create an empty queue. `capacity` is rounded up to a power of two.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2).next_power_of_two();
        Self {
            buffer: vec![IVec2::ZERO; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
        }
    }

    #[inline]
    fn mask(&self) -> usize {
        self.buffer.len() - 1
    }

    /// Push a column.
    ///
    /// Returns `true` if successful, `false` if the queue is full.
    pub fn push(&mut self, column: IVec2) -> bool {
        let next_head = (self.head + 1) & self.mask();
        if next_head == self.tail {
            return false;
        }
        self.buffer[self.head] = column;
        self.head = next_head;
        true
    }

    /// Pop the oldest column.
    pub fn pop(&mut self) -> Option<IVec2> {
        if self.tail == self.head {
            return None;
        }
        let column = self.buffer[self.tail];
        self.tail = (self.tail + 1) & self.mask();
        Some(column)
    }

    /// Number of queued columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.wrapping_sub(self.tail) & self.mask()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Slots in the backing buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Pop at most `budget` columns, oldest first.
    pub fn drain_budget(&mut self, budget: usize) -> Vec<IVec2> {
        let mut columns = Vec::with_capacity(budget.min(self.len()));
        while columns.len() < budget {
            match self.pop() {
                Some(column) => columns.push(column),
                None => break,
            }
        }
        columns
    }
}
