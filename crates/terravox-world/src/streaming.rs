//! Chunk streaming based on the focus position.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec3;
use terravox_core::constants::RENDER_DISTANCE;
use terravox_core::coords::ChunkPos;
use tracing::debug;

use crate::chunk_manager::ChunkManager;
use crate::generation::TerrainGenerator;

/// Priority entry for chunk loading queue.
#[derive(Debug, Clone, Copy)]
struct LoadPriority {
    pos: ChunkPos,
    /// Squared distance to the focus chunk (lower = higher priority).
    distance_sq: i32,
}

impl PartialEq for LoadPriority {
    fn eq(&self, other: &Self) -> bool {
        self.distance_sq == other.distance_sq
    }
}

impl Eq for LoadPriority {}

impl PartialOrd for LoadPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LoadPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (closer chunks have higher priority)
        other.distance_sq.cmp(&self.distance_sq)
    }
}

/// Configuration for chunk streaming behavior.
#[derive(Debug, Clone)]
pub struct StreamingConfig {
    /// Load radius in chunks (Chebyshev).
    pub load_radius: i32,
    /// Unload radius in chunks (must be >= load_radius).
    pub unload_radius: i32,
    /// Maximum chunks to load per update call.
    pub max_gen_per_update: usize,
    /// Capacity of the chunk manager.
    pub max_chunks: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            load_radius: RENDER_DISTANCE,
            unload_radius: RENDER_DISTANCE + 2,
            max_gen_per_update: 64,
            max_chunks: 256,
        }
    }
}

impl StreamingConfig {
    /// Set both radii, keeping the unload margin.
    #[must_use]
    pub fn with_load_radius(mut self, radius: i32) -> Self {
        let margin = self.unload_radius - self.load_radius;
        self.load_radius = radius;
        self.unload_radius = radius.saturating_add(margin.max(0));
        self
    }

    #[must_use]
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }
}

/// What one streaming update changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// Chunks generated from the seed.
    pub generated: Vec<ChunkPos>,
    /// Chunks restored from parked snapshots.
    pub restored: Vec<ChunkPos>,
    /// Chunks evicted (distance or capacity).
    pub evicted: Vec<ChunkPos>,
}

impl StreamingReport {
    /// Whether the update changed nothing.
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty() && self.restored.is_empty() && self.evicted.is_empty()
    }
}

/// Handles chunk streaming around a moving focus.
#[derive(Debug, Default)]
pub struct ChunkStreamer {
    config: StreamingConfig,
    load_queue: BinaryHeap<LoadPriority>,
    last_center: Option<ChunkPos>,
}

impl ChunkStreamer {
    /// Create a new chunk streamer with the given configuration.
    pub fn new(config: StreamingConfig) -> Self {
        Self {
            config,
            load_queue: BinaryHeap::new(),
            last_center: None,
        }
    }

    /// Get the streaming configuration.
    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Get the number of chunks waiting to be loaded.
    pub fn pending_count(&self) -> usize {
        self.load_queue.len()
    }

    /// Rebuild the load queue around the given center.
    fn rebuild_load_queue(&mut self, center: ChunkPos, chunk_manager: &ChunkManager) {
        self.load_queue.clear();

        let r = self.config.load_radius;
        for dy in -r..=r {
            for dx in -r..=r {
                let pos = ChunkPos::new(center.x + dx, center.y + dy);
                if !chunk_manager.contains(pos) {
                    self.load_queue.push(LoadPriority {
                        pos,
                        distance_sq: dx * dx + dy * dy,
                    });
                }
            }
        }
    }

    /// Load missing chunks around `focus` and evict distant ones.
    ///
    /// Parked snapshots are restored in place of regeneration. Fresh chunks are
    /// generated in parallel, nearest first, up to `max_gen_per_update`.
    pub fn update(
        &mut self,
        focus: Vec3,
        chunk_manager: &mut ChunkManager,
        generator: &TerrainGenerator,
    ) -> StreamingReport {
        let center = ChunkPos::from_vec3(focus);
        let mut report = StreamingReport::default();

        // Rebuild when the focus crosses a chunk border or the queue ran dry
        // while chunks are still missing (e.g. after capacity evictions).
        if self.last_center != Some(center) || self.load_queue.is_empty() {
            self.rebuild_load_queue(center, chunk_manager);
            self.last_center = Some(center);
        }

        let mut batch = Vec::with_capacity(self.config.max_gen_per_update);
        while batch.len() + report.restored.len() < self.config.max_gen_per_update {
            let Some(entry) = self.load_queue.pop() else {
                break;
            };
            if chunk_manager.contains(entry.pos) {
                continue;
            }
            if let Some(chunk) = chunk_manager.take_parked(entry.pos) {
                chunk_manager.insert(chunk);
                report.restored.push(entry.pos);
            } else {
                batch.push(entry.pos);
            }
        }

        if !batch.is_empty() {
            for chunk in generator.generate_chunks_parallel(&batch) {
                chunk_manager.insert(chunk);
            }
            report.generated = batch;
        }

        let nearby = chunk_manager.chunks_in_radius(center, self.config.load_radius);
        chunk_manager.touch_chunks(&nearby);

        report.evicted = chunk_manager.evict_outside(center, self.config.unload_radius);
        report.evicted.extend(chunk_manager.evict_if_needed());

        if !report.is_empty() {
            debug!(
                "Streaming at ({}, {}): {} generated, {} restored, {} evicted",
                center.x,
                center.y,
                report.generated.len(),
                report.restored.len(),
                report.evicted.len()
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terravox_core::types::BlockId;

    fn create_test_streamer() -> (ChunkStreamer, ChunkManager, TerrainGenerator) {
        let config = StreamingConfig {
            load_radius: 1,
            unload_radius: 2,
            max_gen_per_update: 100,
            max_chunks: 100,
        };
        (
            ChunkStreamer::new(config),
            ChunkManager::new(100),
            TerrainGenerator::with_seed(12345),
        )
    }

    #[test]
    fn load_priority_ordering() {
        let mut heap = BinaryHeap::new();

        heap.push(LoadPriority {
            pos: ChunkPos::new(10, 10),
            distance_sq: 100,
        });
        heap.push(LoadPriority {
            pos: ChunkPos::new(1, 1),
            distance_sq: 1,
        });
        heap.push(LoadPriority {
            pos: ChunkPos::new(5, 5),
            distance_sq: 25,
        });

        // Closest should come first
        assert_eq!(heap.pop().unwrap().distance_sq, 1);
        assert_eq!(heap.pop().unwrap().distance_sq, 25);
        assert_eq!(heap.pop().unwrap().distance_sq, 100);
    }

    #[test]
    fn streamer_generates_chunks() {
        let (mut streamer, mut manager, generator) = create_test_streamer();

        let report = streamer.update(Vec3::new(8.0, 8.0, 30.0), &mut manager, &generator);

        assert_eq!(report.generated.len(), 9);
        assert_eq!(report.generated[0], ChunkPos::new(0, 0));
        assert_eq!(manager.len(), 9);
        assert!(report.evicted.is_empty());

        // Nothing left to do at the same focus.
        let again = streamer.update(Vec3::new(9.0, 8.0, 30.0), &mut manager, &generator);
        assert!(again.is_empty());
    }

    #[test]
    fn generation_budget_is_respected() {
        let (_, mut manager, generator) = create_test_streamer();
        let mut streamer = ChunkStreamer::new(StreamingConfig {
            load_radius: 2,
            unload_radius: 3,
            max_gen_per_update: 4,
            max_chunks: 100,
        });

        let first = streamer.update(Vec3::ZERO, &mut manager, &generator);
        assert_eq!(first.generated.len(), 4);
        assert!(first.generated.contains(&ChunkPos::new(0, 0)));
        assert_eq!(streamer.pending_count(), 21);

        for _ in 0..10 {
            streamer.update(Vec3::ZERO, &mut manager, &generator);
        }
        assert_eq!(manager.len(), 25);
    }

    #[test]
    fn streamer_unloads_distant_chunks() {
        let (mut streamer, mut manager, generator) = create_test_streamer();

        streamer.update(Vec3::ZERO, &mut manager, &generator);
        assert!(manager.contains(ChunkPos::new(-1, -1)));

        let report = streamer.update(Vec3::new(100.0, 0.0, 30.0), &mut manager, &generator);
        assert!(report.evicted.contains(&ChunkPos::new(-1, -1)));
        assert!(!manager.contains(ChunkPos::new(0, 0)));
        assert!(manager.contains(ChunkPos::new(6, 0)));
    }

    #[test]
    fn edited_chunks_come_back() {
        let (mut streamer, mut manager, generator) = create_test_streamer();

        streamer.update(Vec3::ZERO, &mut manager, &generator);
        manager
            .get_mut(ChunkPos::new(0, 0))
            .unwrap()
            .set(5, 5, 60, BlockId::PLANKS);

        streamer.update(Vec3::new(200.0, 0.0, 0.0), &mut manager, &generator);
        assert!(manager.is_parked(ChunkPos::new(0, 0)));

        let report = streamer.update(Vec3::ZERO, &mut manager, &generator);
        assert!(report.restored.contains(&ChunkPos::new(0, 0)));
        assert_eq!(
            manager.get(ChunkPos::new(0, 0)).unwrap().get(5, 5, 60),
            BlockId::PLANKS
        );
    }
}
