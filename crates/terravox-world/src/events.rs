//! Events the world emits for entity-level consumers.

use glam::Vec3;
use terravox_core::coords::WorldPos;
use terravox_core::mob::MobKind;
use terravox_core::types::BlockId;

/// Something that happened during [`World::update`](crate::World::update).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    /// A flammable block next to a fire source burned away.
    BlockBurned { pos: WorldPos, block: BlockId },
    /// The spawner chose a mob and a ground position for it.
    MobSpawned { kind: MobKind, position: Vec3 },
}
