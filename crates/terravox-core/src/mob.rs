//! Mob kinds shared by the spawner and the entity registry.

use serde::{Deserialize, Serialize};

/// Every kind of mob the world can spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobKind {
    Zombie,
    Skeleton,
    Spider,
    /// Desert zombie variant
    Husk,
    /// Snow skeleton variant
    Stray,
    Slime,
    /// Underwater zombie variant
    Drowned,
    /// Night boss, gated behind a minimum day count
    Warden,
}

impl MobKind {
    /// All regular (non-boss) kinds, in spawn-table order.
    pub const REGULAR: [MobKind; 7] = [
        MobKind::Zombie,
        MobKind::Skeleton,
        MobKind::Spider,
        MobKind::Husk,
        MobKind::Stray,
        MobKind::Slime,
        MobKind::Drowned,
    ];

    #[inline]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Warden)
    }
}

/// Live mob counts, supplied by whoever owns the entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobCensus {
    pub hostile: usize,
    pub boss_alive: bool,
}
