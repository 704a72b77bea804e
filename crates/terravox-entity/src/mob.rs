//! Per-kind mob attributes and components.

use terravox_core::mob::MobKind;

/// Static attributes of a mob kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobStats {
    pub health: f32,
    /// Chase speed in blocks/s.
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    /// Damage per hit on the player.
    pub attack: f32,
}

impl MobStats {
    pub const fn of(kind: MobKind) -> Self {
        let (health, speed, width, height, attack) = match kind {
            MobKind::Zombie => (20.0, 2.3, 0.6, 1.8, 3.0),
            MobKind::Skeleton => (20.0, 2.5, 0.6, 1.9, 2.0),
            MobKind::Spider => (16.0, 3.5, 1.4, 0.9, 2.0),
            MobKind::Husk => (20.0, 2.3, 0.6, 1.8, 3.0),
            MobKind::Stray => (20.0, 2.5, 0.6, 1.9, 2.0),
            MobKind::Slime => (8.0, 2.0, 1.0, 1.0, 1.0),
            MobKind::Drowned => (20.0, 2.0, 0.6, 1.8, 3.0),
            MobKind::Warden => (200.0, 3.0, 0.9, 2.9, 10.0),
        };
        Self {
            health,
            speed,
            width,
            height,
            attack,
        }
    }
}

/// Marks an entity as a mob of `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mob {
    pub kind: MobKind,
}

/// Seconds until the mob may hit again.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttackCooldown(pub f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boss_outclasses_regular_mobs() {
        let boss = MobStats::of(MobKind::Warden);
        for kind in MobKind::REGULAR {
            let stats = MobStats::of(kind);
            assert!(stats.health < boss.health, "{kind:?}");
            assert!(stats.attack < boss.attack, "{kind:?}");
            assert!(stats.width > 0.0 && stats.height > 0.0);
        }
    }
}
