//! Closed catalogs of enemy and pickup types with their fixed stats.

use serde::{Deserialize, Serialize};

/// Types of hostile entities that can inhabit a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Basic melee bot that closes in and attacks on contact.
    Malware,
    /// Ranged attacker that damages the player from a distance.
    Insider,
    /// Slow node that periodically spawns malware around itself.
    Ransomware,
}

/// Base stats for an [`EnemyKind`] before role and difficulty modifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Human-readable name used in notifications.
    pub name: &'static str,
    /// Starting and maximum health.
    pub health: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Damage dealt per attack.
    pub damage: f32,
    /// Score awarded for neutralizing the enemy.
    pub score: u32,
    /// Whether the enemy attacks from range.
    pub ranged: bool,
    /// Whether the enemy spawns additional malware.
    pub spawner: bool,
}

impl EnemyKind {
    /// Every catalog entry in declaration order.
    pub const ALL: [EnemyKind; 3] = [Self::Malware, Self::Insider, Self::Ransomware];

    /// Returns the fixed stats for the kind.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Malware => EnemyStats {
                name: "Malware bot",
                health: 35.0,
                speed: 52.0,
                damage: 8.0,
                score: 80,
                ranged: false,
                spawner: false,
            },
            Self::Insider => EnemyStats {
                name: "Hostile insider",
                health: 55.0,
                speed: 40.0,
                damage: 12.0,
                score: 140,
                ranged: true,
                spawner: false,
            },
            Self::Ransomware => EnemyStats {
                name: "Ransomware node",
                health: 75.0,
                speed: 24.0,
                damage: 10.0,
                score: 220,
                ranged: false,
                spawner: true,
            },
        }
    }
}

/// Types of collectible items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    /// Token unlocking the first level's server.
    BackupToken,
    /// Token unlocking the second level's rack.
    SegmentationKey,
    /// Restores health.
    HealthKit,
    /// Restores energy.
    Battery,
    /// Generic supply crate without a gameplay effect.
    Supply,
}

/// Gameplay effect applied when a pickup is consumed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PickupEffect {
    /// Adds the pickup kind to the level inventory.
    Token,
    /// Restores the given amount of health.
    Heal(f32),
    /// Restores the given amount of energy.
    Energy(f32),
    /// Has no effect beyond the fallback score.
    Inert,
}

impl PickupKind {
    /// Every catalog entry in declaration order.
    pub const ALL: [PickupKind; 5] = [
        Self::BackupToken,
        Self::SegmentationKey,
        Self::HealthKit,
        Self::Battery,
        Self::Supply,
    ];

    /// Human-readable name used in notifications and objectives.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BackupToken => "Backup token",
            Self::SegmentationKey => "Segmentation key",
            Self::HealthKit => "Health kit",
            Self::Battery => "Battery",
            Self::Supply => "Supply crate",
        }
    }

    /// Effect applied when the player consumes the pickup.
    #[must_use]
    pub const fn effect(self) -> PickupEffect {
        match self {
            Self::BackupToken | Self::SegmentationKey => PickupEffect::Token,
            Self::HealthKit => PickupEffect::Heal(40.0),
            Self::Battery => PickupEffect::Energy(45.0),
            Self::Supply => PickupEffect::Inert,
        }
    }

    /// Reports whether the pickup is a key-like token.
    #[must_use]
    pub const fn is_token(self) -> bool {
        matches!(self.effect(), PickupEffect::Token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_insider_is_ranged_and_only_ransomware_spawns() {
        for kind in EnemyKind::ALL {
            let stats = kind.stats();
            assert_eq!(stats.ranged, kind == EnemyKind::Insider);
            assert_eq!(stats.spawner, kind == EnemyKind::Ransomware);
            assert!(stats.health > 0.0);
        }
    }

    #[test]
    fn tokens_are_exactly_the_key_items() {
        let tokens: Vec<_> = PickupKind::ALL
            .into_iter()
            .filter(|kind| kind.is_token())
            .collect();

        assert_eq!(
            tokens,
            vec![PickupKind::BackupToken, PickupKind::SegmentationKey]
        );
        assert_eq!(PickupKind::Battery.effect(), PickupEffect::Energy(45.0));
    }
}
