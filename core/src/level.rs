//! Level configuration and run modifiers consumed as plain data.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{EnemyKind, PickupKind},
    grid::{GridMap, TilePoint},
};

/// Immutable description of a single level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Stable identifier of the level.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Text shown before the level starts.
    #[serde(default)]
    pub briefing: String,
    /// Text shown after the level is won.
    #[serde(default)]
    pub debriefing: String,
    /// Tile grid defining the level geometry.
    pub map: GridMap,
    /// Pose the player spawns with.
    pub start: SpawnPose,
    /// Interaction zone that wins the run once all requirements are held.
    #[serde(default)]
    pub server_door: Option<ServerDoor>,
    /// Zone that wins the run automatically once all requirements are held.
    #[serde(default)]
    pub exit_zone: Option<ExitZone>,
    /// Pickups present when the level loads.
    #[serde(default)]
    pub pickups: Vec<PickupPlacement>,
    /// Enemies present when the level loads, before difficulty extras.
    #[serde(default)]
    pub enemies: Vec<EnemyPlacement>,
}

impl LevelConfig {
    /// Tokens the player must hold before the server door or exit zone opens.
    #[must_use]
    pub fn required_tokens(&self) -> &[PickupKind] {
        self.server_door
            .as_ref()
            .map_or(&[], |door| door.requires.as_slice())
    }
}

/// Player spawn position and facing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPose {
    /// Spawn position in tiles.
    pub position: TilePoint,
    /// Facing angle in radians.
    #[serde(default)]
    pub angle: f32,
}

/// The level's server door.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerDoor {
    /// Center of the door zone in tiles.
    pub position: TilePoint,
    /// Radius of the door zone in world units.
    pub radius: f32,
    /// Token kinds required to open the door.
    #[serde(default)]
    pub requires: Vec<PickupKind>,
}

/// Zone that completes the level on entry once the requirements are met.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExitZone {
    /// Center of the zone in tiles.
    pub position: TilePoint,
    /// Radius of the zone in world units.
    pub radius: f32,
}

/// Initial placement of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyPlacement {
    /// Catalog entry of the enemy.
    pub kind: EnemyKind,
    /// Position in tiles.
    pub position: TilePoint,
}

/// Initial placement of a pickup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickupPlacement {
    /// Catalog entry of the pickup.
    pub kind: PickupKind,
    /// Position in tiles.
    pub position: TilePoint,
    /// Optional label overriding the catalog name.
    #[serde(default)]
    pub label: Option<String>,
}

fn unit() -> f32 {
    1.0
}

fn full_percent() -> f32 {
    100.0
}

/// Multipliers contributed by the player's chosen role.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleModifiers {
    /// Maximum health as a percentage of the base value.
    #[serde(default = "full_percent")]
    pub health_percent: f32,
    /// Maximum energy as a percentage of the base value.
    #[serde(default = "full_percent")]
    pub energy_percent: f32,
    /// Factor applied to enemy movement speed.
    #[serde(default = "unit")]
    pub enemy_speed: f32,
    /// Factor applied to enemy damage.
    #[serde(default = "unit")]
    pub enemy_damage: f32,
    /// Factor applied to kill scores.
    #[serde(default = "unit")]
    pub score_multiplier: f32,
}

impl Default for RoleModifiers {
    fn default() -> Self {
        Self {
            health_percent: 100.0,
            energy_percent: 100.0,
            enemy_speed: 1.0,
            enemy_damage: 1.0,
            score_multiplier: 1.0,
        }
    }
}

/// Multipliers contributed by the chosen difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyModifiers {
    /// Factor applied to the number of placed enemies; values above one add
    /// extra malware at load time.
    #[serde(default = "unit")]
    pub enemy_count: f32,
    /// Factor applied to enemy movement speed.
    #[serde(default = "unit")]
    pub enemy_speed: f32,
    /// Factor applied to enemy damage.
    #[serde(default = "unit")]
    pub enemy_damage: f32,
    /// Factor applied to kill scores.
    #[serde(default = "unit")]
    pub score_multiplier: f32,
}

impl Default for DifficultyModifiers {
    fn default() -> Self {
        Self {
            enemy_count: 1.0,
            enemy_speed: 1.0,
            enemy_damage: 1.0,
            score_multiplier: 1.0,
        }
    }
}

/// Combined role and difficulty modifiers fixed for the duration of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunModifiers {
    /// Role contribution.
    pub role: RoleModifiers,
    /// Difficulty contribution.
    pub difficulty: DifficultyModifiers,
}

impl RunModifiers {
    /// Creates a new modifier set.
    #[must_use]
    pub const fn new(role: RoleModifiers, difficulty: DifficultyModifiers) -> Self {
        Self { role, difficulty }
    }

    /// Product of the role and difficulty score multipliers.
    #[must_use]
    pub fn score_multiplier(&self) -> f32 {
        self.role.score_multiplier * self.difficulty.score_multiplier
    }

    /// Product of the role and difficulty enemy speed factors.
    #[must_use]
    pub fn enemy_speed(&self) -> f32 {
        self.role.enemy_speed * self.difficulty.enemy_speed
    }

    /// Product of the role and difficulty enemy damage factors.
    #[must_use]
    pub fn enemy_damage(&self) -> f32 {
        self.role.enemy_damage * self.difficulty.enemy_damage
    }

    /// Number of extra malware units to add to `base_count` placed enemies.
    #[must_use]
    pub fn extra_enemies(&self, base_count: usize) -> usize {
        let extra = ((self.difficulty.enemy_count - 1.0) * base_count as f32).round();
        if extra > 0.0 {
            extra as usize
        } else {
            0
        }
    }
}
