#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cyberdoom engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the supporting systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values so
//! drivers and tests can react deterministically. Geometry shared by the
//! simulation and the renderer (the [`GridMap`] and the ray marcher) lives here
//! so neither side depends on the other.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod grid;
pub mod level;
pub mod random;
pub mod raycast;

pub use catalog::{EnemyKind, EnemyStats, PickupEffect, PickupKind};
pub use grid::{CellCode, GridError, GridMap, TilePoint, WorldPoint, TILE_SIZE};
pub use level::{
    DifficultyModifiers, EnemyPlacement, ExitZone, LevelConfig, PickupPlacement, RoleModifiers,
    RunModifiers, ServerDoor, SpawnPose,
};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use raycast::{cast_ray, has_line_of_sight, RayHit, LINE_OF_SIGHT_SAMPLES, RAY_STEP};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Cyberdoom. Contain the breach.";

/// Device-agnostic control state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputVector {
    /// Forward axis in `[-1, 1]`; positive walks along the facing direction.
    pub forward: f32,
    /// Strafe axis in `[-1, 1]`; positive steps to the player's right.
    pub strafe: f32,
    /// Turn rate in radians per second.
    pub turn: f32,
    /// Requests the run multiplier.
    pub run: bool,
    /// Requests an attack.
    pub shoot: bool,
    /// Requests an interaction.
    pub interact: bool,
}

impl InputVector {
    /// Returns a copy with the axes clamped into `[-1, 1]` and non-finite
    /// values replaced by zero.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            forward: clamp_axis(self.forward),
            strafe: clamp_axis(self.strafe),
            turn: if self.turn.is_finite() { self.turn } else { 0.0 },
            ..self
        }
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Unique identifier assigned to an enemy within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pickup within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Visual category of a billboard sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    /// A live enemy of the given kind.
    Enemy(EnemyKind),
    /// An unconsumed pickup of the given kind.
    Pickup(PickupKind),
}

/// Renderable snapshot of a live entity, rebuilt after each simulation step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// Visual category of the sprite.
    pub kind: SpriteKind,
    /// Position of the sprite in world units.
    pub position: WorldPoint,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces all level state with a fresh run of the provided level.
    LoadLevel {
        /// Position of the level within the campaign.
        index: usize,
        /// Configuration describing the level.
        level: Box<LevelConfig>,
    },
    /// Advances the simulation by one step.
    Tick {
        /// Simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Control state sampled for this step.
        input: InputVector,
    },
}

/// Reasons an attack attempt produced no damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackRejection {
    /// The previous attack happened too recently.
    Cooldown,
    /// The player lacks the energy required to attack.
    InsufficientEnergy,
    /// The attack was spent but no enemy qualified as a target.
    NoTarget,
}

/// Final outcome of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The player reached the goal.
    Won,
    /// The player's health reached zero.
    Lost,
}

/// Statistics describing a run, handed to scoring collaborators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Accumulated score.
    pub score: u32,
    /// Simulated time between level load and completion (or now, if running).
    pub elapsed: Duration,
    /// Number of enemies neutralized.
    pub kills: u32,
    /// Outcome once the run has completed.
    pub outcome: Option<RunOutcome>,
}

/// Short-lived notification emitted by the simulation for the UI layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Text to display.
    pub message: String,
    /// Simulation time after which the message is no longer shown.
    pub expires_at: Duration,
}

impl Toast {
    /// Reports whether the toast should still be displayed at `now`.
    #[must_use]
    pub fn is_visible_at(&self, now: Duration) -> bool {
        now < self.expires_at
    }
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A level finished loading and a new run started.
    LevelLoaded {
        /// Position of the level within the campaign.
        index: usize,
        /// Identifier of the loaded level.
        level_id: u32,
    },
    /// An enemy damaged the player.
    PlayerDamaged {
        /// Enemy responsible for the damage.
        source: EnemyId,
        /// Health actually removed.
        amount: f32,
        /// Player health after the damage.
        health: f32,
    },
    /// The player's attack damaged an enemy without neutralizing it.
    EnemyHit {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Health remaining after the hit.
        remaining: f32,
    },
    /// An enemy's health dropped to zero.
    EnemyNeutralized {
        /// Enemy that was neutralized.
        enemy: EnemyId,
        /// Catalog entry of the enemy.
        kind: EnemyKind,
        /// Score awarded for the kill.
        score: u32,
    },
    /// A new enemy entered the level after load.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Catalog entry of the new enemy.
        kind: EnemyKind,
        /// Spawner that produced the enemy.
        spawner: EnemyId,
    },
    /// The player consumed a pickup.
    PickupCollected {
        /// Pickup that was consumed.
        pickup: PickupId,
        /// Catalog entry of the pickup.
        kind: PickupKind,
        /// Score awarded for the pickup.
        score: u32,
    },
    /// A defeated enemy left a pickup behind.
    PickupDropped {
        /// Identifier assigned to the dropped pickup.
        pickup: PickupId,
        /// Catalog entry of the dropped pickup.
        kind: PickupKind,
    },
    /// An attack attempt produced no damage.
    AttackRejected {
        /// Reason the attack was rejected.
        reason: AttackRejection,
    },
    /// The server door refused access because a token is missing.
    AccessDenied {
        /// One of the missing tokens.
        missing: PickupKind,
    },
    /// The run reached a terminal state.
    RunCompleted {
        /// Final statistics of the run.
        stats: RunStats,
    },
}
