//! Mutable entity state owned by the world.

use std::{f32::consts::TAU, time::Duration};

use cyberdoom_core::{
    EnemyId, EnemyKind, LevelConfig, PickupId, PickupKind, RunModifiers, WorldPoint,
};

/// Base health before the role percentage is applied.
const BASE_HEALTH: f32 = 100.0;
/// Base energy before the role percentage is applied.
const BASE_ENERGY: f32 = 100.0;

/// Player body and resources.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) position: WorldPoint,
    /// Facing angle, kept in `[0, 2π)`.
    pub(crate) angle: f32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) energy: f32,
    pub(crate) max_energy: f32,
    /// Simulation time of the last successful attack.
    pub(crate) last_attack_at: Option<Duration>,
    pub(crate) alive: bool,
}

impl Player {
    /// Creates a player at the level's spawn pose with role-scaled resources.
    pub(crate) fn spawn(level: &LevelConfig, modifiers: &RunModifiers) -> Self {
        let max_health = (BASE_HEALTH * modifiers.role.health_percent / 100.0).round();
        let max_energy = (BASE_ENERGY * modifiers.role.energy_percent / 100.0).round();
        Self {
            position: level.start.position.to_world(),
            angle: normalize_angle(level.start.angle),
            health: max_health,
            max_health,
            energy: max_energy,
            max_energy,
            last_attack_at: None,
            alive: true,
        }
    }

    /// Adds `amount` (possibly negative) to the energy pool, clamped to its bounds.
    pub(crate) fn adjust_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).clamp(0.0, self.max_energy);
    }

    /// Adds `amount` (possibly negative) to the health pool, clamped to its bounds.
    pub(crate) fn adjust_health(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }
}

/// Hostile entity with per-behavior cooldowns.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: WorldPoint,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
    pub(crate) score: u32,
    /// Phase driving the orbit jitter.
    pub(crate) wobble: f32,
    pub(crate) spawn_timer: f32,
    pub(crate) ranged_timer: f32,
    pub(crate) melee_timer: f32,
    pub(crate) alive: bool,
}

impl Enemy {
    /// Creates an enemy with catalog stats scaled by the run modifiers.
    pub(crate) fn new(
        id: EnemyId,
        kind: EnemyKind,
        position: WorldPoint,
        modifiers: &RunModifiers,
        wobble: f32,
    ) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            position,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed * modifiers.enemy_speed(),
            damage: stats.damage * modifiers.enemy_damage(),
            score: stats.score,
            wobble,
            spawn_timer: 0.0,
            ranged_timer: 0.0,
            melee_timer: 0.0,
            alive: true,
        }
    }
}

/// Collectible placed in the level or dropped at runtime.
#[derive(Clone, Debug)]
pub(crate) struct Pickup {
    pub(crate) id: PickupId,
    pub(crate) kind: PickupKind,
    pub(crate) position: WorldPoint,
    pub(crate) label: String,
    pub(crate) alive: bool,
}

impl Pickup {
    /// Creates a live pickup, falling back to the catalog name for the label.
    pub(crate) fn new(
        id: PickupId,
        kind: PickupKind,
        position: WorldPoint,
        label: Option<String>,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            label: label.unwrap_or_else(|| kind.name().to_owned()),
            alive: true,
        }
    }
}

/// Wraps an angle into `[0, 2π)`.
pub(crate) fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed smallest difference `to - from`, in `(-π, π]`.
pub(crate) fn angle_delta(from: f32, to: f32) -> f32 {
    let delta = normalize_angle(to - from);
    if delta > std::f32::consts::PI {
        delta - TAU
    } else {
        delta
    }
}
