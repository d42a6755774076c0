#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Cyberdoom.
//!
//! The [`World`] owns every piece of mutable run state. Adapters mutate it only
//! through [`apply`] and observe it only through the functions in [`query`];
//! renderers therefore take a read-only borrow for the duration of a frame.

mod combat;
mod enemies;
mod entities;
mod interaction;
mod movement;

use std::{collections::BTreeSet, f32::consts::TAU, time::Duration};

use cyberdoom_core::{
    Command, EnemyId, EnemyKind, Event, InputVector, LevelConfig, PickupId, PickupKind,
    RandomSource, RunModifiers, RunOutcome, Sprite, SpriteKind, Toast, WorldPoint, TILE_SIZE,
    WELCOME_BANNER,
};

use entities::{normalize_angle, Enemy, Pickup, Player};

/// How long a toast remains visible.
const TOAST_LIFETIME: Duration = Duration::from_millis(1_800);
/// Player walking speed in world units per second.
const PLAYER_SPEED: f32 = 120.0;
const RUN_MULTIPLIER: f32 = 1.55;
/// Energy regained per second.
const ENERGY_REGEN: f32 = 6.0;
/// Energy spent per second while running.
const RUN_DRAIN: f32 = 18.0;
/// Running requires strictly more energy than this.
const RUN_ENERGY_FLOOR: f32 = 10.0;
/// Maximum offset of difficulty extras from their anchor placement.
const EXTRA_ENEMY_SPREAD: f32 = TILE_SIZE * 1.5;
/// Probability that a damage application surfaces a toast.
const DAMAGE_NOTICE_CHANCE: f32 = 0.5;

/// Represents the authoritative Cyberdoom world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    level_index: usize,
    level: LevelConfig,
    modifiers: RunModifiers,
    random: Box<dyn RandomSource>,
    clock: Duration,
    player: Player,
    enemies: Vec<Enemy>,
    pickups: Vec<Pickup>,
    inventory: BTreeSet<PickupKind>,
    score: u32,
    kills: u32,
    started_at: Duration,
    ended_at: Option<Duration>,
    outcome: Option<RunOutcome>,
    objective: String,
    toast: Option<Toast>,
    sprites: Vec<Sprite>,
    next_enemy_id: u32,
    next_pickup_id: u32,
}

impl World {
    /// Creates a world running the provided level.
    ///
    /// The modifiers stay fixed for the lifetime of the world; later
    /// [`Command::LoadLevel`] commands reuse them.
    #[must_use]
    pub fn new(
        index: usize,
        level: LevelConfig,
        modifiers: RunModifiers,
        random: Box<dyn RandomSource>,
    ) -> Self {
        let player = Player::spawn(&level, &modifiers);
        let mut world = Self {
            banner: WELCOME_BANNER,
            level_index: index,
            level,
            modifiers,
            random,
            clock: Duration::ZERO,
            player,
            enemies: Vec::new(),
            pickups: Vec::new(),
            inventory: BTreeSet::new(),
            score: 0,
            kills: 0,
            started_at: Duration::ZERO,
            ended_at: None,
            outcome: None,
            objective: String::new(),
            toast: None,
            sprites: Vec::new(),
            next_enemy_id: 0,
            next_pickup_id: 0,
        };
        let mut discarded = Vec::new();
        world.reset(index, &mut discarded);
        world
    }

    fn reset(&mut self, index: usize, out_events: &mut Vec<Event>) {
        self.level_index = index;
        self.player = Player::spawn(&self.level, &self.modifiers);
        self.inventory.clear();
        self.score = 0;
        self.kills = 0;
        self.started_at = self.clock;
        self.ended_at = None;
        self.outcome = None;
        self.toast = None;
        self.next_enemy_id = 0;
        self.next_pickup_id = 0;

        self.enemies.clear();
        let placements = self.level.enemies.clone();
        for placement in &placements {
            let id = self.allocate_enemy_id();
            let wobble = self.random.range(0.0, TAU);
            self.enemies.push(Enemy::new(
                id,
                placement.kind,
                placement.position.to_world(),
                &self.modifiers,
                wobble,
            ));
        }

        let extras = self.modifiers.extra_enemies(placements.len());
        for _ in 0..extras {
            let anchor = placements[self.random.index(placements.len())]
                .position
                .to_world();
            let candidate = anchor.offset(
                self.random.range(-EXTRA_ENEMY_SPREAD, EXTRA_ENEMY_SPREAD),
                self.random.range(-EXTRA_ENEMY_SPREAD, EXTRA_ENEMY_SPREAD),
            );
            let position = if self.level.map.is_wall(candidate) {
                anchor
            } else {
                candidate
            };
            let id = self.allocate_enemy_id();
            let wobble = self.random.range(0.0, TAU);
            self.enemies.push(Enemy::new(
                id,
                EnemyKind::Malware,
                position,
                &self.modifiers,
                wobble,
            ));
        }

        self.pickups.clear();
        let pickups = self.level.pickups.clone();
        for placement in pickups {
            let id = self.allocate_pickup_id();
            self.pickups.push(Pickup::new(
                id,
                placement.kind,
                placement.position.to_world(),
                placement.label,
            ));
        }

        log::info!(
            "loaded level {} ({}) with {} enemies and {} pickups",
            self.level.id,
            self.level.name,
            self.enemies.len(),
            self.pickups.len()
        );
        out_events.push(Event::LevelLoaded {
            index,
            level_id: self.level.id,
        });
        let name = self.level.name.clone();
        self.notify(name);
        self.refresh_views();
    }

    fn tick(&mut self, dt: Duration, input: InputVector, out_events: &mut Vec<Event>) {
        if self.is_complete() {
            return;
        }

        self.clock = self.clock.saturating_add(dt);
        let seconds = dt.as_secs_f32();
        let input = input.clamped();

        self.advance_player(seconds, input);

        if input.shoot {
            combat::attack(self, out_events);
        }
        if input.interact {
            interaction::interact(self, out_events);
        }

        if !self.is_complete() {
            for index in 0..self.enemies.len() {
                enemies::think(self, index, seconds, out_events);
            }
        }

        if !self.is_complete() && self.player.health <= 0.0 {
            self.player.alive = false;
            self.notify("You fell in the crisis simulation.");
            self.complete(RunOutcome::Lost, out_events);
        }

        if !self.is_complete() && self.in_exit_zone() {
            self.complete(RunOutcome::Won, out_events);
        }

        self.refresh_views();
        log::trace!(
            "tick {:?}: player at ({:.1}, {:.1}) hp {:.0} energy {:.0}",
            self.clock,
            self.player.position.x,
            self.player.position.y,
            self.player.health,
            self.player.energy
        );
    }

    fn advance_player(&mut self, dt: f32, input: InputVector) {
        let player = &mut self.player;
        player.adjust_energy(ENERGY_REGEN * dt);
        player.angle = normalize_angle(player.angle + input.turn * dt);

        let mut speed = PLAYER_SPEED;
        if input.run && player.energy > RUN_ENERGY_FLOOR {
            speed *= RUN_MULTIPLIER;
            player.adjust_energy(-RUN_DRAIN * dt);
        }

        let (sin, cos) = player.angle.sin_cos();
        let vx = (cos * input.forward - sin * input.strafe) * speed;
        let vy = (sin * input.forward + cos * input.strafe) * speed;
        player.position = movement::slide(
            &self.level.map,
            player.position,
            vx * dt,
            vy * dt,
            movement::PLAYER_RADIUS,
        );
    }

    fn in_exit_zone(&self) -> bool {
        let Some(zone) = self.level.exit_zone else {
            return false;
        };
        self.missing_token().is_none()
            && self.player.position.distance_to(zone.position.to_world()) < zone.radius
    }

    /// Marks the run as finished. Only the first call has any effect.
    pub(crate) fn complete(&mut self, outcome: RunOutcome, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        self.ended_at = Some(self.clock);
        let stats = query::run_stats(self);
        log::info!(
            "level {} finished: {:?} with score {} and {} kills",
            self.level.id,
            outcome,
            stats.score,
            stats.kills
        );
        out_events.push(Event::RunCompleted { stats });
    }

    fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    /// Replaces the current toast.
    pub(crate) fn notify(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: self.clock.saturating_add(TOAST_LIFETIME),
        });
    }

    /// Removes health from the player on behalf of an enemy.
    pub(crate) fn damage_player(
        &mut self,
        source: EnemyId,
        amount: f32,
        out_events: &mut Vec<Event>,
    ) {
        let before = self.player.health;
        self.player.adjust_health(-amount);
        out_events.push(Event::PlayerDamaged {
            source,
            amount: before - self.player.health,
            health: self.player.health,
        });
        if self.random.chance(DAMAGE_NOTICE_CHANCE) {
            self.notify(format!("Impact: -{} health", amount.round()));
        }
    }

    /// Places a new pickup in the level at runtime.
    pub(crate) fn drop_pickup(
        &mut self,
        kind: PickupKind,
        position: WorldPoint,
        out_events: &mut Vec<Event>,
    ) {
        let id = self.allocate_pickup_id();
        self.pickups.push(Pickup::new(id, kind, position, None));
        out_events.push(Event::PickupDropped { pickup: id, kind });
    }

    pub(crate) fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }

    fn allocate_pickup_id(&mut self) -> PickupId {
        let id = PickupId::new(self.next_pickup_id);
        self.next_pickup_id = self.next_pickup_id.wrapping_add(1);
        id
    }

    fn missing_token(&self) -> Option<PickupKind> {
        self.level
            .required_tokens()
            .iter()
            .copied()
            .find(|kind| !self.inventory.contains(kind))
    }

    /// Text describing what the player should do next.
    pub(crate) fn describe_objective(&self) -> String {
        match self.missing_token() {
            Some(kind) => format!("Find the {} → then reach the data server", kind.name()),
            None => "Reach the data server".to_owned(),
        }
    }

    fn refresh_views(&mut self) {
        self.objective = self.describe_objective();
        self.sprites.clear();
        self.sprites.extend(
            self.enemies
                .iter()
                .filter(|enemy| enemy.alive)
                .map(|enemy| Sprite {
                    kind: SpriteKind::Enemy(enemy.kind),
                    position: enemy.position,
                }),
        );
        self.sprites.extend(
            self.pickups
                .iter()
                .filter(|pickup| pickup.alive)
                .map(|pickup| Sprite {
                    kind: SpriteKind::Pickup(pickup.kind),
                    position: pickup.position,
                }),
        );
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { index, level } => {
            world.level = *level;
            world.reset(index, out_events);
        }
        Command::Tick { dt, input } => world.tick(dt, input, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::{collections::BTreeSet, time::Duration};

    use super::World;
    use cyberdoom_core::{
        EnemyId, EnemyKind, GridMap, LevelConfig, PickupId, PickupKind, RunModifiers,
        RunOutcome, RunStats, Sprite, Toast, WorldPoint,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Position of the active level within the campaign.
    #[must_use]
    pub fn level_index(world: &World) -> usize {
        world.level_index
    }

    /// Configuration of the active level.
    #[must_use]
    pub fn level(world: &World) -> &LevelConfig {
        &world.level
    }

    /// Tile grid of the active level.
    #[must_use]
    pub fn map(world: &World) -> &GridMap {
        &world.level.map
    }

    /// Modifiers fixed for the run.
    #[must_use]
    pub fn modifiers(world: &World) -> &RunModifiers {
        &world.modifiers
    }

    /// Current simulation time.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.clock
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerView {
        let player = &world.player;
        PlayerView {
            position: player.position,
            angle: player.angle,
            health: player.health,
            max_health: player.max_health,
            energy: player.energy,
            max_energy: player.max_energy,
            last_attack_at: player.last_attack_at,
            alive: player.alive,
        }
    }

    /// Captures every enemy, including neutralized ones, in creation order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemyView> {
        world
            .enemies
            .iter()
            .map(|enemy| EnemyView {
                id: enemy.id,
                kind: enemy.kind,
                position: enemy.position,
                health: enemy.health,
                max_health: enemy.max_health,
                score: enemy.score,
                alive: enemy.alive,
            })
            .collect()
    }

    /// Captures every pickup, including consumed ones, in creation order.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupView> {
        world
            .pickups
            .iter()
            .map(|pickup| PickupView {
                id: pickup.id,
                kind: pickup.kind,
                position: pickup.position,
                label: pickup.label.clone(),
                alive: pickup.alive,
            })
            .collect()
    }

    /// Live enemies followed by live pickups, as of the last step.
    #[must_use]
    pub fn sprites(world: &World) -> &[Sprite] {
        &world.sprites
    }

    /// Tokens collected during the current level.
    #[must_use]
    pub fn inventory(world: &World) -> &BTreeSet<PickupKind> {
        &world.inventory
    }

    /// Human-readable description of the current objective.
    #[must_use]
    pub fn objective(world: &World) -> &str {
        &world.objective
    }

    /// Returns the active toast, if it has not expired yet.
    #[must_use]
    pub fn toast(world: &World) -> Option<&Toast> {
        world
            .toast
            .as_ref()
            .filter(|toast| toast.is_visible_at(world.clock))
    }

    /// Reports whether the run has reached a terminal state.
    #[must_use]
    pub fn is_complete(world: &World) -> bool {
        world.is_complete()
    }

    /// Simulation time at which the run ended.
    #[must_use]
    pub fn ended_at(world: &World) -> Option<Duration> {
        world.ended_at
    }

    /// Produces statistics for the current run.
    ///
    /// Elapsed time is frozen once the run completes.
    #[must_use]
    pub fn run_stats(world: &World) -> RunStats {
        let end = world.ended_at.unwrap_or(world.clock);
        RunStats {
            score: world.score,
            elapsed: end.saturating_sub(world.started_at),
            kills: world.kills,
            outcome: world.outcome,
        }
    }

    /// Outcome of the run once it has completed.
    #[must_use]
    pub fn outcome(world: &World) -> Option<RunOutcome> {
        world.outcome
    }

    /// Read-only snapshot of the player.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlayerView {
        /// Position in world units.
        pub position: WorldPoint,
        /// Facing angle in `[0, 2π)`.
        pub angle: f32,
        /// Current health.
        pub health: f32,
        /// Maximum health.
        pub max_health: f32,
        /// Current energy.
        pub energy: f32,
        /// Maximum energy.
        pub max_energy: f32,
        /// Simulation time of the last successful attack.
        pub last_attack_at: Option<Duration>,
        /// Whether the player is still alive.
        pub alive: bool,
    }

    /// Read-only snapshot of an enemy.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EnemyView {
        /// Unique identifier of the enemy.
        pub id: EnemyId,
        /// Catalog entry of the enemy.
        pub kind: EnemyKind,
        /// Position in world units.
        pub position: WorldPoint,
        /// Current health.
        pub health: f32,
        /// Maximum health.
        pub max_health: f32,
        /// Base score awarded for a kill before multipliers.
        pub score: u32,
        /// Whether the enemy is still active.
        pub alive: bool,
    }

    /// Read-only snapshot of a pickup.
    #[derive(Clone, Debug, PartialEq)]
    pub struct PickupView {
        /// Unique identifier of the pickup.
        pub id: PickupId,
        /// Catalog entry of the pickup.
        pub kind: PickupKind,
        /// Position in world units.
        pub position: WorldPoint,
        /// Display label.
        pub label: String,
        /// Whether the pickup can still be collected.
        pub alive: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyberdoom_core::{
        DifficultyModifiers, EnemyPlacement, GridMap, PickupPlacement, RoleModifiers,
        ScriptedRandom, ServerDoor, SpawnPose, TilePoint,
    };

    fn level() -> LevelConfig {
        LevelConfig {
            id: 7,
            name: "Vault".to_owned(),
            briefing: String::new(),
            debriefing: String::new(),
            map: GridMap::from_rows(vec![
                vec![1, 1, 1, 1, 1, 1],
                vec![1, 0, 0, 0, 0, 1],
                vec![1, 0, 0, 0, 0, 1],
                vec![1, 1, 1, 1, 1, 1],
            ])
            .expect("closed"),
            start: SpawnPose {
                position: TilePoint::new(1.5, 1.5),
                angle: 0.0,
            },
            server_door: Some(ServerDoor {
                position: TilePoint::new(4.5, 1.5),
                radius: 30.0,
                requires: vec![PickupKind::BackupToken],
            }),
            exit_zone: None,
            pickups: vec![PickupPlacement {
                kind: PickupKind::BackupToken,
                position: TilePoint::new(1.5, 2.5),
                label: None,
            }],
            enemies: Vec::new(),
        }
    }

    fn world() -> World {
        World::new(
            0,
            level(),
            RunModifiers::default(),
            Box::new(ScriptedRandom::constant(0.5)),
        )
    }

    #[test]
    fn completion_is_idempotent() {
        let mut world = world();
        world.score = 400;
        world.clock = Duration::from_secs(3);
        let mut events = Vec::new();

        world.complete(RunOutcome::Won, &mut events);
        let first_end = world.ended_at;
        world.clock = Duration::from_secs(9);
        world.score = 400;
        world.complete(RunOutcome::Won, &mut events);
        world.complete(RunOutcome::Lost, &mut events);

        assert_eq!(world.ended_at, first_end);
        assert_eq!(world.outcome, Some(RunOutcome::Won));
        assert_eq!(query::run_stats(&world).score, 400);
        assert_eq!(query::run_stats(&world).elapsed, Duration::from_secs(3));
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::RunCompleted { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn new_world_starts_with_level_toast_and_objective() {
        let world = world();

        assert_eq!(query::toast(&world).map(|t| t.message.as_str()), Some("Vault"));
        assert_eq!(
            query::objective(&world),
            "Find the Backup token → then reach the data server"
        );
        assert_eq!(query::sprites(&world).len(), 1);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn toast_hides_after_lifetime() {
        let mut world = world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(1_799),
                input: InputVector::default(),
            },
            &mut events,
        );
        assert!(query::toast(&world).is_some());

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(1),
                input: InputVector::default(),
            },
            &mut events,
        );
        assert!(query::toast(&world).is_none());
    }

    #[test]
    fn running_requires_energy_above_floor() {
        let mut world = world();
        world.player.energy = 9.9;
        let start = world.player.position;
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(10),
                input: InputVector {
                    forward: 1.0,
                    run: true,
                    ..InputVector::default()
                },
            },
            &mut events,
        );

        let moved = world.player.position.x - start.x;
        assert!(world.player.energy > 9.9 && world.player.energy < 10.0);
        assert!((moved - 1.2).abs() < 1e-3);
    }

    #[test]
    fn attack_at_exact_damage_neutralizes_and_scores_with_multipliers() {
        let mut level = level();
        level.enemies = vec![EnemyPlacement {
            kind: EnemyKind::Insider,
            position: TilePoint::new(3.5, 1.5),
        }];
        let modifiers = RunModifiers::new(
            RoleModifiers {
                score_multiplier: 1.15,
                ..RoleModifiers::default()
            },
            DifficultyModifiers {
                score_multiplier: 1.3,
                ..DifficultyModifiers::default()
            },
        );
        let mut world = World::new(0, level, modifiers, Box::new(ScriptedRandom::constant(0.5)));
        world.enemies[0].health = combat::ATTACK_DAMAGE;
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
                input: InputVector {
                    shoot: true,
                    ..InputVector::default()
                },
            },
            &mut events,
        );

        let enemy = &world.enemies[0];
        assert_eq!(enemy.health, 0.0);
        assert!(!enemy.alive);
        assert_eq!(world.kills, 1);
        assert_eq!(world.score, 209);
        assert!(events.contains(&Event::EnemyNeutralized {
            enemy: enemy.id,
            kind: EnemyKind::Insider,
            score: 209,
        }));
        assert!(query::sprites(&world)
            .iter()
            .all(|sprite| sprite.kind != SpriteKind::Enemy(EnemyKind::Insider)));
    }
}
