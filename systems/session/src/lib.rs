#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver for Cyberdoom runs.
//!
//! A [`Session`] owns the live world and advances it by exactly one
//! simulation step followed by one render per frame. It also handles pause,
//! retry and level progression, and hands finished runs to the analytics
//! collaborators.

use std::time::Duration;

use cyberdoom_core::{Command, Event, RunOutcome, SeededRandom};
use cyberdoom_rendering::{Camera, FrameInput, RasterSurface, Renderer, Scene};
use cyberdoom_system_analytics::{
    format_time, Analytics, Certificate, RunReport, ScoreEntry, ScoreSink,
};
use cyberdoom_system_bootstrap::{Bootstrap, Catalog};
use cyberdoom_world::{self as world, query, World};
use thiserror::Error;

/// Longest simulated step taken for a single frame.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(50);

const GUEST_NAME: &str = "Guest";
const WIN_TITLE: &str = "Mission complete";
const LOSS_TITLE: &str = "Mission failed";
const WIN_FALLBACK_TEXT: &str = "Good work.";
const LOSS_TEXT: &str =
    "The simulation overwhelmed you. Retry while managing energy and distance.";

/// Reasons a session cannot start.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested level does not exist in the catalog.
    #[error("level {index} does not exist (campaign has {available} levels)")]
    UnknownLevel {
        /// Requested zero-based index.
        index: usize,
        /// Number of levels in the catalog.
        available: usize,
    },
}

/// Choices that shape a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Name recorded on scores and certificates.
    pub player_name: String,
    /// Selected role id.
    pub role: String,
    /// Selected difficulty id.
    pub difficulty: String,
    /// Zero-based index of the first level.
    pub level: usize,
    /// Seed for every random decision of the session.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_name: GUEST_NAME.to_owned(),
            role: cyberdoom_system_bootstrap::DEFAULT_ROLE.to_owned(),
            difficulty: cyberdoom_system_bootstrap::DEFAULT_DIFFICULTY.to_owned(),
            level: 0,
            seed: 0,
        }
    }
}

/// What a call to [`Session::frame`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// The session is paused; nothing was simulated or drawn.
    Paused,
    /// The world advanced and the frame was drawn.
    Advanced,
    /// The run completed during this frame.
    Completed(RunReport),
}

/// Values shown on the heads-up display.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    /// Display name of the selected role.
    pub role_name: String,
    /// Display name of the current level.
    pub level_name: String,
    /// Current objective.
    pub objective: String,
    /// Accumulated score.
    pub score: u32,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Current energy.
    pub energy: f32,
    /// Maximum energy.
    pub max_energy: f32,
    /// Notification to show, if one is still visible.
    pub toast: Option<String>,
    /// Whether the session is paused.
    pub paused: bool,
}

/// End-of-run screen contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Headline.
    pub title: &'static str,
    /// Debriefing or advice.
    pub text: String,
    /// Final score.
    pub score: u32,
    /// Elapsed time as `m:ss`.
    pub time: String,
    /// Enemies neutralized.
    pub kills: u32,
    /// Whether the next action starts the campaign over.
    pub restarts_campaign: bool,
}

/// Single live run plus the collaborators that observe it.
pub struct Session {
    catalog: Catalog,
    config: SessionConfig,
    world: World,
    renderer: Renderer,
    analytics: Analytics,
    sink: Box<dyn ScoreSink>,
    events: Vec<Event>,
    paused: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("level", &query::level_index(&self.world))
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Starts a session on the configured level.
    pub fn new(
        catalog: Catalog,
        config: SessionConfig,
        sink: Box<dyn ScoreSink>,
    ) -> Result<Self, SessionError> {
        let level = catalog
            .level(config.level)
            .cloned()
            .ok_or(SessionError::UnknownLevel {
                index: config.level,
                available: catalog.levels().len(),
            })?;
        let modifiers = catalog.modifiers(&config.role, &config.difficulty);
        let mut analytics = Analytics::new();
        analytics.begin_run(level.id);

        log::info!(
            "session started as {} ({}/{}) on level {}",
            config.player_name,
            config.role,
            config.difficulty,
            level.id
        );
        let world = World::new(
            config.level,
            level,
            modifiers,
            Box::new(SeededRandom::new(config.seed)),
        );

        Ok(Self {
            catalog,
            config,
            world,
            renderer: Renderer::new(),
            analytics,
            sink,
            events: Vec::new(),
            paused: false,
        })
    }

    /// Advances the session by one frame and draws it.
    ///
    /// `dt` is clamped to [`MAX_FRAME_DELTA`]. While paused the world is
    /// neither simulated nor drawn.
    pub fn frame(
        &mut self,
        dt: Duration,
        input: FrameInput,
        surface: &mut dyn RasterSurface,
    ) -> FrameOutcome {
        if input.pause_toggled {
            self.toggle_pause();
        }
        if self.paused {
            return FrameOutcome::Paused;
        }

        self.events.clear();
        world::apply(
            &mut self.world,
            Command::Tick {
                dt: dt.min(MAX_FRAME_DELTA),
                input: input.controls,
            },
            &mut self.events,
        );
        let report = self.analytics.handle(&self.events);

        let player = query::player(&self.world);
        self.renderer.render(
            &Scene {
                map: query::map(&self.world),
                camera: Camera::new(player.position, player.angle),
                sprites: query::sprites(&self.world),
                show_minimap: input.show_minimap,
            },
            surface,
        );

        match report {
            Some(report) => {
                self.submit(&report);
                FrameOutcome::Completed(report)
            }
            None => FrameOutcome::Advanced,
        }
    }

    fn submit(&mut self, report: &RunReport) {
        log::info!(
            "run finished: {:?} with score {} in {}",
            report.stats.outcome,
            report.stats.score,
            format_time(report.stats.elapsed)
        );
        if !report.won() {
            return;
        }
        let level = query::level(&self.world);
        let entry = ScoreEntry {
            name: self.config.player_name.clone(),
            score: report.stats.score,
            time_ms: u64::try_from(report.stats.elapsed.as_millis()).unwrap_or(u64::MAX),
            kills: report.stats.kills,
            level_id: level.id,
            level_name: level.name.clone(),
            role: self.catalog.role(&self.config.role).id.clone(),
            difficulty: self.catalog.difficulty(&self.config.difficulty).id.clone(),
        };
        if let Err(error) = self.sink.submit(entry) {
            log::warn!("score submission failed: {error}");
        }
    }

    /// Flips the pause flag.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::debug!("paused: {}", self.paused);
    }

    /// Whether the session is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Restarts the current level.
    pub fn retry(&mut self) {
        self.load(query::level_index(&self.world));
    }

    /// Loads the next level, wrapping to the first after the last one.
    pub fn next_level(&mut self) {
        let next = self
            .catalog
            .next_level_index(query::level_index(&self.world));
        self.load(next);
    }

    fn load(&mut self, index: usize) {
        let Some(level) = self.catalog.level(index).cloned() else {
            return;
        };
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::LoadLevel {
                index,
                level: Box::new(level),
            },
            &mut self.events,
        );
        let _ = self.analytics.handle(&self.events);
        self.paused = false;
    }

    /// The live world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the most recent frame or level load.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Heads-up display values for the current frame.
    #[must_use]
    pub fn hud(&self) -> Hud {
        let player = query::player(&self.world);
        Hud {
            role_name: self.catalog.role(&self.config.role).name.clone(),
            level_name: query::level(&self.world).name.clone(),
            objective: query::objective(&self.world).to_owned(),
            score: query::run_stats(&self.world).score,
            health: player.health,
            max_health: player.max_health,
            energy: player.energy,
            max_energy: player.max_energy,
            toast: query::toast(&self.world).map(|toast| toast.message.clone()),
            paused: self.paused,
        }
    }

    /// Briefing text of the current level.
    #[must_use]
    pub fn briefing(&self) -> &str {
        Bootstrap.briefing(&self.world)
    }

    /// End-of-run screen contents once the run has completed.
    #[must_use]
    pub fn summary(&self) -> Option<RunSummary> {
        let stats = query::run_stats(&self.world);
        let outcome = stats.outcome?;
        let (title, text) = match outcome {
            RunOutcome::Won => {
                let debriefing = Bootstrap.debriefing(&self.world);
                let text = if debriefing.is_empty() {
                    WIN_FALLBACK_TEXT
                } else {
                    debriefing
                };
                (WIN_TITLE, text.to_owned())
            }
            RunOutcome::Lost => (LOSS_TITLE, LOSS_TEXT.to_owned()),
        };
        let index = query::level_index(&self.world);
        Some(RunSummary {
            title,
            text,
            score: stats.score,
            time: format_time(stats.elapsed),
            kills: stats.kills,
            restarts_campaign: index + 1 >= self.catalog.levels().len(),
        })
    }

    /// Certificate for the current run, available once it has been won.
    #[must_use]
    pub fn certificate(&self) -> Option<Certificate> {
        let stats = query::run_stats(&self.world);
        let level = u32::try_from(query::level_index(&self.world) + 1).unwrap_or(u32::MAX);
        Certificate::issue(&self.config.player_name, &stats, level)
    }
}
