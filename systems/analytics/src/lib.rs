#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Post-run analytics for Cyberdoom.
//!
//! [`Analytics`] folds world events into a per-run tally and publishes a
//! [`RunReport`] exactly once when the run completes. The [`scoreboard`]
//! module keeps the local top scores and the [`certificate`] module issues
//! shareable completion certificates for winning runs.

use std::time::Duration;

use cyberdoom_core::{AttackRejection, Event, RunOutcome, RunStats};

pub mod certificate;
pub mod scoreboard;

pub use certificate::{Certificate, CertificateError, CERTIFICATE_HEADER};
pub use scoreboard::{
    FileScoreSink, ScoreEntry, ScoreSink, Scoreboard, ScoreboardError, SCOREBOARD_CAPACITY,
};

/// Formats an elapsed time as `m:ss`, truncating partial seconds.
#[must_use]
pub fn format_time(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Summary of a completed run, published once per run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Identifier of the level the run was played on.
    pub level_id: u32,
    /// Final statistics reported by the world.
    pub stats: RunStats,
    /// Total health lost to enemies.
    pub damage_taken: f32,
    /// Attacks that damaged or neutralized an enemy.
    pub hits: u32,
    /// Attacks that were rejected for lack of energy or while cooling down.
    pub blocked_attacks: u32,
    /// Attacks that found no target.
    pub misses: u32,
    /// Pickups consumed during the run.
    pub pickups: u32,
    /// Enemies produced by spawners during the run.
    pub spawned: u32,
}

impl RunReport {
    /// Whether the run ended in a win.
    #[must_use]
    pub fn won(&self) -> bool {
        self.stats.outcome == Some(RunOutcome::Won)
    }

    /// Share of attempted attacks that landed, in `[0, 1]`.
    #[must_use]
    pub fn accuracy(&self) -> f32 {
        let attempts = self.hits + self.misses;
        if attempts == 0 {
            return 0.0;
        }
        self.hits as f32 / attempts as f32
    }
}

#[derive(Clone, Debug, Default)]
struct RunTally {
    level_id: u32,
    damage_taken: f32,
    hits: u32,
    blocked_attacks: u32,
    misses: u32,
    pickups: u32,
    spawned: u32,
}

impl RunTally {
    fn into_report(self, stats: RunStats) -> RunReport {
        RunReport {
            level_id: self.level_id,
            stats,
            damage_taken: self.damage_taken,
            hits: self.hits,
            blocked_attacks: self.blocked_attacks,
            misses: self.misses,
            pickups: self.pickups,
            spawned: self.spawned,
        }
    }
}

/// Event-driven analytics system that tracks the run in progress.
#[derive(Debug, Default)]
pub struct Analytics {
    tally: Option<RunTally>,
    last_report: Option<RunReport>,
}

impl Analytics {
    /// Creates an analytics system that has not observed any run yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the report of the most recently completed run, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    /// Starts tracking a run on `level_id`, discarding any unfinished tally.
    ///
    /// Level loads observed through [`Analytics::handle`] do this implicitly.
    pub fn begin_run(&mut self, level_id: u32) {
        self.tally = Some(RunTally {
            level_id,
            ..RunTally::default()
        });
    }

    /// Consumes world events and returns a report when they complete the tracked run.
    ///
    /// Events observed before the first level load are ignored. A level load
    /// discards the tally of any unfinished run.
    pub fn handle(&mut self, events: &[Event]) -> Option<RunReport> {
        let mut published = None;

        for event in events {
            match event {
                Event::LevelLoaded { level_id, .. } => self.begin_run(*level_id),
                Event::RunCompleted { stats } => {
                    if let Some(tally) = self.tally.take() {
                        let report = tally.into_report(*stats);
                        log::debug!(
                            "run on level {} finished: {:?}, score {}",
                            report.level_id,
                            report.stats.outcome,
                            report.stats.score
                        );
                        self.last_report = Some(report.clone());
                        published = Some(report);
                    }
                }
                other => {
                    if let Some(tally) = self.tally.as_mut() {
                        record(tally, other);
                    }
                }
            }
        }

        published
    }
}

fn record(tally: &mut RunTally, event: &Event) {
    match event {
        Event::PlayerDamaged { amount, .. } => tally.damage_taken += amount,
        Event::EnemyHit { .. } | Event::EnemyNeutralized { .. } => tally.hits += 1,
        Event::AttackRejected { reason } => match reason {
            AttackRejection::NoTarget => tally.misses += 1,
            AttackRejection::Cooldown | AttackRejection::InsufficientEnergy => {
                tally.blocked_attacks += 1;
            }
        },
        Event::PickupCollected { .. } => tally.pickups += 1,
        Event::EnemySpawned { .. } => tally.spawned += 1,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_truncates_to_whole_seconds() {
        assert_eq!(format_time(Duration::ZERO), "0:00");
        assert_eq!(format_time(Duration::from_millis(59_999)), "0:59");
        assert_eq!(format_time(Duration::from_secs(61)), "1:01");
        assert_eq!(format_time(Duration::from_secs(754)), "12:34");
    }

    #[test]
    fn accuracy_ignores_blocked_attacks() {
        let report = RunTally {
            hits: 3,
            misses: 1,
            blocked_attacks: 40,
            ..RunTally::default()
        }
        .into_report(RunStats::default());

        assert!((report.accuracy() - 0.75).abs() < f32::EPSILON);
        assert!(!report.won());
    }

    #[test]
    fn events_before_first_load_are_ignored() {
        let mut analytics = Analytics::new();

        let report = analytics.handle(&[Event::RunCompleted {
            stats: RunStats::default(),
        }]);

        assert!(report.is_none());
        assert!(analytics.tally.is_none());

        analytics.begin_run(9);
        let report = analytics
            .handle(&[Event::RunCompleted {
                stats: RunStats::default(),
            }])
            .expect("tracked run");
        assert_eq!(report.level_id, 9);
    }
}
