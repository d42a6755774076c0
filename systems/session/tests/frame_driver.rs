use std::{cell::RefCell, io, path::PathBuf, rc::Rc, time::Duration};

use cyberdoom_core::{InputVector, RunOutcome};
use cyberdoom_rendering::{FrameInput, Framebuffer};
use cyberdoom_system_analytics::{ScoreEntry, ScoreSink, ScoreboardError};
use cyberdoom_system_bootstrap::Catalog;
use cyberdoom_system_session::{
    FrameOutcome, Session, SessionConfig, SessionError, MAX_FRAME_DELTA,
};
use cyberdoom_world::query;

const CAMPAIGN: &str = r#"
[[levels]]
id = 10
name = "Server closet"
debriefing = "Backups restored."
map = [
  [1,1,1,1,1,1,1],
  [1,0,0,0,0,0,1],
  [1,0,0,0,0,0,1],
  [1,1,1,1,1,2,1],
]
start = { position = { x = 1.5, y = 1.5 } }
server_door = { position = { x = 1.5, y = 1.5 }, radius = 30.0, requires = ["backup_token"] }

[[levels.pickups]]
kind = "backup_token"
position = { x = 1.6, y = 1.5 }

[[levels]]
id = 11
name = "Ambush"
map = [
  [1,1,1,1,1,1,1],
  [1,0,0,0,0,0,1],
  [1,1,1,1,1,1,1],
]
start = { position = { x = 1.5, y = 1.5 } }

[[levels.enemies]]
kind = "insider"
position = { x = 4.5, y = 1.5 }
"#;

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<ScoreEntry>>>);

impl ScoreSink for Recorder {
    fn submit(&mut self, entry: ScoreEntry) -> Result<(), ScoreboardError> {
        self.0.borrow_mut().push(entry);
        Ok(())
    }
}

struct Offline;

impl ScoreSink for Offline {
    fn submit(&mut self, _entry: ScoreEntry) -> Result<(), ScoreboardError> {
        Err(ScoreboardError::Io {
            path: PathBuf::from("scores.bin"),
            source: io::Error::new(io::ErrorKind::Other, "offline"),
        })
    }
}

fn session(level: usize, sink: Box<dyn ScoreSink>) -> Session {
    let catalog = Catalog::with_levels(CAMPAIGN).expect("campaign parses");
    Session::new(
        catalog,
        SessionConfig {
            player_name: "Ada".to_owned(),
            level,
            seed: 7,
            ..SessionConfig::default()
        },
        sink,
    )
    .expect("level exists")
}

fn surface() -> Framebuffer {
    Framebuffer::new(32, 16).expect("valid size")
}

fn interact() -> FrameInput {
    FrameInput {
        controls: InputVector {
            interact: true,
            ..InputVector::default()
        },
        ..FrameInput::default()
    }
}

#[test]
fn long_frames_are_clamped() {
    let mut session = session(0, Box::new(Recorder::default()));
    let mut surface = surface();

    let outcome = session.frame(Duration::from_secs(2), FrameInput::default(), &mut surface);

    assert_eq!(outcome, FrameOutcome::Advanced);
    assert_eq!(query::now(session.world()), MAX_FRAME_DELTA);
    assert_ne!(surface, self::surface(), "frame was drawn");
}

#[test]
fn paused_sessions_neither_simulate_nor_draw() {
    let mut session = session(0, Box::new(Recorder::default()));
    let mut surface = surface();
    let toggle = FrameInput {
        pause_toggled: true,
        ..FrameInput::default()
    };

    assert_eq!(
        session.frame(Duration::from_millis(16), toggle, &mut surface),
        FrameOutcome::Paused
    );
    assert_eq!(
        session.frame(Duration::from_millis(16), interact(), &mut surface),
        FrameOutcome::Paused
    );
    assert_eq!(query::now(session.world()), Duration::ZERO);
    assert_eq!(surface, self::surface());
    assert!(session.hud().paused);

    assert_eq!(
        session.frame(Duration::from_millis(16), toggle, &mut surface),
        FrameOutcome::Advanced
    );
    assert!(!session.is_paused());
}

#[test]
fn winning_run_is_reported_and_submitted_once() {
    let recorder = Recorder::default();
    let mut session = session(0, Box::new(recorder.clone()));
    let mut surface = surface();

    assert_eq!(
        session.frame(Duration::from_millis(16), interact(), &mut surface),
        FrameOutcome::Advanced
    );
    assert_eq!(session.hud().score, 120);
    assert_eq!(session.hud().objective, "Reach the data server");

    let FrameOutcome::Completed(report) =
        session.frame(Duration::from_millis(16), interact(), &mut surface)
    else {
        panic!("second interaction should open the server door");
    };
    assert!(report.won());
    assert_eq!(report.level_id, 10);

    for _ in 0..5 {
        assert_eq!(
            session.frame(Duration::from_millis(16), interact(), &mut surface),
            FrameOutcome::Advanced
        );
    }

    let entries = recorder.0.borrow();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Ada");
    assert_eq!(entries[0].score, 120);
    assert_eq!(entries[0].level_name, "Server closet");
    assert_eq!(entries[0].role, "soc");

    let summary = session.summary().expect("run is over");
    assert_eq!(summary.title, "Mission complete");
    assert_eq!(summary.text, "Backups restored.");
    assert_eq!(summary.time, "0:00");
    assert!(!summary.restarts_campaign);

    let certificate = session.certificate().expect("won runs are certified");
    assert_eq!(certificate.name(), "Ada");
    assert_eq!(certificate.level(), 1);
}

#[test]
fn failed_submission_does_not_interrupt_the_frame_loop() {
    let mut session = session(0, Box::new(Offline));
    let mut surface = surface();

    let _ = session.frame(Duration::from_millis(16), interact(), &mut surface);
    let outcome = session.frame(Duration::from_millis(16), interact(), &mut surface);

    assert!(matches!(outcome, FrameOutcome::Completed(_)));
    assert_eq!(
        session.frame(Duration::from_millis(16), FrameInput::default(), &mut surface),
        FrameOutcome::Advanced
    );
}

#[test]
fn lost_runs_are_not_submitted() {
    let recorder = Recorder::default();
    let mut session = session(1, Box::new(recorder.clone()));
    let mut surface = surface();

    let mut report = None;
    for _ in 0..5_000 {
        if let FrameOutcome::Completed(done) =
            session.frame(MAX_FRAME_DELTA, FrameInput::default(), &mut surface)
        {
            report = Some(done);
            break;
        }
    }

    let report = report.expect("the insider eventually wins");
    assert_eq!(report.stats.outcome, Some(RunOutcome::Lost));
    assert!(report.damage_taken > 0.0);
    assert!(recorder.0.borrow().is_empty());
    assert!(session.certificate().is_none());

    let summary = session.summary().expect("run is over");
    assert_eq!(summary.title, "Mission failed");
    assert!(summary.restarts_campaign);
}

#[test]
fn retry_and_next_level_reload_state() {
    let mut session = session(0, Box::new(Recorder::default()));
    let mut surface = surface();
    let _ = session.frame(Duration::from_millis(16), interact(), &mut surface);
    assert_eq!(session.hud().score, 120);

    session.retry();
    assert_eq!(session.hud().score, 0);
    assert_eq!(query::level_index(session.world()), 0);
    assert!(session.summary().is_none());

    session.next_level();
    assert_eq!(session.hud().level_name, "Ambush");
    assert_eq!(query::enemies(session.world()).len(), 1);

    session.next_level();
    assert_eq!(query::level_index(session.world()), 0);
    assert_eq!(session.hud().toast.as_deref(), Some("Server closet"));
}

#[test]
fn unknown_start_level_is_rejected() {
    let catalog = Catalog::with_levels(CAMPAIGN).expect("campaign parses");

    let error = Session::new(
        catalog,
        SessionConfig {
            level: 4,
            ..SessionConfig::default()
        },
        Box::new(Recorder::default()),
    )
    .expect_err("only two levels exist");

    assert!(matches!(
        error,
        SessionError::UnknownLevel {
            index: 4,
            available: 2
        }
    ));
}
