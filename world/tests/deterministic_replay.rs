use std::time::Duration;

use cyberdoom_core::{
    Command, DifficultyModifiers, EnemyKind, EnemyPlacement, Event, GridMap, InputVector,
    LevelConfig, PickupKind, PickupPlacement, RunModifiers, RunStats, SeededRandom, ServerDoor,
    SpawnPose, Sprite, TilePoint,
};
use cyberdoom_world::{self as world, query, World};

#[test]
fn seeded_runs_replay_identically() {
    let script = input_script();
    let first = replay(0x00c0_ffee, &script);
    let second = replay(0x00c0_ffee, &script);

    assert_eq!(first, second, "replay diverged");
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::EnemySpawned { .. })),
        "spawner never fired during the script"
    );
    assert!(first.stats.elapsed > Duration::ZERO);
}

#[test]
fn load_level_command_restarts_replay_from_scratch() {
    let script = input_script();
    let mut world = World::new(
        0,
        level(),
        modifiers(),
        Box::new(SeededRandom::new(11)),
    );
    for input in &script {
        let mut events = Vec::new();
        world::apply(&mut world, tick(*input), &mut events);
    }

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadLevel {
            index: 0,
            level: Box::new(level()),
        },
        &mut events,
    );

    let stats = query::run_stats(&world);
    assert_eq!(stats.score, 0);
    assert_eq!(stats.kills, 0);
    assert_eq!(stats.outcome, None);
    assert_eq!(query::enemies(&world).len(), 4);
    assert_eq!(query::sprites(&world).len(), 5);
}

fn replay(seed: u64, script: &[InputVector]) -> ReplayOutcome {
    let mut world = World::new(0, level(), modifiers(), Box::new(SeededRandom::new(seed)));
    let mut events = Vec::new();

    for input in script {
        world::apply(&mut world, tick(*input), &mut events);
    }

    ReplayOutcome {
        events,
        stats: query::run_stats(&world),
        sprites: query::sprites(&world).to_vec(),
        objective: query::objective(&world).to_owned(),
    }
}

fn tick(input: InputVector) -> Command {
    Command::Tick {
        dt: Duration::from_millis(16),
        input,
    }
}

fn input_script() -> Vec<InputVector> {
    let mut script = Vec::new();
    for frame in 0..600_u32 {
        script.push(InputVector {
            forward: if frame % 120 < 60 { 1.0 } else { -0.5 },
            strafe: if frame % 90 < 30 { 0.5 } else { 0.0 },
            turn: if frame % 200 < 20 { 1.2 } else { 0.0 },
            run: frame % 50 < 10,
            shoot: frame % 7 == 0,
            interact: frame % 40 == 0,
        });
    }
    script
}

fn modifiers() -> RunModifiers {
    RunModifiers {
        difficulty: DifficultyModifiers {
            enemy_count: 1.34,
            ..DifficultyModifiers::default()
        },
        ..RunModifiers::default()
    }
}

fn level() -> LevelConfig {
    LevelConfig {
        id: 3,
        name: "Replay hall".to_owned(),
        briefing: String::new(),
        debriefing: String::new(),
        map: GridMap::from_rows(vec![
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 1, 0, 0, 0, 1, 0, 0, 1],
            vec![1, 0, 0, 0, 2, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 1, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        ])
        .expect("replay hall is closed"),
        start: SpawnPose {
            position: TilePoint::new(1.5, 1.5),
            angle: 0.0,
        },
        server_door: Some(ServerDoor {
            position: TilePoint::new(8.5, 5.5),
            radius: 30.0,
            requires: vec![PickupKind::SegmentationKey],
        }),
        exit_zone: None,
        pickups: vec![PickupPlacement {
            kind: PickupKind::SegmentationKey,
            position: TilePoint::new(5.5, 1.5),
            label: None,
        }],
        enemies: vec![
            EnemyPlacement {
                kind: EnemyKind::Malware,
                position: TilePoint::new(6.5, 1.5),
            },
            EnemyPlacement {
                kind: EnemyKind::Insider,
                position: TilePoint::new(7.5, 4.5),
            },
            EnemyPlacement {
                kind: EnemyKind::Ransomware,
                position: TilePoint::new(2.5, 4.5),
            },
        ],
    }
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    stats: RunStats,
    sprites: Vec<Sprite>,
    objective: String,
}
