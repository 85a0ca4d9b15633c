use std::time::Duration;

use path_defence_core::{Command, EnemySnapshot, Event, TileCoord, TowerId, TowerKind};
use path_defence_world::{self as world, query, World, WorldConfig};

const FRAME: Duration = Duration::from_nanos(16_666_667);

#[test]
fn deterministic_replay_produces_identical_sessions() {
    let script = scripted_commands();
    let first = replay(script.clone());
    let second = replay(script);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::TowerFired { .. })),
        "script must exercise combat"
    );
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::WaveStarted { wave: 2, .. })),
        "auto start must launch the second wave"
    );
}

#[test]
fn tower_order_follows_identifiers() {
    let outcome = replay(scripted_commands());

    let mut previous: Option<TowerId> = None;
    let mut last_tick_marker = 0usize;
    for (index, event) in outcome.events.iter().enumerate() {
        match event {
            Event::TimeAdvanced { .. } => {
                previous = None;
                last_tick_marker = index;
            }
            Event::TowerFired { tower, .. } => {
                if let Some(earlier) = previous {
                    assert!(
                        earlier < *tower,
                        "towers fired out of order after event {last_tick_marker}"
                    );
                }
                previous = Some(*tower);
            }
            _ => {}
        }
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::PlaceTower {
            kind: TowerKind::Basic,
            tile: TileCoord::new(3, 4),
        },
        Command::PlaceTower {
            kind: TowerKind::Basic,
            tile: TileCoord::new(13, 4),
        },
        Command::UpgradeTower {
            tower: TowerId::new(0),
        },
        Command::StartNextWave,
    ];
    commands.extend((0..3_600).map(|_| Command::Tick { dt: FRAME }));
    commands
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    enemies: Vec<EnemySnapshot>,
    money: u32,
    lives: u32,
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::with_config(WorldConfig {
        auto_start_waves: true,
        ..WorldConfig::default()
    });
    let mut events = Vec::new();

    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    ReplayOutcome {
        events,
        enemies: query::enemy_view(&world).into_vec(),
        money: query::money(&world),
        lives: query::lives(&world),
    }
}
