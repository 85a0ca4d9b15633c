#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Path Defence session headlessly.

mod config;
mod summary;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Result};
use clap::Parser;
use path_defence_core::{Command, TileCoord, TowerKind, WaveStatus};
use path_defence_world::{self as world, query, World};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{Scenario, TowerPlacement},
    summary::{Outcome, Summary},
};

/// Command-line arguments accepted by the headless runner.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Scenario manifest describing economy, waves and opening towers.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulation steps per simulated second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    tick_hz: u32,
    /// Upper bound on simulated time.
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f64,
    /// Additional opening tower written as `kind:column:row`, e.g. `sniper:3:4`.
    #[arg(long = "tower", value_parser = parse_tower)]
    towers: Vec<TowerPlacement>,
    /// Starts every wave as soon as its countdown elapses.
    #[arg(long)]
    auto_start: bool,
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let summary = run(&cli)?;
    println!("{summary}");
    Ok(())
}

fn run(cli: &Cli) -> Result<Summary> {
    ensure!(
        cli.max_seconds.is_finite() && cli.max_seconds >= 0.0,
        "--max-seconds must be a non-negative number"
    );

    let scenario = match &cli.config {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    let mut config = scenario.world_config()?;
    config.auto_start_waves |= cli.auto_start;
    let auto_start = config.auto_start_waves;

    let mut world = World::with_config(config);
    println!("{}", query::welcome_banner(&world));

    let mut summary = Summary::default();
    let mut events = Vec::new();
    for placement in scenario.towers().into_iter().chain(cli.towers.iter().copied()) {
        world::apply(
            &mut world,
            Command::PlaceTower {
                kind: placement.kind,
                tile: placement.tile,
            },
            &mut events,
        );
    }

    let dt = Duration::from_secs(1) / cli.tick_hz;
    let max_ticks = (cli.max_seconds * f64::from(cli.tick_hz)).ceil() as u64;
    info!(tick_hz = cli.tick_hz, max_ticks, "starting headless session");

    for _ in 0..max_ticks {
        if should_press_start(&query::wave_status(&world), auto_start) {
            world::apply(&mut world, Command::StartNextWave, &mut events);
        }

        world::apply(&mut world, Command::Tick { dt }, &mut events);
        for event in events.drain(..) {
            debug!(?event, "event");
            summary.record(&event);
        }
        if summary.is_finished() {
            break;
        }
    }

    match summary.outcome() {
        Outcome::Victory => info!(lives = query::lives(&world), "all waves cleared"),
        Outcome::Defeat => info!(tick = query::tick_index(&world), "defeated"),
        Outcome::TimedOut => info!(max_seconds = cli.max_seconds, "time limit reached"),
    }
    println!(
        "money: {}, lives: {}",
        query::money(&world),
        query::lives(&world)
    );
    Ok(summary)
}

/// Plays the player's part in starting waves. With auto start enabled the
/// world launches waves on its own and the runner stays out of the way.
fn should_press_start(status: &WaveStatus, auto_start: bool) -> bool {
    !auto_start && !status.active && !status.all_complete && status.time_until_next_wave.is_zero()
}

fn parse_tower(value: &str) -> Result<TowerPlacement, String> {
    let mut parts = value.split(':');
    let (Some(kind), Some(column), Some(row), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected `kind:column:row`, got `{value}`"));
    };

    let kind = match kind.to_ascii_lowercase().as_str() {
        "basic" => TowerKind::Basic,
        "sniper" => TowerKind::Sniper,
        "cannon" => TowerKind::Cannon,
        _ => return Err(format!("unknown tower kind `{kind}`")),
    };
    let column = column
        .parse()
        .map_err(|_| format!("invalid column `{column}`"))?;
    let row = row.parse().map_err(|_| format!("invalid row `{row}`"))?;

    Ok(TowerPlacement {
        kind,
        tile: TileCoord::new(column, row),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tower_accepts_known_kinds() {
        assert_eq!(
            parse_tower("sniper:3:4"),
            Ok(TowerPlacement {
                kind: TowerKind::Sniper,
                tile: TileCoord::new(3, 4),
            })
        );
        assert_eq!(
            parse_tower("Cannon:13:4").map(|placement| placement.kind),
            Ok(TowerKind::Cannon)
        );
    }

    #[test]
    fn parse_tower_rejects_malformed_values() {
        assert!(parse_tower("basic:3").is_err());
        assert!(parse_tower("basic:3:4:5").is_err());
        assert!(parse_tower("laser:3:4").is_err());
        assert!(parse_tower("basic:x:4").is_err());
    }

    #[test]
    fn cli_flags_parse() {
        let cli = Cli::try_parse_from([
            "path-defence",
            "--tick-hz",
            "30",
            "--tower",
            "basic:3:4",
            "--tower",
            "sniper:13:4",
            "--auto-start",
        ])
        .expect("flags parse");

        assert_eq!(cli.tick_hz, 30);
        assert_eq!(cli.towers.len(), 2);
        assert!(cli.auto_start);
        assert_eq!(cli.max_seconds, 600.0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn runner_presses_start_only_without_auto_start() {
        let ready = WaveStatus {
            wave_number: 1,
            total_waves: 5,
            active: false,
            time_until_next_wave: Duration::ZERO,
            all_complete: false,
        };
        assert!(should_press_start(&ready, false));
        assert!(!should_press_start(&ready, true));

        let waiting = WaveStatus {
            time_until_next_wave: Duration::from_secs(1),
            ..ready
        };
        assert!(!should_press_start(&waiting, false));

        let running = WaveStatus {
            active: true,
            ..ready
        };
        assert!(!should_press_start(&running, false));
    }

    #[test]
    fn auto_started_session_still_plays_waves() {
        let cli = Cli::try_parse_from(["path-defence", "--max-seconds", "2", "--auto-start"])
            .expect("flags parse");
        let summary = run(&cli).expect("session runs");
        assert_eq!(summary.outcome(), Outcome::TimedOut);
        assert!(!summary.to_string().contains("enemies: 0 spawned"));
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        assert!(Cli::try_parse_from(["path-defence", "--tick-hz", "0"]).is_err());
    }

    #[test]
    fn short_run_times_out() {
        let cli = Cli::try_parse_from(["path-defence", "--max-seconds", "2"]).expect("flags parse");
        let summary = run(&cli).expect("session runs");
        assert_eq!(summary.outcome(), Outcome::TimedOut);
    }
}
