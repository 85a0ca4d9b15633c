//! Running tally of a headless session.

use std::{fmt, time::Duration};

use path_defence_core::Event;

/// How a headless session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Every wave was cleared with lives to spare.
    Victory,
    /// The player ran out of lives.
    Defeat,
    /// The time limit elapsed first.
    TimedOut,
}

/// Counters accumulated from world events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    elapsed: Duration,
    waves_cleared: u32,
    spawned: u32,
    killed: u32,
    escaped: u32,
    shots: u32,
    earned: u32,
    victory: bool,
    defeat: bool,
}

impl Summary {
    pub(crate) fn record(&mut self, event: &Event) {
        match event {
            Event::TimeAdvanced { dt } => self.elapsed = self.elapsed.saturating_add(*dt),
            Event::WaveCleared { .. } => self.waves_cleared += 1,
            Event::AllWavesComplete => self.victory = true,
            Event::EnemySpawned { .. } => self.spawned += 1,
            Event::EnemyKilled { .. } => self.killed += 1,
            Event::EnemyReachedEnd { .. } => self.escaped += 1,
            Event::TowerFired { .. } => self.shots += 1,
            Event::RewardCollected { amount, .. } => {
                self.earned = self.earned.saturating_add(*amount);
            }
            Event::GameOver => self.defeat = true,
            _ => {}
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.victory || self.defeat
    }

    pub(crate) fn outcome(&self) -> Outcome {
        if self.defeat {
            Outcome::Defeat
        } else if self.victory {
            Outcome::Victory
        } else {
            Outcome::TimedOut
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "outcome: {:?}", self.outcome())?;
        writeln!(f, "simulated: {:.2}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "waves cleared: {}", self.waves_cleared)?;
        writeln!(
            f,
            "enemies: {} spawned, {} killed, {} escaped",
            self.spawned, self.killed, self.escaped
        )?;
        write!(f, "shots fired: {}, rewards earned: {}", self.shots, self.earned)
    }
}
