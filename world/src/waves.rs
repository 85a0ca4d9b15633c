//! Wave progression, timed spawning and ownership of live enemies.

use std::time::Duration;

use path_defence_core::{
    EnemyId, EnemyKind, Event, Wave, WaveEntry, WaveStartError, WaveStatus,
};
use tracing::{debug, info};

use crate::{enemies::Enemy, route::Route};

/// Phase of the wave cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WavePhase {
    /// Waiting for the next wave; the countdown gates automatic starts.
    Idle { countdown: Duration },
    /// Spawning or fighting the wave at the current index.
    Active { cursor: usize, countdown: Duration },
    /// Every wave was cleared.
    Complete,
}

/// Drives the wave roster and owns every enemy that is still tracked.
///
/// Enemies that died or reached the end stay in the live set until the wave
/// they belong to is cleared, so callers have at least one full tick to
/// observe them after they turn terminal.
#[derive(Clone, Debug)]
pub struct WaveManager {
    waves: Vec<Wave>,
    wave_index: usize,
    phase: WavePhase,
    live: Vec<Enemy>,
    next_enemy_id: u32,
}

impl WaveManager {
    /// Creates a manager running the built-in five wave roster.
    #[must_use]
    pub fn new() -> Self {
        Self::with_waves(default_waves())
    }

    /// Creates a manager running the provided waves in order.
    #[must_use]
    pub fn with_waves(waves: Vec<Wave>) -> Self {
        let phase = if waves.is_empty() {
            WavePhase::Complete
        } else {
            WavePhase::Idle {
                countdown: Duration::ZERO,
            }
        };
        Self {
            waves,
            wave_index: 0,
            phase,
            live: Vec::new(),
            next_enemy_id: 0,
        }
    }

    /// Starts the upcoming wave, skipping any remaining countdown.
    pub fn start_next_wave(&mut self, out_events: &mut Vec<Event>) -> Result<(), WaveStartError> {
        match self.phase {
            WavePhase::Active { .. } => return Err(WaveStartError::WaveInProgress),
            WavePhase::Complete => return Err(WaveStartError::NoWavesRemaining),
            WavePhase::Idle { .. } => {}
        }

        let Some(wave) = self.waves.get(self.wave_index) else {
            return Err(WaveStartError::NoWavesRemaining);
        };

        let first_offset = wave
            .entries()
            .first()
            .map_or(Duration::ZERO, |entry| entry.offset);
        let enemies = wave.entries().len();
        self.phase = WavePhase::Active {
            cursor: 0,
            countdown: first_offset,
        };

        let wave_number = self.current_wave_number();
        info!(wave = wave_number, enemies, "wave started");
        out_events.push(Event::WaveStarted {
            wave: wave_number,
            enemies,
        });
        Ok(())
    }

    /// Advances the wave cycle by `dt`.
    ///
    /// Spawns every roster entry that came due during the step, checks
    /// whether the active wave has been cleared and finally moves the live
    /// enemies along `route`.
    pub fn tick(&mut self, dt: Duration, route: &Route, out_events: &mut Vec<Event>) {
        match self.phase {
            WavePhase::Idle { countdown } => {
                self.phase = WavePhase::Idle {
                    countdown: countdown.saturating_sub(dt),
                };
            }
            WavePhase::Active { .. } => {
                self.spawn_due(dt, route, out_events);
                self.check_cleared(out_events);
            }
            WavePhase::Complete => {}
        }

        for enemy in &mut self.live {
            enemy.advance(dt, route);
        }
    }

    /// Reports whether a wave is spawning or still has live enemies.
    #[must_use]
    pub fn is_wave_active(&self) -> bool {
        matches!(self.phase, WavePhase::Active { .. })
    }

    /// Reports whether every wave has been cleared.
    #[must_use]
    pub fn all_waves_complete(&self) -> bool {
        self.phase == WavePhase::Complete
    }

    /// One-based number of the current or upcoming wave.
    #[must_use]
    pub fn current_wave_number(&self) -> u32 {
        let index = self.wave_index.min(self.waves.len().saturating_sub(1));
        u32::try_from(index).map_or(u32::MAX, |index| index.saturating_add(1))
    }

    /// Number of waves in the roster.
    #[must_use]
    pub fn total_waves(&self) -> u32 {
        u32::try_from(self.waves.len()).unwrap_or(u32::MAX)
    }

    /// Remaining pause before the next wave, zero when none is running.
    #[must_use]
    pub fn time_until_next_wave(&self) -> Duration {
        match self.phase {
            WavePhase::Idle { countdown } => countdown,
            WavePhase::Active { .. } | WavePhase::Complete => Duration::ZERO,
        }
    }

    /// Summary of wave progression.
    #[must_use]
    pub fn status(&self) -> WaveStatus {
        WaveStatus {
            wave_number: self.current_wave_number(),
            total_waves: self.total_waves(),
            active: self.is_wave_active(),
            time_until_next_wave: self.time_until_next_wave(),
            all_complete: self.all_waves_complete(),
        }
    }

    /// Enemies tracked by the current wave, in spawn order.
    #[must_use]
    pub fn live_enemies(&self) -> &[Enemy] {
        &self.live
    }

    /// Mutable access to the tracked enemies, in spawn order.
    pub fn live_enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.live
    }

    /// Looks up a tracked enemy.
    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.live.iter().find(|enemy| enemy.id() == id)
    }

    fn spawn_due(&mut self, dt: Duration, route: &Route, out_events: &mut Vec<Event>) {
        let WavePhase::Active {
            mut cursor,
            mut countdown,
        } = self.phase
        else {
            return;
        };
        let Some(wave) = self.waves.get(self.wave_index) else {
            return;
        };
        let entries = wave.entries();

        let mut budget = dt;
        let mut due = Vec::new();
        while let Some(entry) = entries.get(cursor) {
            if countdown > budget {
                countdown -= budget;
                break;
            }

            budget -= countdown;
            due.push(entry.kind);
            cursor += 1;
            countdown = entries
                .get(cursor)
                .map_or(Duration::ZERO, |next| next.offset.saturating_sub(entry.offset));
        }

        self.phase = WavePhase::Active { cursor, countdown };
        for kind in due {
            self.spawn(kind, route, out_events);
        }
    }

    fn spawn(&mut self, kind: EnemyKind, route: &Route, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);

        let position = route.start().unwrap_or_default();
        self.live.push(Enemy::spawn(id, kind, position));
        debug!(enemy = id.get(), ?kind, "enemy spawned");
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            position,
        });
    }

    fn check_cleared(&mut self, out_events: &mut Vec<Event>) {
        let WavePhase::Active { cursor, .. } = self.phase else {
            return;
        };
        let Some(wave) = self.waves.get(self.wave_index) else {
            return;
        };
        if cursor < wave.entries().len() || self.live.iter().any(|enemy| !enemy.is_terminal()) {
            return;
        }

        let delay = wave.delay_after();
        let cleared = self.current_wave_number();
        self.live.clear();

        if self.wave_index + 1 < self.waves.len() {
            self.wave_index += 1;
            self.phase = WavePhase::Idle { countdown: delay };
            info!(wave = cleared, next_in = ?delay, "wave cleared");
            out_events.push(Event::WaveCleared {
                wave: cleared,
                next_wave_in: Some(delay),
            });
        } else {
            self.phase = WavePhase::Complete;
            info!(wave = cleared, "final wave cleared");
            out_events.push(Event::WaveCleared {
                wave: cleared,
                next_wave_in: None,
            });
            out_events.push(Event::AllWavesComplete);
        }
    }
}

impl Default for WaveManager {
    fn default() -> Self {
        Self::new()
    }
}

/// The five wave roster shipped with the game.
#[must_use]
pub fn default_waves() -> Vec<Wave> {
    let rosters: [(Vec<WaveEntry>, u64); 5] = [
        (spaced(EnemyKind::Basic, 5, 0, 1000).collect(), 5),
        (spaced(EnemyKind::Basic, 8, 0, 800).collect(), 8),
        (
            spaced(EnemyKind::Basic, 6, 0, 1000)
                .chain(spaced(EnemyKind::Fast, 3, 6000, 500))
                .collect(),
            10,
        ),
        (
            spaced(EnemyKind::Basic, 4, 0, 500)
                .chain(spaced(EnemyKind::Tank, 2, 2000, 2000))
                .chain(spaced(EnemyKind::Fast, 4, 6000, 300))
                .collect(),
            12,
        ),
        (
            spaced(EnemyKind::Basic, 10, 0, 300)
                .chain(spaced(EnemyKind::Fast, 5, 3000, 400))
                .chain(spaced(EnemyKind::Tank, 3, 5000, 1500))
                .collect(),
            0,
        ),
    ];

    rosters
        .into_iter()
        .map(|(entries, delay_secs)| {
            Wave::new(entries, Duration::from_secs(delay_secs))
                .expect("built-in wave rosters are ordered and non-empty")
        })
        .collect()
}

fn spaced(
    kind: EnemyKind,
    count: u64,
    start_millis: u64,
    spacing_millis: u64,
) -> impl Iterator<Item = WaveEntry> {
    (0..count).map(move |index| {
        WaveEntry::new(
            kind,
            Duration::from_millis(start_millis + index * spacing_millis),
        )
    })
}
