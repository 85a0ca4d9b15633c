#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects drivers and the
//! authoritative world. Drivers submit [`Command`] values describing desired
//! mutations, the world executes those commands via its `apply` entry point,
//! and then broadcasts [`Event`] values describing what happened. Stat tables
//! for every enemy and tower type live here so that all crates agree on a
//! single source of balance data.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Path Defence.";

/// Distance in world units at which an enemy counts as having reached a waypoint.
pub const WAYPOINT_ARRIVAL_RADIUS: f32 = 5.0;

/// Money available to the player when a session starts.
pub const DEFAULT_STARTING_MONEY: u32 = 150;

/// Lives available to the player when a session starts.
pub const DEFAULT_STARTING_LIVES: u32 = 20;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the upcoming wave begins spawning.
    StartNextWave,
    /// Requests placement of a tower on the provided tile.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Tile that should host the tower.
        tile: TileCoord,
    },
    /// Requests that an existing tower advances to its next level.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a wave became active.
    WaveStarted {
        /// One-based number of the wave.
        wave: u32,
        /// Number of enemies scheduled by the wave roster.
        enemies: usize,
    },
    /// Announces that every enemy of a wave spawned and finished.
    WaveCleared {
        /// One-based number of the wave that was cleared.
        wave: u32,
        /// Countdown before the following wave may start, if one remains.
        next_wave_in: Option<Duration>,
    },
    /// Announces that the final wave was cleared.
    AllWavesComplete,
    /// Reports that a wave start request was rejected.
    WaveStartRejected {
        /// Specific reason the wave could not start.
        reason: WaveStartError,
    },
    /// Confirms that an enemy entered the route.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Type preset applied to the enemy.
        kind: EnemyKind,
        /// World position of the enemy after spawning.
        position: Vec2,
    },
    /// Reports that an enemy walked off the end of the route.
    EnemyReachedEnd {
        /// Identifier of the enemy that arrived.
        enemy: EnemyId,
    },
    /// Reports that the player lost a life.
    LifeLost {
        /// Lives left after the loss.
        remaining: u32,
    },
    /// Reports that the player ran out of lives.
    GameOver,
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Tile occupied by the tower.
        tile: TileCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Tile provided in the placement request.
        tile: TileCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower advanced a level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached by the tower.
        level: TowerLevel,
    },
    /// Reports that a tower upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted by the request.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Reports that a tower shot at an enemy.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Damage applied by the shot.
        damage: u32,
    },
    /// Reports that a tower landed the lethal shot on an enemy.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Tower credited with the kill.
        tower: TowerId,
        /// Reward queued for the kill.
        reward: u32,
    },
    /// Reports that queued kill rewards were credited to the player.
    RewardCollected {
        /// Amount credited.
        amount: u32,
        /// Balance after crediting.
        balance: u32,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single map tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the neighbouring tile one step in `direction`, if it does not
    /// underflow the grid origin.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<TileCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

/// Cardinal directions across the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Probe order used when walking the path: east, south, west, north.
    pub const ROUTE_PROBE_ORDER: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];
}

/// Gameplay classification of a map tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Decorative ground that is neither walkable nor buildable.
    Grass,
    /// Part of the route walked by enemies.
    Path,
    /// Pad where a tower may be constructed.
    Buildable,
}

impl TileKind {
    /// Layout code used for path tiles.
    pub const PATH_CODE: u8 = 1;
    /// Layout code used for buildable tiles.
    pub const BUILDABLE_CODE: u8 = 2;

    /// Classifies a raw layout code. Every code other than the path and
    /// buildable codes is decorative grass.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            Self::PATH_CODE => Self::Path,
            Self::BUILDABLE_CODE => Self::Buildable,
            _ => Self::Grass,
        }
    }
}

/// Lifecycle state of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    /// Created at the route start and not yet moved.
    Spawned,
    /// Walking the route.
    Moving,
    /// Walked past the final waypoint.
    ReachedEnd,
    /// Health dropped to zero.
    Dead,
}

impl EnemyState {
    /// Reports whether no further simulation applies to the enemy.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::ReachedEnd | Self::Dead)
    }
}

/// Enemy archetypes that waves may spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Balanced walker.
    Basic,
    /// Fragile runner.
    Fast,
    /// Slow, heavily armoured walker.
    Tank,
}

impl EnemyKind {
    /// Stats applied to an enemy of this kind when it spawns.
    #[must_use]
    pub const fn preset(self) -> EnemyPreset {
        match self {
            Self::Basic => EnemyPreset {
                health: 100,
                speed: 150.0,
                reward: 10,
            },
            Self::Fast => EnemyPreset {
                health: 60,
                speed: 250.0,
                reward: 15,
            },
            Self::Tank => EnemyPreset {
                health: 250,
                speed: 80.0,
                reward: 25,
            },
        }
    }
}

/// Spawn-time stats of an enemy archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPreset {
    /// Maximum and starting health.
    pub health: u32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Money granted to the player for the kill.
    pub reward: u32,
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Balanced tower.
    Basic,
    /// Long range, heavy hits, slow fire.
    Sniper,
    /// Short range, very heavy hits, very slow fire.
    Cannon,
}

impl TowerKind {
    /// Every constructible tower kind.
    pub const ALL: [TowerKind; 3] = [TowerKind::Basic, TowerKind::Sniper, TowerKind::Cannon];

    /// Money required to construct the tower.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Basic => 30,
            Self::Sniper => 60,
            Self::Cannon => 80,
        }
    }

    /// Combat stats of the tower at the provided level.
    #[must_use]
    pub const fn stats(self, level: TowerLevel) -> TowerStats {
        match (self, level) {
            (Self::Basic, TowerLevel::One) => TowerStats::new(20, 0.8, 200.0, 180.0),
            (Self::Basic, TowerLevel::Two) => TowerStats::new(35, 1.2, 250.0, 240.0),
            (Self::Basic, TowerLevel::Three) => TowerStats::new(60, 1.8, 280.0, 320.0),
            (Self::Sniper, TowerLevel::One) => TowerStats::new(80, 0.3, 400.0, 120.0),
            (Self::Sniper, TowerLevel::Two) => TowerStats::new(120, 0.4, 450.0, 150.0),
            (Self::Sniper, TowerLevel::Three) => TowerStats::new(200, 0.5, 500.0, 180.0),
            (Self::Cannon, TowerLevel::One) => TowerStats::new(150, 0.2, 150.0, 90.0),
            (Self::Cannon, TowerLevel::Two) => TowerStats::new(250, 0.25, 170.0, 120.0),
            (Self::Cannon, TowerLevel::Three) => TowerStats::new(400, 0.3, 200.0, 150.0),
        }
    }

    /// Human readable name of the tower type.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic Tower",
            Self::Sniper => "Sniper Tower",
            Self::Cannon => "Cannon Tower",
        }
    }
}

/// Discrete upgrade level of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerLevel {
    /// Level reached on construction.
    One,
    /// Level reached after the first upgrade.
    Two,
    /// Maximum level.
    Three,
}

impl TowerLevel {
    /// Numeric representation of the level, starting at one.
    #[must_use]
    pub const fn get(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Level following this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<TowerLevel> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => None,
        }
    }

    /// Money required to advance from this level to the next.
    ///
    /// Returns zero at the maximum level.
    #[must_use]
    pub const fn upgrade_cost(self) -> u32 {
        match self {
            Self::One => 50,
            Self::Two => 100,
            Self::Three => 0,
        }
    }

    /// Human readable label such as `"Level 2"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::One => "Level 1",
            Self::Two => "Level 2",
            Self::Three => "Level 3",
        }
    }
}

/// Combat parameters of a tower at a given level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Damage applied per shot.
    pub damage: u32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Turret rotation speed in degrees per second.
    pub rotation_speed: f32,
}

impl TowerStats {
    const fn new(damage: u32, fire_rate: f32, range: f32, rotation_speed: f32) -> Self {
        Self {
            damage,
            fire_rate,
            range,
            rotation_speed,
        }
    }

    /// Minimum time between two shots.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.fire_rate)
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested tile lies outside the map.
    #[error("tile lies outside the map")]
    OutOfBounds,
    /// The requested tile is not a tower pad.
    #[error("tile is not buildable")]
    NotBuildable,
    /// A tower already stands on the requested tile.
    #[error("tile already hosts a tower")]
    Occupied,
    /// The player cannot pay for the tower.
    #[error("not enough money to build the tower")]
    InsufficientFunds,
    /// The session already ended.
    #[error("the game is over")]
    GameOver,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    MissingTower,
    /// The tower already reached the maximum level.
    #[error("tower is already at the maximum level")]
    MaxLevel,
    /// The player cannot pay for the upgrade.
    #[error("not enough money to upgrade the tower")]
    InsufficientFunds,
    /// The session already ended.
    #[error("the game is over")]
    GameOver,
}

/// Reasons a wave start request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum WaveStartError {
    /// A wave is currently spawning or still has live enemies.
    #[error("a wave is already in progress")]
    WaveInProgress,
    /// The pause after the previous wave has not elapsed.
    #[error("the inter-wave countdown is still running")]
    CountdownRunning,
    /// Every wave already ran.
    #[error("no waves remain")]
    NoWavesRemaining,
    /// The session already ended.
    #[error("the game is over")]
    GameOver,
}

/// Single scheduled spawn within a wave roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveEntry {
    /// Archetype of the enemy to spawn.
    pub kind: EnemyKind,
    /// Time since the wave started at which the enemy spawns.
    pub offset: Duration,
}

impl WaveEntry {
    /// Creates a new roster entry.
    #[must_use]
    pub const fn new(kind: EnemyKind, offset: Duration) -> Self {
        Self { kind, offset }
    }
}

/// Errors raised while assembling a wave definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WaveError {
    /// The roster contains no spawns.
    #[error("wave roster is empty")]
    EmptyRoster,
    /// A spawn offset is earlier than the one preceding it.
    #[error("spawn offset at position {index} is earlier than the previous one")]
    DecreasingOffset {
        /// Position of the offending entry within the roster.
        index: usize,
    },
}

/// Immutable roster of timed spawns followed by a pause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wave {
    entries: Vec<WaveEntry>,
    delay_after: Duration,
}

impl Wave {
    /// Validates and creates a wave definition.
    ///
    /// Offsets must be non-decreasing in roster order because spawning
    /// consumes them sequentially.
    pub fn new(entries: Vec<WaveEntry>, delay_after: Duration) -> Result<Self, WaveError> {
        if entries.is_empty() {
            return Err(WaveError::EmptyRoster);
        }

        if let Some(index) = entries
            .windows(2)
            .position(|pair| pair[1].offset < pair[0].offset)
        {
            return Err(WaveError::DecreasingOffset { index: index + 1 });
        }

        Ok(Self {
            entries,
            delay_after,
        })
    }

    /// Roster entries in spawn order.
    #[must_use]
    pub fn entries(&self) -> &[WaveEntry] {
        &self.entries
    }

    /// Pause that follows the wave once it is cleared.
    #[must_use]
    pub const fn delay_after(&self) -> Duration {
        self.delay_after
    }
}

/// Read-only summary of wave progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveStatus {
    /// One-based number of the current or upcoming wave.
    pub wave_number: u32,
    /// Number of waves in the session.
    pub total_waves: u32,
    /// Whether a wave is spawning or has live enemies.
    pub active: bool,
    /// Remaining pause before the next wave may start.
    pub time_until_next_wave: Duration,
    /// Whether every wave has been cleared.
    pub all_complete: bool,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Lifecycle state of the enemy.
    pub state: EnemyState,
    /// World position of the enemy.
    pub position: Vec2,
    /// Direction of travel in degrees.
    pub facing_degrees: f32,
    /// Remaining health.
    pub health: u32,
    /// Health at spawn.
    pub max_health: u32,
    /// Money granted for the kill.
    pub reward: u32,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of maximum health.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Current upgrade level.
    pub level: TowerLevel,
    /// Tile occupied by the tower.
    pub tile: TileCoord,
    /// World position of the tower's centre.
    pub position: Vec2,
    /// Turret rotation in degrees.
    pub rotation_degrees: f32,
    /// Targeting radius in world units.
    pub range: f32,
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tile_coord_round_trips_through_bincode() {
        assert_round_trip(&TileCoord::new(13, 4));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::Occupied);
    }

    #[test]
    fn tile_codes_classify_decoration_as_grass() {
        assert_eq!(TileKind::from_code(1), TileKind::Path);
        assert_eq!(TileKind::from_code(2), TileKind::Buildable);
        for code in [0, 3, 7, 14, 200] {
            assert_eq!(TileKind::from_code(code), TileKind::Grass);
        }
    }

    #[test]
    fn step_refuses_to_underflow_origin() {
        let origin = TileCoord::new(0, 0);
        assert_eq!(origin.step(Direction::North), None);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::East), Some(TileCoord::new(1, 0)));
        assert_eq!(origin.step(Direction::South), Some(TileCoord::new(0, 1)));
    }

    #[test]
    fn enemy_presets_match_balance_table() {
        assert_eq!(EnemyKind::Basic.preset().health, 100);
        assert_eq!(EnemyKind::Fast.preset().speed, 250.0);
        assert_eq!(EnemyKind::Tank.preset().reward, 25);
    }

    #[test]
    fn tower_levels_walk_to_three_and_stop() {
        assert_eq!(TowerLevel::One.next(), Some(TowerLevel::Two));
        assert_eq!(TowerLevel::Two.next(), Some(TowerLevel::Three));
        assert_eq!(TowerLevel::Three.next(), None);
        assert_eq!(TowerLevel::One.upgrade_cost(), 50);
        assert_eq!(TowerLevel::Two.upgrade_cost(), 100);
        assert_eq!(TowerLevel::Three.upgrade_cost(), 0);
    }

    #[test]
    fn sniper_level_three_stats_match_table() {
        let stats = TowerKind::Sniper.stats(TowerLevel::Three);
        assert_eq!(stats.damage, 200);
        assert_eq!(stats.fire_rate, 0.5);
        assert_eq!(stats.range, 500.0);
        assert_eq!(stats.rotation_speed, 180.0);
    }

    #[test]
    fn basic_fire_interval_is_one_and_a_quarter_seconds() {
        let interval = TowerKind::Basic.stats(TowerLevel::One).fire_interval();
        assert_eq!(interval, Duration::from_millis(1250));
    }

    #[test]
    fn wave_rejects_decreasing_offsets() {
        let entries = vec![
            WaveEntry::new(EnemyKind::Basic, Duration::from_secs(2)),
            WaveEntry::new(EnemyKind::Fast, Duration::from_secs(1)),
        ];
        assert_eq!(
            Wave::new(entries, Duration::ZERO),
            Err(WaveError::DecreasingOffset { index: 1 })
        );
    }

    #[test]
    fn wave_rejects_empty_roster() {
        assert_eq!(
            Wave::new(Vec::new(), Duration::from_secs(5)),
            Err(WaveError::EmptyRoster)
        );
    }

    #[test]
    fn health_fraction_handles_zero_maximum() {
        let snapshot = EnemySnapshot {
            id: EnemyId::new(0),
            kind: EnemyKind::Basic,
            state: EnemyState::Dead,
            position: Vec2::ZERO,
            facing_degrees: 0.0,
            health: 0,
            max_health: 0,
            reward: 10,
        };
        assert_eq!(snapshot.health_fraction(), 0.0);
    }
}
