#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.

mod economy;
mod enemies;
mod grid;
mod route;
mod towers;
mod waves;

use std::time::Duration;

use path_defence_core::{
    Command, Event, PlacementError, TileCoord, TileKind, TowerId, TowerKind, TowerLevel,
    UpgradeError, Wave, WaveStartError, DEFAULT_STARTING_LIVES, DEFAULT_STARTING_MONEY,
    WELCOME_BANNER,
};
use tracing::{debug, info, warn};

pub use economy::Economy;
pub use enemies::Enemy;
pub use grid::{GridError, GridMap, DEFAULT_TILE_SIZE};
pub use route::Route;
pub use towers::{Shot, Tower};
pub use waves::{default_waves, WaveManager};

use towers::TowerRegistry;

/// Parameters used to set up a new session.
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Map the session is played on.
    pub grid: GridMap,
    /// Waves in the order they are played.
    pub waves: Vec<Wave>,
    /// Balance available before the first tower is bought.
    pub starting_money: u32,
    /// Lives available before the game ends.
    pub starting_lives: u32,
    /// Starts each wave as soon as the preceding countdown elapses.
    pub auto_start_waves: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid: GridMap::default(),
            waves: default_waves(),
            starting_money: DEFAULT_STARTING_MONEY,
            starting_lives: DEFAULT_STARTING_LIVES,
            auto_start_waves: false,
        }
    }
}

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: GridMap,
    route: Route,
    waves: WaveManager,
    towers: TowerRegistry,
    economy: Economy,
    auto_start_waves: bool,
    tick_index: u64,
}

impl World {
    /// Creates a world on the shipped map with the built-in waves.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world from the provided configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        let route = Route::derive(&config.grid);
        debug!(waypoints = route.len(), "route derived");

        Self {
            banner: WELCOME_BANNER,
            grid: config.grid,
            route,
            waves: WaveManager::with_waves(config.waves),
            towers: TowerRegistry::new(),
            economy: Economy::new(config.starting_money, config.starting_lives),
            auto_start_waves: config.auto_start_waves,
            tick_index: 0,
        }
    }

    /// Builds a tower of `kind` on `tile` and charges its cost.
    ///
    /// Nothing changes when the request is rejected, which includes every
    /// request made after the game is over.
    pub fn try_place_tower(
        &mut self,
        kind: TowerKind,
        tile: TileCoord,
    ) -> Result<TowerId, PlacementError> {
        if self.economy.is_game_over() {
            return Err(PlacementError::GameOver);
        }
        match self.grid.tile_kind_at(tile) {
            None => return Err(PlacementError::OutOfBounds),
            Some(TileKind::Buildable) => {}
            Some(TileKind::Path | TileKind::Grass) => return Err(PlacementError::NotBuildable),
        }
        if self.grid.is_occupied(tile) {
            return Err(PlacementError::Occupied);
        }
        if !self.economy.spend(kind.cost()) {
            return Err(PlacementError::InsufficientFunds);
        }

        let placed = self.grid.place(tile);
        debug_assert!(placed, "free buildable tile refused placement");

        let position = self.grid.tile_center(tile);
        let rotation = self.grid.facing_toward_path(tile);
        Ok(self.towers.insert(kind, tile, position, rotation))
    }

    /// Advances the tower to its next level and charges the upgrade cost.
    pub fn try_upgrade_tower(&mut self, tower: TowerId) -> Result<TowerLevel, UpgradeError> {
        if self.economy.is_game_over() {
            return Err(UpgradeError::GameOver);
        }
        let Some(entry) = self.towers.get_mut(tower) else {
            return Err(UpgradeError::MissingTower);
        };
        if !entry.can_upgrade() {
            return Err(UpgradeError::MaxLevel);
        }
        if !self.economy.spend(entry.upgrade_cost()) {
            return Err(UpgradeError::InsufficientFunds);
        }

        let upgraded = entry.upgrade();
        debug_assert!(upgraded, "upgradable tower refused upgrade");
        Ok(entry.level())
    }

    /// Starts the upcoming wave once the previous one is cleared and its
    /// countdown has elapsed.
    pub fn try_start_next_wave(
        &mut self,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WaveStartError> {
        if self.economy.is_game_over() {
            return Err(WaveStartError::GameOver);
        }
        if self.waves.is_wave_active() {
            return Err(WaveStartError::WaveInProgress);
        }
        if self.waves.all_waves_complete() {
            return Err(WaveStartError::NoWavesRemaining);
        }
        if !self.waves.time_until_next_wave().is_zero() {
            return Err(WaveStartError::CountdownRunning);
        }
        self.waves.start_next_wave(out_events)
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.waves.tick(dt, &self.route, out_events);

        self.settle_arrivals(out_events);
        if self.economy.is_game_over() {
            return;
        }

        self.run_towers(dt, out_events);
        self.collect_rewards(out_events);

        if self.auto_start_waves
            && !self.waves.is_wave_active()
            && !self.waves.all_waves_complete()
            && self.waves.time_until_next_wave().is_zero()
        {
            let _ = self.waves.start_next_wave(out_events);
        }
    }

    fn settle_arrivals(&mut self, out_events: &mut Vec<Event>) {
        for enemy in self.waves.live_enemies_mut() {
            if self.economy.is_game_over() {
                return;
            }
            if !enemy.settle_arrival() {
                continue;
            }

            let remaining = self.economy.lose_life();
            info!(enemy = enemy.id().get(), remaining, "enemy reached the exit");
            out_events.push(Event::EnemyReachedEnd { enemy: enemy.id() });
            out_events.push(Event::LifeLost { remaining });

            if self.economy.is_game_over() {
                warn!(tick = self.tick_index, "no lives left, game over");
                out_events.push(Event::GameOver);
            }
        }
    }

    fn run_towers(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let enemies = self.waves.live_enemies_mut();
        for tower in self.towers.iter_mut() {
            let Some(shot) = tower.scan_and_act(dt, enemies) else {
                continue;
            };

            out_events.push(Event::TowerFired {
                tower: tower.id(),
                enemy: shot.enemy,
                damage: shot.damage,
            });

            if let Some(reward) = shot.kill_reward {
                debug!(
                    tower = tower.id().get(),
                    enemy = shot.enemy.get(),
                    reward,
                    "enemy killed"
                );
                out_events.push(Event::EnemyKilled {
                    enemy: shot.enemy,
                    tower: tower.id(),
                    reward,
                });
            }
        }
    }

    fn collect_rewards(&mut self, out_events: &mut Vec<Event>) {
        let amount: u32 = self
            .towers
            .iter_mut()
            .flat_map(|tower| tower.drain_rewards())
            .fold(0, u32::saturating_add);
        if amount == 0 {
            return;
        }

        let balance = self.economy.earn(amount);
        out_events.push(Event::RewardCollected { amount, balance });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            if world.economy.is_game_over() {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.tick(dt, out_events);
        }
        Command::StartNextWave => {
            if let Err(reason) = world.try_start_next_wave(out_events) {
                debug!(%reason, "wave start rejected");
                out_events.push(Event::WaveStartRejected { reason });
            }
        }
        Command::PlaceTower { kind, tile } => match world.try_place_tower(kind, tile) {
            Ok(tower) => {
                info!(
                    tower = tower.get(),
                    kind = kind.label(),
                    column = tile.column(),
                    row = tile.row(),
                    money = world.economy.money(),
                    "tower placed"
                );
                out_events.push(Event::TowerPlaced { tower, kind, tile });
            }
            Err(reason) => {
                debug!(%reason, column = tile.column(), row = tile.row(), "placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, tile, reason });
            }
        },
        Command::UpgradeTower { tower } => match world.try_upgrade_tower(tower) {
            Ok(level) => {
                info!(tower = tower.get(), level = level.get(), "tower upgraded");
                out_events.push(Event::TowerUpgraded { tower, level });
            }
            Err(reason) => {
                debug!(%reason, tower = tower.get(), "upgrade rejected");
                out_events.push(Event::TowerUpgradeRejected { tower, reason });
            }
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use path_defence_core::{EnemyView, TileCoord, TowerId, TowerView, WaveStatus};

    use super::{Enemy, GridMap, Route, Tower, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the map.
    #[must_use]
    pub fn grid(world: &World) -> &GridMap {
        &world.grid
    }

    /// Provides read-only access to the route enemies follow.
    #[must_use]
    pub fn route(world: &World) -> &Route {
        &world.route
    }

    /// Current balance.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.economy.money()
    }

    /// Lives left.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.economy.lives()
    }

    /// Reports whether the player ran out of lives.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.economy.is_game_over()
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Summary of wave progression.
    #[must_use]
    pub fn wave_status(world: &World) -> WaveStatus {
        world.waves.status()
    }

    /// Enemies tracked by the current wave, in spawn order.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        world.waves.live_enemies()
    }

    /// Captures a read-only view of the tracked enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .waves
                .live_enemies()
                .iter()
                .map(Enemy::snapshot)
                .collect(),
        )
    }

    /// Captures a read-only view of every tower on the map.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(Tower::snapshot).collect())
    }

    /// Looks up a tower by identifier.
    #[must_use]
    pub fn tower(world: &World, id: TowerId) -> Option<&Tower> {
        world.towers.get(id)
    }

    /// Identifier of the tower standing on `tile`, if any.
    #[must_use]
    pub fn tower_at(world: &World, tile: TileCoord) -> Option<TowerId> {
        world.towers.at_tile(tile)
    }
}
