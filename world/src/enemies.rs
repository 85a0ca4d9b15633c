//! Enemy movement along the route and health bookkeeping.

use std::time::Duration;

use glam::Vec2;
use path_defence_core::{
    EnemyId, EnemyKind, EnemySnapshot, EnemyState, WAYPOINT_ARRIVAL_RADIUS,
};

use crate::route::Route;

/// Enemy walking the route toward the exit.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: Vec2,
    velocity: Vec2,
    facing_degrees: f32,
    speed: f32,
    health: u32,
    max_health: u32,
    reward: u32,
    route_index: usize,
    moved: bool,
    reached_end: bool,
    arrival_settled: bool,
}

impl Enemy {
    /// Creates an enemy of the provided kind standing at `position`.
    #[must_use]
    pub fn spawn(id: EnemyId, kind: EnemyKind, position: Vec2) -> Self {
        let preset = kind.preset();
        Self {
            id,
            kind,
            position,
            velocity: Vec2::ZERO,
            facing_degrees: 0.0,
            speed: preset.speed,
            health: preset.health,
            max_health: preset.health,
            reward: preset.reward,
            route_index: 0,
            moved: false,
            reached_end: false,
            arrival_settled: false,
        }
    }

    /// Moves the enemy toward its current waypoint for `dt`.
    ///
    /// A waypoint counts as reached once the enemy is within
    /// [`WAYPOINT_ARRIVAL_RADIUS`] of it, at which point the enemy turns toward
    /// the following one. A single step never carries the enemy past the
    /// waypoint it is heading for. Dead or arrived enemies do not move.
    pub fn advance(&mut self, dt: Duration, route: &Route) {
        if self.is_terminal() {
            return;
        }
        self.moved = true;

        let Some(mut target) = route.waypoint(self.route_index) else {
            self.arrive();
            return;
        };

        if self.position.distance(target) < WAYPOINT_ARRIVAL_RADIUS {
            self.route_index += 1;
            match route.waypoint(self.route_index) {
                Some(next) => target = next,
                None => {
                    self.arrive();
                    return;
                }
            }
        }

        let delta = target - self.position;
        let distance = delta.length();
        if distance <= 0.0 {
            return;
        }

        let direction = delta / distance;
        self.facing_degrees = direction.y.atan2(direction.x).to_degrees();
        self.velocity = direction * self.speed;

        let travel = (self.speed * dt.as_secs_f32()).min(distance);
        self.position += direction * travel;
    }

    /// Subtracts `amount` from the remaining health, saturating at zero.
    pub fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Unique identifier of the enemy.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Archetype of the enemy.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Current world position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity applied during the most recent step.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Direction of travel in degrees, measured like `atan2`.
    #[must_use]
    pub const fn facing_degrees(&self) -> f32 {
        self.facing_degrees
    }

    /// Movement speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Health at spawn.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Money granted for the kill.
    #[must_use]
    pub const fn reward(&self) -> u32 {
        self.reward
    }

    /// Index of the waypoint the enemy is heading for.
    #[must_use]
    pub const fn route_index(&self) -> usize {
        self.route_index
    }

    /// Lifecycle state. Death takes precedence over arrival.
    #[must_use]
    pub const fn state(&self) -> EnemyState {
        if self.health == 0 {
            EnemyState::Dead
        } else if self.reached_end {
            EnemyState::ReachedEnd
        } else if self.moved {
            EnemyState::Moving
        } else {
            EnemyState::Spawned
        }
    }

    /// Reports whether the enemy has no health left.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Reports whether the enemy walked past the final waypoint alive.
    #[must_use]
    pub const fn has_reached_end(&self) -> bool {
        self.reached_end && self.health > 0
    }

    /// Reports whether the enemy is dead or has reached the end.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Read-only snapshot for queries.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            state: self.state(),
            position: self.position,
            facing_degrees: self.facing_degrees,
            health: self.health,
            max_health: self.max_health,
            reward: self.reward,
        }
    }

    /// Claims the life loss owed for an arrival.
    ///
    /// Returns `true` exactly once for an enemy that reached the end alive.
    pub(crate) fn settle_arrival(&mut self) -> bool {
        if !self.has_reached_end() || self.arrival_settled {
            return false;
        }
        self.arrival_settled = true;
        true
    }

    fn arrive(&mut self) {
        self.reached_end = true;
        self.velocity = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridMap;

    const FRAME: Duration = Duration::from_nanos(16_666_667);

    fn straight_route() -> Route {
        let grid = GridMap::from_rows(&[[1u8, 1, 1, 1]], 100.0).expect("valid layout");
        Route::derive(&grid)
    }

    #[test]
    fn spawn_applies_kind_preset() {
        let enemy = Enemy::spawn(EnemyId::new(3), EnemyKind::Tank, Vec2::new(1.0, 2.0));

        assert_eq!(enemy.health(), 250);
        assert_eq!(enemy.max_health(), 250);
        assert_eq!(enemy.speed(), 80.0);
        assert_eq!(enemy.reward(), 25);
        assert_eq!(enemy.state(), EnemyState::Spawned);
        assert_eq!(enemy.route_index(), 0);
    }

    #[test]
    fn first_advance_skips_spawn_waypoint() {
        let route = straight_route();
        let start = route.start().expect("route has a start");
        let mut enemy = Enemy::spawn(EnemyId::new(0), EnemyKind::Basic, start);

        enemy.advance(Duration::from_millis(100), &route);

        assert_eq!(enemy.route_index(), 1);
        assert_eq!(enemy.state(), EnemyState::Moving);
        assert!((enemy.position().x - 65.0).abs() < 1e-3);
        assert_eq!(enemy.velocity(), Vec2::new(150.0, 0.0));
        assert_eq!(enemy.facing_degrees(), 0.0);
    }

    #[test]
    fn step_never_overshoots_the_waypoint() {
        let route = straight_route();
        let start = route.start().expect("route has a start");
        let mut enemy = Enemy::spawn(EnemyId::new(0), EnemyKind::Fast, start);

        enemy.advance(Duration::from_secs(5), &route);

        assert_eq!(enemy.position(), Vec2::new(150.0, 50.0));
        assert_eq!(enemy.route_index(), 1);
    }

    #[test]
    fn enemy_reaches_end_after_final_waypoint() {
        let route = straight_route();
        let start = route.start().expect("route has a start");
        let mut enemy = Enemy::spawn(EnemyId::new(0), EnemyKind::Basic, start);

        for _ in 0..600 {
            enemy.advance(FRAME, &route);
        }

        assert!(enemy.has_reached_end());
        assert_eq!(enemy.state(), EnemyState::ReachedEnd);
        assert_eq!(enemy.route_index(), route.len());
        assert_eq!(enemy.velocity(), Vec2::ZERO);
    }

    #[test]
    fn route_cursor_never_decreases() {
        let grid = GridMap::default();
        let route = Route::derive(&grid);
        let start = route.start().expect("route has a start");
        let mut enemy = Enemy::spawn(EnemyId::new(0), EnemyKind::Fast, start);

        let mut previous = enemy.route_index();
        for _ in 0..2_000 {
            enemy.advance(FRAME, &route);
            assert!(enemy.route_index() >= previous);
            previous = enemy.route_index();
        }
        assert!(enemy.has_reached_end());
    }

    #[test]
    fn empty_route_arrives_immediately() {
        let mut enemy = Enemy::spawn(EnemyId::new(0), EnemyKind::Basic, Vec2::ZERO);
        enemy.advance(FRAME, &Route::default());
        assert!(enemy.has_reached_end());
    }

    #[test]
    fn damage_saturates_at_zero() {
        let mut enemy = Enemy::spawn(EnemyId::new(0), EnemyKind::Fast, Vec2::ZERO);

        enemy.apply_damage(40);
        assert_eq!(enemy.health(), 20);
        assert!(!enemy.is_dead());

        enemy.apply_damage(500);
        assert_eq!(enemy.health(), 0);
        assert!(enemy.is_dead());
        assert_eq!(enemy.state(), EnemyState::Dead);
    }

    #[test]
    fn dead_enemies_stay_put() {
        let route = straight_route();
        let start = route.start().expect("route has a start");
        let mut enemy = Enemy::spawn(EnemyId::new(0), EnemyKind::Basic, start);
        enemy.apply_damage(100);

        enemy.advance(Duration::from_secs(1), &route);

        assert_eq!(enemy.position(), start);
        assert_eq!(enemy.state(), EnemyState::Dead);
    }

    #[test]
    fn death_outranks_arrival() {
        let mut enemy = Enemy::spawn(EnemyId::new(0), EnemyKind::Basic, Vec2::ZERO);
        enemy.advance(FRAME, &Route::default());
        enemy.apply_damage(100);

        assert_eq!(enemy.state(), EnemyState::Dead);
        assert!(!enemy.has_reached_end());
        assert!(!enemy.settle_arrival());
    }

    #[test]
    fn arrival_settles_once() {
        let mut enemy = Enemy::spawn(EnemyId::new(0), EnemyKind::Basic, Vec2::ZERO);
        enemy.advance(FRAME, &Route::default());

        assert!(enemy.settle_arrival());
        assert!(!enemy.settle_arrival());
    }

    #[test]
    fn snapshot_mirrors_state() {
        let mut enemy = Enemy::spawn(EnemyId::new(9), EnemyKind::Basic, Vec2::new(4.0, 5.0));
        enemy.apply_damage(25);

        let snapshot = enemy.snapshot();
        assert_eq!(snapshot.id, EnemyId::new(9));
        assert_eq!(snapshot.health, 75);
        assert_eq!(snapshot.position, Vec2::new(4.0, 5.0));
        assert_eq!(snapshot.state, EnemyState::Spawned);
        assert_eq!(snapshot.health_fraction(), 0.75);
    }
}
