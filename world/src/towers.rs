//! Tower combat state and identifier allocation.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use path_defence_core::{
    EnemyId, TileCoord, TowerId, TowerKind, TowerLevel, TowerSnapshot, TowerStats,
};
use path_defence_system_tower_targeting::{
    angle_to_target, nearest_within_range, rotate_toward, Candidate,
};

use crate::enemies::Enemy;

/// Outcome of a tower firing during a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shot {
    /// Enemy that was hit.
    pub enemy: EnemyId,
    /// Damage applied.
    pub damage: u32,
    /// Reward queued when the shot was lethal.
    pub kill_reward: Option<u32>,
}

/// Tower standing on a pad, tracking its turret and fire cooldown.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    id: TowerId,
    kind: TowerKind,
    level: TowerLevel,
    tile: TileCoord,
    position: Vec2,
    rotation_degrees: f32,
    stats: TowerStats,
    fire_interval: Duration,
    cooldown: Duration,
    pending_rewards: Vec<u32>,
    shots_fired: u32,
}

impl Tower {
    /// Creates a level one tower centred on `position`.
    #[must_use]
    pub fn new(
        id: TowerId,
        kind: TowerKind,
        tile: TileCoord,
        position: Vec2,
        rotation_degrees: f32,
    ) -> Self {
        let level = TowerLevel::One;
        let stats = kind.stats(level);
        Self {
            id,
            kind,
            level,
            tile,
            position,
            rotation_degrees,
            stats,
            fire_interval: stats.fire_interval(),
            cooldown: Duration::ZERO,
            pending_rewards: Vec::new(),
            shots_fired: 0,
        }
    }

    /// Advances the fire cooldown, turns toward the nearest enemy in range
    /// and shoots it once the cooldown has elapsed.
    ///
    /// Firing does not wait for the turret to finish turning. A shot that
    /// takes an enemy from alive to dead queues its reward until
    /// [`Tower::drain_rewards`] is called.
    pub fn scan_and_act(&mut self, dt: Duration, enemies: &mut [Enemy]) -> Option<Shot> {
        self.cooldown = self.cooldown.saturating_add(dt);

        let candidates = enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| !enemy.is_terminal())
            .map(|(index, enemy)| Candidate::new(index, enemy.position()));
        let index = nearest_within_range(self.position, self.stats.range, candidates)?;
        let target = enemies.get_mut(index)?;

        let desired = angle_to_target(self.position, target.position());
        self.rotation_degrees = rotate_toward(
            self.rotation_degrees,
            desired,
            self.stats.rotation_speed * dt.as_secs_f32(),
        );

        if self.cooldown < self.fire_interval {
            return None;
        }
        self.cooldown = Duration::ZERO;
        self.shots_fired = self.shots_fired.saturating_add(1);

        let was_alive = !target.is_dead();
        target.apply_damage(self.stats.damage);

        let kill_reward = if was_alive && target.is_dead() {
            self.pending_rewards.push(target.reward());
            Some(target.reward())
        } else {
            None
        };

        Some(Shot {
            enemy: target.id(),
            damage: self.stats.damage,
            kill_reward,
        })
    }

    /// Removes and returns rewards queued by lethal shots.
    pub fn drain_rewards(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.pending_rewards)
    }

    /// Reports whether another level is available.
    #[must_use]
    pub const fn can_upgrade(&self) -> bool {
        self.level.next().is_some()
    }

    /// Money required for the next level, zero at the maximum level.
    #[must_use]
    pub const fn upgrade_cost(&self) -> u32 {
        self.level.upgrade_cost()
    }

    /// Advances to the next level and swaps in its stats.
    ///
    /// Returns `false` at the maximum level. The fire cooldown carries over.
    pub fn upgrade(&mut self) -> bool {
        let Some(next) = self.level.next() else {
            return false;
        };
        self.level = next;
        self.stats = self.kind.stats(next);
        self.fire_interval = self.stats.fire_interval();
        true
    }

    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Type of the tower.
    #[must_use]
    pub const fn kind(&self) -> TowerKind {
        self.kind
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> TowerLevel {
        self.level
    }

    /// Tile the tower stands on.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        self.tile
    }

    /// World position of the turret.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Turret rotation in degrees.
    #[must_use]
    pub const fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    /// Stats of the current level.
    #[must_use]
    pub const fn stats(&self) -> TowerStats {
        self.stats
    }

    /// Number of shots fired since construction.
    #[must_use]
    pub const fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    /// Read-only snapshot for queries.
    #[must_use]
    pub fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            level: self.level,
            tile: self.tile,
            position: self.position,
            rotation_degrees: self.rotation_degrees,
            range: self.stats.range,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Builds a tower and returns the identifier allocated to it.
    pub(crate) fn insert(
        &mut self,
        kind: TowerKind,
        tile: TileCoord,
        position: Vec2,
        rotation_degrees: f32,
    ) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let _ = self
            .entries
            .insert(id, Tower::new(id, kind, tile, position, rotation_degrees));
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    /// Towers in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    /// Towers in ascending identifier order, mutably.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    pub(crate) fn at_tile(&self, tile: TileCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.tile() == tile)
            .map(Tower::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::EnemyKind;

    const FRAME: Duration = Duration::from_nanos(16_666_667);

    fn basic_tower() -> Tower {
        Tower::new(
            TowerId::new(0),
            TowerKind::Basic,
            TileCoord::new(0, 0),
            Vec2::ZERO,
            0.0,
        )
    }

    fn enemy_at(id: u32, kind: EnemyKind, position: Vec2) -> Enemy {
        Enemy::spawn(EnemyId::new(id), kind, position)
    }

    #[test]
    fn stationary_target_takes_eight_shots_in_ten_seconds() {
        let mut tower = basic_tower();
        let mut enemies = vec![enemy_at(0, EnemyKind::Tank, Vec2::new(50.0, 0.0))];
        let mut shots = 0;

        for _ in 0..600 {
            if tower.scan_and_act(FRAME, &mut enemies).is_some() {
                shots += 1;
            }
        }

        assert_eq!(shots, 8);
        assert_eq!(tower.shots_fired(), 8);
        assert_eq!(enemies[0].health(), 250 - 8 * 20);
        assert!(tower.drain_rewards().is_empty());
    }

    #[test]
    fn lethal_shot_queues_reward_once() {
        let mut tower = basic_tower();
        let mut enemies = vec![enemy_at(0, EnemyKind::Basic, Vec2::new(50.0, 0.0))];
        let mut kills = Vec::new();

        for tick in 1..=600 {
            if let Some(shot) = tower.scan_and_act(FRAME, &mut enemies) {
                if let Some(reward) = shot.kill_reward {
                    kills.push((tick, reward));
                }
            }
        }

        assert_eq!(kills, vec![(375, 10)]);
        assert_eq!(tower.shots_fired(), 5);
        assert_eq!(tower.drain_rewards(), vec![10]);
        assert!(tower.drain_rewards().is_empty());
    }

    #[test]
    fn targets_beyond_range_are_ignored() {
        let mut tower = basic_tower();
        let mut enemies = vec![enemy_at(0, EnemyKind::Basic, Vec2::new(201.0, 0.0))];

        for _ in 0..600 {
            assert!(tower.scan_and_act(FRAME, &mut enemies).is_none());
        }
        assert_eq!(tower.rotation_degrees(), 0.0);
    }

    #[test]
    fn nearest_live_enemy_is_targeted() {
        let mut tower = basic_tower();
        let mut enemies = vec![
            enemy_at(0, EnemyKind::Basic, Vec2::new(150.0, 0.0)),
            enemy_at(1, EnemyKind::Basic, Vec2::new(0.0, 40.0)),
            enemy_at(2, EnemyKind::Basic, Vec2::new(10.0, 0.0)),
        ];
        enemies[2].apply_damage(100);

        let shot = (0..100)
            .find_map(|_| tower.scan_and_act(FRAME, &mut enemies))
            .expect("tower fires within range");

        assert_eq!(shot.enemy, EnemyId::new(1));
        assert_eq!(shot.damage, 20);
        assert_eq!(shot.kill_reward, None);
    }

    #[test]
    fn turret_turns_at_bounded_speed() {
        let mut tower = basic_tower();
        let mut enemies = vec![enemy_at(0, EnemyKind::Tank, Vec2::new(0.0, 100.0))];

        let _ = tower.scan_and_act(Duration::from_millis(500), &mut enemies);
        assert!((tower.rotation_degrees() + 90.0).abs() < 1e-3);

        let _ = tower.scan_and_act(Duration::from_millis(500), &mut enemies);
        assert!((tower.rotation_degrees().abs() - 180.0).abs() < 1e-3);
    }

    #[test]
    fn cooldown_accumulates_without_a_target() {
        let mut tower = basic_tower();
        let mut enemies: Vec<Enemy> = Vec::new();
        let _ = tower.scan_and_act(Duration::from_secs(3), &mut enemies);

        enemies.push(enemy_at(0, EnemyKind::Tank, Vec2::new(10.0, 0.0)));
        assert!(tower.scan_and_act(FRAME, &mut enemies).is_some());
    }

    #[test]
    fn upgrades_stop_at_level_three() {
        let mut tower = basic_tower();
        assert_eq!(tower.upgrade_cost(), 50);
        assert!(tower.upgrade());
        assert_eq!(tower.level(), TowerLevel::Two);
        assert_eq!(tower.stats().damage, 35);
        assert_eq!(tower.upgrade_cost(), 100);

        assert!(tower.upgrade());
        assert_eq!(tower.level(), TowerLevel::Three);
        assert_eq!(tower.snapshot().range, 280.0);
        assert!(!tower.can_upgrade());
        assert_eq!(tower.upgrade_cost(), 0);

        assert!(!tower.upgrade());
        assert_eq!(tower.level(), TowerLevel::Three);
    }

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(TowerKind::Basic, TileCoord::new(1, 1), Vec2::ZERO, 0.0);
        let second = registry.insert(TowerKind::Cannon, TileCoord::new(2, 1), Vec2::ZERO, 0.0);

        assert_eq!(first, TowerId::new(0));
        assert_eq!(second, TowerId::new(1));
        assert_eq!(registry.at_tile(TileCoord::new(2, 1)), Some(second));
        assert_eq!(registry.at_tile(TileCoord::new(3, 1)), None);
        assert_eq!(
            registry.get(second).map(Tower::kind),
            Some(TowerKind::Cannon)
        );
        let ids: Vec<TowerId> = registry.iter().map(Tower::id).collect();
        assert_eq!(ids, vec![first, second]);
    }
}
