//! Ordered walk along the path tiles of a map.

use std::collections::HashSet;

use glam::Vec2;
use path_defence_core::{Direction, TileCoord};

use crate::grid::GridMap;

/// Ordered list of path tiles enemies follow, together with their centres.
///
/// The walk is greedy: from each tile it moves to the first unvisited path
/// neighbour in east, south, west, north order and stops at a dead end. Maps
/// whose path branches produce whichever branch the probe order reaches first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Route {
    tiles: Vec<TileCoord>,
    waypoints: Vec<Vec2>,
}

impl Route {
    /// Derives the route from the path tiles of `grid`.
    ///
    /// Returns an empty route when the map has no entrance.
    #[must_use]
    pub fn derive(grid: &GridMap) -> Self {
        let Some(entrance) = find_entrance(grid) else {
            return Self::default();
        };

        let mut tiles = vec![entrance];
        let mut visited = HashSet::from([entrance]);
        let mut current = entrance;

        while let Some(next) = Direction::ROUTE_PROBE_ORDER
            .into_iter()
            .filter_map(|direction| current.step(direction))
            .find(|candidate| grid.is_path(*candidate) && !visited.contains(candidate))
        {
            let _ = visited.insert(next);
            tiles.push(next);
            current = next;
        }

        let waypoints = tiles.iter().map(|tile| grid.tile_center(*tile)).collect();
        Self { tiles, waypoints }
    }

    /// Tile centres in walking order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Path tiles in walking order.
    #[must_use]
    pub fn tiles(&self) -> &[TileCoord] {
        &self.tiles
    }

    /// Waypoint at the provided position along the route.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// Position at which enemies spawn.
    #[must_use]
    pub fn start(&self) -> Option<Vec2> {
        self.waypoints.first().copied()
    }

    /// First tile of the route.
    #[must_use]
    pub fn entrance(&self) -> Option<TileCoord> {
        self.tiles.first().copied()
    }

    /// Last tile of the route.
    #[must_use]
    pub fn exit(&self) -> Option<TileCoord> {
        self.tiles.last().copied()
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the route has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// First path tile in row-major order that sits on the western edge or has
/// no path tile to its west.
fn find_entrance(grid: &GridMap) -> Option<TileCoord> {
    (0..grid.rows())
        .flat_map(|row| (0..grid.columns()).map(move |column| TileCoord::new(column, row)))
        .find(|tile| {
            grid.is_path(*tile)
                && tile
                    .step(Direction::West)
                    .map_or(true, |west| !grid.is_path(west))
        })
}
