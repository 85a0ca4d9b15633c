//! Static tile layout and tower pad occupancy.

use glam::Vec2;
use path_defence_core::{Direction, TileCoord, TileKind};
use thiserror::Error;

/// Side length of a tile in the shipped layout, in world units.
pub const DEFAULT_TILE_SIZE: f32 = 64.0;

const DEFAULT_LAYOUT: [[u8; 20]; 15] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 4, 4, 4, 4, 4, 4, 4, 7, 1, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 2, 0, 0, 0, 0, 6, 1, 5, 0, 0, 2, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 6, 1, 12, 3, 3, 3, 3, 3, 3, 3, 8, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 6, 1, 1, 1, 1, 1, 1, 1, 1, 1, 5, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 10, 4, 4, 4, 4, 4, 4, 4, 7, 1, 5, 0],
    [0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6, 1, 5, 0],
    [0, 9, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 13, 1, 5, 0],
    [0, 6, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 5, 0],
    [0, 6, 1, 11, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 14, 0],
    [0, 6, 1, 5, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0],
    [0, 6, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 10, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4],
];

/// Preferred turret rotation for a freshly built tower, keyed by the offset of
/// the adjacent path tile. Orthogonal neighbours win over diagonal ones.
const PATH_FACINGS: [((i32, i32), f32); 8] = [
    ((-1, 0), -90.0),
    ((1, 0), 90.0),
    ((0, -1), 0.0),
    ((0, 1), 180.0),
    ((1, -1), 45.0),
    ((1, 1), 135.0),
    ((-1, 1), -135.0),
    ((-1, -1), -45.0),
];

/// Errors raised while building a custom map layout.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GridError {
    /// The number of tile codes does not match the requested dimensions.
    #[error("layout holds {actual} tiles but a {columns}x{rows} map requires {expected}")]
    DimensionMismatch {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
        /// Number of tiles implied by the dimensions.
        expected: usize,
        /// Number of tile codes supplied.
        actual: usize,
    },
    /// A layout row is shorter or longer than the first one.
    #[error("layout row {row} has {actual} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// The tile size is zero, negative or not a number.
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(f32),
}

/// Immutable tile classification plus the occupancy of tower pads.
///
/// The occupancy grid is the only mutable part of the map and changes solely
/// through [`GridMap::place`].
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    columns: u32,
    rows: u32,
    tile_size: f32,
    tiles: Vec<TileKind>,
    occupancy: Vec<bool>,
}

impl GridMap {
    /// Builds a map from row-major layout codes.
    pub fn from_codes(
        columns: u32,
        rows: u32,
        tile_size: f32,
        codes: &[u8],
    ) -> Result<Self, GridError> {
        if !(tile_size > 0.0) || !tile_size.is_finite() {
            return Err(GridError::InvalidTileSize(tile_size));
        }

        let expected = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(usize::MAX);
        if codes.len() != expected {
            return Err(GridError::DimensionMismatch {
                columns,
                rows,
                expected,
                actual: codes.len(),
            });
        }

        let tiles: Vec<TileKind> = codes.iter().copied().map(TileKind::from_code).collect();
        Ok(Self {
            columns,
            rows,
            tile_size,
            occupancy: vec![false; tiles.len()],
            tiles,
        })
    }

    /// Builds a map from a list of layout rows, top row first.
    pub fn from_rows<R>(rows: &[R], tile_size: f32) -> Result<Self, GridError>
    where
        R: AsRef<[u8]>,
    {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut codes = Vec::with_capacity(width * rows.len());
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::RaggedRow {
                    row: index,
                    expected: width,
                    actual: row.len(),
                });
            }
            codes.extend_from_slice(row);
        }

        let columns = u32::try_from(width).unwrap_or(u32::MAX);
        let row_count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        Self::from_codes(columns, row_count, tile_size, &codes)
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Total width of the map in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_size
    }

    /// Total height of the map in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Classification of the tile, or `None` outside the map.
    #[must_use]
    pub fn tile_kind_at(&self, tile: TileCoord) -> Option<TileKind> {
        self.index(tile)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether the tile is part of the enemy path.
    #[must_use]
    pub fn is_path(&self, tile: TileCoord) -> bool {
        self.tile_kind_at(tile) == Some(TileKind::Path)
    }

    /// Reports whether the tile is a tower pad.
    #[must_use]
    pub fn is_buildable(&self, tile: TileCoord) -> bool {
        self.tile_kind_at(tile) == Some(TileKind::Buildable)
    }

    /// Reports whether the tile is decorative grass.
    #[must_use]
    pub fn is_grass(&self, tile: TileCoord) -> bool {
        self.tile_kind_at(tile) == Some(TileKind::Grass)
    }

    /// Reports whether a tower stands on the tile.
    #[must_use]
    pub fn is_occupied(&self, tile: TileCoord) -> bool {
        self.index(tile)
            .and_then(|index| self.occupancy.get(index).copied())
            .unwrap_or(false)
    }

    /// Marks a free tower pad as occupied.
    ///
    /// Returns `false` without mutating anything when the tile is not
    /// buildable or already hosts a tower.
    pub fn place(&mut self, tile: TileCoord) -> bool {
        if !self.is_buildable(tile) {
            return false;
        }

        let Some(slot) = self
            .index(tile)
            .and_then(|index| self.occupancy.get_mut(index))
        else {
            return false;
        };

        if *slot {
            return false;
        }

        *slot = true;
        true
    }

    /// World position of the tile's centre.
    #[must_use]
    pub fn tile_center(&self, tile: TileCoord) -> Vec2 {
        let half = self.tile_size / 2.0;
        Vec2::new(
            tile.column() as f32 * self.tile_size + half,
            tile.row() as f32 * self.tile_size + half,
        )
    }

    /// Tile containing the provided world or pixel position, if it lies on
    /// the map.
    #[must_use]
    pub fn tile_at_point(&self, point: Vec2) -> Option<TileCoord> {
        if !(point.x >= 0.0 && point.y >= 0.0) {
            return None;
        }

        let column = (point.x / self.tile_size).floor();
        let row = (point.y / self.tile_size).floor();
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }

        Some(TileCoord::new(column as u32, row as u32))
    }

    /// In-bounds orthogonal neighbours in east, south, west, north order.
    pub fn neighbors(&self, tile: TileCoord) -> impl Iterator<Item = TileCoord> + '_ {
        Direction::ROUTE_PROBE_ORDER
            .into_iter()
            .filter_map(move |direction| tile.step(direction))
            .filter(move |neighbor| self.contains(*neighbor))
    }

    /// Number of tiles classified as path.
    #[must_use]
    pub fn path_tile_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|kind| **kind == TileKind::Path)
            .count()
    }

    /// Tower pads in row-major order.
    pub fn buildable_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == TileKind::Buildable)
            .filter_map(move |(index, _)| self.coord(index))
    }

    /// Turret rotation, in degrees, that faces the path next to `tile`.
    ///
    /// Falls back to zero when no path tile touches the tile.
    #[must_use]
    pub fn facing_toward_path(&self, tile: TileCoord) -> f32 {
        PATH_FACINGS
            .iter()
            .find(|((column_offset, row_offset), _)| {
                offset(tile, *column_offset, *row_offset).is_some_and(|next| self.is_path(next))
            })
            .map_or(0.0, |(_, angle)| *angle)
    }

    fn contains(&self, tile: TileCoord) -> bool {
        tile.column() < self.columns && tile.row() < self.rows
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }

        let row = usize::try_from(tile.row()).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn coord(&self, index: usize) -> Option<TileCoord> {
        let width = usize::try_from(self.columns).ok()?;
        if width == 0 {
            return None;
        }
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(TileCoord::new(column, row))
    }
}

impl Default for GridMap {
    fn default() -> Self {
        let tiles: Vec<TileKind> = DEFAULT_LAYOUT
            .iter()
            .flat_map(|row| row.iter().copied().map(TileKind::from_code))
            .collect();
        Self {
            columns: DEFAULT_LAYOUT[0].len() as u32,
            rows: DEFAULT_LAYOUT.len() as u32,
            tile_size: DEFAULT_TILE_SIZE,
            occupancy: vec![false; tiles.len()],
            tiles,
        }
    }
}

fn offset(tile: TileCoord, column_offset: i32, row_offset: i32) -> Option<TileCoord> {
    let column = tile.column().checked_add_signed(column_offset)?;
    let row = tile.row().checked_add_signed(row_offset)?;
    Some(TileCoord::new(column, row))
}
