#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level map parsing and enemy path construction.
//!
//! A level map is a list of strings, one character per tile. [`TerrainMap`]
//! turns it into typed terrain and [`build_path`] orders the path tiles into
//! the single route enemies follow, expressed as tile-centre waypoints.

use std::collections::BTreeSet;

use thiserror::Error;
use tower_defence_core::{TerrainKind, TileCoord, Vec2};
use tracing::{error, warn};

/// Reasons a level map cannot be turned into a playable grid.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// The map contains no tiles once clipped to the configured grid.
    #[error("level map contains no tiles")]
    Empty,
}

/// Terrain grid parsed from a level map, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainMap {
    rows: Vec<Vec<TerrainKind>>,
    columns: u32,
}

impl TerrainMap {
    /// Parses a level map, keeping at most `max_columns` characters of each of the
    /// first `max_rows` lines.
    ///
    /// Rows may differ in length; missing cells are simply absent. Characters
    /// other than the recognised terrain symbols become [`TerrainKind::Unknown`].
    pub fn parse<S>(lines: &[S], max_columns: u32, max_rows: u32) -> Result<Self, MapError>
    where
        S: AsRef<str>,
    {
        let column_limit = usize::try_from(max_columns).unwrap_or(usize::MAX);
        let row_limit = usize::try_from(max_rows).unwrap_or(usize::MAX);

        let rows: Vec<Vec<TerrainKind>> = lines
            .iter()
            .take(row_limit)
            .map(|line| {
                line.as_ref()
                    .chars()
                    .take(column_limit)
                    .map(TerrainKind::from_symbol)
                    .collect()
            })
            .collect();

        let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
        if widest == 0 {
            return Err(MapError::Empty);
        }

        Ok(Self {
            columns: u32::try_from(widest).unwrap_or(u32::MAX),
            rows,
        })
    }

    /// Width of the widest row.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows kept from the map.
    #[must_use]
    pub fn rows(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    /// Terrain at the coordinate, or `None` outside the parsed cells.
    #[must_use]
    pub fn terrain(&self, coord: TileCoord) -> Option<TerrainKind> {
        let row = self.rows.get(usize::try_from(coord.row()).ok()?)?;
        row.get(usize::try_from(coord.column()).ok()?).copied()
    }

    /// Iterator over every parsed cell in scan order (row by row, left to right).
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, TerrainKind)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().map(move |(column, terrain)| {
                (TileCoord::new(column as u32, row as u32), *terrain)
            })
        })
    }

    /// Coordinates of all path tiles in scan order.
    #[must_use]
    pub fn path_tiles(&self) -> Vec<TileCoord> {
        self.iter()
            .filter(|(_, terrain)| *terrain == TerrainKind::Path)
            .map(|(coord, _)| coord)
            .collect()
    }
}

/// Whether the walk consumed every path tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStatus {
    /// Every path tile lies on the route.
    Complete,
    /// The map has no path tiles.
    Empty,
    /// The walk dead-ended with path tiles left over.
    Broken {
        /// Last tile reached before the walk stopped.
        at: TileCoord,
        /// Path tiles the walk never reached.
        unvisited: usize,
    },
}

/// Ordered route enemies follow, immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    tiles: Vec<TileCoord>,
    waypoints: Vec<Vec2>,
    status: PathStatus,
}

impl Path {
    /// Tile-centre waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Tiles in travel order.
    #[must_use]
    pub fn tiles(&self) -> &[TileCoord] {
        &self.tiles
    }

    /// Outcome of the walk.
    #[must_use]
    pub const fn status(&self) -> PathStatus {
        self.status
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

/// Orders path tiles into a single route.
///
/// The walk starts at the first tile (in the given order) that touches the
/// grid edge, or the first tile when none does, and repeatedly steps to the
/// first unvisited path neighbour in the order up, down, left, right. When it
/// dead-ends with tiles left over the partial route is returned and the break
/// is logged.
#[must_use]
pub fn build_path(path_tiles: &[TileCoord], columns: u32, rows: u32, tile_size: f32) -> Path {
    let Some(first) = path_tiles.first().copied() else {
        error!("level map has no path tiles; enemies cannot move");
        return Path {
            tiles: Vec::new(),
            waypoints: Vec::new(),
            status: PathStatus::Empty,
        };
    };

    let start = path_tiles
        .iter()
        .copied()
        .find(|tile| touches_edge(*tile, columns, rows))
        .unwrap_or(first);

    let mut unvisited: BTreeSet<TileCoord> = path_tiles.iter().copied().collect();
    let _ = unvisited.remove(&start);

    let mut ordered = Vec::with_capacity(path_tiles.len());
    ordered.push(start);
    let mut current = start;
    let mut status = PathStatus::Complete;

    while !unvisited.is_empty() {
        let next = neighbours(current)
            .into_iter()
            .flatten()
            .find(|candidate| unvisited.contains(candidate));

        match next {
            Some(tile) => {
                let _ = unvisited.remove(&tile);
                ordered.push(tile);
                current = tile;
            }
            None => {
                warn!(
                    column = current.column(),
                    row = current.row(),
                    unvisited = unvisited.len(),
                    "path broken"
                );
                status = PathStatus::Broken {
                    at: current,
                    unvisited: unvisited.len(),
                };
                break;
            }
        }
    }

    let waypoints = ordered.iter().map(|tile| tile.center(tile_size)).collect();
    Path {
        tiles: ordered,
        waypoints,
        status,
    }
}

fn touches_edge(tile: TileCoord, columns: u32, rows: u32) -> bool {
    tile.column() == 0
        || tile.row() == 0
        || tile.column().saturating_add(1) == columns
        || tile.row().saturating_add(1) == rows
}

fn neighbours(tile: TileCoord) -> [Option<TileCoord>; 4] {
    let column = tile.column();
    let row = tile.row();
    [
        row.checked_sub(1).map(|up| TileCoord::new(column, up)),
        row.checked_add(1).map(|down| TileCoord::new(column, down)),
        column.checked_sub(1).map(|left| TileCoord::new(left, row)),
        column.checked_add(1).map(|right| TileCoord::new(right, row)),
    ]
}
