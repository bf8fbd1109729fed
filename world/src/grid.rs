//! Tile grid built from a parsed level map.

use tower_defence_core::{
    Clickable, PlacementRejection, TerrainKind, TileCoord, TileSnapshot, TowerId, TowerType, Vec2,
    WorldRect,
};
use tower_defence_system_pathing::TerrainMap;

/// Single map tile with an optional occupying tower.
#[derive(Clone, Debug)]
pub(crate) struct Tile {
    coord: TileCoord,
    terrain: TerrainKind,
    bounds: WorldRect,
    pub(crate) tower: Option<TowerId>,
}

impl Tile {
    fn new(coord: TileCoord, terrain: TerrainKind, tile_size: f32) -> Self {
        Self {
            coord,
            terrain,
            bounds: coord.bounds(tile_size),
            tower: None,
        }
    }

    /// Explains why the tile refuses `tower_type`, or `None` when it accepts it.
    pub(crate) fn placement_rejection(&self, tower_type: &TowerType) -> Option<PlacementRejection> {
        if self.tower.is_some() {
            Some(PlacementRejection::Occupied)
        } else if !tower_type.allows(self.terrain) {
            Some(PlacementRejection::Terrain)
        } else {
            None
        }
    }

    pub(crate) fn can_place(&self, tower_type: &TowerType) -> bool {
        self.placement_rejection(tower_type).is_none()
    }

    pub(crate) const fn snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            coord: self.coord,
            terrain: self.terrain,
            tower: self.tower,
        }
    }
}

impl Clickable for Tile {
    fn bounds(&self) -> WorldRect {
        self.bounds
    }
}

/// Row-major tile storage. Rows keep the length of their source line.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    rows: Vec<Vec<Tile>>,
    columns: u32,
    tile_size: f32,
}

impl Grid {
    pub(crate) fn from_map(map: &TerrainMap, tile_size: f32) -> Self {
        let mut rows: Vec<Vec<Tile>> = (0..map.rows()).map(|_| Vec::new()).collect();
        for (coord, terrain) in map.iter() {
            if let Some(row) = usize::try_from(coord.row())
                .ok()
                .and_then(|index| rows.get_mut(index))
            {
                row.push(Tile::new(coord, terrain, tile_size));
            }
        }

        Self {
            rows,
            columns: map.columns(),
            tile_size,
        }
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) fn rows(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    pub(crate) const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub(crate) fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        self.rows.get(row)?.get(column)
    }

    pub(crate) fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        self.rows.get_mut(row)?.get_mut(column)
    }

    /// Resolves the tile under a pointer position, if any.
    pub(crate) fn tile_at(&self, pointer: Vec2) -> Option<&Tile> {
        let coord = TileCoord::from_world(pointer, self.tile_size)?;
        self.tile(coord).filter(|tile| tile.is_under(pointer))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defence_core::{ARCHER, CANNON};

    fn grid(lines: &[&str]) -> Grid {
        let map = TerrainMap::parse(lines, 20, 20).expect("map parses");
        Grid::from_map(&map, 30.0)
    }

    #[test]
    fn placement_follows_terrain_and_occupancy() {
        let mut grid = grid(&["TBP"]);
        let grass = TileCoord::new(0, 0);
        let rock = TileCoord::new(1, 0);
        let path = TileCoord::new(2, 0);

        assert!(grid.tile(grass).expect("grass").can_place(&ARCHER));
        assert!(!grid.tile(grass).expect("grass").can_place(&CANNON));
        assert!(grid.tile(rock).expect("rock").can_place(&CANNON));
        assert_eq!(
            grid.tile(path).expect("path").placement_rejection(&ARCHER),
            Some(PlacementRejection::Terrain)
        );

        grid.tile_mut(grass).expect("grass").tower = Some(TowerId::new(0));
        assert_eq!(
            grid.tile(grass).expect("grass").placement_rejection(&ARCHER),
            Some(PlacementRejection::Occupied)
        );
    }

    #[test]
    fn pointer_resolves_by_flooring() {
        let grid = grid(&["TTT", "TTT"]);
        let tile = grid.tile_at(Vec2::new(59.9, 30.0)).expect("tile");
        assert_eq!(tile.snapshot().coord, TileCoord::new(1, 1));
        assert!(grid.tile_at(Vec2::new(-1.0, 5.0)).is_none());
        assert!(grid.tile_at(Vec2::new(95.0, 5.0)).is_none());
    }

    #[test]
    fn ragged_rows_leave_missing_cells_absent() {
        let grid = grid(&["TTTT", "T"]);
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.rows(), 2);
        assert!(grid.tile(TileCoord::new(3, 0)).is_some());
        assert!(grid.tile(TileCoord::new(3, 1)).is_none());
        assert_eq!(grid.iter().count(), 5);
    }
}
