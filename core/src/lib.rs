#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tower defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing discrete input (a frame tick, a click, a catalog selection), the
//! world executes those commands via its `apply` entry point, and then
//! broadcasts [`Event`] values describing what happened during the step.
//! Renderers read immutable snapshots such as [`EnemySnapshot`] and
//! [`TowerSnapshot`] and never mutate the world directly.

mod catalog;
mod config;
mod timer;

use serde::{Deserialize, Serialize};

pub use catalog::{
    upgrade_cost, InfoPanel, TowerKind, TowerType, UpgradeStats, ARCHER, BUILD_FOOTER, CANNON,
    MIN_COOLDOWN_TICKS, UPGRADE_FOOTER, UPGRADE_RANGE_BONUS,
};
pub use config::{ConfigError, GameConfig};
pub use glam::Vec2;
pub use timer::Timer;

/// Default level layout: `T` grass, `B` rock, `P` path.
pub const LEVEL_MAP: [&str; 25] = [
    "TTTTTTTTTTTTTTTTTTTTTTTT",
    "TBTBTBTTBBTBTBBBTBTBTBTT",
    "TTTTTPPPPPPPPPPPBTBTTTTT",
    "TBTBTPTBTBTTBTBPBTBTBTBT",
    "TTTTTPTTTTTTTTTPTTTTTTTT",
    "PPPPPPBTBTBTBTBPBTBBBTBT",
    "TBTBTTTTTTTTTTTPTTTTTTTT",
    "TTTTTTTTTTTBTBTPBTBTBTBT",
    "TTTTTTTTTTTBTBTPBTBTBTBT",
    "TTTTTTTBTTBTBTBPBTBBBTBT",
    "TBTBTBTBTBTPPPPPTTTTTTTT",
    "TTTTTTTTTTTPBTBTBTBTBTBT",
    "TBTBTBTBTBTPTTTTTTTTTTTT",
    "TTTTTTTTTTTPBTBTBTBTBTBT",
    "TBTBTBTBTBTPTTTTTTTTTTTT",
    "TBTBTBTBTBTPTTTTTTTTTTTT",
    "TTTTTTTTTTTPBTBTBTBTBTBT",
    "TBTBTBTBTBTPTTTTTTTTTTTT",
    "TTTTTTTTTTTPBTBTBTBTBTBT",
    "TBTBTBTBTBTPTTTTTTTTTTTT",
    "TTTTTTTTTTTPPPPPPPPPPPPP",
    "TBTBTBTBTBTBTBTBTBTBTBTT",
    "TTTTTTTTTTTTTTTTTTTTTTTT",
    "TBTBTBTBTBTBTBTBTBTBTBTT",
    "TTTTTTTTTTTTTTTTTTTTTTTT",
];

/// Opaque colour expressed as byte RGB components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a colour from byte RGB components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Terrain assigned to a single map tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Buildable grass (`T`).
    Grass,
    /// Buildable rock (`B`).
    Rock,
    /// Enemy path (`P`).
    Path,
    /// Any unrecognised map character.
    Unknown,
}

impl TerrainKind {
    /// Maps a level map character to its terrain.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Self {
        match symbol {
            'T' => Self::Grass,
            'B' => Self::Rock,
            'P' => Self::Path,
            _ => Self::Unknown,
        }
    }

    /// Base colour of the terrain. Unknown terrain uses a loud error colour.
    #[must_use]
    pub const fn colour(self) -> Rgb {
        match self {
            Self::Grass => Rgb::new(0, 150, 20),
            Self::Rock => Rgb::new(100, 100, 100),
            Self::Path => Rgb::new(100, 50, 0),
            Self::Unknown => Rgb::new(255, 0, 255),
        }
    }
}

/// Location of a map tile expressed as column and row indices.
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

    /// Resolves the tile containing a world-space point.
    ///
    /// Returns `None` for points left of or above the origin, or when
    /// `tile_size` is not positive.
    #[must_use]
    pub fn from_world(point: Vec2, tile_size: f32) -> Option<Self> {
        if !(tile_size > 0.0) || !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = (point.x / tile_size).floor();
        let row = (point.y / tile_size).floor();
        if column > u32::MAX as f32 || row > u32::MAX as f32 {
            return None;
        }
        Some(Self::new(column as u32, row as u32))
    }

    /// World-space rectangle covered by the tile.
    #[must_use]
    pub fn bounds(self, tile_size: f32) -> WorldRect {
        WorldRect::new(
            Vec2::new(self.column as f32 * tile_size, self.row as f32 * tile_size),
            Vec2::splat(tile_size),
        )
    }

    /// World-space centre of the tile.
    #[must_use]
    pub fn center(self, tile_size: f32) -> Vec2 {
        self.bounds(tile_size).center()
    }
}

/// Axis-aligned rectangle in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldRect {
    min: Vec2,
    size: Vec2,
}

impl WorldRect {
    /// Creates a rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Creates a square of side `side` centred on `center`.
    #[must_use]
    pub fn centered_square(center: Vec2, side: f32) -> Self {
        Self::new(center - Vec2::splat(side * 0.5), Vec2::splat(side))
    }

    /// Upper-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Lower-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Geometric centre.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Reports whether the point lies inside; the right and bottom edges are exclusive.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.y >= self.min.y && point.x < max.x && point.y < max.y
    }

    /// Reports whether two rectangles share interior area. Touching edges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &WorldRect) -> bool {
        let max = self.max();
        let other_max = other.max();
        self.min.x < other_max.x
            && max.x > other.min.x
            && self.min.y < other_max.y
            && max.y > other.min.y
    }
}

/// Entity that occupies a rectangle the pointer can hover and click.
pub trait Clickable {
    /// World-space area that reacts to the pointer.
    fn bounds(&self) -> WorldRect;

    /// Reports whether the pointer lies over the entity.
    fn is_under(&self, pointer: Vec2) -> bool {
        self.bounds().contains(pointer)
    }
}

/// Unique identifier assigned to an enemy in spawn order.
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

/// Unique identifier assigned to a tower in build order.
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

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one tick.
    Tick {
        /// Pointer position in world units, used for hover state.
        pointer: Vec2,
    },
    /// Primary-button press on the map.
    Click {
        /// Pointer position in world units at the time of the press.
        pointer: Vec2,
    },
    /// Chooses the catalog entry used by subsequent build clicks.
    SelectTowerType {
        /// Kind to select.
        kind: TowerKind,
    },
    /// Inserts an enemy at the first waypoint of the path.
    SpawnEnemy {
        /// Starting health.
        health: u32,
        /// Distance travelled per tick.
        speed: f32,
        /// Currency awarded on death.
        bounty: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Number of ticks simulated so far, including this one.
        tick: u64,
    },
    /// Announces that the spawner began a new wave.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Enemies the wave will release.
        enemies: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Starting health of the enemy.
        health: u32,
    },
    /// Reports that a tower released a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile was aimed at.
        target: EnemyId,
    },
    /// Reports combined projectile damage applied to an enemy in one tick.
    EnemyHit {
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Tower whose projectiles struck.
        tower: TowerId,
        /// Sum of the damage carried by every colliding projectile.
        damage: u32,
    },
    /// Reports that an enemy died and its bounty was credited.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Currency credited to the player.
        bounty: u32,
    },
    /// Reports that an enemy passed the final waypoint.
    EnemyBreached {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Lives left after the breach.
        lives_remaining: u32,
    },
    /// Confirms that a tower was built.
    TowerBuilt {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Catalog entry of the tower.
        kind: TowerKind,
        /// Tile the tower occupies.
        tile: TileCoord,
    },
    /// Confirms that a tower was upgraded.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Level reached by the upgrade.
        level: u32,
    },
    /// Reports that a purchase failed for lack of funds.
    PurchaseRejected {
        /// Price of the attempted purchase.
        cost: u32,
        /// Balance at the time of the attempt.
        balance: u32,
    },
    /// Reports that a build click landed on a tile that cannot take the tower.
    PlacementRejected {
        /// Tile that was clicked.
        tile: TileCoord,
        /// Catalog entry that was selected.
        kind: TowerKind,
        /// Specific reason the placement failed.
        reason: PlacementRejection,
    },
    /// Confirms a change of build selection.
    TowerTypeSelected {
        /// Newly selected catalog entry.
        kind: TowerKind,
    },
    /// Announces that the last life was lost.
    GameOver,
}

/// Reasons a tile refuses a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementRejection {
    /// The tile terrain is not in the tower type's allowed set.
    Terrain,
    /// The tile already holds a tower.
    Occupied,
}

/// Result of resolving a click on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A new tower was built.
    Built {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Tile the tower occupies.
        tile: TileCoord,
    },
    /// The tower on the clicked tile was upgraded.
    Upgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Level reached.
        level: u32,
    },
    /// The build or upgrade was valid but the balance did not cover it.
    Unaffordable {
        /// Price of the attempted purchase.
        cost: u32,
    },
    /// The clicked tile cannot take the selected tower.
    Rejected(PlacementRejection),
    /// The click did not land on a tile.
    OutsideGrid,
}

/// Phase of the wave state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnPhase {
    /// Intermission before the next wave.
    Countdown,
    /// Releasing the enemies of the current wave.
    Spawning,
    /// All enemies released; waiting for the field to clear.
    Waiting,
}

/// Read-only summary of the wave state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnerStatus {
    /// Current phase.
    pub phase: SpawnPhase,
    /// Most recently started wave; zero before the first wave.
    pub wave: u32,
    /// Ticks left in the intermission countdown.
    pub countdown_remaining: u32,
    /// Enemies of the current wave not yet released.
    pub remaining_to_spawn: u32,
}

impl SpawnerStatus {
    /// Sidebar text: seconds until the next wave, or the current wave number.
    #[must_use]
    pub fn info_text(&self, ticks_per_second: u32) -> String {
        match self.phase {
            SpawnPhase::Countdown => {
                let seconds = self.countdown_remaining / ticks_per_second.max(1);
                format!("Next: {seconds}s")
            }
            SpawnPhase::Spawning | SpawnPhase::Waiting => format!("WAVE {}", self.wave),
        }
    }
}

/// Immutable representation of a single map tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSnapshot {
    /// Grid coordinate of the tile.
    pub coord: TileCoord,
    /// Terrain of the tile.
    pub terrain: TerrainKind,
    /// Tower occupying the tile, if any.
    pub tower: Option<TowerId>,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// World-space centre of the enemy.
    pub position: Vec2,
    /// Health left.
    pub health: i64,
    /// Health at spawn time.
    pub max_health: u32,
    /// Index of the waypoint the enemy is heading towards.
    pub waypoint_index: usize,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of the spawn health, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
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

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
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
    /// Catalog entry of the tower.
    pub kind: TowerKind,
    /// Tile the tower occupies.
    pub tile: TileCoord,
    /// World-space centre of the tower.
    pub center: Vec2,
    /// Current level, starting at one.
    pub level: u32,
    /// Current combat statistics.
    pub stats: UpgradeStats,
    /// Whether the pointer lies over the tower.
    pub hovered: bool,
    /// Whether the tower was the most recent click target.
    pub selected: bool,
}

/// Read-only snapshot describing all towers.
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

    /// Iterator over the captured tower snapshots in build order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// World-space centre of the projectile.
    pub position: Vec2,
    /// Side length of the projectile hit box.
    pub size: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognised_symbols_fall_back_to_unknown_terrain() {
        assert_eq!(TerrainKind::from_symbol('T'), TerrainKind::Grass);
        assert_eq!(TerrainKind::from_symbol('B'), TerrainKind::Rock);
        assert_eq!(TerrainKind::from_symbol('P'), TerrainKind::Path);
        assert_eq!(TerrainKind::from_symbol('x'), TerrainKind::Unknown);
        assert_ne!(
            TerrainKind::Unknown.colour(),
            TerrainKind::Rock.colour(),
            "error terrain must stand out"
        );
    }

    #[test]
    fn world_points_resolve_to_tiles() {
        assert_eq!(
            TileCoord::from_world(Vec2::new(45.0, 29.9), 30.0),
            Some(TileCoord::new(1, 0))
        );
        assert_eq!(
            TileCoord::from_world(Vec2::new(60.0, 60.0), 30.0),
            Some(TileCoord::new(2, 2))
        );
        assert_eq!(TileCoord::from_world(Vec2::new(-1.0, 5.0), 30.0), None);
        assert_eq!(TileCoord::from_world(Vec2::new(1.0, 5.0), 0.0), None);
    }

    #[test]
    fn tile_center_sits_half_a_tile_in() {
        assert_eq!(TileCoord::new(2, 1).center(30.0), Vec2::new(75.0, 45.0));
    }

    #[test]
    fn touching_rectangles_do_not_overlap() {
        let left = WorldRect::new(Vec2::ZERO, Vec2::splat(10.0));
        let right = WorldRect::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let inside = WorldRect::centered_square(Vec2::new(9.0, 5.0), 4.0);
        assert!(!left.overlaps(&right));
        assert!(left.overlaps(&inside));
        assert!(right.overlaps(&inside));
    }

    #[test]
    fn contains_excludes_far_edges() {
        let rect = WorldRect::new(Vec2::ZERO, Vec2::splat(30.0));
        assert!(rect.contains(Vec2::ZERO));
        assert!(!rect.contains(Vec2::new(30.0, 10.0)));
    }

    #[test]
    fn spawner_text_reports_seconds_or_wave() {
        let mut status = SpawnerStatus {
            phase: SpawnPhase::Countdown,
            wave: 2,
            countdown_remaining: 150,
            remaining_to_spawn: 0,
        };
        assert_eq!(status.info_text(60), "Next: 2s");
        status.phase = SpawnPhase::Waiting;
        assert_eq!(status.info_text(60), "WAVE 2");
    }

    #[test]
    fn health_fraction_is_clamped() {
        let snapshot = EnemySnapshot {
            id: EnemyId::new(0),
            position: Vec2::ZERO,
            health: -5,
            max_health: 20,
            waypoint_index: 0,
        };
        assert!((snapshot.health_fraction() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn enemy_view_orders_by_spawn() {
        let make = |id| EnemySnapshot {
            id: EnemyId::new(id),
            position: Vec2::ZERO,
            health: 1,
            max_health: 1,
            waypoint_index: 0,
        };
        let view = EnemyView::from_snapshots(vec![make(3), make(1), make(2)]);
        let ids: Vec<u32> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
