#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the tower defence engine.
//!
//! [`World`] owns the tile grid, the enemy path, live enemies and towers, the
//! wave spawner, the player's balance and lives. It is mutated only through
//! [`apply`] or the equivalent direct methods, one discrete step at a time, and
//! exposes read-only state to adapters through the [`query`] module.

mod enemies;
mod grid;
mod towers;

use thiserror::Error;
use tower_defence_core::{
    ClickOutcome, Command, ConfigError, EnemyId, Event, GameConfig, TowerId, TowerKind, Vec2,
    LEVEL_MAP,
};
use tower_defence_system_combat::Hit;
use tower_defence_system_pathing::{build_path, Path, TerrainMap};
use tower_defence_system_spawning::{Config as SpawnerConfig, EnemySpawner};
use tracing::{debug, info, warn};

pub use tower_defence_system_pathing::MapError;

use enemies::Enemy;
use grid::Grid;
use towers::{TowerRegistry, TowerSystems};

/// Reasons a world cannot be constructed.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The level map holds no tiles.
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Represents the authoritative tower defence world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    grid: Grid,
    path: Path,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    systems: TowerSystems,
    spawner: EnemySpawner,
    money: u32,
    lives: u32,
    selected_type: TowerKind,
    selected_tower: Option<TowerId>,
    next_enemy_id: u32,
    tick_index: u64,
    pending: Vec<Command>,
    hits: Vec<Hit>,
}

impl World {
    /// Creates a world from a configuration and a level map.
    ///
    /// The map is clipped to the configured grid size. A map without any tiles
    /// is rejected; a missing or broken path is logged and leaves the world
    /// playable with whatever route could be built.
    pub fn new<S>(config: GameConfig, map: &[S]) -> Result<Self, WorldError>
    where
        S: AsRef<str>,
    {
        config.validate()?;
        let terrain = TerrainMap::parse(map, config.columns, config.rows)?;
        let path = build_path(
            &terrain.path_tiles(),
            terrain.columns(),
            terrain.rows(),
            config.tile_size,
        );
        let grid = Grid::from_map(&terrain, config.tile_size);
        info!(
            columns = grid.columns(),
            rows = grid.rows(),
            waypoints = path.len(),
            "world created"
        );

        Ok(Self {
            grid,
            path,
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            systems: TowerSystems::default(),
            spawner: EnemySpawner::new(SpawnerConfig::from_game(&config)),
            money: config.starting_money,
            lives: config.starting_lives,
            selected_type: TowerKind::Archer,
            selected_tower: None,
            next_enemy_id: 0,
            tick_index: 0,
            pending: Vec::new(),
            hits: Vec::new(),
            config,
        })
    }

    /// Creates a world on the bundled [`LEVEL_MAP`].
    pub fn with_default_map(config: GameConfig) -> Result<Self, WorldError> {
        Self::new(config, LEVEL_MAP.as_slice())
    }

    /// Runs one simulation step and reports whether the game is still active.
    ///
    /// The spawner advances first, then every tower in build order, then every
    /// enemy in spawn order. Once the lives are exhausted the world is frozen
    /// and further ticks do nothing.
    pub fn tick(&mut self, pointer: Vec2, out_events: &mut Vec<Event>) -> bool {
        if self.lives == 0 {
            return false;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.advance_spawner(out_events);
        self.advance_towers(pointer, out_events);
        self.advance_enemies(out_events);

        self.lives > 0
    }

    /// Resolves a primary click: upgrades the tower on the tile, or builds the
    /// selected tower type when the tile accepts it.
    pub fn handle_click(&mut self, pointer: Vec2, out_events: &mut Vec<Event>) -> ClickOutcome {
        let Some(tile) = self.grid.tile_at(pointer) else {
            return ClickOutcome::OutsideGrid;
        };
        let coord = tile.snapshot().coord;

        if let Some(tower_id) = tile.tower {
            return self.upgrade_tower(tower_id, out_events);
        }

        let kind = self.selected_type;
        let tower_type = kind.tower_type();
        if let Some(reason) = tile.placement_rejection(tower_type) {
            debug!(column = coord.column(), row = coord.row(), ?reason, "placement rejected");
            out_events.push(Event::PlacementRejected {
                tile: coord,
                kind,
                reason,
            });
            return ClickOutcome::Rejected(reason);
        }

        if let Some(outcome) = self.charge(tower_type.cost, out_events) {
            return outcome;
        }

        let tower = self.towers.insert(kind, coord, self.grid.tile_size());
        if let Some(tile) = self.grid.tile_mut(coord) {
            tile.tower = Some(tower);
        }
        self.selected_tower = Some(tower);
        info!(
            tower = tower.get(),
            kind = tower_type.name,
            column = coord.column(),
            row = coord.row(),
            "tower built"
        );
        out_events.push(Event::TowerBuilt {
            tower,
            kind,
            tile: coord,
        });
        ClickOutcome::Built { tower, tile: coord }
    }

    /// Deducts `cost` from the balance if it is covered.
    ///
    /// Returns `false` and leaves the balance untouched otherwise.
    pub fn attempt_buy(&mut self, cost: u32) -> bool {
        if self.money >= cost {
            self.money -= cost;
            true
        } else {
            warn!(cost, balance = self.money, "not enough money");
            false
        }
    }

    /// Chooses the catalog entry used by later build clicks.
    pub fn select_tower_type(&mut self, kind: TowerKind, out_events: &mut Vec<Event>) {
        self.selected_type = kind;
        out_events.push(Event::TowerTypeSelected { kind });
    }

    /// Inserts an enemy at the start of the path.
    ///
    /// Without a path there is nowhere to place it, and `None` is returned.
    pub fn spawn_enemy(
        &mut self,
        health: u32,
        speed: f32,
        bounty: u32,
        out_events: &mut Vec<Event>,
    ) -> Option<EnemyId> {
        let Some(start) = self.path.waypoints().first().copied() else {
            warn!("enemy spawn skipped: no path");
            return None;
        };

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        self.enemies.push(Enemy::new(id, health, speed, bounty, start));
        debug!(enemy = id.get(), health, "enemy spawned");
        out_events.push(Event::EnemySpawned { enemy: id, health });
        Some(id)
    }

    /// First tower, in build order, under the pointer as of the last tick.
    #[must_use]
    pub fn hovered_tower(&self) -> Option<TowerId> {
        self.towers
            .iter()
            .find(|tower| tower.is_hovered())
            .map(|tower| tower.id)
    }

    /// Reports whether `kind` is the current build selection.
    #[must_use]
    pub fn is_selected(&self, kind: TowerKind) -> bool {
        self.selected_type == kind
    }

    fn upgrade_tower(&mut self, tower_id: TowerId, out_events: &mut Vec<Event>) -> ClickOutcome {
        let Some(cost) = self.towers.get(tower_id).map(|tower| tower.upgrade_cost()) else {
            return ClickOutcome::OutsideGrid;
        };

        if let Some(outcome) = self.charge(cost, out_events) {
            return outcome;
        }

        let Some(tower) = self.towers.get_mut(tower_id) else {
            return ClickOutcome::OutsideGrid;
        };
        let level = tower.upgrade();
        self.selected_tower = Some(tower_id);
        info!(tower = tower_id.get(), level, cost, "tower upgraded");
        out_events.push(Event::TowerUpgraded {
            tower: tower_id,
            level,
        });
        ClickOutcome::Upgraded {
            tower: tower_id,
            level,
        }
    }

    fn charge(&mut self, cost: u32, out_events: &mut Vec<Event>) -> Option<ClickOutcome> {
        let balance = self.money;
        if self.attempt_buy(cost) {
            return None;
        }
        out_events.push(Event::PurchaseRejected { cost, balance });
        Some(ClickOutcome::Unaffordable { cost })
    }

    fn advance_spawner(&mut self, out_events: &mut Vec<Event>) {
        let wave_before = self.spawner.wave();
        self.spawner.handle(self.enemies.len(), &mut self.pending);
        if self.spawner.wave() != wave_before {
            out_events.push(Event::WaveStarted {
                wave: self.spawner.wave(),
                enemies: self.spawner.remaining_to_spawn(),
            });
        }

        let pending = std::mem::take(&mut self.pending);
        for command in pending {
            apply(self, command, out_events);
        }
    }

    fn advance_towers(&mut self, pointer: Vec2, out_events: &mut Vec<Event>) {
        let tile_size = self.grid.tile_size();
        for tower in self.towers.iter_mut() {
            let fired_at = tower.advance(
                pointer,
                &self.enemies,
                tile_size,
                &mut self.systems,
                &mut self.hits,
            );
            if let Some(target) = fired_at {
                out_events.push(Event::ProjectileFired {
                    tower: tower.id,
                    target,
                });
            }

            for hit in self.hits.drain(..) {
                let Some(index) = self.enemies.iter().position(|enemy| enemy.id == hit.enemy)
                else {
                    continue;
                };
                out_events.push(Event::EnemyHit {
                    enemy: hit.enemy,
                    tower: tower.id,
                    damage: hit.damage,
                });

                if self.enemies[index].take_damage(hit.damage) {
                    let enemy = self.enemies.remove(index);
                    self.money = self.money.saturating_add(enemy.bounty);
                    debug!(enemy = enemy.id.get(), bounty = enemy.bounty, "enemy killed");
                    out_events.push(Event::EnemyKilled {
                        enemy: enemy.id,
                        bounty: enemy.bounty,
                    });
                }
            }
        }
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        let waypoints = self.path.waypoints();
        let mut breached = Vec::new();
        for enemy in &mut self.enemies {
            if enemy.advance(waypoints) {
                breached.push(enemy.id);
            }
        }
        if breached.is_empty() {
            return;
        }
        self.enemies.retain(|enemy| !enemy.is_breached());

        for enemy in breached {
            let was_alive = self.lives > 0;
            self.lives = self.lives.saturating_sub(1);
            debug!(enemy = enemy.get(), lives = self.lives, "enemy breached");
            out_events.push(Event::EnemyBreached {
                enemy,
                lives_remaining: self.lives,
            });
            if was_alive && self.lives == 0 {
                info!(tick = self.tick_index, "game over");
                out_events.push(Event::GameOver);
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { pointer } => {
            let _ = world.tick(pointer, out_events);
        }
        Command::Click { pointer } => {
            let _ = world.handle_click(pointer, out_events);
        }
        Command::SelectTowerType { kind } => world.select_tower_type(kind, out_events),
        Command::SpawnEnemy {
            health,
            speed,
            bounty,
        } => {
            let _ = world.spawn_enemy(health, speed, bounty, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tower_defence_core::{
        EnemyView, GameConfig, InfoPanel, ProjectileSnapshot, SpawnerStatus, TileCoord,
        TileSnapshot, TowerKind, TowerView,
    };
    use tower_defence_system_pathing::Path;

    use super::World;

    /// Snapshot of every tile in row-major scan order.
    #[must_use]
    pub fn tiles(world: &World) -> Vec<TileSnapshot> {
        world.grid.iter().map(|tile| tile.snapshot()).collect()
    }

    /// Snapshot of a single tile, if the map has one at `coord`.
    #[must_use]
    pub fn tile(world: &World, coord: TileCoord) -> Option<TileSnapshot> {
        world.grid.tile(coord).map(|tile| tile.snapshot())
    }

    /// Reports whether a tower of `kind` could be built on `coord` right now,
    /// ignoring the balance.
    #[must_use]
    pub fn can_place(world: &World, coord: TileCoord, kind: TowerKind) -> bool {
        world
            .grid
            .tile(coord)
            .is_some_and(|tile| tile.can_place(kind.tower_type()))
    }

    /// Number of columns and rows in the parsed map.
    #[must_use]
    pub fn grid_size(world: &World) -> (u32, u32) {
        (world.grid.columns(), world.grid.rows())
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Route enemies follow.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Captures a read-only view of the live enemies in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the towers in build order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| tower.snapshot(world.selected_tower == Some(tower.id)))
                .collect(),
        )
    }

    /// Every projectile in flight, grouped by owning tower in build order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .towers
            .iter()
            .flat_map(|tower| tower.projectiles().iter().map(|projectile| projectile.snapshot()))
            .collect()
    }

    /// Current balance.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.money
    }

    /// Lives left.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Reports whether the lives are exhausted.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.lives == 0
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Read-only summary of the wave state machine.
    #[must_use]
    pub fn spawner_status(world: &World) -> SpawnerStatus {
        world.spawner.status()
    }

    /// Sidebar text for the spawner, e.g. `"Next: 3s"` or `"WAVE 2"`.
    #[must_use]
    pub fn spawner_text(world: &World) -> String {
        world
            .spawner
            .status()
            .info_text(world.config.ticks_per_second)
    }

    /// Catalog entry used by build clicks.
    #[must_use]
    pub fn selected_type(world: &World) -> TowerKind {
        world.selected_type
    }

    /// Info panel for the hovered tower, or the selected catalog entry when
    /// no tower is hovered.
    #[must_use]
    pub fn info_panel(world: &World) -> InfoPanel {
        world
            .hovered_tower()
            .and_then(|id| world.towers.get(id))
            .map_or_else(|| world.selected_type.tower_type().info(), |tower| tower.info())
    }
}
