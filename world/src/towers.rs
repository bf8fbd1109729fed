//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use tower_defence_core::{
    upgrade_cost, Clickable, EnemyId, InfoPanel, TileCoord, Timer, TowerId, TowerKind,
    TowerSnapshot, TowerType, UpgradeStats, Vec2, WorldRect, UPGRADE_FOOTER,
};
use tower_defence_system_combat::{Hit, Projectile, Shot, TowerCombat};
use tower_defence_system_targeting::TowerTargeting;

use crate::enemies::Enemy;

/// Stateless and scratch-buffer systems shared by every tower during a tick.
#[derive(Debug, Default)]
pub(crate) struct TowerSystems {
    targeting: TowerTargeting,
    combat: TowerCombat,
}

/// Placed tower with its cooldown and the projectiles it owns.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    kind: TowerKind,
    tile: TileCoord,
    bounds: WorldRect,
    level: u32,
    stats: UpgradeStats,
    cooldown: Timer,
    projectiles: Vec<Projectile>,
    hovered: bool,
}

impl Tower {
    fn new(id: TowerId, kind: TowerKind, tile: TileCoord, tile_size: f32) -> Self {
        let stats = kind.tower_type().base_stats();
        Self {
            id,
            kind,
            tile,
            bounds: tile.bounds(tile_size),
            level: 1,
            stats,
            cooldown: Timer::new(stats.cooldown_ticks),
            projectiles: Vec::new(),
            hovered: false,
        }
    }

    fn tower_type(&self) -> &'static TowerType {
        self.kind.tower_type()
    }

    pub(crate) fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    pub(crate) const fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub(crate) fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Price of the next upgrade.
    pub(crate) fn upgrade_cost(&self) -> u32 {
        upgrade_cost(self.tower_type().cost, self.level)
    }

    /// Statistics the next upgrade would produce.
    pub(crate) fn upgrade_stats(&self) -> UpgradeStats {
        self.stats.upgraded()
    }

    /// Applies the previewed upgrade and returns the new level.
    ///
    /// A cooldown already running keeps its remaining ticks; the shorter
    /// duration applies from the next shot.
    pub(crate) fn upgrade(&mut self) -> u32 {
        self.stats = self.upgrade_stats();
        self.level = self.level.saturating_add(1);
        self.cooldown.set_duration(self.stats.cooldown_ticks);
        self.level
    }

    pub(crate) fn info(&self) -> InfoPanel {
        let tower_type = self.tower_type();
        InfoPanel {
            title: format!("LVL {} {}", self.level, tower_type.name),
            colour: tower_type.colour,
            stats: self.stats,
            cost: self.upgrade_cost(),
            footer: UPGRADE_FOOTER,
            preview: Some(self.upgrade_stats()),
        }
    }

    /// Runs one tick of the tower against the live enemies.
    ///
    /// Updates hover state, moves owned projectiles, fires at the highest
    /// threat in range when the cooldown allows, and appends grouped hits to
    /// `hits`. Returns the enemy fired at, if any. Enemies are only read here;
    /// the caller applies the hits.
    pub(crate) fn advance(
        &mut self,
        pointer: Vec2,
        enemies: &[Enemy],
        tile_size: f32,
        systems: &mut TowerSystems,
        hits: &mut Vec<Hit>,
    ) -> Option<EnemyId> {
        self.hovered = self.is_under(pointer);

        let _ = systems.combat.advance_projectiles(&mut self.projectiles);

        let _ = self.cooldown.tick();
        let mut fired_at = None;
        if !self.cooldown.is_active() {
            let range = self.stats.range as f32;
            let target = systems
                .targeting
                .find_target(self.center(), range, enemies.iter().map(Enemy::candidate));
            if let Some(target) = target {
                self.fire(target.position);
                fired_at = Some(target.enemy);
            }
        }

        systems.combat.resolve_hits(
            &mut self.projectiles,
            enemies.iter().map(|enemy| enemy.hit_target(tile_size)),
            hits,
        );
        fired_at
    }

    fn fire(&mut self, aim: Vec2) {
        let tower_type = self.tower_type();
        let shot = Shot {
            tower: self.id,
            damage: self.stats.damage,
            range: self.stats.range as f32,
            speed: tower_type.projectile_speed,
            size: tower_type.projectile_size,
        };
        self.projectiles.push(Projectile::fire(shot, self.center(), aim));
        self.cooldown.activate();
    }

    pub(crate) fn snapshot(&self, selected: bool) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            tile: self.tile,
            center: self.center(),
            level: self.level,
            stats: self.stats,
            hovered: self.hovered,
            selected,
        }
    }
}

impl Clickable for Tower {
    fn bounds(&self) -> WorldRect {
        self.bounds
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

    /// Builds a level one tower on `tile` and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, tile: TileCoord, tile_size: f32) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, Tower::new(id, kind, tile, tile_size));
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    /// Towers in build order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }
}
