#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile kinematics and per-tower collision resolution.
//!
//! A projectile flies in a straight line at constant velocity and carries the
//! damage and range its tower had when it fired, so later upgrades never
//! change shots already in flight. Collisions are resolved per tower: every
//! projectile overlapping an enemy in the same tick is consumed and their
//! damage is summed into a single [`Hit`].

use tower_defence_core::{EnemyId, ProjectileSnapshot, TowerId, Vec2, WorldRect};
use tracing::trace;

/// Values captured from the firing tower at the moment of the shot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    /// Tower that fires.
    pub tower: TowerId,
    /// Damage carried by the projectile.
    pub damage: u32,
    /// Distance the projectile may travel before it is discarded.
    pub range: f32,
    /// Distance travelled per tick.
    pub speed: f32,
    /// Side length of the projectile hit box.
    pub size: f32,
}

/// Range-limited moving hit box owned by a tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    shot: Shot,
    spawn: Vec2,
    position: Vec2,
    velocity: Vec2,
}

impl Projectile {
    /// Launches a projectile from `origin` towards the current position of `aim`.
    ///
    /// The heading is fixed at fire time; there is no lead or homing. Aiming at
    /// the origin itself fires along the positive x axis.
    #[must_use]
    pub fn fire(shot: Shot, origin: Vec2, aim: Vec2) -> Self {
        let direction = (aim - origin).try_normalize().unwrap_or(Vec2::X);
        Self {
            shot,
            spawn: origin,
            position: origin,
            velocity: direction * shot.speed,
        }
    }

    /// Moves the projectile one tick along its heading.
    ///
    /// Returns `false` once the distance from the spawn point exceeds the
    /// captured range, at which point the owner discards it.
    pub fn advance(&mut self) -> bool {
        self.position += self.velocity;
        self.traveled() <= self.shot.range
    }

    /// Straight-line distance from the spawn point.
    #[must_use]
    pub fn traveled(&self) -> f32 {
        self.position.distance(self.spawn)
    }

    /// Current world-space centre.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Per-tick displacement.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Damage captured at fire time.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.shot.damage
    }

    /// Square hit box centred on the projectile.
    #[must_use]
    pub fn hit_box(&self) -> WorldRect {
        WorldRect::centered_square(self.position, self.shot.size)
    }

    /// Read-only state for presentation.
    #[must_use]
    pub const fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            tower: self.shot.tower,
            position: self.position,
            size: self.shot.size,
        }
    }
}

/// Enemy hit box offered to collision resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTarget {
    /// Enemy identifier.
    pub enemy: EnemyId,
    /// Area the enemy occupies this tick.
    pub bounds: WorldRect,
}

/// Combined damage one tower dealt to one enemy in a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    /// Enemy that was struck.
    pub enemy: EnemyId,
    /// Sum of the captured damage of every colliding projectile.
    pub damage: u32,
}

/// Combat system that moves projectiles and groups their collisions.
#[derive(Debug, Default)]
pub struct TowerCombat {
    consumed: Vec<bool>,
}

impl TowerCombat {
    /// Creates a new combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every projectile and drops those past their range.
    ///
    /// Returns the number of projectiles dropped.
    pub fn advance_projectiles(&mut self, projectiles: &mut Vec<Projectile>) -> usize {
        let before = projectiles.len();
        projectiles.retain_mut(Projectile::advance);
        before - projectiles.len()
    }

    /// Resolves collisions between one tower's projectiles and the enemies.
    ///
    /// Targets are visited in the supplied order. A projectile overlapping
    /// several enemies is consumed by the first of them. Consumed projectiles
    /// are removed after the scan, and one [`Hit`] per struck enemy is
    /// appended to `out`.
    pub fn resolve_hits<I>(&mut self, projectiles: &mut Vec<Projectile>, targets: I, out: &mut Vec<Hit>)
    where
        I: IntoIterator<Item = HitTarget>,
    {
        if projectiles.is_empty() {
            return;
        }

        self.consumed.clear();
        self.consumed.resize(projectiles.len(), false);

        for target in targets {
            let mut damage = 0u32;
            let mut count = 0usize;

            for (index, projectile) in projectiles.iter().enumerate() {
                if self.consumed[index] || !projectile.hit_box().overlaps(&target.bounds) {
                    continue;
                }
                self.consumed[index] = true;
                damage = damage.saturating_add(projectile.damage());
                count += 1;
            }

            if count > 0 {
                trace!(enemy = target.enemy.get(), damage, count, "projectiles collided");
                out.push(Hit {
                    enemy: target.enemy,
                    damage,
                });
            }
        }

        let consumed = &self.consumed;
        let mut index = 0;
        projectiles.retain(|_| {
            let keep = !consumed[index];
            index += 1;
            keep
        });
    }
}
