//! Path-following enemies.

use tower_defence_core::{EnemyId, EnemySnapshot, Vec2, WorldRect};
use tower_defence_system_combat::HitTarget;
use tower_defence_system_targeting::TargetCandidate;

/// Live enemy walking the path towards the exit.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    health: i64,
    max_health: u32,
    speed: f32,
    pub(crate) bounty: u32,
    position: Vec2,
    next_waypoint: usize,
    breached: bool,
}

impl Enemy {
    /// Places a new enemy on `start` heading for waypoint zero.
    pub(crate) fn new(id: EnemyId, health: u32, speed: f32, bounty: u32, start: Vec2) -> Self {
        Self {
            id,
            health: i64::from(health),
            max_health: health,
            speed,
            bounty,
            position: start,
            next_waypoint: 0,
            breached: false,
        }
    }

    /// Moves the enemy one tick along `waypoints` and reports whether it has breached.
    ///
    /// Reaching a waypoint snaps onto it exactly and targets the next one. The
    /// breach is detected on the call after the final waypoint was reached.
    pub(crate) fn advance(&mut self, waypoints: &[Vec2]) -> bool {
        if self.breached {
            return true;
        }

        let Some(target) = waypoints.get(self.next_waypoint).copied() else {
            self.breached = true;
            return true;
        };

        let offset = target - self.position;
        let distance = offset.length();
        if distance > self.speed {
            self.position += offset / distance * self.speed;
        } else {
            self.position = target;
            self.next_waypoint += 1;
        }
        false
    }

    /// Subtracts `amount` from the health and reports whether the enemy died.
    pub(crate) fn take_damage(&mut self, amount: u32) -> bool {
        self.health -= i64::from(amount);
        self.health <= 0
    }

    pub(crate) const fn is_breached(&self) -> bool {
        self.breached
    }

    pub(crate) fn hit_target(&self, tile_size: f32) -> HitTarget {
        HitTarget {
            enemy: self.id,
            bounds: WorldRect::centered_square(self.position, tile_size),
        }
    }

    pub(crate) const fn candidate(&self) -> TargetCandidate {
        TargetCandidate {
            enemy: self.id,
            position: self.position,
            waypoint_index: self.next_waypoint,
        }
    }

    pub(crate) const fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            waypoint_index: self.next_waypoint,
        }
    }
}
