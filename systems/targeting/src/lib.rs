#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks tower targets by threat priority.
//!
//! Among the enemies inside a tower's range the one furthest along the path
//! (highest next-waypoint index) is chosen. Ties go to the candidate that
//! appears first in the supplied order, which the world keeps as spawn order.

use tower_defence_core::{EnemyId, EnemySnapshot, Vec2};

/// Minimal enemy state needed to evaluate a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetCandidate {
    /// Enemy identifier.
    pub enemy: EnemyId,
    /// World-space centre of the enemy.
    pub position: Vec2,
    /// Index of the waypoint the enemy is heading towards.
    pub waypoint_index: usize,
}

impl From<&EnemySnapshot> for TargetCandidate {
    fn from(snapshot: &EnemySnapshot) -> Self {
        Self {
            enemy: snapshot.id,
            position: snapshot.position,
            waypoint_index: snapshot.waypoint_index,
        }
    }
}

/// Tower targeting system.
#[derive(Clone, Copy, Debug, Default)]
pub struct TowerTargeting;

impl TowerTargeting {
    /// Creates a new targeting system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Selects the candidate closest to breaching within `range` of `tower_center`.
    ///
    /// The range test is inclusive. Returns `None` when no candidate is in range.
    pub fn find_target<I>(
        &self,
        tower_center: Vec2,
        range: f32,
        candidates: I,
    ) -> Option<TargetCandidate>
    where
        I: IntoIterator<Item = TargetCandidate>,
    {
        let max_distance_sq = range * range;
        let mut best: Option<TargetCandidate> = None;

        for candidate in candidates {
            if tower_center.distance_squared(candidate.position) > max_distance_sq {
                continue;
            }

            match best {
                Some(existing) if candidate.waypoint_index <= existing.waypoint_index => {}
                _ => best = Some(candidate),
            }
        }

        best
    }
}
