use tower_defence_core::{EnemyId, EnemySnapshot, EnemyView, Vec2};
use tower_defence_system_targeting::{TargetCandidate, TowerTargeting};

fn enemy(id: u32, position: (f32, f32), waypoint_index: usize) -> EnemySnapshot {
    EnemySnapshot {
        id: EnemyId::new(id),
        position: Vec2::new(position.0, position.1),
        health: 20,
        max_health: 20,
        waypoint_index,
    }
}

fn target_of(view: &EnemyView, center: Vec2, range: f32) -> Option<EnemyId> {
    TowerTargeting::new()
        .find_target(center, range, view.iter().map(TargetCandidate::from))
        .map(|candidate| candidate.enemy)
}

#[test]
fn prefers_enemy_furthest_along_path_over_nearest() {
    let view = EnemyView::from_snapshots(vec![
        enemy(1, (10.0, 0.0), 2),
        enemy(2, (90.0, 0.0), 7),
        enemy(3, (5.0, 0.0), 1),
    ]);

    assert_eq!(
        target_of(&view, Vec2::ZERO, 100.0),
        Some(EnemyId::new(2)),
        "threat priority ignores distance inside range"
    );
}

#[test]
fn enemies_outside_range_are_ignored() {
    let view = EnemyView::from_snapshots(vec![
        enemy(1, (10.0, 0.0), 2),
        enemy(2, (150.0, 0.0), 9),
    ]);

    assert_eq!(target_of(&view, Vec2::ZERO, 120.0), Some(EnemyId::new(1)));
}

#[test]
fn ties_go_to_earliest_spawned_enemy() {
    let view = EnemyView::from_snapshots(vec![
        enemy(8, (20.0, 0.0), 4),
        enemy(3, (60.0, 0.0), 4),
        enemy(5, (0.0, 10.0), 4),
    ]);

    assert_eq!(target_of(&view, Vec2::ZERO, 100.0), Some(EnemyId::new(3)));
}

#[test]
fn no_candidates_yield_no_target() {
    let view = EnemyView::default();
    assert_eq!(target_of(&view, Vec2::ZERO, 100.0), None);

    let far = EnemyView::from_snapshots(vec![enemy(1, (500.0, 500.0), 3)]);
    assert_eq!(target_of(&far, Vec2::ZERO, 100.0), None);
}

#[test]
fn larger_range_brings_distant_enemy_into_play() {
    let view = EnemyView::from_snapshots(vec![enemy(1, (130.0, 0.0), 3)]);

    assert_eq!(target_of(&view, Vec2::ZERO, 120.0), None);
    assert_eq!(target_of(&view, Vec2::ZERO, 135.0), Some(EnemyId::new(1)));
}
