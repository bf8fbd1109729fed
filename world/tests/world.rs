use tower_defence_core::{
    ClickOutcome, Command, EnemyId, Event, GameConfig, SpawnPhase, TileCoord, TowerId, TowerKind,
    Vec2,
};
use tower_defence_world::{apply, query, World};

const STRAIGHT: [&str; 2] = ["PPPPP", "TTTTT"];
const AWAY: Vec2 = Vec2::new(-100.0, -100.0);

fn quiet_config() -> GameConfig {
    GameConfig {
        wave_break_ticks: 100_000,
        ..GameConfig::default()
    }
}

fn pointer_on(column: u32, row: u32) -> Vec2 {
    TileCoord::new(column, row).center(30.0)
}

#[test]
fn archer_kills_enemy_with_two_spaced_hits() {
    let mut world = World::new(quiet_config(), &STRAIGHT).expect("world builds");
    let mut events = Vec::new();

    let outcome = world.handle_click(pointer_on(2, 1), &mut events);
    assert_eq!(
        outcome,
        ClickOutcome::Built {
            tower: TowerId::new(0),
            tile: TileCoord::new(2, 1),
        }
    );
    assert_eq!(query::money(&world), 450);

    let enemy = world
        .spawn_enemy(20, 1.5, 10, &mut events)
        .expect("path exists");

    let mut hit_ticks = Vec::new();
    let mut fire_ticks = Vec::new();
    let mut killed_at = None;
    for tick in 1..=200u32 {
        events.clear();
        assert!(world.tick(AWAY, &mut events));

        for event in &events {
            match event {
                Event::ProjectileFired { .. } => fire_ticks.push(tick),
                Event::EnemyHit { damage, .. } => {
                    assert_eq!(*damage, 10);
                    hit_ticks.push(tick);
                }
                Event::EnemyKilled { enemy: killed, bounty } => {
                    assert_eq!(*killed, enemy);
                    assert_eq!(*bounty, 10);
                    killed_at = Some(tick);
                }
                Event::EnemyBreached { .. } => panic!("enemy escaped"),
                _ => {}
            }
        }

        if killed_at.is_some() {
            break;
        }
    }

    assert_eq!(fire_ticks, vec![1, 46], "second shot waits for the 45 tick cooldown");
    assert_eq!(hit_ticks, vec![6, 48]);
    assert_eq!(killed_at, Some(48));
    assert_eq!(query::money(&world), 460);
    assert_eq!(query::lives(&world), 20);
    assert!(query::enemy_view(&world).is_empty());
}

#[test]
fn upgrade_does_not_change_projectiles_in_flight() {
    let mut world = World::new(quiet_config(), &STRAIGHT).expect("world builds");
    let mut events = Vec::new();
    let tile = pointer_on(2, 1);

    assert!(matches!(
        world.handle_click(tile, &mut events),
        ClickOutcome::Built { .. }
    ));
    let _ = world.spawn_enemy(100, 1.5, 10, &mut events);

    events.clear();
    assert!(world.tick(AWAY, &mut events));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ProjectileFired { .. })));

    assert!(matches!(
        world.handle_click(tile, &mut events),
        ClickOutcome::Upgraded { level: 2, .. }
    ));
    assert_eq!(query::tower_view(&world).into_vec()[0].stats.damage, 15);

    events.clear();
    for _ in 0..10 {
        assert!(world.tick(AWAY, &mut events));
    }

    let damages: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyHit { damage, .. } => Some(*damage),
            _ => None,
        })
        .collect();
    assert_eq!(damages, vec![10], "shot fired before the upgrade keeps its damage");
}

#[test]
fn clicking_an_occupied_tile_only_upgrades() {
    let mut world = World::new(quiet_config(), &STRAIGHT).expect("world builds");
    let mut events = Vec::new();
    let tile = pointer_on(1, 1);

    assert!(matches!(
        world.handle_click(tile, &mut events),
        ClickOutcome::Built { .. }
    ));
    world.select_tower_type(TowerKind::Cannon, &mut events);

    let mut levels = Vec::new();
    loop {
        match world.handle_click(tile, &mut events) {
            ClickOutcome::Upgraded { level, .. } => levels.push(level),
            ClickOutcome::Unaffordable { cost } => {
                assert_eq!(cost, 175);
                break;
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(levels, vec![2, 3, 4, 5]);
    assert_eq!(query::money(&world), 100, "500 - 50 - 35 - 70 - 105 - 140");
    assert!(events.contains(&Event::PurchaseRejected {
        cost: 175,
        balance: 100,
    }));

    let towers = query::tower_view(&world).into_vec();
    assert_eq!(towers.len(), 1);
    assert_eq!(towers[0].kind, TowerKind::Archer);
    assert_eq!(towers[0].level, 5);
    assert!(towers[0].selected);
    assert_eq!(
        query::tile(&world, TileCoord::new(1, 1)).and_then(|tile| tile.tower),
        Some(TowerId::new(0))
    );
}

#[test]
fn failed_build_leaves_balance_untouched() {
    let config = GameConfig {
        starting_money: 40,
        ..quiet_config()
    };
    let mut world = World::new(config, &STRAIGHT).expect("world builds");
    let mut events = Vec::new();

    let outcome = world.handle_click(pointer_on(0, 1), &mut events);

    assert_eq!(outcome, ClickOutcome::Unaffordable { cost: 50 });
    assert_eq!(query::money(&world), 40);
    assert_eq!(query::tile(&world, TileCoord::new(0, 1)).and_then(|tile| tile.tower), None);
}

#[test]
fn clicks_outside_the_map_are_ignored() {
    let mut world = World::new(quiet_config(), &STRAIGHT).expect("world builds");
    let mut events = Vec::new();

    assert_eq!(world.handle_click(AWAY, &mut events), ClickOutcome::OutsideGrid);
    assert_eq!(
        world.handle_click(pointer_on(7, 0), &mut events),
        ClickOutcome::OutsideGrid
    );
    assert!(events.is_empty());
    assert_eq!(query::money(&world), 500);
}

#[test]
fn breaches_cost_lives_until_game_over() {
    let config = GameConfig {
        starting_lives: 2,
        ..quiet_config()
    };
    let mut world = World::new(config, &["PPP", "TTT"]).expect("world builds");
    let mut events = Vec::new();
    for _ in 0..3 {
        let _ = world.spawn_enemy(20, 30.0, 10, &mut events);
    }

    events.clear();
    for _ in 0..3 {
        assert!(world.tick(AWAY, &mut events));
    }
    assert!(
        !events.iter().any(|event| matches!(event, Event::EnemyBreached { .. })),
        "breach is detected the tick after the exit is reached"
    );

    assert!(!world.tick(AWAY, &mut events));

    let remaining: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyBreached {
                lives_remaining, ..
            } => Some(*lives_remaining),
            _ => None,
        })
        .collect();
    assert_eq!(remaining, vec![1, 0, 0]);
    assert_eq!(
        events.iter().filter(|event| **event == Event::GameOver).count(),
        1
    );
    assert_eq!(query::lives(&world), 0);
    assert!(query::is_game_over(&world));

    events.clear();
    assert!(!world.tick(AWAY, &mut events));
    assert!(events.is_empty(), "a finished game no longer advances");
    assert_eq!(query::tick_index(&world), 4);
}

#[test]
fn spawner_feeds_waves_into_the_world() {
    let config = GameConfig {
        wave_break_ticks: 3,
        spawn_delay_ticks: 2,
        starting_enemies: 1,
        enemies_per_wave: 1,
        ticks_per_second: 1,
        enemy_speed: 0.5,
        ..GameConfig::default()
    };
    let mut world = World::new(config, &STRAIGHT).expect("world builds");
    let mut events = Vec::new();

    let _ = world.tick(AWAY, &mut events);
    assert_eq!(query::spawner_text(&world), "Next: 2s");

    for _ in 0..6 {
        let _ = world.tick(AWAY, &mut events);
    }

    assert!(events.contains(&Event::WaveStarted {
        wave: 1,
        enemies: 2,
    }));
    let spawned: Vec<(EnemyId, u32)> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { enemy, health } => Some((*enemy, *health)),
            _ => None,
        })
        .collect();
    assert_eq!(spawned, vec![(EnemyId::new(0), 25), (EnemyId::new(1), 25)]);
    assert_eq!(query::enemy_view(&world).len(), 2);
    assert_eq!(query::spawner_status(&world).phase, SpawnPhase::Waiting);
    assert_eq!(query::spawner_text(&world), "WAVE 1");
}

#[test]
fn world_without_path_keeps_cycling_waves_harmlessly() {
    let config = GameConfig {
        wave_break_ticks: 2,
        spawn_delay_ticks: 1,
        ..GameConfig::default()
    };
    let mut world = World::new(config, &["TTT", "TBT"]).expect("world builds");
    let mut events = Vec::new();

    for _ in 0..100 {
        assert!(world.tick(AWAY, &mut events));
    }

    assert!(query::path(&world).is_empty());
    assert!(query::enemy_view(&world).is_empty());
    assert!(query::spawner_status(&world).wave > 1);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::EnemySpawned { .. })));
}

#[test]
fn default_level_is_playable_through_commands() {
    let events = replay();

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TowerBuilt { .. })));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EnemyKilled { .. })));
    assert_eq!(replay(), events, "replay diverged between runs");
}

fn replay() -> Vec<Event> {
    let mut world = World::with_default_map(GameConfig::default()).expect("default map builds");
    let mut events = Vec::new();

    let script = [
        Command::Click {
            pointer: pointer_on(4, 4),
        },
        Command::Click {
            pointer: pointer_on(14, 4),
        },
        Command::SelectTowerType {
            kind: TowerKind::Cannon,
        },
        Command::Click {
            pointer: pointer_on(16, 5),
        },
        Command::Click {
            pointer: pointer_on(4, 4),
        },
    ];
    for command in script {
        apply(&mut world, command, &mut events);
    }

    for tick in 0..3_000u32 {
        let pointer = pointer_on(tick % 20, (tick / 20) % 20);
        apply(&mut world, Command::Tick { pointer }, &mut events);
    }

    events
}
