use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use tower_defence_core::{Command, GameConfig, SpawnPhase};
use tower_defence_system_spawning::{Config, EnemySpawner};

fn quick_config() -> GameConfig {
    GameConfig {
        wave_break_ticks: 3,
        spawn_delay_ticks: 2,
        starting_enemies: 1,
        enemies_per_wave: 1,
        enemy_hp: 10,
        hp_per_wave: 4,
        ..GameConfig::default()
    }
}

#[test]
fn countdown_runs_for_the_wave_break_before_first_wave() {
    let mut spawner = EnemySpawner::new(Config::from_game(&quick_config()));
    let mut out = Vec::new();

    spawner.handle(0, &mut out);
    spawner.handle(0, &mut out);
    assert_eq!(spawner.phase(), SpawnPhase::Countdown);
    assert_eq!(spawner.status().info_text(1), "Next: 1s");

    spawner.handle(0, &mut out);
    assert_eq!(spawner.phase(), SpawnPhase::Spawning);
    assert_eq!(spawner.wave(), 1);
    assert_eq!(spawner.remaining_to_spawn(), 2);
    assert_eq!(spawner.status().info_text(60), "WAVE 1");
    assert!(out.is_empty(), "first enemy waits for the spawn delay");
}

#[test]
fn enemies_are_spaced_by_the_spawn_delay() {
    let mut spawner = EnemySpawner::new(Config::from_game(&quick_config()));
    let mut spawn_ticks = Vec::new();

    for tick in 1..=20 {
        let mut out = Vec::new();
        spawner.handle(1, &mut out);
        if !out.is_empty() {
            spawn_ticks.push(tick);
        }
    }

    assert_eq!(spawn_ticks, vec![5, 7], "wave one releases 1 + 1 enemies");
    assert_eq!(spawner.phase(), SpawnPhase::Waiting);
}

#[test]
fn spawned_enemies_carry_wave_scaled_health() {
    let mut spawner = EnemySpawner::new(Config::from_game(&quick_config()));
    let mut out = Vec::new();

    for _ in 0..5 {
        spawner.handle(0, &mut out);
    }

    assert_eq!(
        out,
        vec![Command::SpawnEnemy {
            health: 14,
            speed: 1.5,
            bounty: 10,
        }]
    );
}

#[test]
fn waiting_holds_until_field_is_clear() {
    let mut spawner = EnemySpawner::new(Config::from_game(&quick_config()));
    let mut out = Vec::new();

    for _ in 0..7 {
        spawner.handle(2, &mut out);
    }
    assert_eq!(spawner.phase(), SpawnPhase::Waiting);

    for _ in 0..10 {
        spawner.handle(1, &mut out);
    }
    assert_eq!(spawner.phase(), SpawnPhase::Waiting, "one enemy still alive");

    spawner.handle(0, &mut out);
    assert_eq!(spawner.phase(), SpawnPhase::Countdown);
    assert_eq!(spawner.status().countdown_remaining, 3);
}

#[test]
fn machine_cycles_indefinitely_with_growing_waves() {
    let config = Config::from_game(&quick_config());
    let mut spawner = EnemySpawner::new(config);
    let mut phases = Vec::new();
    let mut wave_sizes = Vec::new();
    let mut previous = spawner.phase();

    for _ in 0..400 {
        let mut out = Vec::new();
        spawner.handle(0, &mut out);
        let phase = spawner.phase();
        if phase != previous {
            phases.push(phase);
            if phase == SpawnPhase::Spawning {
                wave_sizes.push(spawner.remaining_to_spawn());
            }
            previous = phase;
        }
    }

    for window in phases.windows(2) {
        let expected = match window[0] {
            SpawnPhase::Countdown => SpawnPhase::Spawning,
            SpawnPhase::Spawning => SpawnPhase::Waiting,
            SpawnPhase::Waiting => SpawnPhase::Countdown,
        };
        assert_eq!(window[1], expected, "illegal transition in {phases:?}");
    }

    assert!(wave_sizes.len() >= 5, "expected several waves, got {wave_sizes:?}");
    for (index, size) in wave_sizes.iter().enumerate() {
        let wave = index as u32 + 1;
        assert_eq!(*size, config.enemies_in_wave(wave));
        assert_eq!(*size, 1 + wave);
    }
}

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert!(!first.is_empty());
}

fn replay() -> Vec<(u32, u64)> {
    let mut spawner = EnemySpawner::new(Config::from_game(&quick_config()));
    let mut log = Vec::new();
    let mut live = 0usize;

    for tick in 0..200u32 {
        let mut out = Vec::new();
        spawner.handle(live, &mut out);
        live += out.len();
        if tick % 9 == 0 {
            live = live.saturating_sub(1);
        }
        for command in out {
            log.push((tick, fingerprint(&command)));
        }
    }

    log
}

fn fingerprint(command: &Command) -> u64 {
    let mut hasher = DefaultHasher::new();
    if let Command::SpawnEnemy {
        health,
        speed,
        bounty,
    } = command
    {
        health.hash(&mut hasher);
        speed.to_bits().hash(&mut hasher);
        bounty.hash(&mut hasher);
    }
    hasher.finish()
}
