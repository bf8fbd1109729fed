#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave state machine responsible for emitting enemy spawn commands.
//!
//! The spawner cycles `Countdown -> Spawning -> Waiting -> Countdown` forever.
//! Each wave releases more enemies than the last, and each enemy carries more
//! health; the game ends through the world's life counter, never here.

use tower_defence_core::{Command, GameConfig, SpawnPhase, SpawnerStatus, Timer};
use tracing::{debug, info};

/// Difficulty curve and pacing used by the spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    wave_break_ticks: u32,
    spawn_delay_ticks: u32,
    base_enemy_count: u32,
    enemies_per_wave: u32,
    base_hp: u32,
    hp_per_wave: u32,
    enemy_speed: f32,
    enemy_bounty: u32,
}

impl Config {
    /// Extracts the spawner settings from the game configuration.
    #[must_use]
    pub fn from_game(config: &GameConfig) -> Self {
        Self {
            wave_break_ticks: config.wave_break_ticks,
            spawn_delay_ticks: config.spawn_delay_ticks,
            base_enemy_count: config.starting_enemies,
            enemies_per_wave: config.enemies_per_wave,
            base_hp: config.enemy_hp,
            hp_per_wave: config.hp_per_wave,
            enemy_speed: config.enemy_speed,
            enemy_bounty: config.enemy_bounty,
        }
    }

    /// Number of enemies released by wave `wave`.
    #[must_use]
    pub fn enemies_in_wave(&self, wave: u32) -> u32 {
        self.base_enemy_count
            .saturating_add(wave.saturating_mul(self.enemies_per_wave))
    }

    /// Health of every enemy released by wave `wave`.
    #[must_use]
    pub fn enemy_hp(&self, wave: u32) -> u32 {
        self.base_hp
            .saturating_add(wave.saturating_mul(self.hp_per_wave))
    }
}

/// Wave state machine owned by the world.
#[derive(Debug)]
pub struct EnemySpawner {
    config: Config,
    phase: SpawnPhase,
    wave: u32,
    remaining: u32,
    wave_timer: Timer,
    spawn_timer: Timer,
}

impl EnemySpawner {
    /// Creates a spawner in the countdown phase with its intermission already running.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            phase: SpawnPhase::Countdown,
            wave: 0,
            remaining: 0,
            wave_timer: Timer::started(config.wave_break_ticks),
            spawn_timer: Timer::new(config.spawn_delay_ticks),
            config,
        }
    }

    /// Advances the state machine by one tick.
    ///
    /// `live_enemies` is the number of enemies currently on the field; the
    /// waiting phase ends once it reaches zero. Spawn requests are appended to
    /// `out` as [`Command::SpawnEnemy`].
    pub fn handle(&mut self, live_enemies: usize, out: &mut Vec<Command>) {
        match self.phase {
            SpawnPhase::Countdown => {
                if self.wave_timer.tick() {
                    self.start_new_wave();
                }
            }
            SpawnPhase::Spawning => {
                if self.spawn_timer.tick() {
                    out.push(self.spawn_command());
                    self.remaining = self.remaining.saturating_sub(1);

                    if self.remaining > 0 {
                        self.spawn_timer.activate();
                    } else {
                        self.phase = SpawnPhase::Waiting;
                    }
                }
            }
            SpawnPhase::Waiting => {
                if live_enemies == 0 {
                    debug!(wave = self.wave, "wave cleared");
                    self.phase = SpawnPhase::Countdown;
                    self.wave_timer.activate();
                }
            }
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> SpawnPhase {
        self.phase
    }

    /// Most recently started wave; zero before the first.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Enemies of the current wave not yet released.
    #[must_use]
    pub const fn remaining_to_spawn(&self) -> u32 {
        self.remaining
    }

    /// Read-only summary for presentation.
    #[must_use]
    pub const fn status(&self) -> SpawnerStatus {
        SpawnerStatus {
            phase: self.phase,
            wave: self.wave,
            countdown_remaining: self.wave_timer.remaining(),
            remaining_to_spawn: self.remaining,
        }
    }

    fn start_new_wave(&mut self) {
        self.wave = self.wave.saturating_add(1);
        self.remaining = self.config.enemies_in_wave(self.wave);
        info!(wave = self.wave, enemies = self.remaining, "wave started");

        if self.remaining == 0 {
            self.phase = SpawnPhase::Waiting;
            return;
        }

        self.phase = SpawnPhase::Spawning;
        self.spawn_timer.activate();
    }

    fn spawn_command(&self) -> Command {
        Command::SpawnEnemy {
            health: self.config.enemy_hp(self.wave),
            speed: self.config.enemy_speed,
            bounty: self.config.enemy_bounty,
        }
    }
}
