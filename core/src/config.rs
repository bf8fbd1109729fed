//! Tunable game constants loaded from TOML.

use serde::Deserialize;
use thiserror::Error;

/// Reasons a configuration document may be rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or contains fields of the wrong type.
    #[error("invalid game configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds a value the simulation cannot run with.
    #[error("invalid game configuration: `{field}` {problem}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Human readable description of the constraint that failed.
        problem: &'static str,
    },
}

/// Game constants shared by the world and its systems.
///
/// Every field is optional in the TOML document; missing fields take the
/// values of [`GameConfig::default`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Side length of one square tile in world units.
    pub tile_size: f32,
    /// Number of map columns kept from the level map.
    pub columns: u32,
    /// Number of map rows kept from the level map.
    pub rows: u32,
    /// Simulation ticks per displayed second.
    pub ticks_per_second: u32,
    /// Currency available at the start of the game.
    pub starting_money: u32,
    /// Breaches tolerated before the game ends.
    pub starting_lives: u32,
    /// Enemy health during wave zero; later waves add `hp_per_wave`.
    pub enemy_hp: u32,
    /// Distance an enemy travels per tick.
    pub enemy_speed: f32,
    /// Currency awarded for each kill.
    pub enemy_bounty: u32,
    /// Ticks of intermission before each wave.
    pub wave_break_ticks: u32,
    /// Ticks between two enemies of the same wave.
    pub spawn_delay_ticks: u32,
    /// Enemies in wave zero; later waves add `enemies_per_wave`.
    pub starting_enemies: u32,
    /// Additional enemies per wave number.
    pub enemies_per_wave: u32,
    /// Additional enemy health per wave number.
    pub hp_per_wave: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 30.0,
            columns: 20,
            rows: 20,
            ticks_per_second: 60,
            starting_money: 500,
            starting_lives: 20,
            enemy_hp: 20,
            enemy_speed: 1.5,
            enemy_bounty: 10,
            wave_break_ticks: 3 * 60,
            spawn_delay_ticks: 60,
            starting_enemies: 5,
            enemies_per_wave: 2,
            hp_per_wave: 5,
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "tile_size",
                problem: "must be a positive number",
            });
        }
        if !(self.enemy_speed.is_finite() && self.enemy_speed >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "enemy_speed",
                problem: "must be a non-negative number",
            });
        }
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid {
                field: "ticks_per_second",
                problem: "must be at least one",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GameConfig::from_toml_str("").expect("defaults parse");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_document_overrides_selected_fields() {
        let config = GameConfig::from_toml_str("starting_money = 75\nenemy_speed = 2.0\n")
            .expect("partial config parses");
        assert_eq!(config.starting_money, 75);
        assert!((config.enemy_speed - 2.0).abs() < f32::EPSILON);
        assert_eq!(config.starting_lives, 20);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = GameConfig::from_toml_str("gravity = 9.8").expect_err("unknown field");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn non_positive_tile_size_is_rejected() {
        let error = GameConfig::from_toml_str("tile_size = 0.0").expect_err("zero tile");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "tile_size",
                ..
            }
        ));
    }
}
