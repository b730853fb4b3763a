//! Game configuration.
//!
//! A single immutable `GameConfig` resource carries every tunable constant of a session
//! (lives, round count, time budget, scoring weights, endpoints). On native it can be
//! overridden from a RON file in the user's config directory.

use bevy::log::{debug, info, warn};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub struct ConfigPlugin;
impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GameConfig::load());
    }
}

#[cfg(not(target_arch = "wasm32"))]
const CONFIG_FILE: &str = "config.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("games_count must be at least 1")]
    NoGames,
    #[error("lives_count must be at least 1")]
    NoLives,
    #[error("tick_ms must be at least 1")]
    ZeroTick,
    #[error("time_to_answer_ms ({budget}) is not a whole number of {tick}ms ticks")]
    UnevenBudget { budget: u32, tick: u32 },
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub lives_count: u32,
    pub games_count: usize,
    pub time_to_answer_ms: u32,
    pub tick_ms: u32,
    /// Answers strictly faster than this earn the speed bonus.
    pub fast_answer_secs: u32,
    /// Answers strictly slower than this take the slow penalty.
    pub slow_answer_secs: u32,
    pub correct_points: i32,
    pub speed_bonus: i32,
    pub slow_penalty: i32,
    pub life_bonus: i32,
    /// Remaining-time values at which the countdown is drawn in the urgent colour.
    pub urgent_marks_ms: Vec<u32>,
    pub rounds_source: String,
    pub results_endpoint: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lives_count: 3,
            games_count: 10,
            time_to_answer_ms: 30_000,
            tick_ms: 1_000,
            fast_answer_secs: 10,
            slow_answer_secs: 20,
            correct_points: 100,
            speed_bonus: 50,
            slow_penalty: 50,
            life_bonus: 50,
            urgent_marks_ms: vec![5_000, 3_000, 1_000],
            rounds_source: default_rounds_source(),
            results_endpoint: "https://es.dump.academy/pixel-hunter/stats".to_string(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_rounds_source() -> String {
    "assets/rounds.json".to_string()
}

#[cfg(target_arch = "wasm32")]
fn default_rounds_source() -> String {
    "https://es.dump.academy/pixel-hunter/questions".to_string()
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.games_count == 0 {
            return Err(ConfigError::NoGames);
        }
        if self.lives_count == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.time_to_answer_ms % self.tick_ms != 0 {
            return Err(ConfigError::UnevenBudget {
                budget: self.time_to_answer_ms,
                tick: self.tick_ms,
            });
        }
        Ok(())
    }

    /// Full time budget of a round in whole seconds.
    pub fn time_to_answer_secs(&self) -> u32 {
        self.time_to_answer_ms / 1_000
    }

    pub fn is_urgent(&self, remaining_ms: u32) -> bool {
        self.urgent_marks_ms.contains(&remaining_ms)
    }

    /// Parses a RON override, keeping defaults for omitted fields.
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load() -> Self {
        let Some(config_dir) = dirs::config_dir().map(|p| p.join("pixel-hunter")) else {
            warn!("Could not determine config directory, using defaults");
            return GameConfig::default();
        };
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            debug!("No config override found at {:?}", path);
            return GameConfig::default();
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => match GameConfig::from_ron(&content) {
                Ok(config) => {
                    info!("Loaded config override from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Ignoring invalid config {:?}: {}", path, e);
                    GameConfig::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                GameConfig::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn load() -> Self {
        GameConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.time_to_answer_secs(), 30);
    }

    #[test]
    fn urgent_marks() {
        let config = GameConfig::default();
        assert!(config.is_urgent(5_000));
        assert!(config.is_urgent(3_000));
        assert!(config.is_urgent(1_000));
        assert!(!config.is_urgent(4_000));
        assert!(!config.is_urgent(0));
    }

    #[test]
    fn override_keeps_omitted_defaults() {
        let config = GameConfig::from_ron("(lives_count: 5, games_count: 4)").unwrap();
        assert_eq!(config.lives_count, 5);
        assert_eq!(config.games_count, 4);
        assert_eq!(config.time_to_answer_ms, 30_000);
    }

    #[test]
    fn rejects_uneven_budget() {
        let config = GameConfig { time_to_answer_ms: 2_500, ..GameConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnevenBudget { budget: 2_500, tick: 1_000 })
        ));
        assert!(matches!(GameConfig::from_ron("(games_count: 0)"), Err(ConfigError::NoGames)));
        assert!(matches!(GameConfig::from_ron("(games_count: \"ten\")"), Err(ConfigError::Parse(_))));
    }
}
