// Configuration module for reading Tank.toml
// Every tunable of the decision core lives here; game constants come from the server.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::line_of_fire::RayTermination;
use crate::types::Position;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub board: BoardConfig,
    pub threat: ThreatConfig,
    pub scorer: ScorerConfig,
    pub roles: RolesConfig,
    pub dispatch: DispatchConfig,
    pub session: SessionConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    /// Fixed board side; uploaded maps may be smaller, never larger
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThreatConfig {
    /// Shell trajectory horizon as a multiple of shell speed
    pub trajectory_horizon: i32,
}

/// Where the scorer's bait cell comes from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BaitSource {
    /// `bait_cell` as configured, possibly none
    #[default]
    Fixed,
    /// Grass patch nearest the flag (or the centre while no flag is known)
    Grass,
}

/// Line-of-fire constants
#[derive(Debug, Deserialize, Clone)]
pub struct ScorerConfig {
    pub min_fire_score: i32,
    pub ray_termination: RayTermination,
    #[serde(default)]
    pub bait_cell: Option<Position>,
    #[serde(default)]
    pub bait_source: BaitSource,
    /// How far from the flag to look for grass
    #[serde(default = "default_grass_radius")]
    pub grass_radius: i32,
}

fn default_grass_radius() -> i32 {
    5
}

/// How roster slots map to behaviours
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoleStrategy {
    /// Slot 0 attacks, 1 takes the flag, 2 guards, 3 scouts
    Slot,
    /// Even ids hold the centre, odd ids roam around it
    Parity,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttackerTarget {
    Nearest,
    First,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RolesConfig {
    pub strategy: RoleStrategy,
    pub attacker_target: AttackerTarget,
    /// Flag holder loiters within this many cells of the centre
    pub capturer_jitter: i32,
    /// Guard offset is drawn from width / divisor on each side
    pub guard_spread_divisor: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DispatchConfig {
    /// A fire order ends the round for every remaining tank
    pub fire_ends_round: bool,
    /// Pathfinding calls allowed per round; later tanks stall
    pub max_path_searches: usize,
    /// Soft wall-clock budget per round, 0 derives it from the server timeout
    pub round_budget_ms: u64,
}

impl DispatchConfig {
    /// Effective per-round budget, `None` when neither source sets one
    pub fn budget(&self, round_timeout_ms: i32) -> Option<Duration> {
        let ms = if self.round_budget_ms > 0 {
            self.round_budget_ms
        } else {
            (round_timeout_ms.max(0) as u64) / 2
        };
        (ms > 0).then(|| Duration::from_millis(ms))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub history_capacity: usize,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Tank.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Tank.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Tank.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Tank.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardConfig { capacity: 50 },
            threat: ThreatConfig {
                trajectory_horizon: 2,
            },
            scorer: ScorerConfig {
                min_fire_score: 6,
                ray_termination: RayTermination::Origin,
                bait_cell: None,
                bait_source: BaitSource::Fixed,
                grass_radius: 5,
            },
            roles: RolesConfig {
                strategy: RoleStrategy::Slot,
                attacker_target: AttackerTarget::Nearest,
                capturer_jitter: 2,
                guard_spread_divisor: 8,
            },
            dispatch: DispatchConfig {
                fire_ends_round: true,
                max_path_searches: 5,
                round_budget_ms: 0,
            },
            session: SessionConfig {
                history_capacity: 200,
                rng_seed: None,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "tank_rounds.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Tank.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_derives_from_round_timeout() {
        let config = Config::default_hardcoded();
        assert_eq!(config.dispatch.budget(2000), Some(Duration::from_millis(1000)));
        assert_eq!(config.dispatch.budget(0), None);

        let mut fixed = config.dispatch.clone();
        fixed.round_budget_ms = 300;
        assert_eq!(fixed.budget(2000), Some(Duration::from_millis(300)));
    }

    #[test]
    fn test_tank_toml_can_be_parsed() {
        let result = Config::from_file("Tank.toml");
        assert!(result.is_ok(), "Failed to parse Tank.toml: {:?}", result.err());
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Tank.toml").expect("Tank.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        assert_eq!(file_config.board.capacity, hardcoded.board.capacity);
        assert_eq!(
            file_config.threat.trajectory_horizon,
            hardcoded.threat.trajectory_horizon
        );
        assert_eq!(file_config.scorer.min_fire_score, hardcoded.scorer.min_fire_score);
        assert_eq!(file_config.scorer.ray_termination, hardcoded.scorer.ray_termination);
        assert_eq!(file_config.scorer.bait_cell, hardcoded.scorer.bait_cell);
        assert_eq!(file_config.scorer.bait_source, hardcoded.scorer.bait_source);
        assert_eq!(file_config.scorer.grass_radius, hardcoded.scorer.grass_radius);
        assert_eq!(file_config.roles.strategy, hardcoded.roles.strategy);
        assert_eq!(file_config.roles.attacker_target, hardcoded.roles.attacker_target);
        assert_eq!(file_config.roles.capturer_jitter, hardcoded.roles.capturer_jitter);
        assert_eq!(
            file_config.roles.guard_spread_divisor,
            hardcoded.roles.guard_spread_divisor
        );
        assert_eq!(
            file_config.dispatch.fire_ends_round,
            hardcoded.dispatch.fire_ends_round
        );
        assert_eq!(
            file_config.dispatch.max_path_searches,
            hardcoded.dispatch.max_path_searches
        );
        assert_eq!(
            file_config.session.history_capacity,
            hardcoded.session.history_capacity
        );
        assert!(!file_config.debug.log_file_path.is_empty());
    }

    #[test]
    fn test_strategy_variants_parse() {
        let raw = Config::default_hardcoded();
        let toml_text = std::fs::read_to_string("Tank.toml")
            .unwrap()
            .replace("strategy = \"slot\"", "strategy = \"parity\"")
            .replace("ray_termination = \"origin\"", "ray_termination = \"obstacle\"")
            .replace("bait_source = \"fixed\"", "bait_source = \"grass\"");
        let parsed: Config = toml::from_str(&toml_text).unwrap();
        assert_eq!(parsed.roles.strategy, RoleStrategy::Parity);
        assert_eq!(parsed.scorer.ray_termination, RayTermination::Obstacle);
        assert_eq!(parsed.scorer.bait_source, BaitSource::Grass);
        assert_eq!(raw.roles.strategy, RoleStrategy::Slot);
    }

    #[test]
    fn test_bait_knobs_are_optional() {
        let toml_text = std::fs::read_to_string("Tank.toml")
            .unwrap()
            .replace("bait_source = \"fixed\"", "")
            .replace("grass_radius = 5", "");
        let parsed: Config = toml::from_str(&toml_text).unwrap();
        assert_eq!(parsed.scorer.bait_source, BaitSource::Fixed);
        assert_eq!(parsed.scorer.grass_radius, 5);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        assert!(Config::from_file("nonexistent.toml").is_err());
    }
}
