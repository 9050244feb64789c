//! Engine configuration with documented constants
//!
//! Settlement and AI tunables are collected here. Fixed combat and growth
//! formulas live in `combat::constants`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{EngineError, Result};
use crate::data::LoadError;

/// Tunables for encounter settlement and AI selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === SETTLEMENT ===
    /// Experience granted per enemy attribute point
    ///
    /// Total encounter XP is this value times the sum of every attribute of
    /// every enemy, split evenly between the surviving party members.
    pub xp_per_enemy_attribute: u64,

    /// Extra XP share per point of leadership
    ///
    /// At 0.05 a member with 10 leadership earns 50% more than their share.
    pub leadership_xp_bonus: f64,

    /// Fraction of max HP restored to resting party members per encounter
    pub hp_regen_rate: f64,

    /// Fraction of max MP restored to resting party members per encounter
    pub mp_regen_rate: f64,

    /// Encounters a surviving member sits out after fighting
    pub encounter_cooldown: u32,

    /// Reward roll bonus per point of the luckiest survivor's luck
    pub luck_reward_bonus: f64,

    // === AI ===
    /// Roll threshold for the AI to switch to a better option
    ///
    /// A strictly better candidate only replaces the current best when a
    /// uniform roll exceeds this value. 0.0 makes the AI fully greedy.
    pub selection_variance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            xp_per_enemy_attribute: 10,
            leadership_xp_bonus: 0.05,
            hp_regen_rate: 0.10,
            mp_regen_rate: 0.05,
            encounter_cooldown: 1,
            luck_reward_bonus: 0.05,
            selection_variance: 0.75,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("hp_regen_rate", self.hp_regen_rate),
            ("mp_regen_rate", self.mp_regen_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} ({}) must be within [0, 1]",
                    name, rate
                )));
            }
        }

        if !(0.0..1.0).contains(&self.selection_variance) {
            return Err(EngineError::InvalidConfig(format!(
                "selection_variance ({}) must be within [0, 1)",
                self.selection_variance
            )));
        }

        if self.leadership_xp_bonus < 0.0 || self.luck_reward_bonus < 0.0 {
            return Err(EngineError::InvalidConfig("Bonuses must not be negative".into()));
        }

        Ok(())
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, LoadError> {
        let config: EngineConfig = toml::from_str(content)?;
        config
            .validate()
            .map_err(|e| LoadError::InvalidDefinition(e.to_string()))?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> std::result::Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("selection_variance = 0.0\n").unwrap();
        assert_eq!(config.selection_variance, 0.0);
        assert_eq!(config.xp_per_enemy_attribute, 10);
        assert_eq!(config.encounter_cooldown, 1);
    }

    #[test]
    fn test_out_of_range_regen_rejected() {
        let config = EngineConfig {
            hp_regen_rate: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_toml_surfaces_load_error() {
        let result = EngineConfig::from_toml_str("selection_variance = 2.0\n");
        assert!(matches!(result, Err(LoadError::InvalidDefinition(_))));
    }
}
