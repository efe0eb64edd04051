//! Tunable battle constants, loadable from RON.

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Numbers the engine reads while resolving a turn.
///
/// Every field has a default, so a RON file only needs to name the values it changes:
///
/// ```ron
/// (critical_hit_rate: 8, trainer_exp_bonus: 2.0)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// A critical hit happens on a 1-in-N draw.
    pub critical_hit_rate: u16,
    pub critical_multiplier: f32,
    /// Multiplier when the move shares a type with its user.
    pub same_type_bonus: f32,
    /// Lowest percentage of the random damage roll; the upper bound is always 100.
    pub damage_roll_min: u8,
    /// Experience multiplier for defeating a trainer's combatant.
    pub trainer_exp_bonus: f32,
    pub max_level: u8,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            critical_hit_rate: 16,
            critical_multiplier: 2.0,
            same_type_bonus: 1.5,
            damage_roll_min: 85,
            trainer_exp_bonus: 1.5,
            max_level: 100,
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let config: BattleConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.critical_hit_rate == 0 {
            return Err(invalid("critical_hit_rate", "must be at least 1"));
        }
        if !(self.critical_multiplier >= 1.0) {
            return Err(invalid("critical_multiplier", "must be at least 1.0"));
        }
        if !(self.same_type_bonus >= 1.0) {
            return Err(invalid("same_type_bonus", "must be at least 1.0"));
        }
        if self.damage_roll_min == 0 || self.damage_roll_min > 100 {
            return Err(invalid("damage_roll_min", "must be within 1..=100"));
        }
        if !(self.trainer_exp_bonus > 0.0) {
            return Err(invalid("trainer_exp_bonus", "must be positive"));
        }
        if self.max_level == 0 || self.max_level > 100 {
            return Err(invalid("max_level", "must be within 1..=100"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}
