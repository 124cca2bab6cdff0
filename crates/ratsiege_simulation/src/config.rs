//! Конфигурация симуляции (JSON)
//!
//! Все секции опциональны: отсутствующие поля берутся из Default
//! (значения из игры). Ошибки только здесь: тик симуляции не падает.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AgentConfig;
use crate::combat::{MeleeAttack, RangedAttack};
use crate::logger::LogLevel;
use crate::mission::MissionConfig;
use crate::player::PlayerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::invalid(field, format!("expected a positive number, got {}", value)))
        }
    }

    pub(crate) fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(Self::invalid(field, format!("expected a non-negative number, got {}", value)))
        }
    }
}

/// Корневой конфиг headless симуляции
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed детерминированного RNG
    pub seed: u64,
    /// Частота simulation tick (FixedUpdate)
    pub tick_hz: f64,
    /// debug / info / warning / error
    pub log_level: String,
    pub enemy: AgentConfig,
    pub melee: MeleeAttack,
    pub ranged: RangedAttack,
    pub player: PlayerConfig,
    pub mission: MissionConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            log_level: "info".to_string(),
            enemy: AgentConfig::default(),
            melee: MeleeAttack::default(),
            ranged: RangedAttack::default(),
            player: PlayerConfig::default(),
            mission: MissionConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.log_level
            .parse()
            .map_err(|reason: String| ConfigError::invalid("log_level", reason))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return Err(ConfigError::invalid(
                "tick_hz",
                format!("expected a positive tick rate, got {}", self.tick_hz),
            ));
        }
        self.log_level()?;

        self.enemy.validate()?;

        ConfigError::require_positive("melee.attack_damage", self.melee.attack_damage)?;
        ConfigError::require_non_negative("melee.attack_cooldown", self.melee.attack_cooldown)?;

        ConfigError::require_positive("ranged.projectile_speed", self.ranged.projectile_speed)?;
        ConfigError::require_positive("ranged.projectile_damage", self.ranged.projectile_damage)?;
        ConfigError::require_non_negative("ranged.shot_interval", self.ranged.shot_interval)?;
        ConfigError::require_non_negative("ranged.reload_time", self.ranged.reload_time)?;
        if self.ranged.magazine_size == Some(0) {
            return Err(ConfigError::invalid(
                "ranged.magazine_size",
                "must be at least 1 (use null for an endless magazine)",
            ));
        }

        self.player.validate()?;
        self.mission.validate()?;

        Ok(())
    }
}
