//! AgentConfig: параметры врага (perception, патруль, gib/ragdoll политика)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Параметры AI врага
///
/// Компонент на агенте: разные крысы могут иметь разные радиусы/пороги.
/// Значения по умолчанию: из игры (view 10м, attack 2м, gib после 3 ударов).
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AgentConfig {
    pub max_health: f32,

    /// Радиус обнаружения цели (метры)
    pub sight_radius: f32,
    /// Радиус атаки (метры), ≤ sight_radius
    pub attack_radius: f32,

    /// Patrol: разброс случайной walk point по X/Z от текущей позиции
    pub walk_point_range: f32,
    /// Patrol: ожидание на достигнутой walk point (секунды)
    pub wait_time: f32,
    /// Длина луча вниз при проверке walk point
    pub ground_probe_distance: f32,

    /// Ниже этой высоты агент удаляется (упал с карты)
    pub out_of_bounds_y: f32,

    /// Gib после N melee ударов (None → выключено)
    pub gib_after_hits: Option<u32>,
    /// Gib если health ≤ порога (None → выключено)
    pub gib_health_threshold: Option<f32>,
    /// Попадание снаряда сразу разрывает агента
    pub gib_on_shot: bool,
    /// Gib без предварительного включения ragdoll
    pub gib_bypasses_ragdoll: bool,
    pub debris_count: u32,
    /// Сила случайного импульса каждого куска
    pub debris_impulse: f32,
    pub debris_size_scale: f32,
    /// Удаление агента после gib (секунды)
    pub gib_despawn_delay: f32,

    /// Включать ragdoll при обычной смерти
    pub ragdoll_on_death: bool,
    /// Ragdoll после пинка восстанавливается (иначе агент лежит навсегда)
    pub ragdoll_recoverable: bool,
    /// Через сколько секунд пробуем встать
    pub ragdoll_recover_delay: f32,
    /// Интервал повторной проверки "лежим на земле?"
    pub ragdoll_retry_interval: f32,
    /// Длина луча вниз для проверки приземления (рост/2 + запас)
    pub ground_check_distance: f32,

    /// Интервал шагов при движении (секунды)
    pub step_rate: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_health: 30.0,
            sight_radius: 10.0,
            attack_radius: 2.0,
            walk_point_range: 8.0,
            wait_time: 1.0,
            ground_probe_distance: 2.0,
            out_of_bounds_y: -10.0,
            gib_after_hits: Some(3),
            gib_health_threshold: None,
            gib_on_shot: true,
            gib_bypasses_ragdoll: true,
            debris_count: 5,
            debris_impulse: 5.0,
            debris_size_scale: 1.0,
            gib_despawn_delay: 5.0,
            ragdoll_on_death: true,
            ragdoll_recoverable: false,
            ragdoll_recover_delay: 5.0,
            ragdoll_retry_interval: 0.5,
            ground_check_distance: 1.2,
            step_rate: 0.5,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("enemy.max_health", self.max_health)?;
        ConfigError::require_positive("enemy.sight_radius", self.sight_radius)?;
        ConfigError::require_positive("enemy.attack_radius", self.attack_radius)?;
        if self.attack_radius > self.sight_radius {
            return Err(ConfigError::invalid(
                "enemy.attack_radius",
                format!(
                    "attack radius {} exceeds sight radius {}",
                    self.attack_radius, self.sight_radius
                ),
            ));
        }

        ConfigError::require_non_negative("enemy.walk_point_range", self.walk_point_range)?;
        ConfigError::require_non_negative("enemy.wait_time", self.wait_time)?;
        ConfigError::require_positive("enemy.ground_probe_distance", self.ground_probe_distance)?;
        ConfigError::require_non_negative("enemy.debris_impulse", self.debris_impulse)?;
        ConfigError::require_positive("enemy.debris_size_scale", self.debris_size_scale)?;
        ConfigError::require_non_negative("enemy.gib_despawn_delay", self.gib_despawn_delay)?;
        ConfigError::require_non_negative("enemy.ragdoll_recover_delay", self.ragdoll_recover_delay)?;
        ConfigError::require_positive("enemy.ragdoll_retry_interval", self.ragdoll_retry_interval)?;
        ConfigError::require_positive("enemy.ground_check_distance", self.ground_check_distance)?;
        ConfigError::require_positive("enemy.step_rate", self.step_rate)?;

        if self.gib_after_hits == Some(0) {
            return Err(ConfigError::invalid(
                "enemy.gib_after_hits",
                "must be at least 1 (use null to disable)",
            ));
        }
        if let Some(threshold) = self.gib_health_threshold {
            if !threshold.is_finite() || threshold >= self.max_health {
                return Err(ConfigError::invalid(
                    "enemy.gib_health_threshold",
                    format!("threshold {} must be below max health {}", threshold, self.max_health),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_default_is_valid() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sight_radius, 10.0);
        assert_eq!(config.attack_radius, 2.0);
        assert_eq!(config.gib_after_hits, Some(3));
        assert_eq!(config.out_of_bounds_y, -10.0);
    }

    #[test]
    fn test_attack_radius_beyond_sight_rejected() {
        let config = AgentConfig {
            attack_radius: 12.0,
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "enemy.attack_radius", .. })
        ));
    }

    #[test]
    fn test_gib_threshold_above_max_rejected() {
        let config = AgentConfig {
            gib_health_threshold: Some(30.0),
            ..default()
        };
        assert!(config.validate().is_err());

        let config = AgentConfig {
            gib_after_hits: Some(0),
            ..default()
        };
        assert!(config.validate().is_err());
    }
}
