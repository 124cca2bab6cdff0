//! Player: цель крыс
//!
//! ECS ответственность: здоровье, смерть/респавн, game over таймер,
//! возврат на safe zone при падении с карты.
//! Движок: input, камера, анимации, ragdoll физика.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Health;
use crate::config::ConfigError;
use crate::cooldown::CooldownScheduler;
use crate::SimulationSet;

pub mod health;
pub mod systems;

pub use health::{closest_safe_zone, heal, respawn, take_damage};

/// Marker component для player-controlled entity
///
/// Крысы ищут цель через `With<Player>` при спавне (если CombatTarget пуст).
/// AI системы врагов используют `Without<EnemyAgent>` для запросов к цели.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Health, PlayerLife, PlayerConfig, PlayerTimers, Transform)]
pub struct Player;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum PlayerLife {
    #[default]
    Alive,
    Dead,
}

impl PlayerLife {
    pub fn is_alive(&self) -> bool {
        matches!(self, PlayerLife::Alive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTimer {
    /// Смерть → экран game over
    GameOver,
}

#[derive(Component, Debug, Clone, Default)]
pub struct PlayerTimers(pub CooldownScheduler<PlayerTimer>);

#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    /// Ниже этой высоты игрок возвращается на safe zone
    pub out_of_bounds_y: f32,
    /// Пауза между смертью и game over (секунды)
    pub game_over_delay: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            out_of_bounds_y: -100.0,
            game_over_delay: 5.0,
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("player.max_health", self.max_health)?;
        ConfigError::require_non_negative("player.game_over_delay", self.game_over_delay)?;
        Ok(())
    }
}

// ============================================================================
// Events
// ============================================================================

#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlayerDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Истёк game over таймер (UI показывает экран поражения)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct GameOver {
    pub entity: Entity,
}

/// Аптечка подобрана (движок → ECS)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HealRequested {
    pub target: Entity,
    pub amount: f32,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct HealthRestored {
    pub entity: Entity,
    pub amount: f32,
    pub current: f32,
}

/// Респавн (опционально в новой позиции)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct RespawnRequested {
    pub entity: Entity,
    pub position: Option<Vec3>,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlayerReturnedToSafeZone {
    pub entity: Entity,
    pub position: Vec3,
}

/// Bundle игрока (Health из конфига, остальное через Required Components)
pub fn player_bundle(position: Vec3, config: PlayerConfig) -> impl Bundle {
    (
        Player,
        Name::new("Player"),
        Health::new(config.max_health),
        config,
        Transform::from_translation(position),
    )
}

/// Player Plugin
///
/// Урон игроку применяет CombatPlugin (общая DamageModel).
/// Здесь: лечение, респавн, safe zone, game over таймер (Resolve, после урона).
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerDied>()
            .add_event::<GameOver>()
            .add_event::<HealRequested>()
            .add_event::<HealthRestored>()
            .add_event::<RespawnRequested>()
            .add_event::<PlayerReturnedToSafeZone>();
        crate::actuators::add_actuator_events(app);

        app.add_systems(
            FixedUpdate,
            (
                systems::apply_heal_requests,
                systems::apply_respawns,
                systems::return_players_to_safe_zone,
            )
                .chain()
                .in_set(SimulationSet::Resolve)
                // Сначала урон этого тика, потом аптечки/респавн
                .after(crate::combat::systems::apply_knockbacks),
        )
        .add_systems(
            FixedUpdate,
            systems::tick_player_timers
                .in_set(SimulationSet::Resolve)
                // Таймер, запущенный смертью на этом тике, отсчитывается со следующего
                .before(crate::combat::systems::apply_damage_events),
        );
    }
}
