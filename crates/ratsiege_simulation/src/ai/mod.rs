//! AI врагов (крысы)
//!
//! PerceptionSensor + CombatStateMachine.
//! ECS решает что делать (state, cooldowns, урон), движок: как (NavMesh, анимации).

use bevy::prelude::*;

pub mod agent;
pub mod config;
pub mod perception;
pub mod spawn;
pub mod systems;


// Re-export основных типов
pub use agent::{CombatFlags, CombatState, CooldownKind, EnemyAgent, TickInput};
pub use config::AgentConfig;
pub use perception::{sense, Perception, TargetView};
pub use spawn::{boss_bundle, enemy_bundle};

use crate::combat::damage::DamageEvent;
use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. acquire_player_target: новым крысам цель = игрок (Sense)
/// 2. register_spawned_enemies, ObjectiveEvent::EnemySpawned (Sense)
/// 3. run_enemy_brains: perception → out-of-bounds → state → cooldowns (Decide)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageEvent>();
        crate::actuators::add_actuator_events(app);

        app.add_systems(
            FixedUpdate,
            (
                (systems::acquire_player_target, systems::register_spawned_enemies)
                    .chain()
                    .in_set(SimulationSet::Sense),
                systems::run_enemy_brains.in_set(SimulationSet::Decide),
            ),
        );
    }
}
