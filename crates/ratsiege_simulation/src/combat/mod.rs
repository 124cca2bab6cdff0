//! Combat module
//!
//! ECS ответственность:
//! - Game state: Health, AttackProfile (укус / стрельба)
//! - Combat rules: DamageModel, gib/death пороги, shot pattern
//! - Events: DamageDealt, EntityDied
//!
//! Движок ответственность:
//! - Анимация укуса, полёт снаряда, коллизии, ragdoll физика
//! - Попадание пули / пинок игрока → DamageEvent / KnockbackEvent

use bevy::prelude::*;

pub mod attacker;
pub mod damage;
pub mod ranged;
pub mod systems;

#[cfg(test)]
mod damage_tests;

// Re-export основных типов
pub use attacker::{AttackProfile, MeleeAttack};
pub use damage::{
    DamageDealt, DamageEvent, DamageKind, EntityDied, HealthEvent, KnockbackEvent,
};
pub use ranged::{ProjectileKind, ProjectileSpawn, RangedAttack, ShotKind, ShotPattern};

use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (Resolve set, после мозгов крыс).
///
/// Порядок выполнения:
/// 1. apply_damage_events: укусы этого тика + попадания от движка → Dead/Gibbed
/// 2. apply_knockbacks: пинки → Ragdoll
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageEvent>()
            .add_event::<KnockbackEvent>()
            .add_event::<DamageDealt>()
            .add_event::<crate::player::PlayerDied>();
        crate::actuators::add_actuator_events(app);

        app.add_systems(
            FixedUpdate,
            (systems::apply_damage_events, systems::apply_knockbacks)
                .chain()
                .in_set(SimulationSet::Resolve),
        );
    }
}
