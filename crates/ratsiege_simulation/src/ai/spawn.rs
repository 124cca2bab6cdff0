//! Спавн крыс

use bevy::prelude::*;

use crate::ai::agent::EnemyAgent;
use crate::ai::config::AgentConfig;
use crate::combat::attacker::AttackProfile;
use crate::components::{Boss, CombatTarget, Health};

/// Bundle крысы
///
/// `target: None` → цель найдёт acquire_player_target (первый Player).
/// Остальное (MovementCommand, NavigationState, ...): через Required Components.
pub fn enemy_bundle(
    position: Vec3,
    config: AgentConfig,
    attack: AttackProfile,
    target: Option<Entity>,
) -> impl Bundle {
    let name = if attack.is_ranged() { "RangedRat" } else { "Rat" };
    agent_bundle(name, position, config, attack, target)
}

/// Bundle босса: та же state machine, но не считается в счётчике крыс
pub fn boss_bundle(
    position: Vec3,
    config: AgentConfig,
    attack: AttackProfile,
    target: Option<Entity>,
) -> impl Bundle {
    (agent_bundle("RatKing", position, config, attack, target), Boss)
}

fn agent_bundle(
    name: &'static str,
    position: Vec3,
    config: AgentConfig,
    attack: AttackProfile,
    target: Option<Entity>,
) -> impl Bundle {
    // Спавн не отказывает: агент сам клампит опасные значения
    if let Err(err) = config.validate() {
        crate::log_warning(&format!("🐀 {} spawned with invalid config: {}", name, err));
    }

    (
        EnemyAgent::new(&attack),
        Name::new(name),
        Health::new(config.max_health),
        config,
        attack,
        CombatTarget(target),
        Transform::from_translation(position),
    )
}
