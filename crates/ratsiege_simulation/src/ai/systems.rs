//! AI systems: регистрация спавна + мозг крысы (Sense → Decide)

use bevy::prelude::*;

use crate::actuators::Actuators;
use crate::ai::agent::{EnemyAgent, TickInput};
use crate::ai::config::AgentConfig;
use crate::ai::perception::TargetView;
use crate::combat::attacker::AttackProfile;
use crate::combat::damage::DamageEvent;
use crate::components::{
    Boss, CombatTarget, Health, LocomotionAnimation, MovementCommand, NavigationState, Terrain,
};
use crate::mission::ObjectiveEvent;
use crate::player::{Player, PlayerLife};
use crate::DeterministicRng;

/// Система: новая крыса без цели → цель = игрок
///
/// Игрока нет → CombatTarget остаётся None, крыса только патрулирует.
pub fn acquire_player_target(
    mut spawned: Query<(Entity, &mut CombatTarget), Added<EnemyAgent>>,
    players: Query<Entity, (With<Player>, Without<EnemyAgent>)>,
) {
    for (entity, mut target) in spawned.iter_mut() {
        if target.0.is_some() {
            continue;
        }

        target.0 = players.iter().next();
        if target.0.is_none() {
            crate::log_warning(&format!("🐀 {:?} spawned without a player to hunt", entity));
        }
    }
}

/// Система: спавн обычной крысы → ObjectiveEvent::EnemySpawned
pub fn register_spawned_enemies(
    spawned: Query<Entity, (Added<EnemyAgent>, Without<Boss>)>,
    mut objectives: EventWriter<ObjectiveEvent>,
) {
    for entity in spawned.iter() {
        objectives.write(ObjectiveEvent::EnemySpawned { entity });
    }
}

/// Система: один тик CombatStateMachine для каждой крысы
///
/// Perception → out-of-bounds → поведение → cooldowns → шаги (внутри EnemyAgent::tick),
/// затем derived animation speed. Удар по цели: DamageEvent (применится в Resolve).
pub fn run_enemy_brains(
    time: Res<Time<Fixed>>,
    terrain: Res<Terrain>,
    mut rng: ResMut<DeterministicRng>,
    mut enemies: Query<(
        Entity,
        &mut EnemyAgent,
        &Transform,
        &AgentConfig,
        &AttackProfile,
        &CombatTarget,
        &NavigationState,
        &mut MovementCommand,
        &mut LocomotionAnimation,
        Has<Boss>,
    )>,
    targets: Query<(&Transform, &Health, Option<&PlayerLife>), Without<EnemyAgent>>,
    mut damage_events: EventWriter<DamageEvent>,
    mut actuators: Actuators,
) {
    let delta = time.delta_secs();

    for (entity, mut agent, transform, config, attack, target, navigation, mut movement, mut animation, is_boss) in
        enemies.iter_mut()
    {
        let target = target.0.and_then(|target_entity| {
            let (target_transform, health, life) = targets.get(target_entity).ok()?;
            Some(TargetView {
                entity: target_entity,
                position: target_transform.translation,
                alive: health.is_alive() && life.is_none_or(PlayerLife::is_alive),
            })
        });

        let input = TickInput {
            delta,
            position: transform.translation,
            target,
            navigation: *navigation,
        };

        let previous = agent.state;
        let mut actions = Vec::new();
        let removed = agent.tick(&input, config, attack, terrain.probe(), &mut rng.rng, &mut actions);

        if agent.state != previous {
            crate::log(&format!("🐀 {:?}: {:?} → {:?}", entity, previous, agent.state));
        }

        let dispatched = actuators.dispatch(entity, is_boss, actions);
        if let Some(command) = dispatched.navigation {
            movement.set_if_neq(command);
        }
        for strike in dispatched.strikes {
            crate::log(&format!(
                "🦷 {:?} bites {:?} for {:.1}",
                entity, strike.target, strike.amount
            ));
            damage_events.write(strike);
        }

        if !removed {
            animation.speed = agent.locomotion_speed(navigation);
        }
    }
}
