//! Combat systems (Resolve set): DamageEvent / KnockbackEvent → DamageModel

use bevy::prelude::*;

use crate::actuators::Actuators;
use crate::ai::{AgentConfig, EnemyAgent};
use crate::combat::damage::{DamageDealt, DamageEvent, KnockbackEvent};
use crate::components::{Boss, Health, MovementCommand};
use crate::player::{self, Player, PlayerConfig, PlayerDied, PlayerLife, PlayerTimers};
use crate::DeterministicRng;

/// Система: применение урона (враги и игрок)
///
/// Порядок событий сохраняется: два удара за тик → два последовательных применения.
/// Урон по трупу отклоняется DamageModel (DamageDealt не пишется).
pub fn apply_damage_events(
    mut events: EventReader<DamageEvent>,
    mut rng: ResMut<DeterministicRng>,
    mut enemies: Query<(
        &mut EnemyAgent,
        &mut Health,
        &AgentConfig,
        &Transform,
        &mut MovementCommand,
        Has<Boss>,
    )>,
    mut players: Query<
        (&mut Health, &mut PlayerLife, &mut PlayerTimers, &PlayerConfig),
        (With<Player>, Without<EnemyAgent>),
    >,
    mut dealt: EventWriter<DamageDealt>,
    mut player_deaths: EventWriter<PlayerDied>,
    mut actuators: Actuators,
) {
    for event in events.read() {
        if let Ok((mut agent, mut health, config, transform, mut movement, is_boss)) =
            enemies.get_mut(event.target)
        {
            if agent.state.is_terminal() {
                continue;
            }

            let before = health.current;
            let mut actions = Vec::new();
            agent.receive_damage(
                &mut health,
                event,
                config,
                transform.translation,
                &mut rng.rng,
                &mut actions,
            );

            if before != health.current || agent.state.is_terminal() {
                dealt.write(DamageDealt {
                    source: event.source,
                    target: event.target,
                    amount: before - health.current,
                    remaining: health.current,
                    target_died: agent.state.is_terminal(),
                });
                crate::log(&format!(
                    "💥 {:?} hit {:?} for {:.1} ({:?}) → {:.1}/{:.1} [{:?}]",
                    event.source, event.target, event.amount, event.kind, health.current, health.max, agent.state
                ));
            }

            let dispatched = actuators.dispatch(event.target, is_boss, actions);
            if let Some(command) = dispatched.navigation {
                movement.set_if_neq(command);
            }
            continue;
        }

        if let Ok((mut health, mut life, mut timers, config)) = players.get_mut(event.target) {
            let before = health.current;
            let mut actions = Vec::new();
            let died = player::take_damage(&mut health, &mut life, &mut timers, config, event.amount, &mut actions);

            if before != health.current {
                dealt.write(DamageDealt {
                    source: event.source,
                    target: event.target,
                    amount: before - health.current,
                    remaining: health.current,
                    target_died: died,
                });
            }
            actuators.dispatch(event.target, false, actions);

            if died {
                player_deaths.write(PlayerDied {
                    entity: event.target,
                    killer: event.source,
                });
                crate::log_info(&format!("💀 Player {:?} killed by {:?}", event.target, event.source));
            }
            continue;
        }

        // Цель уже удалена (OOB, gib despawn): не ошибка
        crate::log(&format!("DamageEvent: target {:?} has no health, skipped", event.target));
    }
}

/// Система: пинки → ragdoll
pub fn apply_knockbacks(
    mut events: EventReader<KnockbackEvent>,
    mut enemies: Query<(&mut EnemyAgent, &AgentConfig, &mut MovementCommand, Has<Boss>)>,
    mut actuators: Actuators,
) {
    for event in events.read() {
        let Ok((mut agent, config, mut movement, is_boss)) = enemies.get_mut(event.target) else {
            continue;
        };

        let mut actions = Vec::new();
        agent.knock_back(event.impulse, config, &mut actions);
        if actions.is_empty() {
            continue;
        }

        crate::log(&format!(
            "🦶 {:?} knocked {:?} into ragdoll (impulse {:?})",
            event.source, event.target, event.impulse
        ));
        let dispatched = actuators.dispatch(event.target, is_boss, actions);
        if let Some(command) = dispatched.navigation {
            movement.set_if_neq(command);
        }
    }
}
