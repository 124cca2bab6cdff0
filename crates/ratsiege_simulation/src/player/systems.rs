//! Player systems (Resolve set)

use bevy::prelude::*;

use super::{
    health, GameOver, HealRequested, HealthRestored, Player, PlayerConfig, PlayerLife,
    PlayerReturnedToSafeZone, PlayerTimer, PlayerTimers, RespawnRequested,
};
use crate::actuators::Actuators;
use crate::components::{Health, SafeZone};

/// Система: аптечки → HealthRestored
pub fn apply_heal_requests(
    mut requests: EventReader<HealRequested>,
    mut players: Query<(&mut Health, &PlayerLife), With<Player>>,
    mut restored: EventWriter<HealthRestored>,
) {
    for request in requests.read() {
        let Ok((mut health, life)) = players.get_mut(request.target) else {
            crate::log_warning(&format!("HealRequested: {:?} is not a player", request.target));
            continue;
        };

        match health::heal(&mut health, life, request.amount) {
            Some(amount) => {
                restored.write(HealthRestored {
                    entity: request.target,
                    amount,
                    current: health.current,
                });
                crate::log(&format!(
                    "💊 {:?} healed +{:.1} → {:.1}/{:.1}",
                    request.target, amount, health.current, health.max
                ));
            }
            None => {
                crate::log(&format!(
                    "💊 {:?} heal rejected (dead or full health)",
                    request.target
                ));
            }
        }
    }
}

/// Система: респавн игрока
pub fn apply_respawns(
    mut requests: EventReader<RespawnRequested>,
    mut players: Query<(&mut Health, &mut PlayerLife, &mut PlayerTimers, &mut Transform), With<Player>>,
    mut actuators: Actuators,
) {
    for request in requests.read() {
        let Ok((mut health, mut life, mut timers, mut transform)) = players.get_mut(request.entity) else {
            crate::log_warning(&format!("RespawnRequested: {:?} is not a player", request.entity));
            continue;
        };

        let mut actions = Vec::new();
        health::respawn(&mut health, &mut life, &mut timers, &mut actions);
        if let Some(position) = request.position {
            transform.translation = position;
        }
        actuators.dispatch(request.entity, false, actions);

        crate::log_info(&format!("🔄 {:?} respawned at {:?}", request.entity, transform.translation));
    }
}

/// Система: игрок упал с карты → телепорт на ближайшую safe zone
pub fn return_players_to_safe_zone(
    mut players: Query<(Entity, &mut Transform, &PlayerConfig), With<Player>>,
    zones: Query<&Transform, (With<SafeZone>, Without<Player>)>,
    mut returned: EventWriter<PlayerReturnedToSafeZone>,
) {
    for (entity, mut transform, config) in players.iter_mut() {
        if transform.translation.y >= config.out_of_bounds_y {
            continue;
        }

        let Some(position) =
            health::closest_safe_zone(transform.translation, zones.iter().map(|zone| zone.translation))
        else {
            crate::log_warning(&format!("{:?} fell out of bounds but no SafeZone exists", entity));
            continue;
        };

        transform.translation = position;
        returned.write(PlayerReturnedToSafeZone { entity, position });
        crate::log_info(&format!("🪂 {:?} returned to safe zone at {:?}", entity, position));
    }
}

/// Система: game over таймер
pub fn tick_player_timers(
    time: Res<Time<Fixed>>,
    mut players: Query<(Entity, &mut PlayerTimers), With<Player>>,
    mut game_over: EventWriter<GameOver>,
) {
    let delta = time.delta_secs();

    for (entity, mut timers) in players.iter_mut() {
        for timer in timers.0.tick(delta) {
            match timer {
                PlayerTimer::GameOver => {
                    game_over.write(GameOver { entity });
                    crate::log_info(&format!("☠️ GAME OVER ({:?})", entity));
                }
            }
        }
    }
}
