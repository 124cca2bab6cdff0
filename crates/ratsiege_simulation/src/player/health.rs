//! PlayerHealthModel: Alive/Dead поверх общей DamageModel
//!
//! Та же модель урона, что у врагов, но без gib/hit_count:
//! урон → hit reaction, смерть → ragdoll + game over таймер,
//! лечение аптечкой, респавн.

use bevy::prelude::*;

use super::{PlayerConfig, PlayerLife, PlayerTimer, PlayerTimers};
use crate::actuators::{AgentAction, AnimationClip, SoundCue};
use crate::combat::damage::{self, HealthEvent};
use crate::components::Health;

/// Урон игроку. Возвращает true если этот удар убил игрока.
pub fn take_damage(
    health: &mut Health,
    life: &mut PlayerLife,
    timers: &mut PlayerTimers,
    config: &PlayerConfig,
    amount: f32,
    actions: &mut Vec<AgentAction>,
) -> bool {
    let events = damage::damage(health, amount, !life.is_alive());
    if events.is_empty() {
        return false;
    }

    actions.push(AgentAction::Animate {
        clip: AnimationClip::Hit,
        interrupt: true,
    });
    actions.push(AgentAction::Sound(SoundCue::Damage));

    if !damage::is_depleted(&events) {
        return false;
    }

    *life = PlayerLife::Dead;
    actions.push(AgentAction::Ragdoll {
        enabled: true,
        impulse: None,
    });
    actions.push(AgentAction::Sound(SoundCue::Death));
    timers.0.start(PlayerTimer::GameOver, config.game_over_delay);

    true
}

/// Аптечка. None → отклонено (мёртв или здоровье полное).
pub fn heal(health: &mut Health, life: &PlayerLife, amount: f32) -> Option<f32> {
    if health.is_full() {
        return None;
    }

    damage::restore(health, amount, !life.is_alive())
        .into_iter()
        .find_map(|event| match event {
            HealthEvent::HealApplied { amount, .. } => Some(amount),
            _ => None,
        })
}

/// Респавн: живой, полное здоровье, ragdoll выключен, game over отменён
pub fn respawn(
    health: &mut Health,
    life: &mut PlayerLife,
    timers: &mut PlayerTimers,
    actions: &mut Vec<AgentAction>,
) {
    *life = PlayerLife::Alive;
    health.restore_full();
    timers.0.cancel(PlayerTimer::GameOver);
    actions.push(AgentAction::Ragdoll {
        enabled: false,
        impulse: None,
    });
}

/// Ближайшая safe zone к позиции (None → зон нет)
pub fn closest_safe_zone(position: Vec3, zones: impl IntoIterator<Item = Vec3>) -> Option<Vec3> {
    zones
        .into_iter()
        .min_by(|a, b| position.distance_squared(*a).total_cmp(&position.distance_squared(*b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alive_player() -> (Health, PlayerLife, PlayerTimers, PlayerConfig) {
        (
            Health::new(100.0),
            PlayerLife::Alive,
            PlayerTimers::default(),
            PlayerConfig::default(),
        )
    }

    #[test]
    fn test_damage_plays_hit_reaction() {
        let (mut health, mut life, mut timers, config) = alive_player();
        let mut actions = Vec::new();

        let died = take_damage(&mut health, &mut life, &mut timers, &config, 30.0, &mut actions);

        assert!(!died);
        assert_eq!(health.current, 70.0);
        assert_eq!(
            actions,
            vec![
                AgentAction::Animate { clip: AnimationClip::Hit, interrupt: true },
                AgentAction::Sound(SoundCue::Damage),
            ]
        );
    }

    #[test]
    fn test_lethal_damage_starts_game_over() {
        let (mut health, mut life, mut timers, config) = alive_player();
        let mut actions = Vec::new();

        assert!(take_damage(&mut health, &mut life, &mut timers, &config, 150.0, &mut actions));
        assert_eq!(life, PlayerLife::Dead);
        assert!(actions.contains(&AgentAction::Ragdoll { enabled: true, impulse: None }));
        assert_eq!(timers.0.remaining(PlayerTimer::GameOver), Some(5.0));

        // Труп урона не получает
        let mut actions = Vec::new();
        assert!(!take_damage(&mut health, &mut life, &mut timers, &config, 10.0, &mut actions));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_heal_rejected_when_full_or_dead() {
        let (mut health, mut life, mut timers, config) = alive_player();
        assert_eq!(heal(&mut health, &life, 25.0), None);

        take_damage(&mut health, &mut life, &mut timers, &config, 40.0, &mut Vec::new());
        assert_eq!(heal(&mut health, &life, 25.0), Some(25.0));
        assert_eq!(heal(&mut health, &life, 25.0), Some(15.0));
        assert_eq!(health.current, 100.0);

        take_damage(&mut health, &mut life, &mut timers, &config, 100.0, &mut Vec::new());
        assert_eq!(heal(&mut health, &life, 25.0), None);
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn test_respawn_restores_and_cancels_game_over() {
        let (mut health, mut life, mut timers, config) = alive_player();
        take_damage(&mut health, &mut life, &mut timers, &config, 100.0, &mut Vec::new());

        let mut actions = Vec::new();
        respawn(&mut health, &mut life, &mut timers, &mut actions);

        assert!(life.is_alive());
        assert!(health.is_full());
        assert!(!timers.0.is_running(PlayerTimer::GameOver));
        assert_eq!(actions, vec![AgentAction::Ragdoll { enabled: false, impulse: None }]);
    }

    #[test]
    fn test_closest_safe_zone() {
        let zones = [Vec3::new(10.0, 0.0, 0.0), Vec3::new(-3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 20.0)];
        assert_eq!(closest_safe_zone(Vec3::ZERO, zones), Some(Vec3::new(-3.0, 0.0, 0.0)));
        assert_eq!(closest_safe_zone(Vec3::ZERO, Vec::new()), None);
    }
}
