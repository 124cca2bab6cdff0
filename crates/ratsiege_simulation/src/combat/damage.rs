//! DamageModel: общая модель урона/лечения для врагов и игрока
//!
//! Чистые функции над числами + обёртка над Health, которая:
//! - отклоняет урон и лечение в терминальном состоянии (Dead/Gibbed)
//! - возвращает список событий для state machine вызывающего

use bevy::prelude::*;

use crate::components::Health;

/// Тип урона (определяет реакцию цели)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DamageKind {
    /// Укус / пинок: накапливает hit_count (альтернативный gib trigger)
    Melee,
    /// Пуля / снаряд: может сразу гибнуть цель (gib_on_shot)
    Projectile,
    /// Окружение (падение, огонь)
    Environment,
}

/// Событие: один удар по цели
///
/// Transient: потребляется синхронно в apply_damage_events, не хранится.
/// Пишет атакующий агент (ECS) или tactical layer (попадание пули, пинок игрока).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageEvent {
    pub amount: f32,
    pub source: Option<Entity>,
    pub target: Entity,
    pub kind: DamageKind,
}

/// Событие: пинок / взрывная волна (kinetic reaction → ragdoll)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct KnockbackEvent {
    pub source: Option<Entity>,
    pub target: Entity,
    pub impulse: Vec3,
}

/// Событие: урон нанесён (для UI, звуков, hit feedback)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub source: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
    pub remaining: f32,
    pub target_died: bool,
}

/// Событие: агент погиб (Dead или Gibbed, первый терминальный переход)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
    pub gibbed: bool,
}

/// Сигналы DamageModel для вызывающей state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthEvent {
    DamageApplied { amount: f32, remaining: f32 },
    HealthDepleted,
    HealApplied { amount: f32, current: f32 },
}

/// new = max(0, current - amount), clamp в [0, max]
pub fn apply_damage(current: f32, amount: f32, max_health: f32) -> f32 {
    (current - amount.max(0.0)).clamp(0.0, max_health.max(0.0))
}

/// new = min(max, current + amount)
pub fn heal(current: f32, amount: f32, max_health: f32) -> f32 {
    (current + amount.max(0.0)).clamp(0.0, max_health.max(0.0))
}

/// Урон по Health с учётом терминального состояния владельца.
///
/// Пустой список = урон отклонён (терминальное состояние или amount ≤ 0).
pub fn damage(health: &mut Health, amount: f32, terminal: bool) -> Vec<HealthEvent> {
    if terminal || amount <= 0.0 || !amount.is_finite() {
        return Vec::new();
    }

    let before = health.current;
    health.current = apply_damage(health.current, amount, health.max);

    let mut events = vec![HealthEvent::DamageApplied {
        amount: before - health.current,
        remaining: health.current,
    }];

    if before > 0.0 && health.current <= 0.0 {
        events.push(HealthEvent::HealthDepleted);
    }

    events
}

/// Лечение Health. Пустой список = отклонено (терминальное состояние или amount ≤ 0).
pub fn restore(health: &mut Health, amount: f32, terminal: bool) -> Vec<HealthEvent> {
    if terminal || amount <= 0.0 || !amount.is_finite() {
        return Vec::new();
    }

    let before = health.current;
    health.current = heal(health.current, amount, health.max);

    vec![HealthEvent::HealApplied {
        amount: health.current - before,
        current: health.current,
    }]
}

pub fn is_depleted(events: &[HealthEvent]) -> bool {
    events.contains(&HealthEvent::HealthDepleted)
}
