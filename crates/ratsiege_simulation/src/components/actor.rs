//! Базовые компоненты агентов: Health, CombatTarget, Boss

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Здоровье агента (враг или игрок)
///
/// Инвариант: 0 ≤ current ≤ max
/// Изменяется только через DamageModel (combat::damage).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn restore_full(&mut self) {
        self.current = self.max;
    }
}

/// Ссылка на цель (обычно игрок)
///
/// Агент НЕ владеет целью: только читает её позицию/здоровье для perception
/// и отправляет ей DamageEvent. None → цель не найдена при спавне:
/// агент деградирует до патруля.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CombatTarget(pub Option<Entity>);

/// Marker: босс миссии
///
/// Босс не считается в счётчике крыс; его смерть → ObjectiveEvent::BossDefeated.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Boss;
