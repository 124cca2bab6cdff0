//! PerceptionSensor: "вижу ли цель / дотягиваюсь ли"
//!
//! Чистая геометрия: расстояние до цели против двух радиусов.
//! Никаких raycast'ов и памяти: пересчитывается каждый тик.

use bevy::prelude::*;

/// Результат perception на текущем тике
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct Perception {
    pub in_sight: bool,
    pub in_attack_range: bool,
}

/// Что агент знает о цели на этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub entity: Entity,
    pub position: Vec3,
    pub alive: bool,
}

/// Мёртвая или отсутствующая цель не видна независимо от расстояния
pub fn sense(
    position: Vec3,
    target: Option<&TargetView>,
    sight_radius: f32,
    attack_radius: f32,
) -> Perception {
    let Some(target) = target.filter(|t| t.alive) else {
        return Perception::default();
    };

    let distance = position.distance(target.position);
    Perception {
        in_sight: distance <= sight_radius,
        in_attack_range: distance <= attack_radius,
    }
}
