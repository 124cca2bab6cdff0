//! Ranged атака: shot pattern, прицеливание, планирование снарядов
//!
//! Shot pattern, явная конфигурация, не случайность:
//! - каждый `volley_every`-й выстрел → залп из `volley_size` снарядов веером
//! - иначе каждый `special_every`-й → один Special снаряд
//! - иначе → Standard
//! Если номер выстрела делится на оба: залп важнее.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тип снаряда для движка (какой prefab спавнить)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ProjectileKind {
    Standard,
    Special,
}

/// Что делает N-й выстрел
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotKind {
    Standard,
    Special,
    Volley,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotPattern {
    /// Каждый N-й выстрел: Special (None или 0 → выключено)
    pub special_every: Option<u32>,
    /// Каждый N-й выстрел: залп (None или 0 → выключено)
    pub volley_every: Option<u32>,
    /// Снарядов в залпе
    pub volley_size: u32,
    /// Угол между соседними снарядами залпа (градусы, вокруг Y)
    pub volley_spread_deg: f32,
}

impl Default for ShotPattern {
    fn default() -> Self {
        Self {
            special_every: Some(3),
            volley_every: Some(7),
            volley_size: 3,
            volley_spread_deg: 10.0,
        }
    }
}

impl ShotPattern {
    /// Вид выстрела по 1-based номеру
    pub fn shot_kind(&self, shot_number: u32) -> ShotKind {
        let divides = |every: Option<u32>| match every {
            Some(n) if n > 0 && shot_number > 0 => shot_number % n == 0,
            _ => false,
        };

        if divides(self.volley_every) {
            ShotKind::Volley
        } else if divides(self.special_every) {
            ShotKind::Special
        } else {
            ShotKind::Standard
        }
    }
}

/// Параметры стрелка (ranged rat)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedAttack {
    /// Скорость снаряда (м/с)
    pub projectile_speed: f32,
    /// Урон снаряда (доставит движок через DamageEvent при попадании)
    pub projectile_damage: f32,
    /// Интервал между выстрелами (секунды)
    pub shot_interval: f32,
    /// Высота точки выстрела над origin агента
    pub fire_height: f32,
    /// Подъём прицела над позицией цели (целимся чуть выше ног)
    pub aim_lift: f32,
    /// Размер магазина (None → бесконечный)
    pub magazine_size: Option<u32>,
    /// Перезарядка (секунды)
    pub reload_time: f32,
    pub pattern: ShotPattern,
}

impl Default for RangedAttack {
    fn default() -> Self {
        Self {
            projectile_speed: 20.0,
            projectile_damage: 10.0,
            shot_interval: 2.0,
            fire_height: 0.5,
            aim_lift: 1.0,
            magazine_size: None,
            reload_time: 3.0,
            pattern: ShotPattern::default(),
        }
    }
}

/// Запрос на спавн снаряда (fire-and-forget для движка)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub origin: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub kind: ProjectileKind,
}

/// Направление выстрела: на цель с подъёмом `lift` по Y, нормализованное
pub fn aim_direction(origin: Vec3, target: Vec3, lift: f32) -> Vec3 {
    let mut direction = target - origin;
    direction.y += lift;
    let direction = direction.normalize_or_zero();

    if direction == Vec3::ZERO {
        Vec3::NEG_Z
    } else {
        direction
    }
}

impl RangedAttack {
    pub fn fire_origin(&self, position: Vec3) -> Vec3 {
        position + Vec3::Y * self.fire_height
    }

    /// Снаряды для выстрела номер `shot_number` (1-based)
    pub fn plan_shot(&self, shot_number: u32, position: Vec3, target: Vec3) -> Vec<ProjectileSpawn> {
        let origin = self.fire_origin(position);
        let direction = aim_direction(origin, target, self.aim_lift);

        let projectile = |direction: Vec3, kind: ProjectileKind| ProjectileSpawn {
            origin,
            direction,
            speed: self.projectile_speed,
            damage: self.projectile_damage,
            kind,
        };

        match self.pattern.shot_kind(shot_number) {
            ShotKind::Standard => vec![projectile(direction, ProjectileKind::Standard)],
            ShotKind::Special => vec![projectile(direction, ProjectileKind::Special)],
            ShotKind::Volley => {
                let count = self.pattern.volley_size.max(1);
                let center = (count - 1) as f32 / 2.0;

                (0..count)
                    .map(|i| {
                        let angle = (i as f32 - center) * self.pattern.volley_spread_deg;
                        let rotated = Quat::from_rotation_y(angle.to_radians()) * direction;
                        projectile(rotated, ProjectileKind::Standard)
                    })
                    .collect()
            }
        }
    }
}
