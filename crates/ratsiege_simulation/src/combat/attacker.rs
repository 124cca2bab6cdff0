//! AttackProfile: чем агент атакует (укус или стрельба)
//!
//! Архитектура:
//! - ECS хранит: урон, cooldown, shot pattern (game rules)
//! - Движок выполняет: анимацию укуса, полёт снаряда, коллизии
//! - Движок → ECS: DamageEvent при попадании снаряда

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::ranged::RangedAttack;

/// Ближний бой (укус крысы)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeAttack {
    /// Урон за укус
    pub attack_damage: f32,
    /// Cooldown между укусами (секунды)
    pub attack_cooldown: f32,
}

impl Default for MeleeAttack {
    fn default() -> Self {
        Self {
            attack_damage: 10.0,
            attack_cooldown: 1.0,
        }
    }
}

/// Профиль атаки агента
///
/// Melee → DamageEvent напрямую цели.
/// Ranged → ProjectileSpawnRequested, урон доставит движок при попадании.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttackProfile {
    Melee(MeleeAttack),
    Ranged(RangedAttack),
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self::Melee(MeleeAttack::default())
    }
}

impl AttackProfile {
    pub fn is_ranged(&self) -> bool {
        matches!(self, AttackProfile::Ranged(_))
    }

    /// Магазин при спавне (None → без перезарядки)
    pub fn initial_rounds(&self) -> Option<u32> {
        match self {
            AttackProfile::Melee(_) => None,
            AttackProfile::Ranged(ranged) => ranged.magazine_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_profile_default_is_melee() {
        let profile = AttackProfile::default();
        assert!(!profile.is_ranged());
        assert_eq!(profile.initial_rounds(), None);
    }

    #[test]
    fn test_melee_defaults() {
        let melee = MeleeAttack::default();
        assert_eq!(melee.attack_damage, 10.0);
        assert_eq!(melee.attack_cooldown, 1.0);
    }
}
