//! MissionProgress: прогресс миссии "очистить ферму от крыс"
//!
//! Крысы → босс у силоса → победа. Параллельно: найти ружьё, починить машину.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Наблюдатель за убийствами/спавнами врагов
///
/// Вызывается один раз за тик при разборе очереди ObjectiveEvent.
pub trait ObjectiveTracker {
    fn on_enemy_spawned(&mut self);
    fn on_enemy_killed(&mut self);
    fn on_boss_defeated(&mut self);
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    /// Позиция силоса (None → босс не спавнится)
    pub silo_position: Option<[f32; 3]>,
    /// Игрок ближе этой дистанции к силосу → спавн босса
    pub boss_spawn_distance: f32,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            silo_position: None,
            boss_spawn_distance: 50.0,
        }
    }
}

impl MissionConfig {
    pub fn silo(&self) -> Option<Vec3> {
        self.silo_position.map(Vec3::from_array)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("mission.boss_spawn_distance", self.boss_spawn_distance)
    }
}

/// Что изменилось в миссии (для UI, музыки, спавна босса)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum MissionUpdate {
    /// Все крысы убиты: можно идти к силосу
    BossUnlocked,
    /// Игрок у силоса: движок активирует босса
    BossSpawnRequested { position: Vec3 },
    MissionComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PickupKind {
    Rifle,
    CarBattery,
}

/// Открытые цели (UI сам решает как их показать)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    ExterminateRats { killed: u32, spawned: u32 },
    InvestigateSilo,
    DefeatBoss,
    FindRifle,
    RepairCar,
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct MissionProgress {
    pub rats_spawned: u32,
    pub rats_killed: u32,
    pub boss_unlocked: bool,
    pub boss_spawned: bool,
    pub boss_defeated: bool,
    pub has_rifle: bool,
    pub has_car_battery: bool,
    pending: Vec<MissionUpdate>,
}

impl ObjectiveTracker for MissionProgress {
    fn on_enemy_spawned(&mut self) {
        self.rats_spawned += 1;
    }

    fn on_enemy_killed(&mut self) {
        self.rats_killed += 1;

        if !self.boss_unlocked && self.rats_killed >= self.rats_spawned {
            self.boss_unlocked = true;
            self.pending.push(MissionUpdate::BossUnlocked);
        }
    }

    fn on_boss_defeated(&mut self) {
        if self.boss_defeated {
            return;
        }
        self.boss_defeated = true;
        self.pending.push(MissionUpdate::MissionComplete);
    }
}

impl MissionProgress {
    /// Проверка "игрок у силоса". Босс спавнится один раз.
    pub fn check_boss_spawn(&mut self, player_position: Vec3, config: &MissionConfig) -> bool {
        if !self.boss_unlocked || self.boss_spawned {
            return false;
        }
        let Some(silo) = config.silo() else {
            return false;
        };
        if player_position.distance(silo) >= config.boss_spawn_distance {
            return false;
        }

        self.boss_spawned = true;
        self.pending.push(MissionUpdate::BossSpawnRequested { position: silo });
        true
    }

    pub fn collect(&mut self, kind: PickupKind) {
        match kind {
            PickupKind::Rifle => self.has_rifle = true,
            PickupKind::CarBattery => self.has_car_battery = true,
        }
    }

    /// Забрать накопленные изменения (очищает очередь)
    pub fn take_updates(&mut self) -> Vec<MissionUpdate> {
        std::mem::take(&mut self.pending)
    }

    pub fn objectives(&self) -> Vec<Objective> {
        let mut objectives = Vec::new();

        if !self.boss_unlocked {
            objectives.push(Objective::ExterminateRats {
                killed: self.rats_killed,
                spawned: self.rats_spawned,
            });
        }
        if self.boss_unlocked && !self.boss_spawned {
            objectives.push(Objective::InvestigateSilo);
        }
        if self.boss_spawned && !self.boss_defeated {
            objectives.push(Objective::DefeatBoss);
        }
        if !self.has_rifle {
            objectives.push(Objective::FindRifle);
        }
        if !self.has_car_battery {
            objectives.push(Objective::RepairCar);
        }

        objectives
    }
}
