//! Mission tracking
//!
//! Враги не знают про миссию: они пишут ObjectiveEvent (через Actuators),
//! очередь разбирается один раз за тик в Settle set.
//! Трекер: любой Resource с ObjectiveTracker (по умолчанию MissionProgress).

use bevy::prelude::*;

use crate::ai::EnemyAgent;
use crate::player::Player;
use crate::SimulationSet;

pub mod progress;

pub use progress::{
    MissionConfig, MissionProgress, MissionUpdate, Objective, ObjectiveTracker, PickupKind,
};

/// Уведомления для трекера миссии
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveEvent {
    /// Обычный враг появился (босс не считается)
    EnemySpawned { entity: Entity },
    EnemyKilled { entity: Entity },
    BossDefeated { entity: Entity },
}

/// Подобран предмет миссии (движок → ECS)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupCollected {
    pub kind: PickupKind,
}

/// Система: очередь ObjectiveEvent → трекер
pub fn drain_objectives<T: ObjectiveTracker + Resource>(
    mut events: EventReader<ObjectiveEvent>,
    mut tracker: ResMut<T>,
) {
    for event in events.read() {
        match event {
            ObjectiveEvent::EnemySpawned { .. } => tracker.on_enemy_spawned(),
            ObjectiveEvent::EnemyKilled { .. } => tracker.on_enemy_killed(),
            ObjectiveEvent::BossDefeated { .. } => tracker.on_boss_defeated(),
        }
    }
}

pub fn collect_pickups(mut pickups: EventReader<PickupCollected>, mut progress: ResMut<MissionProgress>) {
    for pickup in pickups.read() {
        progress.collect(pickup.kind);
        crate::log_info(&format!("📦 Picked up {:?}", pickup.kind));
    }
}

/// Система: игрок у силоса → запрос спавна босса
pub fn check_boss_spawn(
    players: Query<&Transform, (With<Player>, Without<EnemyAgent>)>,
    config: Res<MissionConfig>,
    mut progress: ResMut<MissionProgress>,
) {
    for transform in players.iter() {
        if progress.check_boss_spawn(transform.translation, &config) {
            crate::log_info("👑 Boss spawn requested at the silo");
        }
    }
}

/// Система: накопленные изменения → MissionUpdate events
pub fn publish_mission_updates(mut progress: ResMut<MissionProgress>, mut updates: EventWriter<MissionUpdate>) {
    for update in progress.take_updates() {
        crate::log_info(&format!("🎯 Mission: {:?}", update));
        updates.write(update);
    }
}

/// Mission Plugin
///
/// Порядок (Settle, после всех смертей тика):
/// 1. drain_objectives: spawn/kill счётчики
/// 2. collect_pickups: ружьё, аккумулятор
/// 3. check_boss_spawn: игрок у силоса
/// 4. publish_mission_updates: события для UI/движка
pub struct MissionPlugin;

impl Plugin for MissionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ObjectiveEvent>()
            .add_event::<PickupCollected>()
            .add_event::<MissionUpdate>()
            .init_resource::<MissionProgress>()
            .init_resource::<MissionConfig>();

        app.add_systems(
            FixedUpdate,
            (
                drain_objectives::<MissionProgress>,
                collect_pickups,
                check_boss_spawn,
                publish_mission_updates,
            )
                .chain()
                .in_set(SimulationSet::Settle),
        );
    }
}
