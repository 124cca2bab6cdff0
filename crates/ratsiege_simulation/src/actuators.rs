//! ExternalActuators: запросы ECS к движку (tactical layer)
//!
//! State machine агента не трогает мир напрямую: она возвращает `AgentAction`,
//! а системы прогоняют их через `Actuators` → Bevy events.
//! Движок читает события и делает анимацию, звук, debris, ragdoll, снаряды.
//!
//! Исключения (возвращаются вызывающему в `Dispatched`):
//! - Navigate → последняя команда пишется в MovementCommand агента
//! - Strike → DamageEvent (one-way урон цели)

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::damage::{DamageEvent, DamageKind, EntityDied};
use crate::combat::ranged::ProjectileSpawn;
use crate::components::MovementCommand;
use crate::mission::ObjectiveEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AnimationClip {
    /// Укус крысы
    Bite,
    /// Выстрел ranged крысы
    Shoot,
    /// Реакция игрока на урон
    Hit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SoundCue {
    Attack,
    Shot,
    Footstep,
    Damage,
    Death,
    Gib,
}

/// Почему агент удалён из мира
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum RemovalReason {
    /// Упал ниже out_of_bounds_y
    OutOfBounds,
    /// Истёк despawn таймер после gib
    Gibbed,
}

/// Что агент хочет сделать с миром (результат одного шага state machine)
#[derive(Debug, Clone, PartialEq)]
pub enum AgentAction {
    Navigate(MovementCommand),
    Strike { target: Entity, amount: f32 },
    Fire(ProjectileSpawn),
    Animate { clip: AnimationClip, interrupt: bool },
    Sound(SoundCue),
    SpawnDebris {
        position: Vec3,
        size_scale: f32,
        impulses: Vec<Vec3>,
    },
    Ragdoll { enabled: bool, impulse: Option<Vec3> },
    DestroyVisual,
    HideIcon,
    /// Первый терминальный переход (Dead/Gibbed) или падение живого агента
    ReportKill { killer: Option<Entity>, gibbed: bool },
    Remove(RemovalReason),
}

// ============================================================================
// Events (ECS → движок)
// ============================================================================

#[derive(Event, Debug, Clone, PartialEq)]
pub struct AnimationRequested {
    pub entity: Entity,
    pub clip: AnimationClip,
    /// Прервать текущий клип (укус, hit reaction)
    pub interrupt: bool,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct SoundRequested {
    pub entity: Entity,
    pub cue: SoundCue,
}

/// Спавн кусков после gib (количество = impulses.len())
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DebrisSpawnRequested {
    pub entity: Entity,
    pub position: Vec3,
    pub size_scale: f32,
    pub impulses: Vec<Vec3>,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ProjectileSpawnRequested {
    pub shooter: Entity,
    pub projectile: ProjectileSpawn,
}

/// Включить/выключить физическую симуляцию тела
#[derive(Event, Debug, Clone, PartialEq)]
pub struct RagdollToggled {
    pub entity: Entity,
    pub enabled: bool,
    pub impulse: Option<Vec3>,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct VisualDestroyed {
    pub entity: Entity,
}

/// Скрыть иконку агента на миникарте
#[derive(Event, Debug, Clone, PartialEq)]
pub struct IconHidden {
    pub entity: Entity,
}

/// Агент удалён из ECS (движок удаляет свой node)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AgentRemoved {
    pub entity: Entity,
    pub reason: RemovalReason,
}

/// Регистрация всех событий актуаторов (повторный вызов безопасен)
pub fn add_actuator_events(app: &mut App) {
    app.add_event::<AnimationRequested>()
        .add_event::<SoundRequested>()
        .add_event::<DebrisSpawnRequested>()
        .add_event::<ProjectileSpawnRequested>()
        .add_event::<RagdollToggled>()
        .add_event::<VisualDestroyed>()
        .add_event::<IconHidden>()
        .add_event::<AgentRemoved>()
        .add_event::<EntityDied>()
        .add_event::<ObjectiveEvent>();
}

/// То, что Actuators не отправляют сами
#[derive(Debug, Default, PartialEq)]
pub struct Dispatched {
    /// Последняя команда навигации тика (None → не трогать)
    pub navigation: Option<MovementCommand>,
    pub strikes: Vec<DamageEvent>,
}

/// Все выходы к движку одним SystemParam
///
/// DamageEvent сюда НЕ входит: combat система читает DamageEvent,
/// а writer + reader одного события в одной системе: конфликт доступа.
#[derive(SystemParam)]
pub struct Actuators<'w, 's> {
    commands: Commands<'w, 's>,
    animations: EventWriter<'w, AnimationRequested>,
    sounds: EventWriter<'w, SoundRequested>,
    debris: EventWriter<'w, DebrisSpawnRequested>,
    projectiles: EventWriter<'w, ProjectileSpawnRequested>,
    ragdolls: EventWriter<'w, RagdollToggled>,
    visuals: EventWriter<'w, VisualDestroyed>,
    icons: EventWriter<'w, IconHidden>,
    removals: EventWriter<'w, AgentRemoved>,
    deaths: EventWriter<'w, EntityDied>,
    objectives: EventWriter<'w, ObjectiveEvent>,
}

impl Actuators<'_, '_> {
    /// Выполнить действия агента.
    ///
    /// Navigate/Strike не отправляются, а возвращаются: MovementCommand пишет
    /// вызывающий (set_if_neq), DamageEvent тоже.
    pub fn dispatch(&mut self, entity: Entity, is_boss: bool, actions: Vec<AgentAction>) -> Dispatched {
        let mut dispatched = Dispatched::default();

        for action in actions {
            match action {
                AgentAction::Navigate(command) => {
                    dispatched.navigation = Some(command);
                }
                AgentAction::Strike { target, amount } => {
                    dispatched.strikes.push(DamageEvent {
                        amount,
                        source: Some(entity),
                        target,
                        kind: DamageKind::Melee,
                    });
                }
                AgentAction::Fire(projectile) => {
                    self.projectiles.write(ProjectileSpawnRequested {
                        shooter: entity,
                        projectile,
                    });
                }
                AgentAction::Animate { clip, interrupt } => {
                    self.animations.write(AnimationRequested {
                        entity,
                        clip,
                        interrupt,
                    });
                }
                AgentAction::Sound(cue) => {
                    self.sounds.write(SoundRequested { entity, cue });
                }
                AgentAction::SpawnDebris {
                    position,
                    size_scale,
                    impulses,
                } => {
                    self.debris.write(DebrisSpawnRequested {
                        entity,
                        position,
                        size_scale,
                        impulses,
                    });
                }
                AgentAction::Ragdoll { enabled, impulse } => {
                    self.ragdolls.write(RagdollToggled {
                        entity,
                        enabled,
                        impulse,
                    });
                }
                AgentAction::DestroyVisual => {
                    self.visuals.write(VisualDestroyed { entity });
                }
                AgentAction::HideIcon => {
                    self.icons.write(IconHidden { entity });
                }
                AgentAction::ReportKill { killer, gibbed } => {
                    self.report_kill(entity, is_boss, killer, gibbed);
                }
                AgentAction::Remove(reason) => {
                    self.removals.write(AgentRemoved { entity, reason });
                    if let Ok(mut entity_commands) = self.commands.get_entity(entity) {
                        entity_commands.try_despawn();
                    }
                    crate::log(&format!("🗑️ {:?} removed ({:?})", entity, reason));
                }
            }
        }

        dispatched
    }

    fn report_kill(&mut self, entity: Entity, is_boss: bool, killer: Option<Entity>, gibbed: bool) {
        self.deaths.write(EntityDied {
            entity,
            killer,
            gibbed,
        });

        // Босс не считается в счётчике крыс
        let objective = if is_boss {
            ObjectiveEvent::BossDefeated { entity }
        } else {
            ObjectiveEvent::EnemyKilled { entity }
        };
        self.objectives.write(objective);

        crate::log_info(&format!(
            "💀 {:?} killed by {:?} (gibbed: {}, boss: {})",
            entity, killer, gibbed, is_boss
        ));
    }
}
