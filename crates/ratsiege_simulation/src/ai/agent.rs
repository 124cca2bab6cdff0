//! CombatStateMachine врага (крысы)
//!
//! Всё состояние агента: один owned компонент `EnemyAgent`.
//! Методы не знают про ECS: получают входы тика, возвращают `AgentAction`.
//! Системы (ai::systems, combat::systems) только собирают входы и
//! прогоняют действия через Actuators.
//!
//! Порядок внутри тика:
//! perception → out-of-bounds → ход таймеров → поведение состояния → expire cooldowns → шаги
//!
//! Состояния:
//! - Patrolling (initial) → случайные walk point'ы с проверкой земли
//! - Pursuing → бежим к цели по NavMesh
//! - Attacking → укус / выстрел по cooldown
//! - Ragdoll → пинок, тело в физике (опционально встаёт)
//! - Dead → health ≤ 0, терминальное
//! - Gibbed → разорвало на куски, терминальное, удаление по таймеру

use bevy::prelude::*;
use rand::Rng;

use crate::actuators::{AgentAction, AnimationClip, RemovalReason, SoundCue};
use crate::ai::config::AgentConfig;
use crate::ai::perception::{sense, Perception, TargetView};
use crate::combat::attacker::{AttackProfile, MeleeAttack};
use crate::combat::damage::{self, DamageEvent, DamageKind};
use crate::combat::ranged::RangedAttack;
use crate::components::{
    CombatTarget, GroundProbe, Health, LayerMask, LocomotionAnimation, MovementCommand,
    NavigationState,
};
use crate::cooldown::CooldownScheduler;

/// Дистанция "дошли до walk point"
pub const WALK_POINT_REACHED: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum CombatState {
    #[default]
    Patrolling,
    Pursuing,
    Attacking,
    Ragdoll,
    Dead,
    Gibbed,
}

impl CombatState {
    /// Dead/Gibbed: ни урона, ни атак
    pub fn is_terminal(self) -> bool {
        matches!(self, CombatState::Dead | CombatState::Gibbed)
    }

    /// Агент не управляет собой (ни perception, ни поведения)
    pub fn is_incapacitated(self) -> bool {
        matches!(self, CombatState::Ragdoll | CombatState::Dead | CombatState::Gibbed)
    }
}

/// Ключи таймеров агента (истёкший ключ = действие "on expire")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CooldownKind {
    /// → can_attack = true
    Attack,
    /// → can_shoot = true
    Shot,
    /// → магазин полон, can_shoot = true
    Reload,
    /// → can_walk = true
    PatrolWait,
    /// → проверка земли под агентом, встаём или пробуем позже
    RagdollRecover,
    /// → удалить агента (после gib)
    Despawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatFlags {
    pub can_attack: bool,
    pub can_walk: bool,
    pub can_shoot: bool,
}

impl Default for CombatFlags {
    fn default() -> Self {
        Self {
            can_attack: true,
            can_walk: true,
            can_shoot: true,
        }
    }
}

impl CombatFlags {
    fn disable_all(&mut self) {
        self.can_attack = false;
        self.can_walk = false;
        self.can_shoot = false;
    }
}

/// Входы одного тика (собираются системой из ECS)
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    pub delta: f32,
    pub position: Vec3,
    pub target: Option<TargetView>,
    pub navigation: NavigationState,
}

/// Враг: состояние боевой state machine
///
/// Required Components: всё, что нужно системам, появляется автоматически.
/// Health по умолчанию перезаписывается в `enemy_bundle` (max_health из AgentConfig).
#[derive(Component, Debug, Clone, Default)]
#[require(
    Health,
    AgentConfig,
    AttackProfile,
    CombatTarget,
    MovementCommand,
    NavigationState,
    LocomotionAnimation,
    Transform
)]
pub struct EnemyAgent {
    pub state: CombatState,
    pub flags: CombatFlags,
    pub cooldowns: CooldownScheduler<CooldownKind>,
    /// Perception последнего тика
    pub perception: Perception,
    /// Валиден только в Patrolling
    pub walk_point: Option<Vec3>,
    /// Счётчик melee попаданий (альтернативный gib trigger)
    pub hit_count: u32,
    /// Guard: gib ровно один раз
    pub gibbed: bool,
    /// Номер последнего выстрела (shot pattern, 1-based)
    pub shots_fired: u32,
    /// Патроны в магазине (None → бесконечно или ещё не заряжен)
    pub rounds_left: Option<u32>,
    step_timer: f32,
}

impl EnemyAgent {
    pub fn new(attack: &AttackProfile) -> Self {
        Self {
            rounds_left: attack.initial_rounds(),
            ..default()
        }
    }

    /// Один simulation tick. Возвращает true если агент удалён из мира.
    pub fn tick(
        &mut self,
        input: &TickInput,
        config: &AgentConfig,
        attack: &AttackProfile,
        ground: &dyn GroundProbe,
        rng: &mut impl Rng,
        actions: &mut Vec<AgentAction>,
    ) -> bool {
        // 1. Perception (в ragdoll/смерти агент ничего не видит)
        self.perception = if self.state.is_incapacitated() {
            Perception::default()
        } else {
            sense(
                input.position,
                input.target.as_ref(),
                config.sight_radius,
                config.attack_radius,
            )
        };

        // 2. Out-of-bounds: всегда побеждает, в любом состоянии
        if input.position.y < config.out_of_bounds_y {
            if !self.state.is_terminal() {
                actions.push(AgentAction::ReportKill {
                    killer: None,
                    gibbed: false,
                });
                self.state = CombatState::Dead;
            }
            self.cooldowns.clear();
            actions.push(AgentAction::Remove(RemovalReason::OutOfBounds));
            return true;
        }

        // Время идёт только старым таймерам: запущенные поведением ниже
        // отсчитываются со следующего тика
        self.cooldowns.advance(input.delta);

        // 3. Поведение
        if !self.state.is_incapacitated() {
            self.select_state(actions);

            match self.state {
                CombatState::Patrolling => self.patrol(input.position, config, ground, rng, actions),
                CombatState::Pursuing => self.pursue(input, actions),
                CombatState::Attacking => self.attack(input, attack, actions),
                _ => {}
            }
        }

        // 4. Cooldowns
        for key in self.cooldowns.take_expired() {
            if self.on_cooldown_expired(key, input.position, config, attack, ground, actions) {
                return true;
            }
        }

        // 5. Шаги (derived от фактической скорости)
        // Копится только в движении, на месте не сбрасывается
        if !self.state.is_incapacitated() && input.navigation.is_moving() {
            self.step_timer += input.delta;
            if self.step_timer >= config.step_rate {
                actions.push(AgentAction::Sound(SoundCue::Footstep));
                self.step_timer = 0.0;
            }
        }

        false
    }

    /// Скорость для blend tree: упавший/мёртвый агент не бежит
    pub fn locomotion_speed(&self, navigation: &NavigationState) -> f32 {
        if self.state.is_incapacitated() {
            0.0
        } else {
            navigation.speed()
        }
    }

    fn select_state(&mut self, actions: &mut Vec<AgentAction>) {
        let next = match (self.perception.in_sight, self.perception.in_attack_range) {
            (true, true) => CombatState::Attacking,
            (true, false) => CombatState::Pursuing,
            _ => CombatState::Patrolling,
        };

        if next == self.state {
            return;
        }

        if self.state == CombatState::Patrolling {
            self.walk_point = None;
        }
        // Потеряли цель посреди ожидания на точке: patrol() команд не даст
        let lost_target = self.state == CombatState::Pursuing && next == CombatState::Patrolling;
        if next == CombatState::Attacking || lost_target {
            actions.push(AgentAction::Navigate(MovementCommand::Stop));
        }
        self.state = next;
    }

    fn patrol(
        &mut self,
        position: Vec3,
        config: &AgentConfig,
        ground: &dyn GroundProbe,
        rng: &mut impl Rng,
        actions: &mut Vec<AgentAction>,
    ) {
        // Ждём на точке: никаких команд движения
        if !self.flags.can_walk {
            return;
        }

        let walk_point = match self.walk_point {
            Some(point) => point,
            None => {
                let range = config.walk_point_range.max(0.0);
                let candidate = position
                    + Vec3::new(rng.gen_range(-range..=range), 0.0, rng.gen_range(-range..=range));

                // Над пропастью: пробуем другую точку на следующем тике
                if !ground.is_ground_below(candidate, config.ground_probe_distance, LayerMask::GROUND) {
                    return;
                }
                self.walk_point = Some(candidate);
                candidate
            }
        };

        if position.distance(walk_point) < WALK_POINT_REACHED {
            self.walk_point = None;
            self.flags.can_walk = false;
            self.cooldowns.start(CooldownKind::PatrolWait, config.wait_time);
            actions.push(AgentAction::Navigate(MovementCommand::Stop));
        } else {
            actions.push(AgentAction::Navigate(MovementCommand::MoveToPosition {
                target: walk_point,
            }));
        }
    }

    fn pursue(&mut self, input: &TickInput, actions: &mut Vec<AgentAction>) {
        let Some(target) = input.target else {
            return;
        };

        if input.navigation.on_nav_mesh {
            actions.push(AgentAction::Navigate(MovementCommand::MoveToPosition {
                target: target.position,
            }));
        } else if input.navigation.has_path {
            actions.push(AgentAction::Navigate(MovementCommand::Stop));
        }
    }

    fn attack(&mut self, input: &TickInput, attack: &AttackProfile, actions: &mut Vec<AgentAction>) {
        let Some(target) = input.target.filter(|t| t.alive) else {
            return;
        };

        match attack {
            AttackProfile::Melee(melee) => self.bite(target, melee, actions),
            AttackProfile::Ranged(ranged) => self.shoot(input.position, target, ranged, actions),
        }
    }

    fn bite(&mut self, target: TargetView, melee: &MeleeAttack, actions: &mut Vec<AgentAction>) {
        if !self.flags.can_attack {
            return;
        }

        actions.push(AgentAction::Sound(SoundCue::Attack));
        actions.push(AgentAction::Animate {
            clip: AnimationClip::Bite,
            interrupt: true,
        });
        actions.push(AgentAction::Strike {
            target: target.entity,
            amount: melee.attack_damage,
        });

        self.flags.can_attack = false;
        self.cooldowns.start(CooldownKind::Attack, melee.attack_cooldown);
    }

    fn shoot(
        &mut self,
        position: Vec3,
        target: TargetView,
        ranged: &RangedAttack,
        actions: &mut Vec<AgentAction>,
    ) {
        if !self.flags.can_shoot {
            return;
        }

        self.shots_fired += 1;
        for projectile in ranged.plan_shot(self.shots_fired, position, target.position) {
            actions.push(AgentAction::Fire(projectile));
        }
        actions.push(AgentAction::Sound(SoundCue::Shot));
        actions.push(AgentAction::Animate {
            clip: AnimationClip::Shoot,
            interrupt: false,
        });
        self.flags.can_shoot = false;

        if let Some(magazine) = ranged.magazine_size {
            let rounds = self.rounds_left.get_or_insert(magazine);
            *rounds = rounds.saturating_sub(1);
            if *rounds == 0 {
                self.cooldowns.start(CooldownKind::Reload, ranged.reload_time);
                return;
            }
        }

        self.cooldowns.start(CooldownKind::Shot, ranged.shot_interval);
    }

    /// Возвращает true если агент удалён
    fn on_cooldown_expired(
        &mut self,
        key: CooldownKind,
        position: Vec3,
        config: &AgentConfig,
        attack: &AttackProfile,
        ground: &dyn GroundProbe,
        actions: &mut Vec<AgentAction>,
    ) -> bool {
        match key {
            CooldownKind::Attack => self.flags.can_attack = true,
            CooldownKind::Shot => self.flags.can_shoot = true,
            CooldownKind::Reload => {
                self.rounds_left = attack.initial_rounds();
                self.flags.can_shoot = true;
            }
            CooldownKind::PatrolWait => self.flags.can_walk = true,
            CooldownKind::RagdollRecover => {
                if self.state != CombatState::Ragdoll {
                    return false;
                }

                if ground.is_ground_below(position, config.ground_check_distance, LayerMask::GROUND) {
                    // Приземлились → обратно на NavMesh
                    self.state = CombatState::Patrolling;
                    self.walk_point = None;
                    actions.push(AgentAction::Ragdoll {
                        enabled: false,
                        impulse: None,
                    });
                } else {
                    self.cooldowns
                        .start(CooldownKind::RagdollRecover, config.ragdoll_retry_interval);
                }
            }
            CooldownKind::Despawn => {
                actions.push(AgentAction::Remove(RemovalReason::Gibbed));
                return true;
            }
        }

        false
    }

    /// Входящий урон (укус игрока, пуля, окружение)
    ///
    /// Dead/Gibbed: отклоняется целиком (hit_count тоже не растёт).
    pub fn receive_damage(
        &mut self,
        health: &mut Health,
        event: &DamageEvent,
        config: &AgentConfig,
        position: Vec3,
        rng: &mut impl Rng,
        actions: &mut Vec<AgentAction>,
    ) {
        let events = damage::damage(health, event.amount, self.state.is_terminal());
        if events.is_empty() {
            return;
        }

        if event.kind == DamageKind::Melee {
            self.hit_count += 1;
        }

        if self.should_gib(health, event.kind, config) {
            self.gib(event.source, config, position, rng, actions);
        } else if damage::is_depleted(&events) {
            self.die(event.source, config, actions);
        }
    }

    fn should_gib(&self, health: &Health, kind: DamageKind, config: &AgentConfig) -> bool {
        let by_hits = config.gib_after_hits.is_some_and(|hits| self.hit_count >= hits);
        let by_health = config
            .gib_health_threshold
            .is_some_and(|threshold| health.current <= threshold);
        let by_shot = kind == DamageKind::Projectile && config.gib_on_shot;

        by_hits || by_health || by_shot
    }

    /// Разорвать агента. Повторный вызов (и вызов на Dead): no-op.
    pub fn gib(
        &mut self,
        killer: Option<Entity>,
        config: &AgentConfig,
        position: Vec3,
        rng: &mut impl Rng,
        actions: &mut Vec<AgentAction>,
    ) {
        if self.gibbed || self.state.is_terminal() {
            return;
        }
        self.gibbed = true;

        if !config.gib_bypasses_ragdoll && self.state != CombatState::Ragdoll {
            actions.push(AgentAction::Ragdoll {
                enabled: true,
                impulse: None,
            });
        }

        self.state = CombatState::Gibbed;
        self.flags.disable_all();
        self.walk_point = None;
        self.cooldowns.clear();

        let impulses = (0..config.debris_count)
            .map(|_| random_outward(rng) * config.debris_impulse)
            .collect();

        actions.push(AgentAction::Navigate(MovementCommand::Stop));
        actions.push(AgentAction::DestroyVisual);
        actions.push(AgentAction::HideIcon);
        actions.push(AgentAction::SpawnDebris {
            position,
            size_scale: config.debris_size_scale,
            impulses,
        });
        actions.push(AgentAction::Sound(SoundCue::Gib));
        actions.push(AgentAction::ReportKill {
            killer,
            gibbed: true,
        });

        self.cooldowns.start(CooldownKind::Despawn, config.gib_despawn_delay);
    }

    /// Обычная смерть. Повторный вызов: no-op.
    pub fn die(&mut self, killer: Option<Entity>, config: &AgentConfig, actions: &mut Vec<AgentAction>) {
        if self.state.is_terminal() {
            return;
        }

        let was_ragdoll = self.state == CombatState::Ragdoll;
        self.state = CombatState::Dead;
        self.flags.disable_all();
        self.walk_point = None;
        self.cooldowns.clear();

        actions.push(AgentAction::Navigate(MovementCommand::Stop));
        actions.push(AgentAction::Sound(SoundCue::Death));
        actions.push(AgentAction::HideIcon);
        if config.ragdoll_on_death && !was_ragdoll {
            actions.push(AgentAction::Ragdoll {
                enabled: true,
                impulse: None,
            });
        }
        actions.push(AgentAction::ReportKill {
            killer,
            gibbed: false,
        });
    }

    /// Пинок / взрывная волна → ragdoll. На трупы не действует.
    pub fn knock_back(&mut self, impulse: Vec3, config: &AgentConfig, actions: &mut Vec<AgentAction>) {
        if self.state.is_terminal() {
            return;
        }

        self.state = CombatState::Ragdoll;
        self.walk_point = None;
        self.perception = Perception::default();

        actions.push(AgentAction::Navigate(MovementCommand::Stop));
        actions.push(AgentAction::Ragdoll {
            enabled: true,
            impulse: Some(impulse),
        });

        if config.ragdoll_recoverable {
            self.cooldowns
                .start(CooldownKind::RagdollRecover, config.ragdoll_recover_delay);
        }
    }
}

/// Случайное направление "наружу и вверх" (единичный вектор)
fn random_outward(rng: &mut impl Rng) -> Vec3 {
    let direction = Vec3::new(
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(0.0..=1.0),
        rng.gen_range(-1.0..=1.0),
    );
    direction.try_normalize().unwrap_or(Vec3::Y)
}
