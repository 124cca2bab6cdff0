//! Ratsiege Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (strategic layer): крысы, игрок, миссия.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (game state, AI, combat rules)
//! - Движок = tactical layer (physics, rendering, pathfinding, audio)
//!
//! Один simulation tick (FixedUpdate):
//! Sense → Decide → Resolve → Settle

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actuators;
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod cooldown;
pub mod logger;
pub mod mission;
pub mod player;

// Re-export базовых типов для удобства
pub use actuators::{AgentAction, AnimationClip, RemovalReason, SoundCue};
pub use ai::{boss_bundle, enemy_bundle, AIPlugin, AgentConfig, CombatState, EnemyAgent};
pub use combat::{AttackProfile, CombatPlugin, DamageDealt, DamageEvent, DamageKind, EntityDied};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use cooldown::CooldownScheduler;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter,
};
pub use mission::{MissionPlugin, MissionProgress, ObjectiveEvent};
pub use player::{player_bundle, Player, PlayerPlugin};

/// Частота simulation tick по умолчанию
pub const DEFAULT_TICK_HZ: f64 = 60.0;

/// Seed по умолчанию (если приложение не вставило свой DeterministicRng)
pub const DEFAULT_SEED: u64 = 42;

/// Фазы одного simulation tick (FixedUpdate, строго последовательно)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Регистрация спавна, поиск цели
    Sense,
    /// Мозги крыс: perception → out-of-bounds → state → cooldowns
    Decide,
    /// Урон, пинки, смерть/gib, лечение/респавн игрока
    Resolve,
    /// Разбор очереди ObjectiveEvent
    Settle,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Sense,
                SimulationSet::Decide,
                SimulationSet::Resolve,
                SimulationSet::Settle,
            )
                .chain(),
        );

        // Seed мог поставить create_headless_app: не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }

        app.init_resource::<Terrain>()
            // Подсистемы (ECS strategic layer)
            .add_plugins((CombatPlugin, AIPlugin, PlayerPlugin, MissionPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` продвигает часы ровно на один fixed step
/// (первый update только запускает часы: см. `run_ticks`).
pub fn create_headless_app(seed: u64) -> App {
    create_app(seed, DEFAULT_TICK_HZ)
}

/// Headless App по конфигу: seed, tick rate, log level, параметры миссии + SimulationPlugin
pub fn create_headless_app_with_config(config: &SimulationConfig) -> Result<App, ConfigError> {
    config.validate()?;
    set_log_level(config.log_level()?);

    let mut app = create_app(config.seed, config.tick_hz);
    app.insert_resource(config.mission.clone())
        .add_plugins(SimulationPlugin);

    Ok(app)
}

fn create_app(seed: u64, tick_hz: f64) -> App {
    let mut app = App::new();
    init_logger();

    let step = Duration::from_secs_f64(1.0 / tick_hz);
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(step))
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));

    app
}

/// Прогнать `ticks` simulation tick'ов
pub fn run_ticks(app: &mut App, ticks: usize) {
    // Первый update только фиксирует стартовое время (delta = 0)
    if app.world().resource::<Time<Real>>().first_update().is_none() {
        app.update();
    }

    for _ in 0..ticks {
        app.update();
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
