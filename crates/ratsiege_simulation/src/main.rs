//! Headless симуляция Ratsiege
//!
//! Запускает Bevy App без рендера: игрок на ферме, стая крыс, одна стреляет.
//! Игрок раз в секунду пинает ближайшую крысу (вместо input'а),
//! крысы ходят по прямой (вместо NavMesh).
//!
//! Использование: ratsiege_simulation [config.json]

use bevy::prelude::*;
use ratsiege_simulation::ai::CombatState;
use ratsiege_simulation::combat::{AttackProfile, DamageEvent, DamageKind};
use ratsiege_simulation::{
    create_headless_app_with_config, enemy_bundle, log_error, log_info, player_bundle, run_ticks,
    EnemyAgent, Health, MissionProgress, MovementCommand, NavigationState, Player, SafeZone,
    SimulationConfig, SimulationSet,
};

const TICKS: usize = 1800;
const KICK_RANGE: f32 = 3.0;
const KICK_DAMAGE: f32 = 15.0;
const RAT_SPEED: f32 = 3.0;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                ratsiege_simulation::init_logger();
                log_error(&format!("Config error: {}", err));
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    let mut app = match create_headless_app_with_config(&config) {
        Ok(app) => app,
        Err(err) => {
            log_error(&format!("Config error: {}", err));
            std::process::exit(1);
        }
    };

    // Заглушка tactical layer: движение по MovementCommand
    app.add_systems(FixedUpdate, walk_agents.before(SimulationSet::Sense));

    log_info(&format!(
        "Starting Ratsiege headless simulation (seed: {}, {} Hz)",
        config.seed, config.tick_hz
    ));

    let world = app.world_mut();
    world.spawn((SafeZone, Transform::default()));
    world.spawn(player_bundle(Vec3::ZERO, config.player.clone()));

    for i in 0..5 {
        let angle = i as f32 * std::f32::consts::TAU / 5.0;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * 6.0;
        world.spawn(enemy_bundle(
            position,
            config.enemy.clone(),
            AttackProfile::Melee(config.melee),
            None,
        ));
    }
    world.spawn(enemy_bundle(
        Vec3::new(0.0, 0.0, -9.0),
        config.enemy.clone(),
        AttackProfile::Ranged(config.ranged),
        None,
    ));

    let ticks_per_second = config.tick_hz.round().max(1.0) as usize;
    for tick in 0..TICKS {
        run_ticks(&mut app, 1);

        if tick % ticks_per_second == 0 {
            player_kick(app.world_mut());
            report(app.world_mut(), tick);
        }
    }

    let progress = app.world().resource::<MissionProgress>();
    log_info(&format!(
        "Simulation complete! Rats killed: {}/{}, objectives: {:?}",
        progress.rats_killed,
        progress.rats_spawned,
        progress.objectives()
    ));
}

/// Прямолинейное движение к цели команды (NavMesh в headless нет)
fn walk_agents(
    time: Res<Time<Fixed>>,
    mut agents: Query<(&MovementCommand, &mut Transform, &mut NavigationState)>,
) {
    let delta = time.delta_secs();

    for (command, mut transform, mut navigation) in agents.iter_mut() {
        let MovementCommand::MoveToPosition { target } = *command else {
            navigation.velocity = Vec3::ZERO;
            navigation.has_path = false;
            continue;
        };

        let to_target = target - transform.translation;
        let step = RAT_SPEED * delta;
        if to_target.length() <= step {
            transform.translation = target;
            navigation.velocity = Vec3::ZERO;
            navigation.has_path = false;
        } else {
            navigation.velocity = to_target.normalize() * RAT_SPEED;
            navigation.has_path = true;
            transform.translation += navigation.velocity * delta;
        }
    }
}

/// "Игрок" пинает ближайшую живую крысу в радиусе
fn player_kick(world: &mut World) {
    let mut players = world.query_filtered::<(Entity, &Transform, &Health), With<Player>>();
    let Some((player, player_position)) = players
        .iter(world)
        .find(|(_, _, health)| health.is_alive())
        .map(|(entity, transform, _)| (entity, transform.translation))
    else {
        return;
    };

    let mut enemies = world.query::<(Entity, &Transform, &EnemyAgent)>();
    let target = enemies
        .iter(world)
        .filter(|(_, _, agent)| !agent.state.is_terminal())
        .map(|(entity, transform, _)| (entity, transform.translation.distance(player_position)))
        .filter(|(_, distance)| *distance <= KICK_RANGE)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entity, _)| entity);

    if let Some(target) = target {
        world.send_event(DamageEvent {
            amount: KICK_DAMAGE,
            source: Some(player),
            target,
            kind: DamageKind::Melee,
        });
    }
}

fn report(world: &mut World, tick: usize) {
    let mut enemies = world.query::<&EnemyAgent>();
    let mut counts = [0usize; 6];
    for agent in enemies.iter(world) {
        let slot = match agent.state {
            CombatState::Patrolling => 0,
            CombatState::Pursuing => 1,
            CombatState::Attacking => 2,
            CombatState::Ragdoll => 3,
            CombatState::Dead => 4,
            CombatState::Gibbed => 5,
        };
        counts[slot] += 1;
    }

    let mut players = world.query_filtered::<&Health, With<Player>>();
    let player_health = players.iter(world).next().map_or(0.0, |health| health.current);

    log_info(&format!(
        "Tick {}: player hp {:.0} | patrol {} pursue {} attack {} ragdoll {} dead {} gibbed {}",
        tick, player_health, counts[0], counts[1], counts[2], counts[3], counts[4], counts[5]
    ));
}
