//! Integration тесты игрока и миссии
//!
//! Смерть → game over таймер → респавн, аптечки, safe zone,
//! счётчик крыс → босс у силоса → победа.

use bevy::prelude::*;
use ratsiege_simulation::ai::AgentConfig;
use ratsiege_simulation::combat::{AttackProfile, DamageEvent, DamageKind};
use ratsiege_simulation::mission::{MissionConfig, MissionProgress, MissionUpdate, PickupCollected, PickupKind};
use ratsiege_simulation::player::{
    GameOver, HealRequested, HealthRestored, PlayerConfig, PlayerDied, PlayerLife,
    PlayerReturnedToSafeZone, RespawnRequested,
};
use ratsiege_simulation::{
    boss_bundle, create_headless_app, create_headless_app_with_config, enemy_bundle, player_bundle,
    run_ticks, ConfigError, Health, SafeZone, SimulationConfig, SimulationPlugin, SimulationSet,
};

#[derive(Resource, Default)]
struct Captured {
    player_deaths: Vec<PlayerDied>,
    game_overs: Vec<GameOver>,
    restored: Vec<HealthRestored>,
    returned: Vec<PlayerReturnedToSafeZone>,
    mission: Vec<MissionUpdate>,
}

fn capture(
    mut player_deaths: EventReader<PlayerDied>,
    mut game_overs: EventReader<GameOver>,
    mut restored: EventReader<HealthRestored>,
    mut returned: EventReader<PlayerReturnedToSafeZone>,
    mut mission: EventReader<MissionUpdate>,
    mut captured: ResMut<Captured>,
) {
    captured.player_deaths.extend(player_deaths.read().cloned());
    captured.game_overs.extend(game_overs.read().cloned());
    captured.restored.extend(restored.read().cloned());
    captured.returned.extend(returned.read().cloned());
    captured.mission.extend(mission.read().cloned());
}

fn setup() -> App {
    let mut app = create_headless_app(7);
    app.add_plugins(SimulationPlugin)
        .init_resource::<Captured>()
        .add_systems(FixedUpdate, capture.after(SimulationSet::Settle));
    app
}

fn captured(app: &App) -> &Captured {
    app.world().resource::<Captured>()
}

fn hit(target: Entity, amount: f32) -> DamageEvent {
    DamageEvent {
        amount,
        source: None,
        target,
        kind: DamageKind::Environment,
    }
}

#[test]
fn test_player_death_game_over_and_respawn() {
    let mut app = setup();
    let config = PlayerConfig {
        game_over_delay: 0.5,
        ..default()
    };
    let player = app.world_mut().spawn(player_bundle(Vec3::ZERO, config)).id();
    run_ticks(&mut app, 1);

    app.world_mut().send_event(hit(player, 150.0));
    run_ticks(&mut app, 1);

    assert_eq!(app.world().get::<Health>(player).unwrap().current, 0.0);
    assert_eq!(*app.world().get::<PlayerLife>(player).unwrap(), PlayerLife::Dead);
    assert_eq!(captured(&app).player_deaths.len(), 1);

    // Мёртвых не лечат и не добивают
    app.world_mut().send_event(HealRequested { target: player, amount: 20.0 });
    app.world_mut().send_event(hit(player, 10.0));
    run_ticks(&mut app, 1);
    assert!(captured(&app).restored.is_empty());
    assert_eq!(captured(&app).player_deaths.len(), 1);
    assert!(captured(&app).game_overs.is_empty());

    run_ticks(&mut app, 40);
    assert_eq!(captured(&app).game_overs.len(), 1);
    assert_eq!(captured(&app).game_overs[0].entity, player);

    app.world_mut().send_event(RespawnRequested {
        entity: player,
        position: Some(Vec3::new(5.0, 0.0, 5.0)),
    });
    run_ticks(&mut app, 1);

    let health = app.world().get::<Health>(player).unwrap();
    assert_eq!(health.current, health.max);
    assert_eq!(*app.world().get::<PlayerLife>(player).unwrap(), PlayerLife::Alive);
    assert_eq!(
        app.world().get::<Transform>(player).unwrap().translation,
        Vec3::new(5.0, 0.0, 5.0)
    );
}

#[test]
fn test_game_over_delay_counts_from_tick_after_death() {
    let mut app = setup();
    // 2.5 тика при 60Hz
    let config = PlayerConfig {
        game_over_delay: 2.5 / 60.0,
        ..default()
    };
    let player = app.world_mut().spawn(player_bundle(Vec3::ZERO, config)).id();
    run_ticks(&mut app, 1);

    app.world_mut().send_event(hit(player, 150.0));
    run_ticks(&mut app, 1);
    assert_eq!(captured(&app).player_deaths.len(), 1);

    run_ticks(&mut app, 2);
    assert!(captured(&app).game_overs.is_empty());

    run_ticks(&mut app, 1);
    assert_eq!(captured(&app).game_overs.len(), 1);
}

#[test]
fn test_respawn_cancels_pending_game_over() {
    let mut app = setup();
    let config = PlayerConfig {
        game_over_delay: 0.5,
        ..default()
    };
    let player = app.world_mut().spawn(player_bundle(Vec3::ZERO, config)).id();
    run_ticks(&mut app, 1);

    app.world_mut().send_event(hit(player, 150.0));
    run_ticks(&mut app, 10);
    app.world_mut().send_event(RespawnRequested { entity: player, position: None });
    run_ticks(&mut app, 60);

    assert!(captured(&app).game_overs.is_empty());
    assert_eq!(*app.world().get::<PlayerLife>(player).unwrap(), PlayerLife::Alive);
}

#[test]
fn test_heal_clamps_to_max_health() {
    let mut app = setup();
    let player = app.world_mut().spawn(player_bundle(Vec3::ZERO, PlayerConfig::default())).id();
    run_ticks(&mut app, 1);

    app.world_mut().send_event(hit(player, 30.0));
    run_ticks(&mut app, 1);
    app.world_mut().send_event(HealRequested { target: player, amount: 50.0 });
    run_ticks(&mut app, 1);

    let restored = &captured(&app).restored;
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].amount, 30.0);
    assert_eq!(restored[0].current, 100.0);

    // Полное здоровье: аптечка не тратится
    app.world_mut().send_event(HealRequested { target: player, amount: 50.0 });
    run_ticks(&mut app, 1);
    assert_eq!(captured(&app).restored.len(), 1);
}

#[test]
fn test_fallen_player_returns_to_closest_safe_zone() {
    let mut app = setup();
    app.world_mut()
        .spawn((SafeZone, Transform::from_xyz(0.0, 0.0, 0.0)));
    app.world_mut()
        .spawn((SafeZone, Transform::from_xyz(40.0, 0.0, 0.0)));
    let player = app.world_mut().spawn(player_bundle(Vec3::ZERO, PlayerConfig::default())).id();
    run_ticks(&mut app, 1);

    app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(35.0, -150.0, 0.0);
    run_ticks(&mut app, 1);

    assert_eq!(
        app.world().get::<Transform>(player).unwrap().translation,
        Vec3::new(40.0, 0.0, 0.0)
    );
    assert_eq!(captured(&app).returned.len(), 1);
}

#[test]
fn test_mission_boss_flow() {
    let mut app = setup();
    app.insert_resource(MissionConfig {
        silo_position: Some([0.0, 0.0, -100.0]),
        boss_spawn_distance: 10.0,
    });

    let player = app.world_mut().spawn(player_bundle(Vec3::ZERO, PlayerConfig::default())).id();
    let rats: Vec<Entity> = [Vec3::new(30.0, 0.0, 0.0), Vec3::new(-30.0, 0.0, 0.0)]
        .into_iter()
        .map(|position| {
            app.world_mut()
                .spawn(enemy_bundle(position, AgentConfig::default(), AttackProfile::default(), None))
                .id()
        })
        .collect();
    run_ticks(&mut app, 1);
    assert_eq!(app.world().resource::<MissionProgress>().rats_spawned, 2);

    app.world_mut().send_event(hit(rats[0], 100.0));
    run_ticks(&mut app, 1);
    assert!(!app.world().resource::<MissionProgress>().boss_unlocked);

    // Подход к силосу до зачистки ничего не даёт
    app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(0.0, 0.0, -95.0);
    run_ticks(&mut app, 1);
    assert!(captured(&app).mission.is_empty());

    app.world_mut().send_event(hit(rats[1], 100.0));
    run_ticks(&mut app, 1);
    assert_eq!(
        captured(&app).mission,
        vec![
            MissionUpdate::BossUnlocked,
            MissionUpdate::BossSpawnRequested {
                position: Vec3::new(0.0, 0.0, -100.0)
            },
        ]
    );

    // Движок активирует босса; босс не считается крысой
    let boss = app
        .world_mut()
        .spawn(boss_bundle(
            Vec3::new(0.0, 0.0, -100.0),
            AgentConfig {
                max_health: 200.0,
                ..default()
            },
            AttackProfile::default(),
            None,
        ))
        .id();
    run_ticks(&mut app, 1);
    assert_eq!(app.world().resource::<MissionProgress>().rats_spawned, 2);

    app.world_mut().send_event(hit(boss, 500.0));
    run_ticks(&mut app, 1);

    let progress = app.world().resource::<MissionProgress>();
    assert!(progress.boss_defeated);
    assert_eq!(progress.rats_killed, 2);
    assert_eq!(captured(&app).mission.last(), Some(&MissionUpdate::MissionComplete));
}

#[test]
fn test_pickups_tracked() {
    let mut app = setup();
    run_ticks(&mut app, 1);

    app.world_mut().send_event(PickupCollected { kind: PickupKind::Rifle });
    run_ticks(&mut app, 1);

    let progress = app.world().resource::<MissionProgress>();
    assert!(progress.has_rifle);
    assert!(!progress.has_car_battery);
}

#[test]
fn test_app_from_config() {
    let config: SimulationConfig = SimulationConfig::from_json_str(
        r#"{ "seed": 9, "mission": { "silo_position": [1.0, 0.0, 2.0] } }"#,
    )
    .unwrap();
    let app = create_headless_app_with_config(&config).unwrap();
    assert_eq!(
        app.world().resource::<MissionConfig>().silo(),
        Some(Vec3::new(1.0, 0.0, 2.0))
    );

    let broken = SimulationConfig {
        tick_hz: 0.0,
        ..default()
    };
    assert!(matches!(
        create_headless_app_with_config(&broken),
        Err(ConfigError::Invalid { field: "tick_hz", .. })
    ));
}
