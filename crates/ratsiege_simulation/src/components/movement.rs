//! Navigation канал между ECS и tactical layer (NavMesh живёт снаружи)
//!
//! ECS → движок: MovementCommand (requestPathTo / cancelPath)
//! Движок → ECS: NavigationState (isOnNavMesh / hasPath / velocity)

use bevy::prelude::*;

/// Команда движения для NavMesh агента
///
/// Пишется только при изменении (set_if_neq): иначе Changed<MovementCommand> спамит движок.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementCommand {
    /// Ничего не делать (не трогать текущий путь)
    #[default]
    Idle,
    /// Построить путь и идти к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
    /// Сбросить путь и остановиться (cancelPath)
    Stop,
}

/// Состояние NavMesh агента (репортит tactical layer каждый physics tick)
///
/// Headless по умолчанию: агент на NavMesh, пути нет, стоит на месте.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct NavigationState {
    /// Агент стоит на NavMesh (можно строить путь)
    pub on_nav_mesh: bool,
    /// У агента есть активный путь
    pub has_path: bool,
    /// Фактическая скорость (для animation speed и шагов)
    pub velocity: Vec3,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            on_nav_mesh: true,
            has_path: false,
            velocity: Vec3::ZERO,
        }
    }
}

impl NavigationState {
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn is_moving(&self) -> bool {
        self.speed() > 0.0
    }
}

/// Производные параметры анимации (обновляются последними в тике)
///
/// Движок читает их для blend tree; ECS в анимацию не лезет.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LocomotionAnimation {
    pub speed: f32,
}
