//! ECS Components общие для всех доменов
//!
//! Организация:
//! - actor: здоровье, ссылка на цель, маркер босса
//! - movement: NavMesh канал (MovementCommand, NavigationState), animation speed
//! - world: ground probe, layer masks, safe zones

pub mod actor;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use world::*;
