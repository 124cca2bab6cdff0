//! Мир глазами симуляции: ground probe, layer masks, safe zones
//!
//! Raycast живёт в движке. ECS видит его через GroundProbe trait,
//! который лежит в resource Terrain (headless → FlatGround).

use bevy::prelude::*;

/// Bitmask слоёв коллизий (как в движке)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const GROUND: LayerMask = LayerMask(1 << 0);
    pub const PLAYER: LayerMask = LayerMask(1 << 1);
    pub const ENEMY: LayerMask = LayerMask(1 << 2);

    pub fn contains(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

/// Проба "есть ли земля под точкой"
///
/// Используется для валидации walk point и детекта приземления после ragdoll.
pub trait GroundProbe: Send + Sync {
    /// Луч вниз из `point` длиной `max_distance` попадает в слой из `layers`
    fn is_ground_below(&self, point: Vec3, max_distance: f32, layers: LayerMask) -> bool;
}

/// Бесконечная плоскость на высоте `height`
#[derive(Debug, Clone, Copy)]
pub struct FlatGround {
    pub height: f32,
}

impl Default for FlatGround {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

impl GroundProbe for FlatGround {
    fn is_ground_below(&self, point: Vec3, max_distance: f32, layers: LayerMask) -> bool {
        if !layers.contains(LayerMask::GROUND) {
            return false;
        }
        let drop = point.y - self.height;
        drop >= 0.0 && drop <= max_distance
    }
}

/// Resource: ground probe текущего мира
#[derive(Resource)]
pub struct Terrain(pub Box<dyn GroundProbe>);

impl Default for Terrain {
    fn default() -> Self {
        Self(Box::new(FlatGround::default()))
    }
}

impl Terrain {
    pub fn new(probe: impl GroundProbe + 'static) -> Self {
        Self(Box::new(probe))
    }

    pub fn probe(&self) -> &dyn GroundProbe {
        self.0.as_ref()
    }
}

/// Точка возврата игрока при падении за пределы мира
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct SafeZone;
