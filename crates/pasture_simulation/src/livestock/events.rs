//! Livestock events
//!
//! DamageGrazer: вход (снаряд/хищник наносит урон).
//! GrazerStateChanged / GrazerDied: выход для UI, звуков, эффектов.

use bevy::prelude::*;

use crate::livestock::components::GrazerState;

/// Нанести урон грейзеру (ECS форма `Grazer::take_damage`)
#[derive(Event, Debug, Clone)]
pub struct DamageGrazer {
    pub target: Entity,
    pub amount: f32,
}

/// Грейзер сменил состояние
#[derive(Event, Debug, Clone, PartialEq)]
pub struct GrazerStateChanged {
    pub entity: Entity,
    pub from: GrazerState,
    pub to: GrazerState,
}

/// Грейзер умер (health == 0)
#[derive(Event, Debug, Clone)]
pub struct GrazerDied {
    pub entity: Entity,
    pub position: Vec3,
}
