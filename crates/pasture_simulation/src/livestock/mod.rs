//! Livestock module: FSM грейзера (корова на пастбище)
//!
//! Idle → Walking → Eating → Idle, Running при уроне, Dead терминальное.
//!
//! Слои:
//! - brain: чистая FSM, мир только через host::GrazerHost
//! - systems: ECS адаптер (Transform, rapier body/collider, AnimationFlags, Commands)

use bevy::prelude::*;

pub mod brain;
pub mod components;
pub mod events;
pub mod host;
pub mod systems;


// Re-export основных типов
pub use brain::DamageOutcome;
pub use components::*;
pub use events::{DamageGrazer, GrazerDied, GrazerStateChanged};
pub use host::{AnimFlag, AnimTrigger, GrazerHost};
pub use systems::{spawn_grazer, spawn_pasture, PastureScene};

/// Livestock Plugin
///
/// Регистрирует системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. apply_grazer_damage: DamageGrazer → Running/Dead
/// 2. tick_grazers: одна оценка FSM на грейзера
/// 3. despawn_after_timeout: уборка мёртвых через DESPAWN_DELAY_SECS
pub struct LivestockPlugin;

impl Plugin for LivestockPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageGrazer>()
            .add_event::<GrazerStateChanged>()
            .add_event::<GrazerDied>()
            .register_type::<Grazer>()
            .register_type::<AnimationFlags>()
            .register_type::<Waypoints>()
            .register_type::<crate::config::GrazerConfig>();

        app.add_systems(
            FixedUpdate,
            (
                systems::apply_grazer_damage,
                systems::tick_grazers,
                systems::despawn_after_timeout,
            )
                .chain(), // Последовательное выполнение для детерминизма
        );
    }
}
