//! Pasture Simulation Core
//!
//! ECS-симуляция пастбища на Bevy 0.16 (headless).
//!
//! Слои:
//! - livestock: FSM грейзера (Idle/Walking/Eating/Running/Dead) + ECS адаптер
//! - config: GrazerConfig + scene файл
//! - logger: глобальный leveled logger

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod config;
pub mod livestock;
pub mod logger;

// Re-export базовых типов для удобства
pub use config::{ConfigError, DropTemplate, GrazerConfig, PastureConfig};
pub use livestock::{
    spawn_grazer, spawn_pasture, AnimFlag, AnimTrigger, AnimationFlags, DamageGrazer, DamageOutcome, DeathDrop,
    DespawnAfter, Grazer, GrazerDied, GrazerState, GrazerStateChanged, LivestockPlugin, Obstacle, PastureScene,
    Tethered, Waypoints,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};

/// Частота симуляции (FixedUpdate)
pub const TICK_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed из create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .add_plugins(LivestockPlugin);
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
/// Время идёт вручную: каждый `app.update()` = ровно один fixed tick
/// (первый update только выставляет baseline).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / TICK_HZ)));

    app
}

/// Headless App со сценой пастбища (спавн в Startup)
///
/// Сцена валидируется до спавна, в том числе собранная в коде.
pub fn create_pasture_app(scene: PastureConfig) -> Result<App, ConfigError> {
    scene.validate()?;

    let mut app = create_headless_app(scene.seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(PastureScene(scene))
        .add_systems(Startup, livestock::systems::spawn_pasture_scene);

    Ok(app)
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
