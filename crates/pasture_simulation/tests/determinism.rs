//! Тесты детерминизма
//!
//! Симуляция пастбища с одинаковым seed даёт идентичные результаты

use bevy::prelude::*;
use pasture_simulation::{create_pasture_app, world_snapshot, DamageGrazer, Grazer, PastureConfig};

/// Запускает сцену и возвращает snapshot грейзеров + их Transform
fn run_simulation(seed: u64, tick_count: usize) -> Vec<u8> {
    let scene = PastureConfig {
        seed,
        ..Default::default()
    };
    let mut app = create_pasture_app(scene).expect("default scene is valid");

    for tick in 0..tick_count {
        app.update();

        // Пугаем первого грейзера посреди прогона
        if tick == tick_count / 2 {
            let world = app.world_mut();
            let mut query = world.query_filtered::<Entity, With<Grazer>>();
            let mut grazers: Vec<Entity> = query.iter(world).collect();
            grazers.sort_by_key(|entity| entity.index());
            if let Some(&target) = grazers.first() {
                world.send_event(DamageGrazer { target, amount: 10.0 });
            }
        }
    }

    let world = app.world_mut();
    let mut snapshot = world_snapshot::<Grazer>(world);
    snapshot.extend(world_snapshot::<Transform>(world));
    snapshot
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 1200;

    let snapshot1 = run_simulation(SEED, TICK_COUNT);
    let snapshot2 = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 600;

    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_different_seeds_diverge() {
    let snapshot1 = run_simulation(1, 600);
    let snapshot2 = run_simulation(2, 600);

    assert_ne!(snapshot1, snapshot2, "Разные seed дали одинаковую симуляцию");
}
