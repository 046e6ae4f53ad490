//! Headless симуляция пастбища
//!
//! `pasture_simulation [scene.json]`: без аргумента берётся сцена по умолчанию.

use pasture_simulation::{create_pasture_app, log_error, Grazer, GrazerState, PastureConfig};

fn main() {
    pasture_simulation::init_logger();

    let scene = match std::env::args().nth(1) {
        Some(path) => match PastureConfig::load(&path) {
            Ok(scene) => scene,
            Err(err) => {
                log_error(&format!("Cannot start pasture: {}", err));
                std::process::exit(1);
            }
        },
        None => PastureConfig::default(),
    };

    let ticks = scene.ticks;
    println!("Starting pasture simulation (seed: {}, ticks: {})", scene.seed, ticks);

    let mut app = match create_pasture_app(scene) {
        Ok(app) => app,
        Err(err) => {
            log_error(&format!("Cannot start pasture: {}", err));
            std::process::exit(1);
        }
    };

    for tick in 0..ticks {
        app.update();

        if tick % 600 == 0 {
            let world = app.world_mut();
            let mut query = world.query::<&Grazer>();
            let mut counts = [0usize; 5];
            for grazer in query.iter(world) {
                let slot = match grazer.state() {
                    GrazerState::Idle => 0,
                    GrazerState::Walking => 1,
                    GrazerState::Eating => 2,
                    GrazerState::Running => 3,
                    GrazerState::Dead => 4,
                };
                counts[slot] += 1;
            }
            println!(
                "Tick {}: idle {} / walking {} / eating {} / running {} / dead {}",
                tick, counts[0], counts[1], counts[2], counts[3], counts[4]
            );
        }
    }

    println!("Simulation complete!");
}
