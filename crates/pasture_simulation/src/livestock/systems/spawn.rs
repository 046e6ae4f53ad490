//! Spawn грейзеров и сцены пастбища.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, RigidBody, Velocity};
use rand::RngCore;

use crate::config::{GrazerConfig, PastureConfig};
use crate::livestock::components::{AnimationFlags, Grazer, Obstacle, Waypoints};
use crate::DeterministicRng;

/// Capsule коллайдер коровы (half height, radius)
const GRAZER_CAPSULE: (f32, f32) = (0.5, 0.4);

/// Сцена пастбища для Startup спавна
#[derive(Resource, Debug, Clone)]
pub struct PastureScene(pub PastureConfig);

/// Spawn одного грейзера со всеми коллабораторами
///
/// Dynamic body + capsule collider + animation flags. FSM стартует в Idle.
pub fn spawn_grazer(
    commands: &mut Commands,
    rng: &mut dyn RngCore,
    config: GrazerConfig,
    waypoints: Vec<Vec3>,
    position: Vec3,
) -> Entity {
    if let Err(err) = config.validate() {
        crate::logger::log_warning(&format!("Spawning grazer with invalid config: {}", err));
    }

    let grazer = Grazer::spawn(&config, waypoints.len(), rng);
    let (half_height, radius) = GRAZER_CAPSULE;

    let entity = commands
        .spawn((
            Name::new("Grazer"),
            grazer,
            config,
            Waypoints(waypoints),
            Transform::from_translation(position),
            RigidBody::Dynamic,
            Velocity::zero(),
            Collider::capsule_y(half_height, radius),
            AnimationFlags::default(),
        ))
        .id();

    crate::logger::log(&format!("🐄 Spawned grazer {:?} at {:?}", entity, position));
    entity
}

/// Spawn всей сцены: препятствия + по грейзеру на каждую spawn точку
pub fn spawn_pasture(commands: &mut Commands, rng: &mut dyn RngCore, scene: &PastureConfig) -> Vec<Entity> {
    for obstacle in &scene.obstacles {
        commands.spawn((
            Name::new("Obstacle"),
            Obstacle {
                radius: obstacle.radius,
            },
            Transform::from_translation(Vec3::from_array(obstacle.position)),
        ));
    }

    let waypoints = scene.waypoint_positions();

    scene
        .spawn_points
        .iter()
        .map(|point| {
            spawn_grazer(
                commands,
                rng,
                scene.grazer.clone(),
                waypoints.clone(),
                Vec3::from_array(*point),
            )
        })
        .collect()
}

/// Startup система: спавн PastureScene
pub fn spawn_pasture_scene(mut commands: Commands, mut rng: ResMut<DeterministicRng>, scene: Res<PastureScene>) {
    let herd = spawn_pasture(&mut commands, &mut rng.rng, &scene.0);

    crate::logger::log_info(&format!(
        "Pasture ready: {} grazers, {} waypoints, {} obstacles",
        herd.len(),
        scene.0.waypoints.len(),
        scene.0.obstacles.len()
    ));
}
