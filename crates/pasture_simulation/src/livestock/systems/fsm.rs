//! Grazer FSM systems (damage application, per-tick evaluation) + ECS host adapter.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, ColliderDisabled, RigidBody, Velocity};
use rand::RngCore;
use rand_chacha::ChaCha8Rng;

use crate::config::{DropTemplate, GrazerConfig};
use crate::livestock::components::{
    ray_hits_sphere, AnimationFlags, DeathDrop, DespawnAfter, Grazer, GrazerState, Obstacle, Tethered, Waypoints,
};
use crate::livestock::events::{DamageGrazer, GrazerDied, GrazerStateChanged};
use crate::livestock::host::{Animator, ColliderToggle, GrazerHost, PhysicsBody, Spawner};
use crate::DeterministicRng;

/// Всё, что нужно FSM от entity грейзера
type GrazerQueryData = (
    Entity,
    &'static mut Grazer,
    &'static GrazerConfig,
    Option<&'static Waypoints>,
    &'static mut Transform,
    Option<&'static mut Velocity>,
    Option<&'static mut RigidBody>,
    Option<&'static mut AnimationFlags>,
    Has<Collider>,
    Has<Tethered>,
);

/// Rapier body: Velocity + RigidBody (оба опциональны)
pub struct RapierBody<'a> {
    pub velocity: Option<&'a mut Velocity>,
    pub rigid_body: Option<&'a mut RigidBody>,
}

impl RapierBody<'_> {
    fn is_present(&self) -> bool {
        self.velocity.is_some() || self.rigid_body.is_some()
    }
}

impl PhysicsBody for RapierBody<'_> {
    fn halt(&mut self) {
        if let Some(velocity) = self.velocity.as_deref_mut() {
            *velocity = Velocity::zero();
        }
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        if let Some(rigid_body) = self.rigid_body.as_deref_mut() {
            *rigid_body = if kinematic {
                RigidBody::KinematicPositionBased
            } else {
                RigidBody::Dynamic
            };
        }
    }
}

/// GrazerHost поверх компонентов одной entity
///
/// Коллайдер и спавн/деспавн идут через Commands (применяются после системы).
pub struct EcsHost<'a, 'w, 's> {
    pub entity: Entity,
    pub transform: &'a mut Transform,
    pub body: RapierBody<'a>,
    pub animation: Option<&'a mut AnimationFlags>,
    pub has_collider: bool,
    pub tethered: bool,
    /// (center, radius) сфер-препятствий
    pub obstacles: &'a [(Vec3, f32)],
    pub commands: &'a mut Commands<'w, 's>,
    pub rng: &'a mut ChaCha8Rng,
    /// Текущее время симуляции (секунды), для DespawnAfter
    pub now: f32,
}

impl ColliderToggle for EcsHost<'_, '_, '_> {
    fn set_enabled(&mut self, enabled: bool) {
        let mut entity = self.commands.entity(self.entity);
        if enabled {
            entity.remove::<ColliderDisabled>();
        } else {
            entity.insert(ColliderDisabled);
        }
    }
}

impl Spawner for EcsHost<'_, '_, '_> {
    fn spawn_drop(&mut self, template: &DropTemplate, position: Vec3) {
        let drop = self
            .commands
            .spawn((
                DeathDrop {
                    name: template.name.clone(),
                },
                Transform::from_translation(position),
            ))
            .id();
        crate::logger::log(&format!("🥩 Spawned drop '{}' {:?} at {:?}", template.name, drop, position));
    }

    fn schedule_removal(&mut self, delay: f32) {
        self.commands.entity(self.entity).insert(DespawnAfter {
            despawn_time: self.now + delay,
        });
    }
}

impl GrazerHost for EcsHost<'_, '_, '_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    fn advance(&mut self, delta: Vec3) {
        if !self.tethered {
            self.transform.translation += delta;
        }
    }

    fn animator(&mut self) -> Option<&mut dyn Animator> {
        self.animation.as_deref_mut().map(|flags| flags as &mut dyn Animator)
    }

    fn body(&mut self) -> Option<&mut dyn PhysicsBody> {
        if self.body.is_present() {
            Some(&mut self.body)
        } else {
            None
        }
    }

    fn collider(&mut self) -> Option<&mut dyn ColliderToggle> {
        if self.has_collider {
            Some(self)
        } else {
            None
        }
    }

    fn spawner(&mut self) -> &mut dyn Spawner {
        self
    }

    fn obstacle_ahead(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
        self.obstacles
            .iter()
            .any(|&(center, radius)| ray_hits_sphere(origin, direction, max_distance, center, radius))
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }
}

/// Система: применение DamageGrazer событий
///
/// Выполняется до tick_grazers в том же fixed step.
pub fn apply_grazer_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageGrazer>,
    mut grazers: Query<GrazerQueryData>,
    mut rng: ResMut<DeterministicRng>,
    mut state_events: EventWriter<GrazerStateChanged>,
    mut died_events: EventWriter<GrazerDied>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for event in damage_events.read() {
        let Ok((entity, mut grazer, config, waypoints, mut transform, mut velocity, mut rigid_body, mut animation, has_collider, tethered)) =
            grazers.get_mut(event.target)
        else {
            crate::logger::log_warning(&format!("DamageGrazer: {:?} is not a grazer", event.target));
            continue;
        };

        let waypoints = waypoints.map(Waypoints::as_slice).unwrap_or(&[]);
        let before = grazer.state();

        let mut host = EcsHost {
            entity,
            transform: &mut transform,
            body: RapierBody {
                velocity: velocity.as_deref_mut(),
                rigid_body: rigid_body.as_deref_mut(),
            },
            animation: animation.as_deref_mut(),
            has_collider,
            tethered,
            obstacles: &[],
            commands: &mut commands,
            rng: &mut rng.rng,
            now,
        };

        let outcome = grazer.take_damage(event.amount, config, waypoints, &mut host);
        let position = host.position();

        crate::logger::log(&format!(
            "💥 Grazer {:?} took {} damage → {:?} (hp {})",
            entity,
            event.amount,
            outcome,
            grazer.health().current
        ));

        report_transition(entity, before, grazer.state(), position, &mut state_events, &mut died_events);
    }
}

/// Система: одна оценка FSM для каждого грейзера за fixed step
pub fn tick_grazers(
    mut commands: Commands,
    mut grazers: Query<GrazerQueryData>,
    obstacles: Query<(&Transform, &Obstacle), Without<Grazer>>,
    mut rng: ResMut<DeterministicRng>,
    mut state_events: EventWriter<GrazerStateChanged>,
    mut died_events: EventWriter<GrazerDied>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs();

    let obstacle_spheres: Vec<(Vec3, f32)> = obstacles
        .iter()
        .map(|(transform, obstacle)| (transform.translation, obstacle.radius))
        .collect();

    for (entity, mut grazer, config, waypoints, mut transform, mut velocity, mut rigid_body, mut animation, has_collider, tethered) in
        grazers.iter_mut()
    {
        if grazer.is_dead() {
            continue;
        }

        let waypoints = waypoints.map(Waypoints::as_slice).unwrap_or(&[]);
        let before = grazer.state();

        let mut host = EcsHost {
            entity,
            transform: &mut transform,
            body: RapierBody {
                velocity: velocity.as_deref_mut(),
                rigid_body: rigid_body.as_deref_mut(),
            },
            animation: animation.as_deref_mut(),
            has_collider,
            tethered,
            obstacles: &obstacle_spheres,
            commands: &mut commands,
            rng: &mut rng.rng,
            now,
        };

        grazer.tick(delta, config, waypoints, &mut host);
        let position = host.position();

        report_transition(entity, before, grazer.state(), position, &mut state_events, &mut died_events);
    }
}

fn report_transition(
    entity: Entity,
    from: GrazerState,
    to: GrazerState,
    position: Vec3,
    state_events: &mut EventWriter<GrazerStateChanged>,
    died_events: &mut EventWriter<GrazerDied>,
) {
    if from == to {
        return;
    }

    state_events.write(GrazerStateChanged { entity, from, to });

    if to == GrazerState::Dead {
        died_events.write(GrazerDied { entity, position });
    }
}
