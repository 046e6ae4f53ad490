//! Grazer FSM components (state, health, waypoints, animation flags, obstacles).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::livestock::host::{AnimFlag, AnimTrigger, Animator};

/// Состояния грейзера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum GrazerState {
    /// Стоит, ждёт таймер
    #[default]
    Idle,
    /// Идёт к waypoint (move_speed)
    Walking,
    /// Ест на месте, eat_duration
    Eating,
    /// Убегает к waypoint после урона (run_speed)
    Running,
    /// Терминальное состояние, дальше только деспавн
    Dead,
}

/// Здоровье грейзера
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Отрицательный/NaN урон игнорируется (health не растёт через урон)
    pub fn take_damage(&mut self, amount: f32) {
        let amount = amount.max(0.0);
        self.current = (self.current - amount).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }
}

/// Живое состояние одного грейзера (FSM + health)
///
/// Меняется только через методы в `livestock::brain`.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Grazer {
    pub(crate) state: GrazerState,
    pub(crate) health: Health,
    /// Countdown для Idle и Eating
    pub(crate) state_timer: f32,
    /// None если waypoints пустые
    pub(crate) target_waypoint: Option<usize>,
}

impl Grazer {
    pub fn state(&self) -> GrazerState {
        self.state
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn state_timer(&self) -> f32 {
        self.state_timer
    }

    pub fn target_waypoint(&self) -> Option<usize> {
        self.target_waypoint
    }

    pub fn is_dead(&self) -> bool {
        self.state == GrazerState::Dead
    }
}

/// Фиксированная последовательность точек маршрута (не меняется после спавна)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Waypoints(pub Vec<Vec3>);

impl Waypoints {
    pub fn as_slice(&self) -> &[Vec3] {
        &self.0
    }
}

/// Параметры анимации для host animation layer
///
/// Bool флаги читаются каждый кадр, триггеры забираются через `take_triggers`.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationFlags {
    pub is_walking: bool,
    pub is_running: bool,
    pub is_eating: bool,
    pub pending_triggers: Vec<AnimTrigger>,
}

impl AnimationFlags {
    pub fn get(&self, flag: AnimFlag) -> bool {
        match flag {
            AnimFlag::IsWalking => self.is_walking,
            AnimFlag::IsRunning => self.is_running,
            AnimFlag::IsEating => self.is_eating,
        }
    }

    pub fn take_triggers(&mut self) -> Vec<AnimTrigger> {
        std::mem::take(&mut self.pending_triggers)
    }
}

impl Animator for AnimationFlags {
    fn set_flag(&mut self, flag: AnimFlag, value: bool) {
        match flag {
            AnimFlag::IsWalking => self.is_walking = value,
            AnimFlag::IsRunning => self.is_running = value,
            AnimFlag::IsEating => self.is_eating = value,
        }
    }

    fn trigger(&mut self, trigger: AnimTrigger) {
        self.pending_triggers.push(trigger);
    }
}

/// Сферическое препятствие (для obstacle probe грейзеров)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Obstacle {
    pub radius: f32,
}

/// Пересекает ли луч (origin, direction) сферу ближе `max_distance`
///
/// `direction` ожидается нормализованным. Origin внутри сферы считается hit.
pub fn ray_hits_sphere(origin: Vec3, direction: Vec3, max_distance: f32, center: Vec3, radius: f32) -> bool {
    let to_center = center - origin;
    let radius_sq = radius * radius;
    let distance_sq = to_center.length_squared();

    if distance_sq <= radius_sq {
        return true;
    }

    let along = to_center.dot(direction);
    if along < 0.0 {
        return false;
    }

    let closest_sq = distance_sq - along * along;
    if closest_sq > radius_sq {
        return false;
    }

    let entry = along - (radius_sq - closest_sq).sqrt();
    entry <= max_distance
}

/// Death-drop объект (мясо), спавнится при смерти грейзера
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DeathDrop {
    pub name: String,
}

/// Маркер: грейзер поворачивается, но не двигается вперёд
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Tethered;

/// Компонент-маркер: деспавн entity после указанного времени
///
/// Система `despawn_after_timeout` проверяет время и удаляет entity.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах от старта симуляции)
    pub despawn_time: f32,
}
