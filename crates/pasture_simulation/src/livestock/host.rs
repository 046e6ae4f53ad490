//! Capability интерфейсы host engine'а
//!
//! FSM грейзера не знает про Bevy/rapier: всё, что ей нужно от мира,
//! приходит через GrazerHost. ECS адаптер живёт в systems::fsm,
//! mock для тестов в brain_tests.
//!
//! Animator/PhysicsBody/ColliderToggle опциональны (Option), отсутствие
//! коллаборатора не ошибка, действие просто пропускается.

use bevy::prelude::*;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::DropTemplate;

/// Boolean параметры анимации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum AnimFlag {
    IsWalking,
    IsRunning,
    IsEating,
}

impl AnimFlag {
    pub const ALL: [AnimFlag; 3] = [AnimFlag::IsWalking, AnimFlag::IsRunning, AnimFlag::IsEating];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimFlag::IsWalking => "IsWalking",
            AnimFlag::IsRunning => "IsRunning",
            AnimFlag::IsEating => "IsEating",
        }
    }
}

/// One-shot триггеры анимации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum AnimTrigger {
    TakeDamage,
    Die,
}

impl AnimTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimTrigger::TakeDamage => "TakeDamage",
            AnimTrigger::Die => "Die",
        }
    }
}

pub trait Animator {
    fn set_flag(&mut self, flag: AnimFlag, value: bool);
    fn trigger(&mut self, trigger: AnimTrigger);
}

pub trait PhysicsBody {
    /// Обнулить скорость
    fn halt(&mut self);
    fn set_kinematic(&mut self, kinematic: bool);
}

pub trait ColliderToggle {
    fn set_enabled(&mut self, enabled: bool);
}

pub trait Spawner {
    /// Спавн death-drop объекта в мировой позиции
    fn spawn_drop(&mut self, template: &DropTemplate, position: Vec3);
    /// Удалить самого грейзера через `delay` секунд
    fn schedule_removal(&mut self, delay: f32);
}

/// Всё, что FSM видит от мира за один вызов
pub trait GrazerHost {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
    /// Сдвиг позиции (прямая интеграция, не через velocity)
    fn advance(&mut self, delta: Vec3);

    fn animator(&mut self) -> Option<&mut dyn Animator>;
    fn body(&mut self) -> Option<&mut dyn PhysicsBody>;
    fn collider(&mut self) -> Option<&mut dyn ColliderToggle>;
    fn spawner(&mut self) -> &mut dyn Spawner;

    /// Короткий луч из `origin` вдоль `direction`; true если что-то ближе `max_distance`
    fn obstacle_ahead(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> bool {
        false
    }

    fn rng(&mut self) -> &mut dyn RngCore;
}
