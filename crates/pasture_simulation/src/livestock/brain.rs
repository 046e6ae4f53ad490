//! Grazer FSM
//!
//! Idle → Walking → (Eating | Idle) → ..., Running после урона, Dead терминальное.
//!
//! Архитектура:
//! - Одна оценка FSM на fixed step (`tick`)
//! - Entry actions собраны в `switch_state` (один match arm на состояние)
//! - Смерть идёт мимо transition guard'а (`die`), поэтому entry actions Dead
//!   выполняются ровно один раз
//! - Мир доступен только через `GrazerHost`

use bevy::prelude::*;
use rand::{Rng, RngCore};

use crate::config::GrazerConfig;
use crate::livestock::components::{Grazer, GrazerState, Health};
use crate::livestock::host::{AnimFlag, AnimTrigger, GrazerHost};

/// Дистанция "дошли" для Walking (метры)
pub const WALK_ARRIVAL_DISTANCE: f32 = 1.5;
/// Дистанция "добежали" для Running (метры)
pub const RUN_ARRIVAL_DISTANCE: f32 = 2.0;
/// Через сколько секунд после смерти entity удаляется
pub const DESPAWN_DELAY_SECS: f32 = 5.0;
/// Death-drop спавнится чуть выше позиции грейзера
pub const DROP_HEIGHT: f32 = 0.5;
/// Длина луча obstacle probe
pub const OBSTACLE_PROBE_DISTANCE: f32 = 4.0;
/// Yaw bias при hit'е probe (уводит вправо от препятствия)
pub const AVOIDANCE_YAW_DEGREES: f32 = 75.0;

/// Результат `take_damage`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Уже мёртв, урон проигнорирован
    Ignored,
    /// Выжил → Running
    Fled,
    /// Health дошёл до 0 → Dead
    Killed,
}

impl Grazer {
    /// Новый грейзер: Idle, полное здоровье, случайный idle таймер, первый waypoint
    pub fn spawn(config: &GrazerConfig, waypoint_count: usize, rng: &mut dyn RngCore) -> Self {
        let mut grazer = Self {
            state: GrazerState::Idle,
            health: Health::new(config.max_health),
            state_timer: sample_idle_time(config, rng),
            target_waypoint: None,
        };
        grazer.select_new_waypoint(waypoint_count, rng);
        grazer
    }

    /// Одна оценка FSM за `dt` секунд
    pub fn tick(&mut self, dt: f32, config: &GrazerConfig, waypoints: &[Vec3], host: &mut dyn GrazerHost) {
        match self.state {
            GrazerState::Dead => {}

            GrazerState::Idle => {
                self.state_timer -= dt;
                if self.state_timer <= 0.0 {
                    self.switch_state(GrazerState::Walking, config, waypoints, host);
                }
            }

            GrazerState::Eating => {
                self.state_timer -= dt;
                if self.state_timer <= 0.0 {
                    self.switch_state(GrazerState::Idle, config, waypoints, host);
                }
            }

            GrazerState::Walking => {
                if self.travel(dt, config.move_speed, WALK_ARRIVAL_DISTANCE, config, waypoints, host) {
                    // Дошли: поесть или просто постоять
                    let next = if host.rng().gen::<f32>() < config.chance_to_eat {
                        GrazerState::Eating
                    } else {
                        GrazerState::Idle
                    };
                    self.switch_state(next, config, waypoints, host);
                }
            }

            GrazerState::Running => {
                if self.travel(dt, config.run_speed, RUN_ARRIVAL_DISTANCE, config, waypoints, host) {
                    self.switch_state(GrazerState::Idle, config, waypoints, host);
                }
            }
        }
    }

    /// Переход в `next` с entry actions
    ///
    /// No-op (false) если `next` совпадает с текущим состоянием или грейзер мёртв.
    pub fn switch_state(
        &mut self,
        next: GrazerState,
        config: &GrazerConfig,
        waypoints: &[Vec3],
        host: &mut dyn GrazerHost,
    ) -> bool {
        if self.state == next || self.state == GrazerState::Dead {
            return false;
        }

        if next == GrazerState::Dead {
            self.die(config, host);
            return true;
        }

        let previous = self.state;
        self.state = next;
        clear_flags(host);

        match next {
            GrazerState::Idle => {
                halt(host);
                self.state_timer = sample_idle_time(config, host.rng());
            }
            GrazerState::Walking => {
                set_flag(host, AnimFlag::IsWalking);
                self.select_new_waypoint(waypoints.len(), host.rng());
            }
            GrazerState::Eating => {
                halt(host);
                set_flag(host, AnimFlag::IsEating);
                self.state_timer = config.eat_duration;
            }
            GrazerState::Running => {
                set_flag(host, AnimFlag::IsRunning);
                // Убегаем к новой точке
                self.select_new_waypoint(waypoints.len(), host.rng());
            }
            // Обработано в die()
            GrazerState::Dead => {}
        }

        crate::logger::log(&format!("Grazer: {:?} → {:?}", previous, next));
        true
    }

    /// Публичная точка входа для урона (снаряды, хищники)
    pub fn take_damage(
        &mut self,
        amount: f32,
        config: &GrazerConfig,
        waypoints: &[Vec3],
        host: &mut dyn GrazerHost,
    ) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }

        self.health.take_damage(amount);

        if let Some(animator) = host.animator() {
            animator.trigger(AnimTrigger::TakeDamage);
        }

        if self.health.is_alive() {
            self.switch_state(GrazerState::Running, config, waypoints, host);
            DamageOutcome::Fled
        } else {
            self.die(config, host);
            DamageOutcome::Killed
        }
    }

    /// Терминальный переход: state выставляется напрямую, без guard'а
    fn die(&mut self, config: &GrazerConfig, host: &mut dyn GrazerHost) {
        self.state = GrazerState::Dead;
        clear_flags(host);

        if let Some(animator) = host.animator() {
            animator.trigger(AnimTrigger::Die);
        }

        // Мёртвый грейзер не реагирует на физику
        if let Some(body) = host.body() {
            body.halt();
            body.set_kinematic(true);
        }

        if let Some(collider) = host.collider() {
            collider.set_enabled(false);
        }

        let drop_position = host.position() + Vec3::Y * DROP_HEIGHT;
        let spawner = host.spawner();
        if let Some(template) = &config.death_drop {
            spawner.spawn_drop(template, drop_position);
        }
        spawner.schedule_removal(DESPAWN_DELAY_SECS);

        crate::logger::log_info(&format!(
            "☠️ Grazer died at {:?} (drop: {:?})",
            drop_position,
            config.death_drop.as_ref().map(|template| template.name.as_str())
        ));
    }

    /// Случайный waypoint без немедленного повтора текущего
    pub fn select_new_waypoint(&mut self, waypoint_count: usize, rng: &mut dyn RngCore) {
        if waypoint_count == 0 {
            return;
        }

        let draw = rng.gen_range(0..waypoint_count);
        self.target_waypoint = Some(pick_waypoint(draw, self.target_waypoint, waypoint_count));
    }

    /// Двигаемся к текущему waypoint; true если дошли ближе `arrival_distance`
    ///
    /// Нет waypoint'а → сразу Idle.
    fn travel(
        &mut self,
        dt: f32,
        speed: f32,
        arrival_distance: f32,
        config: &GrazerConfig,
        waypoints: &[Vec3],
        host: &mut dyn GrazerHost,
    ) -> bool {
        let Some(waypoint) = self.target_waypoint.and_then(|index| waypoints.get(index)).copied() else {
            self.switch_state(GrazerState::Idle, config, waypoints, host);
            return false;
        };

        // Высота цели игнорируется (идём по своей высоте)
        let target = Vec3::new(waypoint.x, host.position().y, waypoint.z);
        move_and_rotate(target, speed, dt, config, host);

        host.position().distance(target) < arrival_distance
    }
}

/// Повтор текущего индекса сдвигается на следующий (циклически)
///
/// Защищает только от немедленного повтора, не от повтора через шаг.
pub fn pick_waypoint(draw: usize, current: Option<usize>, waypoint_count: usize) -> usize {
    if waypoint_count > 1 && current == Some(draw) {
        (draw + 1) % waypoint_count
    } else {
        draw
    }
}

/// Равномерно из [min, max)
///
/// Вырожденный диапазон → min. Битый диапазон (NaN, inverted, переполнение
/// ширины) бывает только у невалидированного конфига: warning + безопасный fallback.
pub fn sample_idle_time(config: &GrazerConfig, rng: &mut dyn RngCore) -> f32 {
    let (min, max) = config.idle_time_range;
    let span = max - min;

    if min.is_finite() && span.is_finite() && span >= 0.0 {
        let sample = min + rng.gen::<f32>() * span;
        return sample.min(max);
    }

    let fallback = if min.is_finite() { min.max(0.0) } else { 0.0 };
    crate::logger::log_warning(&format!(
        "Invalid idle_time_range ({}, {}), idling for {}s",
        min, max, fallback
    ));
    fallback
}

/// Поворот (yaw-only), при котором forward (-Z) смотрит вдоль `direction`
pub fn facing_rotation(direction: Vec3) -> Quat {
    Quat::from_rotation_y(f32::atan2(-direction.x, -direction.z))
}

/// Поворот от `from` к `to` не больше чем на `max_angle` радиан
pub fn rotate_towards(from: Quat, to: Quat, max_angle: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle <= max_angle || angle <= f32::EPSILON {
        to
    } else {
        from.slerp(to, max_angle / angle)
    }
}

/// Поворот к цели с ограничением turn rate, затем шаг вдоль текущего forward
fn move_and_rotate(target: Vec3, speed: f32, dt: f32, config: &GrazerConfig, host: &mut dyn GrazerHost) {
    let position = host.position();
    let direction = (target - position).normalize_or_zero();

    if direction != Vec3::ZERO {
        let forward = host.rotation() * Vec3::NEG_Z;
        let mut facing = facing_rotation(direction);

        if config.avoid_obstacles && host.obstacle_ahead(position, forward, OBSTACLE_PROBE_DISTANCE) {
            facing *= Quat::from_rotation_y(-AVOIDANCE_YAW_DEGREES.to_radians());
        }

        let max_step = config.turn_rate_degrees.to_radians() * dt;
        let rotation = rotate_towards(host.rotation(), facing, max_step);
        host.set_rotation(rotation);
    }

    let forward = host.rotation() * Vec3::NEG_Z;
    host.advance(forward * speed * dt);
}

fn clear_flags(host: &mut dyn GrazerHost) {
    if let Some(animator) = host.animator() {
        for flag in AnimFlag::ALL {
            animator.set_flag(flag, false);
        }
    }
}

fn set_flag(host: &mut dyn GrazerHost, flag: AnimFlag) {
    if let Some(animator) = host.animator() {
        animator.set_flag(flag, true);
    }
}

fn halt(host: &mut dyn GrazerHost) {
    if let Some(body) = host.body() {
        body.halt();
    }
}
