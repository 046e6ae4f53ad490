//! Конфигурация пастбища: параметры грейзера + scene файл (JSON)
//!
//! GrazerConfig задаётся один раз при спавне и дальше только читается.
//! PastureConfig описывает сцену для headless запуска: seed, точки спавна,
//! waypoints, препятствия.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Ошибки загрузки/валидации конфигурации
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid grazer config: {0}")]
    Invalid(String),
}

/// Что появляется на месте смерти (мясо, шкура, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct DropTemplate {
    pub name: String,
}

impl DropTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Параметры грейзера
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct GrazerConfig {
    /// Скорость шага (m/s)
    pub move_speed: f32,
    /// Скорость бега при испуге (m/s)
    pub run_speed: f32,
    /// Максимальная скорость поворота (градусы/сек)
    pub turn_rate_degrees: f32,
    pub max_health: f32,
    /// Диапазон времени в Idle (min, max), секунды
    pub idle_time_range: (f32, f32),
    /// Сколько секунд ест
    pub eat_duration: f32,
    /// Шанс (0-1) начать есть по прибытии к точке
    pub chance_to_eat: f32,
    /// Луч вперёд + уклонение на фиксированный yaw
    pub avoid_obstacles: bool,
    pub death_drop: Option<DropTemplate>,
}

impl Default for GrazerConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.5,
            run_speed: 5.0,
            turn_rate_degrees: 300.0,
            max_health: 100.0,
            idle_time_range: (3.0, 7.0),
            eat_duration: 4.0,
            chance_to_eat: 0.3,
            avoid_obstacles: true,
            death_drop: Some(DropTemplate::new("meat")),
        }
    }
}

impl GrazerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("move_speed", self.move_speed),
            ("run_speed", self.run_speed),
            ("turn_rate_degrees", self.turn_rate_degrees),
            ("eat_duration", self.eat_duration),
            ("idle_time_range.min", self.idle_time_range.0),
        ];

        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a finite non-negative number, got {}",
                    field, value
                )));
            }
        }

        if !self.max_health.is_finite() || self.max_health <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_health must be positive, got {}",
                self.max_health
            )));
        }

        let (min, max) = self.idle_time_range;
        if !max.is_finite() || max < min {
            return Err(ConfigError::Invalid(format!(
                "idle_time_range is inverted: ({}, {})",
                min, max
            )));
        }
        if !(max - min).is_finite() {
            return Err(ConfigError::Invalid(format!(
                "idle_time_range is too wide: ({}, {})",
                min, max
            )));
        }

        if !(0.0..=1.0).contains(&self.chance_to_eat) {
            return Err(ConfigError::Invalid(format!(
                "chance_to_eat must be within [0, 1], got {}",
                self.chance_to_eat
            )));
        }

        Ok(())
    }
}

/// Сферическое препятствие для obstacle probe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub position: [f32; 3],
    pub radius: f32,
}

/// Scene файл для headless запуска
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PastureConfig {
    pub seed: u64,
    /// Сколько fixed тиков прогнать
    pub ticks: u32,
    pub grazer: GrazerConfig,
    /// Один грейзер на каждую точку
    pub spawn_points: Vec<[f32; 3]>,
    pub waypoints: Vec<[f32; 3]>,
    pub obstacles: Vec<ObstacleSpec>,
}

impl Default for PastureConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 3600,
            grazer: GrazerConfig::default(),
            spawn_points: vec![[0.0, 0.0, 0.0], [4.0, 0.0, 2.0], [-3.0, 0.0, 5.0]],
            waypoints: vec![
                [10.0, 0.0, 0.0],
                [0.0, 0.0, 12.0],
                [-8.0, 0.0, -6.0],
                [6.0, 0.0, -10.0],
            ],
            obstacles: vec![ObstacleSpec {
                position: [5.0, 0.0, 5.0],
                radius: 1.0,
            }],
        }
    }
}

impl PastureConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&json).inspect_err(|err| {
            crate::logger::log_warning(&format!("Config {} rejected: {}", path.display(), err));
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grazer.validate()?;

        for obstacle in &self.obstacles {
            if !obstacle.radius.is_finite() || obstacle.radius <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "obstacle radius must be positive, got {}",
                    obstacle.radius
                )));
            }
        }

        Ok(())
    }

    pub fn waypoint_positions(&self) -> Vec<Vec3> {
        self.waypoints.iter().copied().map(Vec3::from_array).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grazer_config_default() {
        let config = GrazerConfig::default();
        assert_eq!(config.move_speed, 1.5);
        assert_eq!(config.run_speed, 5.0);
        assert_eq!(config.max_health, 100.0);
        assert_eq!(config.idle_time_range, (3.0, 7.0));
        assert_eq!(config.eat_duration, 4.0);
        assert_eq!(config.chance_to_eat, 0.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PastureConfig::from_json(
            r#"{ "seed": 7, "grazer": { "run_speed": 8.0, "death_drop": null } }"#,
        )
        .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.grazer.run_speed, 8.0);
        assert_eq!(config.grazer.move_speed, 1.5);
        assert!(config.grazer.death_drop.is_none());
        assert_eq!(config.waypoints.len(), 4);
    }

    #[test]
    fn test_inverted_idle_range_rejected() {
        let err = PastureConfig::from_json(r#"{ "grazer": { "idle_time_range": [5.0, 2.0] } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "err = {}", err);
    }

    #[test]
    fn test_overflowing_idle_range_rejected() {
        let err = PastureConfig::from_json(r#"{ "grazer": { "idle_time_range": [0.0, 3.4028235e38] } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "err = {}", err);

        let config = GrazerConfig {
            idle_time_range: (-0.0, f32::INFINITY),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_idle_min_rejected() {
        let config = GrazerConfig {
            idle_time_range: (f32::NAN, 3.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chance_to_eat_out_of_range_rejected() {
        let config = GrazerConfig {
            chance_to_eat: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_health_rejected() {
        let config = GrazerConfig {
            max_health: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = PastureConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PastureConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
