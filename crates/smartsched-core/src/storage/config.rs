//! TOML-based engine configuration.
//!
//! Stores:
//! - Request defaults (horizon, top K, awake window, task fallbacks)
//! - Scoring weights and step thresholds
//! - How undated scheduled tasks are projected
//!
//! Configuration is stored at `~/.config/smartsched/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};
use crate::schedule::TimeInterval;
use crate::scoring::ScoringConfig;

/// Longest horizon a request may ask for.
pub const MAX_HORIZON_DAYS: u32 = 366;

/// Values applied when a request leaves a field out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_awake_start")]
    pub awake_start: String, // HH:MM
    #[serde(default = "default_awake_end")]
    pub awake_end: String, // HH:MM
    /// Duration assumed for a task (or scheduled task) without one.
    #[serde(default = "default_task_minutes")]
    pub task_minutes: i64,
    /// Priority assumed for a task without one.
    #[serde(default = "default_task_priority")]
    pub task_priority: i64,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/smartsched/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Undated scheduled tasks block only today when true, every day otherwise.
    #[serde(default = "default_true")]
    pub undated_tasks_today_only: bool,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

// Default functions
fn default_horizon_days() -> u32 {
    7
}
fn default_top_k() -> usize {
    3
}
fn default_awake_start() -> String {
    "08:00".into()
}
fn default_awake_end() -> String {
    "22:00".into()
}
fn default_task_minutes() -> i64 {
    60
}
fn default_task_priority() -> i64 {
    3
}
fn default_true() -> bool {
    true
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            top_k: default_top_k(),
            awake_start: default_awake_start(),
            awake_end: default_awake_end(),
            task_minutes: default_task_minutes(),
            task_priority: default_task_priority(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig::default(),
            scoring: ScoringConfig::default(),
            undated_tasks_today_only: true,
        }
    }
}

impl DefaultsConfig {
    /// The configured awake window.
    ///
    /// # Errors
    /// Returns an error if either end is malformed or the range is empty.
    pub fn awake_window(&self) -> Result<TimeInterval, ValidationError> {
        TimeInterval::parse(&self.awake_start, &self.awake_end)
    }
}

impl EngineConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".into(),
        };
        let unparsable = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| unparsable(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| unparsable(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(unparsable(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| unparsable(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from `path`, or return defaults if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into())
            }
        };
        let cfg: EngineConfig = toml::from_str(&content).map_err(ConfigError::from)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from the default location.
    ///
    /// # Errors
    /// See [`EngineConfig::load_from`].
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// See [`EngineConfig::save_to`].
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The result must still validate.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the updated config is invalid. `self` is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: EngineConfig = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// # Errors
    /// Returns the first invalid default, weight or threshold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let d = &self.defaults;
        d.awake_window()?;
        if d.horizon_days > MAX_HORIZON_DAYS {
            return Err(ValidationError::invalid(
                "defaults.horizon_days",
                format!("must be at most {MAX_HORIZON_DAYS}"),
            ));
        }
        if d.top_k == 0 {
            return Err(ValidationError::invalid("defaults.top_k", "must be at least 1"));
        }
        if d.task_minutes <= 0 {
            return Err(ValidationError::invalid(
                "defaults.task_minutes",
                "must be positive",
            ));
        }
        if !(1..=5).contains(&d.task_priority) {
            return Err(ValidationError::invalid(
                "defaults.task_priority",
                "must be within 1..=5",
            ));
        }
        self.scoring.validate()
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default engine config");
            Self::default()
        })
    }
}
