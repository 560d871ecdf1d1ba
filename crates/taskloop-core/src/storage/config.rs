//! TOML configuration stored at `~/.config/taskloop/config.toml`.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classifier::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::ConfigError;
use crate::tracker::{QualifyPolicy, TrackerConfig};

use super::data_dir;

fn default_points_per_completion() -> u64 {
    10
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_username() -> String {
    "default".to_string()
}

/// Points awarded by the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsConfig {
    /// Points granted for each task completion.
    #[serde(default = "default_points_per_completion")]
    pub per_completion: u64,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            per_completion: default_points_per_completion(),
        }
    }
}

/// Streak behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Which completions advance the daily streak.
    #[serde(default)]
    pub qualify: QualifyPolicy,
}

/// Special-badge classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Whether completions are sent to the classifier at all.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound on a single classification round trip.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Active profile selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Username all store operations are keyed by.
    #[serde(default = "default_username")]
    pub username: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub points: PointsConfig,
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

impl Config {
    /// Path to the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::PathFailed(e.to_string()))?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, writing the defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Save the configuration to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load the configuration, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("failed to load config, using defaults: {e}");
            Self::default()
        })
    }

    /// The tracker settings derived from this configuration.
    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig {
            points_per_completion: self.points.per_completion,
            qualify: self.streak.qualify,
            classifier_timeout_secs: self.classifier.timeout_secs,
        }
    }

    /// Read a value by dot-separated key, e.g. `classifier.model`.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value =
            serde_json::to_value(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let found = get_json_value_by_path(&value, key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        Ok(match found {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Update a value by dot-separated key, coercing `raw` to the field's type.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let mut value =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let slot = get_json_value_by_path_mut(&mut value, key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        *slot = coerce(slot, key, raw)?;
        let candidate: Self =
            serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        crate::profile::validate_username(&self.profile.username).map_err(|e| {
            ConfigError::InvalidValue {
                key: "profile.username".to_string(),
                message: e.to_string(),
            }
        })
    }
}

fn get_json_value_by_path<'a>(
    value: &'a serde_json::Value,
    path: &str,
) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn get_json_value_by_path_mut<'a>(
    value: &'a mut serde_json::Value,
    path: &str,
) -> Option<&'a mut serde_json::Value> {
    let mut current = value;
    for part in path.split('.') {
        current = current.get_mut(part)?;
    }
    Some(current)
}

fn coerce(
    existing: &serde_json::Value,
    key: &str,
    raw: &str,
) -> Result<serde_json::Value, ConfigError> {
    match existing {
        serde_json::Value::Bool(_) => raw
            .parse::<bool>()
            .map(serde_json::Value::Bool)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("expected true or false, got '{raw}'"),
            }),
        serde_json::Value::Number(_) => raw
            .parse::<u64>()
            .map(|n| serde_json::Value::Number(n.into()))
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("expected a number, got '{raw}'"),
            }),
        serde_json::Value::String(_) => Ok(serde_json::Value::String(raw.to_string())),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "key does not hold a settable value".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.points.per_completion, 10);
        assert_eq!(config.streak.qualify, QualifyPolicy::AnyCompletion);
        assert!(!config.classifier.enabled);
        assert_eq!(config.classifier.model, DEFAULT_MODEL);
        assert_eq!(config.classifier.timeout_secs, 5);
        assert_eq!(config.profile.username, "default");
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.points.per_completion, config.points.per_completion);
        assert_eq!(parsed.classifier.model, config.classifier.model);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("[points]\nper_completion = 25\n").unwrap();
        assert_eq!(parsed.points.per_completion, 25);
        assert_eq!(parsed.classifier.timeout_secs, 5);
        assert_eq!(parsed.profile.username, "default");
    }

    #[test]
    fn test_get_by_path() {
        let config = Config::default();
        assert_eq!(config.get("points.per_completion").unwrap(), "10");
        assert_eq!(config.get("classifier.enabled").unwrap(), "false");
        assert_eq!(config.get("streak.qualify").unwrap(), "any_completion");
        assert!(matches!(
            config.get("points.per_minute"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_set_by_path() {
        let mut config = Config::default();
        config.set("points.per_completion", "50").unwrap();
        assert_eq!(config.points.per_completion, 50);

        config.set("classifier.enabled", "true").unwrap();
        assert!(config.classifier.enabled);

        config.set("profile.username", "ada").unwrap();
        assert_eq!(config.profile.username, "ada");

        config.set("streak.qualify", "all_tasks").unwrap();
        assert_eq!(config.streak.qualify, QualifyPolicy::AllTasks);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("points.per_completion", "lots"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("classifier.enabled", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("streak.qualify", "whenever"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("points", "10"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("profile.username", "ada lovelace"),
            Err(ConfigError::InvalidValue { .. })
        ));
        // failed sets must not corrupt the config
        assert_eq!(config.points.per_completion, 10);
        assert_eq!(config.profile.username, "default");
    }
}
