//! TOML-based application configuration.
//!
//! Stores:
//! - Trigger bindings for each control action
//! - Display refresh cadence
//!
//! Configuration is stored at `~/.config/vgtimer/config.toml`.
//!
//! Binding strings are kept raw here; [`crate::trigger::Bindings`] resolves
//! them and falls back to built-in defaults. Only [`Config::set`] rejects an
//! unparsable binding outright.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::trigger::{Action, KeyStroke};

/// Raw binding strings, one per action. `None` means not configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingsConfig {
    #[serde(default)]
    pub reset: Option<String>,
    #[serde(default)]
    pub stop: Option<String>,
    #[serde(default)]
    pub green: Option<String>,
    #[serde(default, rename = "break")]
    pub break_bar: Option<String>,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub blue: Option<String>,
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Polling cadence of the update loop.
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/vgtimer/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "BindingsConfig::unset")]
    pub bindings: BindingsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

const MIN_UPDATE_INTERVAL_MS: u64 = 10;

fn default_update_interval_ms() -> u64 {
    100
}

impl BindingsConfig {
    /// No binding configured for any action.
    pub fn unset() -> Self {
        Self {
            reset: None,
            stop: None,
            green: None,
            break_bar: None,
            segment: None,
            blue: None,
        }
    }

    pub fn get(&self, action: Action) -> Option<&str> {
        let raw = match action {
            Action::Reset => &self.reset,
            Action::Stop => &self.stop,
            Action::Green => &self.green,
            Action::Break => &self.break_bar,
            Action::Segment => &self.segment,
            Action::Blue => &self.blue,
        };
        raw.as_deref()
    }
}

impl Default for BindingsConfig {
    /// Every action bound to its built-in default.
    fn default() -> Self {
        let default = |action: Action| Some(action.default_binding().to_string());
        Self {
            reset: default(Action::Reset),
            stop: default(Action::Stop),
            green: default(Action::Green),
            break_bar: default(Action::Break),
            segment: default(Action::Segment),
            blue: default(Action::Blue),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bindings: BindingsConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
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
        let unknown = || ConfigError::UnknownKey(key.to_string());

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        for part in parent_path.into_iter().flat_map(|p| p.split('.')) {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                    .into(),
            ),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("cannot replace a whole section".to_string()))
            }
            // Strings and unset bindings.
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            if let Err(e) = cfg.save_to(&path) {
                warn!(path = %path.display(), error = %e, "Unable to write default configuration");
            }
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
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
        toml::from_str(&content).map_err(|e| {
            ConfigError::ParseFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load from `path` (or the default location), falling back to the
    /// defaults with a warning when the file is unusable.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        };
        loaded.unwrap_or_else(|e| {
            warn!(error = %e, "Unable to read configuration, using defaults");
            Self::default()
        })
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key. Unset bindings
    /// return `None`, like unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value has the wrong type,
    /// or a binding value does not parse as a key stroke.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        if key.starts_with("bindings.") {
            value.parse::<KeyStroke>()?;
        }
        *self = serde_json::from_value(json).map_err(CoreError::Json)?;
        Ok(())
    }

    /// Polling cadence, never below 10ms.
    pub fn update_interval(&self) -> Duration {
        let ms = self.display.update_interval_ms;
        if ms < MIN_UPDATE_INTERVAL_MS {
            warn!(
                configured = ms,
                minimum = MIN_UPDATE_INTERVAL_MS,
                "update interval too small, clamping"
            );
            return Duration::from_millis(MIN_UPDATE_INTERVAL_MS);
        }
        Duration::from_millis(ms)
    }
}
