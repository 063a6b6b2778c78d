//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Age profile, interface language and voice
//! - Alarm sound played when the work budget runs out
//! - Assistant endpoint, model and API key variable
//!
//! Configuration is stored at `~/.config/tempo/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::assistant::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::audio::AlarmKind;
use crate::error::ConfigError;
use crate::profile::{Language, Profile, VoiceChoice};

/// Who is using the app and how it talks to them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub voice: VoiceChoice,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlarmConfig {
    #[serde(default)]
    pub kind: AlarmKind,
}

/// Assistant service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tempo/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub alarm: AlarmConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_model() -> String {
    DEFAULT_MODEL.into()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_timeout_secs() -> u64 {
    20
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if part.is_empty() {
                return Err(unknown());
            }
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                serde_json::Value::Object(_) => return Err(unknown()),
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Location of the config file in the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string())),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config unreadable, using defaults");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Every leaf key with its value, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Accepted values for keys with a fixed set; `None` for free-form
    /// keys and unknown keys.
    pub fn choices(key: &str) -> Option<Vec<String>> {
        fn names<T: ToString>(all: &[T]) -> Vec<String> {
            all.iter().map(ToString::to_string).collect()
        }
        match key {
            "profile.profile" => Some(names(&Profile::ALL)),
            "profile.language" => Some(names(&Language::ALL)),
            "profile.voice" => Some(names(&VoiceChoice::ALL)),
            "alarm.kind" => Some(names(&AlarmKind::ALL)),
            _ => None,
        }
    }

    /// Change a value in memory. Enum-valued keys are checked by
    /// deserializing the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.profile.profile, Profile::Teen);
        assert_eq!(parsed.assistant.timeout_secs, 20);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("profile.language").as_deref(), Some("es"));
        assert_eq!(cfg.get("alarm.kind").as_deref(), Some("soft_chime"));
        assert_eq!(cfg.get("assistant.timeout_secs").as_deref(), Some("20"));
        assert!(cfg.get("profile").is_none());
        assert!(cfg.get("profile.missing_key").is_none());
    }

    #[test]
    fn set_value_updates_enums_and_numbers() {
        let mut cfg = Config::default();
        cfg.set_value("profile.profile", "child").unwrap();
        cfg.set_value("profile.language", "ca").unwrap();
        cfg.set_value("alarm.kind", "siren").unwrap();
        cfg.set_value("assistant.timeout_secs", "5").unwrap();
        assert_eq!(cfg.profile.profile, Profile::Child);
        assert_eq!(cfg.profile.language, Language::Catalan);
        assert_eq!(cfg.alarm.kind, AlarmKind::Siren);
        assert_eq!(cfg.assistant.timeout_secs, 5);
    }

    #[test]
    fn set_value_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.set_value("profile.nope", "x"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(cfg.set_value("assistant", "x"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(cfg.set_value("", "x"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            cfg.set_value("profile.language", "klingon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set_value("assistant.timeout_secs", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.profile.language, Language::Spanish);
    }

    #[test]
    fn entries_flatten_every_leaf() {
        let entries = Config::default().entries();
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"profile.voice"));
        assert!(keys.contains(&"assistant.api_key_env"));
        assert_eq!(entries.len(), 8);
    }

    #[test]
    fn choices_cover_enum_keys_only() {
        assert_eq!(
            Config::choices("alarm.kind").unwrap(),
            vec!["siren", "seismic", "soft_chime"]
        );
        assert_eq!(Config::choices("profile.language").unwrap().len(), 9);
        assert!(Config::choices("assistant.model").is_none());
        // every listed value is accepted by set_value
        for (key, _) in Config::default().entries() {
            for value in Config::choices(&key).unwrap_or_default() {
                Config::default().set_value(&key, &value).unwrap();
            }
        }
    }

    #[test]
    fn load_from_missing_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.assistant.model, DEFAULT_MODEL);
    }

    #[test]
    fn load_from_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profile]\nprofile = \"adult\"\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.profile.profile, Profile::Adult);
        assert_eq!(cfg.profile.voice, VoiceChoice::Female);
        assert_eq!(cfg.alarm.kind, AlarmKind::SoftChime);
    }

    #[test]
    fn load_from_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "profile = [").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseFailed(_))));
    }
}
