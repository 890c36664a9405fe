//! Detector profiles: the serializable configuration of a whole engine.
//!
//! A profile carries default channel parameters, per-kind overrides, the
//! Happiness cheek weight, which built-in channels to register, and the
//! timestamp policy. Profiles are stored as pretty-printed JSON.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::channel_config::{check_unit, ConfigError, EmotionChannelConfig, TimestampPolicy};
use crate::emotion::EmotionKind;

/// Default weight of AU6 (cheek raiser) in the Happiness formula.
pub const DEFAULT_CHEEK_WEIGHT: f32 = 0.35;

/// Engine-wide detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorProfile {
    /// Parameters applied to every channel without an override.
    #[serde(default)]
    pub defaults: EmotionChannelConfig,

    /// Per-kind parameters replacing `defaults`.
    #[serde(default)]
    pub overrides: BTreeMap<EmotionKind, EmotionChannelConfig>,

    /// Weight of AU6 in the Happiness formula, `[0.0, 1.0]`.
    #[serde(default = "default_cheek_weight")]
    pub cheek_weight: f32,

    /// Built-in kinds to register. `None` registers all of them.
    #[serde(default)]
    pub enabled: Option<Vec<EmotionKind>>,

    #[serde(default)]
    pub timestamp_policy: TimestampPolicy,
}

fn default_cheek_weight() -> f32 {
    DEFAULT_CHEEK_WEIGHT
}

impl Default for DetectorProfile {
    fn default() -> Self {
        Self {
            defaults: EmotionChannelConfig::default(),
            overrides: BTreeMap::new(),
            cheek_weight: DEFAULT_CHEEK_WEIGHT,
            enabled: None,
            timestamp_policy: TimestampPolicy::default(),
        }
    }
}

impl DetectorProfile {
    /// Resolved parameters for `kind`.
    pub fn config_for(&self, kind: &EmotionKind) -> EmotionChannelConfig {
        self.overrides.get(kind).copied().unwrap_or(self.defaults)
    }

    /// Built-in kinds this profile registers, in table order.
    pub fn enabled_builtins(&self) -> Vec<EmotionKind> {
        match &self.enabled {
            None => EmotionKind::BUILTIN.to_vec(),
            Some(enabled) => EmotionKind::BUILTIN
                .into_iter()
                .filter(|kind| enabled.contains(kind))
                .collect(),
        }
    }

    /// Check every parameter in the profile.
    pub fn validate(&self) -> Result<(), ProfileError> {
        self.defaults
            .validate()
            .map_err(|source| ProfileError::InvalidChannel {
                kind: None,
                source,
            })?;

        for (kind, config) in &self.overrides {
            config
                .validate()
                .map_err(|source| ProfileError::InvalidChannel {
                    kind: Some(kind.clone()),
                    source,
                })?;
        }

        check_unit("cheek_weight", self.cheek_weight as f64).map_err(|source| {
            ProfileError::InvalidChannel {
                kind: Some(EmotionKind::HAPPINESS),
                source,
            }
        })?;

        if let Some(enabled) = &self.enabled {
            if let Some(unknown) = enabled.iter().find(|kind| !kind.is_builtin()) {
                return Err(ProfileError::UnknownBuiltin {
                    kind: unknown.clone(),
                });
            }
        }

        Ok(())
    }

    /// Load and validate a profile from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ProfileError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let profile: Self = serde_json::from_str(&json).map_err(|e| ProfileError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Save the profile as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProfileError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ProfileError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ProfileError::SerializeError {
                path: path.to_path_buf(),
                source: e,
            })?;
        std::fs::write(path, json).map_err(|e| ProfileError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when working with profiles.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize profile for {path}: {source}")]
    SerializeError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid {} parameters: {source}", channel_label(.kind))]
    InvalidChannel {
        kind: Option<EmotionKind>,
        source: ConfigError,
    },

    #[error("Enabled kind '{kind}' has no built-in formula")]
    UnknownBuiltin { kind: EmotionKind },
}

fn channel_label(kind: &Option<EmotionKind>) -> String {
    match kind {
        Some(kind) => format!("'{kind}' channel"),
        None => "default channel".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_for_prefers_override() {
        let mut profile = DetectorProfile::default();
        let strict = EmotionChannelConfig {
            on_threshold: 0.8,
            ..Default::default()
        };
        profile.overrides.insert(EmotionKind::ANGER, strict);

        assert_eq!(profile.config_for(&EmotionKind::ANGER), strict);
        assert_eq!(
            profile.config_for(&EmotionKind::FEAR),
            EmotionChannelConfig::default()
        );
    }

    #[test]
    fn test_enabled_builtins_keeps_table_order() {
        let profile = DetectorProfile {
            enabled: Some(vec![EmotionKind::SURPRISE, EmotionKind::ANGER]),
            ..Default::default()
        };
        assert_eq!(
            profile.enabled_builtins(),
            vec![EmotionKind::ANGER, EmotionKind::SURPRISE]
        );
        assert_eq!(DetectorProfile::default().enabled_builtins().len(), 7);
    }

    #[test]
    fn test_validate_rejects_bad_override() {
        let mut profile = DetectorProfile::default();
        profile.overrides.insert(
            EmotionKind::SADNESS,
            EmotionChannelConfig {
                off_threshold: 2.0,
                ..Default::default()
            },
        );
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("'sadness' channel"));
    }

    #[test]
    fn test_validate_rejects_cheek_weight_and_unknown_kind() {
        let profile = DetectorProfile {
            cheek_weight: -0.1,
            ..Default::default()
        };
        assert!(profile.validate().is_err());

        let profile = DetectorProfile {
            enabled: Some(vec![EmotionKind::new("contempt")]),
            ..Default::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::UnknownBuiltin { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join("emotrace_test_profile");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("booth.json");

        let mut profile = DetectorProfile {
            cheek_weight: 0.5,
            timestamp_policy: TimestampPolicy::Clamp,
            ..Default::default()
        };
        profile.overrides.insert(
            EmotionKind::SMILE,
            EmotionChannelConfig {
                ema_alpha: 0.5,
                ..Default::default()
            },
        );
        profile.save(&path).unwrap();

        let loaded = DetectorProfile::load(&path).unwrap();
        assert_eq!(loaded, profile);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_object_is_default_profile() {
        let profile: DetectorProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, DetectorProfile::default());
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("emotrace_test_no_such_profile.json");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            DetectorProfile::load(&path),
            Err(ProfileError::IoError { .. })
        ));
    }

    #[test]
    fn test_read_and_write_failures_are_distinct() {
        let path = std::env::temp_dir().join("emotrace_test_malformed_profile.json");
        std::fs::write(&path, "{ \"cheek_weight\": ").unwrap();
        let err = DetectorProfile::load(&path).unwrap_err();
        assert!(matches!(err, ProfileError::ParseError { .. }));
        assert!(err.to_string().starts_with("Parse error in"));
        std::fs::remove_file(&path).ok();

        let source = serde_json::from_str::<f32>("nope").unwrap_err();
        let err = ProfileError::SerializeError {
            path: PathBuf::from("out/profile.json"),
            source,
        };
        assert!(err
            .to_string()
            .starts_with("Failed to serialize profile for out/profile.json"));
    }
}
