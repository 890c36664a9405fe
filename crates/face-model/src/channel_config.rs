//! Per-channel detection parameters.

use serde::{Deserialize, Serialize};

/// Immutable parameters of one emotion channel, supplied at registration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionChannelConfig {
    /// Smoothed intensity at or above which onset starts counting. `[0.0, 1.0]`.
    pub on_threshold: f32,

    /// Smoothed intensity strictly below which offset starts counting. `[0.0, 1.0]`.
    pub off_threshold: f32,

    /// How long intensity must stay at or above `on_threshold` (ms).
    pub min_onset_duration_ms: f64,

    /// How long intensity must stay below `off_threshold` (ms).
    pub min_offset_duration_ms: f64,

    /// Weight of the newest sample in the moving average. `[0.0, 1.0]`.
    pub ema_alpha: f32,
}

impl Default for EmotionChannelConfig {
    fn default() -> Self {
        Self {
            on_threshold: 0.6,
            off_threshold: 0.4,
            min_onset_duration_ms: 180.0,
            min_offset_duration_ms: 250.0,
            ema_alpha: 0.25,
        }
    }
}

impl EmotionChannelConfig {
    /// Check that every parameter is finite and in range.
    ///
    /// A missing hysteresis gap (`on_threshold <= off_threshold`) is legal;
    /// see [`Self::has_hysteresis_gap`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("on_threshold", self.on_threshold as f64)?;
        check_unit("off_threshold", self.off_threshold as f64)?;
        check_unit("ema_alpha", self.ema_alpha as f64)?;
        check_duration("min_onset_duration_ms", self.min_onset_duration_ms)?;
        check_duration("min_offset_duration_ms", self.min_offset_duration_ms)?;
        Ok(())
    }

    /// Whether the on threshold sits above the off threshold.
    ///
    /// Without a gap the channel can chatter around a single boundary.
    pub fn has_hysteresis_gap(&self) -> bool {
        self.on_threshold > self.off_threshold
    }
}

/// How the engine treats a timestamp earlier than the previous tick's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Refuse the whole tick with an error; no channel state changes.
    #[default]
    Reject,
    /// Evaluate the tick, counting elapsed durations as zero.
    Clamp,
}

/// Invalid channel or profile parameter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

pub(crate) fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    check_range(field, value, 0.0, 1.0)
}

fn check_duration(field: &'static str, value: f64) -> Result<(), ConfigError> {
    check_range(field, value, 0.0, f64::MAX)
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EmotionChannelConfig::default();
        assert!((config.on_threshold - 0.6).abs() < 1e-6);
        assert!((config.off_threshold - 0.4).abs() < 1e-6);
        assert_eq!(config.min_onset_duration_ms, 180.0);
        assert_eq!(config.min_offset_duration_ms, 250.0);
        assert!((config.ema_alpha - 0.25).abs() < 1e-6);
        assert!(config.validate().is_ok());
        assert!(config.has_hysteresis_gap());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let config = EmotionChannelConfig {
            ema_alpha: 1.5,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, "ema_alpha"),
            other => panic!("expected out-of-range error, got {other:?}"),
        }

        let config = EmotionChannelConfig {
            min_offset_duration_ms: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan() {
        let config = EmotionChannelConfig {
            on_threshold: f32::NAN,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotFinite {
                field: "on_threshold"
            })
        );
    }

    #[test]
    fn test_inverted_thresholds_are_allowed() {
        let config = EmotionChannelConfig {
            on_threshold: 0.3,
            off_threshold: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(!config.has_hysteresis_gap());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EmotionChannelConfig =
            serde_json::from_str(r#"{"on_threshold": 0.7, "min_onset_duration_ms": 90}"#).unwrap();
        assert!((config.on_threshold - 0.7).abs() < 1e-6);
        assert_eq!(config.min_onset_duration_ms, 90.0);
        assert!((config.off_threshold - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_policy_serde() {
        let policy: TimestampPolicy = serde_json::from_str("\"clamp\"").unwrap();
        assert_eq!(policy, TimestampPolicy::Clamp);
        assert_eq!(TimestampPolicy::default(), TimestampPolicy::Reject);
    }
}
