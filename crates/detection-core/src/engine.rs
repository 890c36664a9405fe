//! The emotion engine: a registry of channels driven once per frame.
//!
//! The engine is synchronous and owns all channel state. Callers feed one
//! [`FaceFrame`] per capture tick with a non-decreasing timestamp and get
//! back the transitions that tick produced, in registration order.
//!
//! # Timestamps
//!
//! Timestamps must not move backwards between calls. What happens when
//! they do is set by [`TimestampPolicy`]:
//! - `Reject`: the call fails with [`EngineError::NonMonotonicTimestamp`]
//!   and no channel is touched.
//! - `Clamp`: the tick is evaluated at the previous timestamp, so the
//!   elapsed time it contributes to any debounce is zero.

use std::collections::HashMap;

use emotrace_face_model::{
    ActivationError, ActivationEvent, ConfigError, DetectorProfile, EmotionChannelConfig,
    EmotionKind, FaceFrame, ProfileError, TimestampPolicy,
};

use crate::activation::{ActivationFunction, BuiltinEmotion};
use crate::channel::EmotionChannel;

/// Owns the channels and dispatches frames to them.
#[derive(Debug, Default)]
pub struct EmotionEngine {
    channels: Vec<EmotionChannel>,
    index: HashMap<EmotionKind, usize>,
    timestamp_policy: TimestampPolicy,
    last_timestamp: Option<f64>,
}

/// Result of one tick: events plus the channels that failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub events: Vec<ActivationEvent>,
    pub errors: Vec<ChannelEvaluationError>,
}

impl Evaluation {
    pub fn is_quiet(&self) -> bool {
        self.events.is_empty() && self.errors.is_empty()
    }
}

/// A channel whose activation function failed on a tick.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Channel '{kind}' failed to evaluate: {cause}")]
pub struct ChannelEvaluationError {
    pub kind: EmotionKind,
    pub cause: ActivationError,
}

/// Read-only view of a channel for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSnapshot {
    pub kind: EmotionKind,
    pub current_intensity: f32,
    pub is_active: bool,
}

/// Errors returned by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Channel '{kind}' is already registered")]
    DuplicateChannel { kind: EmotionKind },

    #[error("Channel kind must not be empty")]
    EmptyKind,

    #[error("Channel '{kind}' is not registered")]
    UnknownChannel { kind: EmotionKind },

    #[error("Invalid config for channel '{kind}': {source}")]
    InvalidChannelConfig {
        kind: EmotionKind,
        source: ConfigError,
    },

    #[error("Timestamp {current} is earlier than previous timestamp {previous}")]
    NonMonotonicTimestamp { previous: f64, current: f64 },

    #[error("Timestamp must be finite, got {value}")]
    InvalidTimestamp { value: f64 },

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl EmotionEngine {
    /// Create an empty engine.
    pub fn new(timestamp_policy: TimestampPolicy) -> Self {
        Self {
            timestamp_policy,
            ..Default::default()
        }
    }

    /// Create an engine with the built-in channels a profile enables.
    pub fn from_profile(profile: &DetectorProfile) -> Result<Self, EngineError> {
        let mut engine = Self::new(profile.timestamp_policy);
        engine.register_builtins(profile)?;
        Ok(engine)
    }

    /// Register the profile-enabled built-ins, in table order.
    ///
    /// The profile is validated first, so an enabled kind without a built-in
    /// formula is an error rather than a skipped channel.
    pub fn register_builtins(&mut self, profile: &DetectorProfile) -> Result<(), EngineError> {
        profile.validate()?;
        let enabled = profile.enabled_builtins();
        for builtin in BuiltinEmotion::all(profile.cheek_weight) {
            let kind = builtin.kind();
            if enabled.contains(&kind) {
                let config = profile.config_for(&kind);
                self.register_channel(kind, builtin, config)?;
            }
        }
        Ok(())
    }

    /// Add a channel. Kinds must be unique.
    pub fn register_channel(
        &mut self,
        kind: impl Into<EmotionKind>,
        activation: impl ActivationFunction + 'static,
        config: EmotionChannelConfig,
    ) -> Result<(), EngineError> {
        let kind = kind.into();
        if kind.as_str().is_empty() {
            return Err(EngineError::EmptyKind);
        }
        if self.index.contains_key(&kind) {
            return Err(EngineError::DuplicateChannel { kind });
        }
        if let Err(source) = config.validate() {
            return Err(EngineError::InvalidChannelConfig { kind, source });
        }
        if !config.has_hysteresis_gap() {
            tracing::warn!(
                kind = %kind,
                on_threshold = config.on_threshold,
                off_threshold = config.off_threshold,
                "Channel has no hysteresis gap and may chatter"
            );
        }

        tracing::debug!(kind = %kind, ?config, "Registered emotion channel");
        self.index.insert(kind.clone(), self.channels.len());
        self.channels.push(EmotionChannel::new(kind, activation, config));
        Ok(())
    }

    /// Feed one frame to every channel.
    ///
    /// Channel failures are collected in [`Evaluation::errors`]; the failing
    /// channel keeps its previous state and the others proceed normally.
    pub fn evaluate(
        &mut self,
        frame: &FaceFrame,
        timestamp: f64,
    ) -> Result<Evaluation, EngineError> {
        let timestamp = self.admit_timestamp(timestamp)?;

        let mut evaluation = Evaluation::default();
        for channel in &mut self.channels {
            match channel.evaluate(frame, timestamp) {
                Ok(Some(event)) => {
                    tracing::debug!(
                        kind = %event.kind,
                        transition = %event.transition,
                        timestamp = event.timestamp,
                        intensity = event.intensity,
                        "Emotion transition"
                    );
                    evaluation.events.push(event);
                }
                Ok(None) => {}
                Err(cause) => {
                    tracing::warn!(
                        kind = %channel.kind(),
                        error = %cause,
                        "Channel evaluation failed"
                    );
                    evaluation.errors.push(ChannelEvaluationError {
                        kind: channel.kind().clone(),
                        cause,
                    });
                }
            }
        }

        Ok(evaluation)
    }

    /// Intensity and activation of one channel.
    pub fn channel_state(&self, kind: &EmotionKind) -> Result<ChannelSnapshot, EngineError> {
        let channel = self.channel(kind)?;
        Ok(ChannelSnapshot {
            kind: kind.clone(),
            current_intensity: channel.state().current_intensity(),
            is_active: channel.state().is_active(),
        })
    }

    /// Snapshots of every channel, in registration order.
    pub fn snapshots(&self) -> Vec<ChannelSnapshot> {
        self.channels
            .iter()
            .map(|channel| ChannelSnapshot {
                kind: channel.kind().clone(),
                current_intensity: channel.state().current_intensity(),
                is_active: channel.state().is_active(),
            })
            .collect()
    }

    /// Borrow a channel for detailed inspection.
    pub fn channel(&self, kind: &EmotionKind) -> Result<&EmotionChannel, EngineError> {
        self.index
            .get(kind)
            .map(|&idx| &self.channels[idx])
            .ok_or_else(|| EngineError::UnknownChannel { kind: kind.clone() })
    }

    /// Registered kinds, in registration order.
    pub fn channel_kinds(&self) -> impl Iterator<Item = &EmotionKind> {
        self.channels.iter().map(|channel| channel.kind())
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn timestamp_policy(&self) -> TimestampPolicy {
        self.timestamp_policy
    }

    /// Latest timestamp accepted so far.
    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Reset every channel and forget the last timestamp.
    ///
    /// Use when the tracked face is lost and a new session begins.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.reset();
        }
        self.last_timestamp = None;
    }

    /// Reset one channel's state.
    pub fn reset_channel(&mut self, kind: &EmotionKind) -> Result<(), EngineError> {
        let idx = *self
            .index
            .get(kind)
            .ok_or_else(|| EngineError::UnknownChannel { kind: kind.clone() })?;
        self.channels[idx].reset();
        Ok(())
    }

    /// Apply the timestamp policy and return the timestamp channels see.
    fn admit_timestamp(&mut self, timestamp: f64) -> Result<f64, EngineError> {
        if !timestamp.is_finite() {
            return Err(EngineError::InvalidTimestamp { value: timestamp });
        }

        let effective = match self.last_timestamp {
            Some(previous) if timestamp < previous => match self.timestamp_policy {
                TimestampPolicy::Reject => {
                    return Err(EngineError::NonMonotonicTimestamp {
                        previous,
                        current: timestamp,
                    });
                }
                TimestampPolicy::Clamp => {
                    tracing::debug!(
                        previous,
                        current = timestamp,
                        "Clamping non-monotonic timestamp"
                    );
                    previous
                }
            },
            _ => timestamp,
        };

        self.last_timestamp = Some(effective);
        Ok(effective)
    }
}
