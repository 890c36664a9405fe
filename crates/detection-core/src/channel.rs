//! Emotion channels: per-emotion smoothing and hysteresis debounce.
//!
//! # Algorithm
//!
//! On every tick a channel:
//!
//! 1. **Activates:** runs its activation function and clamps the result to `[0, 1]`.
//! 2. **Smooths:** `ema = α·raw + (1 − α)·ema_prev` (the first sample seeds the average).
//! 3. **Debounces:** while inactive, intensity `≥ on_threshold` must hold for
//!    `min_onset_duration_ms` before the channel activates; while active,
//!    intensity `< off_threshold` must hold for `min_offset_duration_ms`
//!    before it deactivates. Any break in the condition restarts the count.
//!
//! Durations come from caller timestamps, not tick counts, so irregular
//! frame spacing is fine. Elapsed time never goes negative: a timestamp
//! earlier than the pending candidate counts as zero elapsed.

use emotrace_face_model::{
    ActivationError, ActivationEvent, EmotionChannelConfig, EmotionKind, FaceFrame,
};

use crate::activation::ActivationFunction;

/// Debounce phase of a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelPhase {
    /// Not active. `onset_since` is when intensity first reached the on threshold.
    Inactive { onset_since: Option<f64> },
    /// Active. `offset_since` is when intensity first fell below the off threshold.
    Active { offset_since: Option<f64> },
}

impl Default for ChannelPhase {
    fn default() -> Self {
        Self::Inactive { onset_since: None }
    }
}

/// Mutable runtime state of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmotionChannelState {
    ema: Option<f32>,
    phase: ChannelPhase,
    current_intensity: f32,
}

impl EmotionChannelState {
    /// Smoothed value, `None` until the first successful sample.
    pub fn ema_value(&self) -> Option<f32> {
        self.ema
    }

    pub fn phase(&self) -> ChannelPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, ChannelPhase::Active { .. })
    }

    /// Smoothed intensity of the last tick, in `[0.0, 1.0]`.
    pub fn current_intensity(&self) -> f32 {
        self.current_intensity
    }

    pub fn onset_candidate(&self) -> Option<f64> {
        match self.phase {
            ChannelPhase::Inactive { onset_since } => onset_since,
            ChannelPhase::Active { .. } => None,
        }
    }

    pub fn offset_candidate(&self) -> Option<f64> {
        match self.phase {
            ChannelPhase::Active { offset_since } => offset_since,
            ChannelPhase::Inactive { .. } => None,
        }
    }
}

/// The state machine tracking one emotion kind.
pub struct EmotionChannel {
    kind: EmotionKind,
    activation: Box<dyn ActivationFunction>,
    config: EmotionChannelConfig,
    state: EmotionChannelState,
}

impl std::fmt::Debug for EmotionChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmotionChannel")
            .field("kind", &self.kind)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl EmotionChannel {
    /// Create an inactive channel.
    pub fn new(
        kind: EmotionKind,
        activation: impl ActivationFunction + 'static,
        config: EmotionChannelConfig,
    ) -> Self {
        Self {
            kind,
            activation: Box::new(activation),
            config,
            state: EmotionChannelState::default(),
        }
    }

    pub fn kind(&self) -> &EmotionKind {
        &self.kind
    }

    pub fn config(&self) -> &EmotionChannelConfig {
        &self.config
    }

    pub fn state(&self) -> &EmotionChannelState {
        &self.state
    }

    /// Feed one frame. Returns the transition this tick completed, if any.
    ///
    /// When the activation function fails, the error is returned and the
    /// channel state is left exactly as it was.
    pub fn evaluate(
        &mut self,
        frame: &FaceFrame,
        timestamp: f64,
    ) -> Result<Option<ActivationEvent>, ActivationError> {
        let raw = self.activation.activate(frame)?;
        if !raw.is_finite() {
            return Err(ActivationError::NonFiniteOutput { value: raw });
        }
        let raw = clamp01(raw);

        let alpha = self.config.ema_alpha;
        let ema = match self.state.ema {
            None => raw,
            Some(prev) => alpha * raw + (1.0 - alpha) * prev,
        };
        self.state.ema = Some(ema);
        self.state.current_intensity = clamp01(ema);

        Ok(self.advance(timestamp))
    }

    /// Return to the initial state: no average, inactive, no candidates.
    pub fn reset(&mut self) {
        self.state = EmotionChannelState::default();
    }

    fn advance(&mut self, timestamp: f64) -> Option<ActivationEvent> {
        let intensity = self.state.current_intensity;
        let config = self.config;

        match self.state.phase {
            ChannelPhase::Inactive { onset_since } => {
                if intensity < config.on_threshold {
                    self.state.phase = ChannelPhase::Inactive { onset_since: None };
                    return None;
                }

                let since = onset_since.unwrap_or(timestamp);
                if elapsed_ms(since, timestamp) >= config.min_onset_duration_ms {
                    self.state.phase = ChannelPhase::Active { offset_since: None };
                    return Some(ActivationEvent::activated(
                        self.kind.clone(),
                        timestamp,
                        intensity,
                    ));
                }

                self.state.phase = ChannelPhase::Inactive {
                    onset_since: Some(since),
                };
                None
            }
            ChannelPhase::Active { offset_since } => {
                // Equality with the off threshold keeps the channel active.
                if intensity >= config.off_threshold {
                    self.state.phase = ChannelPhase::Active { offset_since: None };
                    return None;
                }

                let since = offset_since.unwrap_or(timestamp);
                if elapsed_ms(since, timestamp) >= config.min_offset_duration_ms {
                    self.state.phase = ChannelPhase::Inactive { onset_since: None };
                    return Some(ActivationEvent::deactivated(
                        self.kind.clone(),
                        timestamp,
                        intensity,
                    ));
                }

                self.state.phase = ChannelPhase::Active {
                    offset_since: Some(since),
                };
                None
            }
        }
    }
}

/// Milliseconds from `since` to `now`, never negative.
fn elapsed_ms(since: f64, now: f64) -> f64 {
    ((now - since) * 1000.0).max(0.0)
}

fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
