//! Emotrace Detection Core — the emotion engine
//!
//! Turns per-frame action-unit intensities into debounced emotion events:
//! - **Activation:** Pure per-emotion formulas mapping a frame to a raw intensity
//! - **Channels:** EMA smoothing plus two-threshold hysteresis with onset/offset debounce
//! - **Engine:** A registry of independent channels driven once per capture tick
//!
//! This crate is pure computation: inputs and outputs are plain data, and the
//! engine holds no global state.

pub mod activation;
pub mod channel;
pub mod engine;

pub use activation::{activation_fn, ActivationFunction, BuiltinEmotion};
pub use channel::{ChannelPhase, EmotionChannel, EmotionChannelState};
pub use engine::{ChannelEvaluationError, ChannelSnapshot, EmotionEngine, EngineError, Evaluation};
