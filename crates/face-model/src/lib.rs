//! Emotrace Face Model
//!
//! Defines the core data contracts for emotion detection:
//! - **Action units:** The FACS muscle movements read by activation formulas
//! - **Frames:** Immutable per-tick snapshots of AU intensity and confidence
//! - **Channel config:** Thresholds, debounce durations, and smoothing weight
//! - **Events:** Debounced activation/deactivation transitions
//! - **Profiles:** Serializable configuration of a whole detector
//!
//! All intensities are normalized to the `[0.0, 1.0]` range. Timestamps are
//! seconds supplied by the capture collaborator.

pub mod action_unit;
pub mod channel_config;
pub mod emotion;
pub mod event;
pub mod frame;
pub mod profile;

pub use action_unit::*;
pub use channel_config::*;
pub use emotion::*;
pub use event::*;
pub use frame::*;
pub use profile::*;
