//! Activation events emitted by emotion channels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::emotion::EmotionKind;

/// Direction of a channel state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Activated,
    Deactivated,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activated => f.pad("activated"),
            Self::Deactivated => f.pad("deactivated"),
        }
    }
}

/// A debounced emotion transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationEvent {
    /// Channel that changed state.
    pub kind: EmotionKind,

    pub transition: Transition,

    /// Timestamp (seconds) of the tick that completed the debounce.
    #[serde(rename = "t")]
    pub timestamp: f64,

    /// Smoothed intensity at that tick, in `[0.0, 1.0]`.
    pub intensity: f32,
}

impl ActivationEvent {
    pub fn activated(kind: EmotionKind, timestamp: f64, intensity: f32) -> Self {
        Self {
            kind,
            transition: Transition::Activated,
            timestamp,
            intensity,
        }
    }

    pub fn deactivated(kind: EmotionKind, timestamp: f64, intensity: f32) -> Self {
        Self {
            kind,
            transition: Transition::Deactivated,
            timestamp,
            intensity,
        }
    }

    pub fn is_activation(&self) -> bool {
        self.transition == Transition::Activated
    }
}

impl fmt::Display for ActivationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>9.3}s  {:<10} {:<11} intensity={:.3}",
            self.timestamp, self.kind, self.transition, self.intensity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = ActivationEvent::activated(EmotionKind::SMILE, 1.25, 0.75);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "smile");
        assert_eq!(json["transition"], "activated");
        assert_eq!(json["t"], 1.25);
        assert!(event.is_activation());
    }

    #[test]
    fn test_display() {
        let event = ActivationEvent::deactivated(EmotionKind::ANGER, 2.5, 0.125);
        let line = event.to_string();
        assert!(line.contains("anger"));
        assert!(line.contains("deactivated"));
        assert!(line.contains("0.125"));
    }
}
