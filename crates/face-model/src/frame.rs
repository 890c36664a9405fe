//! Face frames: one snapshot of action-unit intensities per capture tick.
//!
//! A frame is immutable once built. Unset units read as intensity `0.0`
//! with confidence `1.0`. Out-of-range values are clamped to `[0.0, 1.0]`
//! on construction; non-finite values are kept so that activation functions
//! can reject them as malformed input instead of silently reading zero.
//!
//! Recorded capture streams use JSONL, one frame per line:
//!
//! ```text
//! {"t": 0.016, "aus": {"AU12": 0.8, "AU6": {"intensity": 0.2, "confidence": 0.9}}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::action_unit::FaceActionUnit;

/// Intensity and tracker confidence for one action unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuSample {
    intensity: f32,
    confidence: f32,
}

impl AuSample {
    /// Create a sample, clamping both values into `[0.0, 1.0]`.
    pub fn new(intensity: f32, confidence: f32) -> Self {
        Self {
            intensity: clamp_unit(intensity),
            confidence: clamp_unit(confidence),
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

impl Default for AuSample {
    fn default() -> Self {
        Self {
            intensity: 0.0,
            confidence: 1.0,
        }
    }
}

/// Immutable snapshot of action-unit samples for one timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<FaceActionUnit, SampleRepr>")]
#[serde(into = "BTreeMap<FaceActionUnit, SampleRepr>")]
pub struct FaceFrame {
    samples: BTreeMap<FaceActionUnit, AuSample>,
}

impl FaceFrame {
    /// Start building a frame.
    pub fn builder() -> FaceFrameBuilder {
        FaceFrameBuilder::default()
    }

    /// Build a frame from `(unit, intensity)` pairs at full confidence.
    pub fn from_intensities(pairs: impl IntoIterator<Item = (FaceActionUnit, f32)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::builder(), |b, (au, intensity)| b.intensity(au, intensity))
            .build()
    }

    /// Sample for `au`, or the default sample when unset.
    pub fn sample(&self, au: FaceActionUnit) -> AuSample {
        self.samples.get(&au).copied().unwrap_or_default()
    }

    /// Intensity of `au` (0.0 when unset). May be non-finite for malformed input.
    pub fn intensity(&self, au: FaceActionUnit) -> f32 {
        self.sample(au).intensity
    }

    /// Confidence of `au` (1.0 when unset).
    pub fn confidence(&self, au: FaceActionUnit) -> f32 {
        self.sample(au).confidence
    }

    /// Intensity of `au`, failing when the stored value is not finite.
    pub fn try_intensity(&self, au: FaceActionUnit) -> Result<f32, ActivationError> {
        let value = self.intensity(au);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ActivationError::NonFiniteIntensity { au })
        }
    }

    /// Intensity of `au`, failing when the unit was never set on this frame.
    pub fn require(&self, au: FaceActionUnit) -> Result<f32, ActivationError> {
        if !self.is_set(au) {
            return Err(ActivationError::MissingActionUnit { au });
        }
        self.try_intensity(au)
    }

    /// Whether `au` was explicitly set.
    pub fn is_set(&self, au: FaceActionUnit) -> bool {
        self.samples.contains_key(&au)
    }

    /// Number of explicitly set units.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate explicitly set units in FACS order.
    pub fn iter(&self) -> impl Iterator<Item = (FaceActionUnit, AuSample)> + '_ {
        self.samples.iter().map(|(au, s)| (*au, *s))
    }
}

/// Builder for [`FaceFrame`]. Later writes to the same unit win.
#[derive(Debug, Default)]
pub struct FaceFrameBuilder {
    samples: BTreeMap<FaceActionUnit, AuSample>,
}

impl FaceFrameBuilder {
    /// Set intensity at full confidence.
    pub fn intensity(self, au: FaceActionUnit, intensity: f32) -> Self {
        self.sample(au, intensity, 1.0)
    }

    /// Set intensity and confidence.
    pub fn sample(mut self, au: FaceActionUnit, intensity: f32, confidence: f32) -> Self {
        self.samples.insert(au, AuSample::new(intensity, confidence));
        self
    }

    pub fn build(self) -> FaceFrame {
        FaceFrame {
            samples: self.samples,
        }
    }
}

/// Errors raised by activation functions while reading a frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActivationError {
    #[error("Intensity of {au} is not a finite number")]
    NonFiniteIntensity { au: FaceActionUnit },

    #[error("Required action unit {au} is missing from the frame")]
    MissingActionUnit { au: FaceActionUnit },

    #[error("Activation produced a non-finite value: {value}")]
    NonFiniteOutput { value: f32 },

    #[error("{message}")]
    Custom { message: String },
}

impl ActivationError {
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom {
            message: msg.into(),
        }
    }
}

/// A frame paired with its capture timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedFrame {
    /// Capture time in seconds.
    #[serde(rename = "t")]
    pub timestamp: f64,

    /// Action-unit samples.
    #[serde(default)]
    pub aus: FaceFrame,
}

impl TimedFrame {
    pub fn new(timestamp: f64, aus: FaceFrame) -> Self {
        Self { timestamp, aus }
    }
}

/// Parse a frame log from JSONL content (one JSON object per line).
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_frame_log(jsonl: &str) -> Result<Vec<TimedFrame>, FrameLogError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| {
            serde_json::from_str(content).map_err(|source| FrameLogError { line, source })
        })
        .collect()
}

/// A frame log line that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("Invalid frame on line {line}: {source}")]
pub struct FrameLogError {
    pub line: usize,
    pub source: serde_json::Error,
}

/// Wire form of a sample: a bare intensity or an object with confidence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum SampleRepr {
    Intensity(f32),
    Full {
        intensity: f32,
        #[serde(default = "full_confidence")]
        confidence: f32,
    },
}

fn full_confidence() -> f32 {
    1.0
}

impl From<BTreeMap<FaceActionUnit, SampleRepr>> for FaceFrame {
    fn from(map: BTreeMap<FaceActionUnit, SampleRepr>) -> Self {
        let samples = map
            .into_iter()
            .map(|(au, repr)| {
                let sample = match repr {
                    SampleRepr::Intensity(intensity) => AuSample::new(intensity, 1.0),
                    SampleRepr::Full {
                        intensity,
                        confidence,
                    } => AuSample::new(intensity, confidence),
                };
                (au, sample)
            })
            .collect();
        Self { samples }
    }
}

impl From<FaceFrame> for BTreeMap<FaceActionUnit, SampleRepr> {
    fn from(frame: FaceFrame) -> Self {
        frame
            .samples
            .into_iter()
            .map(|(au, s)| {
                let repr = if s.confidence == 1.0 {
                    SampleRepr::Intensity(s.intensity)
                } else {
                    SampleRepr::Full {
                        intensity: s.intensity,
                        confidence: s.confidence,
                    }
                };
                (au, repr)
            })
            .collect()
    }
}

/// Clamp into `[0.0, 1.0]`; NaN and infinities pass through unchanged.
fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use FaceActionUnit::*;

    #[test]
    fn test_unset_units_use_defaults() {
        let frame = FaceFrame::default();
        assert_eq!(frame.intensity(JawDrop), 0.0);
        assert_eq!(frame.confidence(JawDrop), 1.0);
        assert!(!frame.is_set(JawDrop));
        assert!(frame.is_empty());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let frame = FaceFrame::builder()
            .sample(LipCornerPuller, 1.7, -0.2)
            .intensity(BrowLowerer, -3.0)
            .build();
        assert_eq!(frame.intensity(LipCornerPuller), 1.0);
        assert_eq!(frame.confidence(LipCornerPuller), 0.0);
        assert_eq!(frame.intensity(BrowLowerer), 0.0);
    }

    #[test]
    fn test_non_finite_intensity_is_reported() {
        let frame = FaceFrame::from_intensities([(CheekRaiser, f32::NAN)]);
        assert!(frame.intensity(CheekRaiser).is_nan());
        assert_eq!(
            frame.try_intensity(CheekRaiser),
            Err(ActivationError::NonFiniteIntensity { au: CheekRaiser })
        );
        // Unset units are still readable.
        assert_eq!(frame.try_intensity(JawDrop), Ok(0.0));
    }

    #[test]
    fn test_infinite_intensity_is_reported() {
        let frame = FaceFrame::from_intensities([
            (LipCornerPuller, f32::INFINITY),
            (CheekRaiser, f32::NEG_INFINITY),
        ]);
        assert_eq!(frame.intensity(LipCornerPuller), f32::INFINITY);
        assert_eq!(
            frame.try_intensity(LipCornerPuller),
            Err(ActivationError::NonFiniteIntensity {
                au: LipCornerPuller
            })
        );
        assert_eq!(
            frame.try_intensity(CheekRaiser),
            Err(ActivationError::NonFiniteIntensity { au: CheekRaiser })
        );
    }

    #[test]
    fn test_require_missing_unit() {
        let frame = FaceFrame::from_intensities([(LipCornerPuller, 0.5)]);
        assert_eq!(frame.require(LipCornerPuller), Ok(0.5));
        assert_eq!(
            frame.require(ChinRaiser),
            Err(ActivationError::MissingActionUnit { au: ChinRaiser })
        );
    }

    #[test]
    fn test_later_write_wins() {
        let frame = FaceFrame::builder()
            .intensity(NoseWrinkler, 0.2)
            .intensity(NoseWrinkler, 0.9)
            .build();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.intensity(NoseWrinkler), 0.9);
    }

    #[test]
    fn test_parse_frame_log_mixed_forms() {
        let jsonl = r#"
# capture session 7
{"t": 0.0, "aus": {"AU12": 0.8, "AU6": {"intensity": 0.2, "confidence": 0.5}}}

{"t": 0.016, "aus": {"AU4": 1.4}}
{"t": 0.033}
"#;
        let frames = parse_frame_log(jsonl).unwrap();
        assert_eq!(frames.len(), 3);

        assert_eq!(frames[0].aus.intensity(LipCornerPuller), 0.8);
        assert_eq!(frames[0].aus.confidence(CheekRaiser), 0.5);
        assert_eq!(frames[1].aus.intensity(BrowLowerer), 1.0);
        assert!((frames[2].timestamp - 0.033).abs() < 1e-12);
        assert!(frames[2].aus.is_empty());
    }

    #[test]
    fn test_parse_frame_log_reports_line() {
        let jsonl = "{\"t\": 0.0}\n{\"t\": 0.1, \"aus\": {\"AU99\": 0.5}}\n";
        let err = parse_frame_log(jsonl).unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_frame_serializes_compactly() {
        let frame = FaceFrame::builder()
            .intensity(LipCornerPuller, 0.5)
            .sample(CheekRaiser, 0.25, 0.5)
            .build();
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["AU12"], serde_json::json!(0.5));
        assert_eq!(json["AU6"]["confidence"], serde_json::json!(0.5));

        let parsed: FaceFrame = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, frame);
    }

    proptest::proptest! {
        #[test]
        fn finite_samples_land_in_unit_range(
            intensity in -10.0f32..10.0,
            confidence in -10.0f32..10.0,
        ) {
            let sample = AuSample::new(intensity, confidence);
            proptest::prop_assert!((0.0..=1.0).contains(&sample.intensity()));
            proptest::prop_assert!((0.0..=1.0).contains(&sample.confidence()));

            let frame = FaceFrame::builder().sample(BrowLowerer, intensity, confidence).build();
            proptest::prop_assert_eq!(frame.try_intensity(BrowLowerer), Ok(sample.intensity()));
        }
    }
}
