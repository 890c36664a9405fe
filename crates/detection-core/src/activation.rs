//! Activation functions: pure maps from a face frame to a raw intensity.
//!
//! Each emotion kind owns one function. Functions hold no state between
//! calls and never see other channels. The engine clamps their output to
//! `[0.0, 1.0]`, so a function only needs to produce a finite number.
//!
//! # Built-in formulas
//!
//! | Emotion   | Formula                                   |
//! |-----------|-------------------------------------------|
//! | Anger     | (AU4 + AU7 + max(AU23, AU24)) / 3          |
//! | Disgust   | (AU9 + AU10) × 0.5                         |
//! | Fear      | (max(AU1, AU2) + AU5 + AU20) / 3           |
//! | Happiness | (1 − w)·AU12 + w·AU6, w = cheek weight     |
//! | Sadness   | (AU1 + AU15 + AU17) / 3                    |
//! | Smile     | AU12                                      |
//! | Surprise  | (max(AU1, AU2) + AU5 + AU26) / 3           |

use emotrace_face_model::{
    ActivationError, EmotionKind, FaceActionUnit, FaceFrame, DEFAULT_CHEEK_WEIGHT,
};

use FaceActionUnit::*;

/// A pure mapping from a frame to one emotion's raw intensity.
pub trait ActivationFunction: Send + Sync {
    /// Compute the raw (unsmoothed) intensity for `frame`.
    fn activate(&self, frame: &FaceFrame) -> Result<f32, ActivationError>;
}

impl<F> ActivationFunction for F
where
    F: Fn(&FaceFrame) -> Result<f32, ActivationError> + Send + Sync,
{
    fn activate(&self, frame: &FaceFrame) -> Result<f32, ActivationError> {
        self(frame)
    }
}

/// Pin a closure to the activation-function signature.
///
/// Helps inference when a closure is stored or passed through generics.
pub fn activation_fn<F>(f: F) -> F
where
    F: Fn(&FaceFrame) -> Result<f32, ActivationError> + Send + Sync,
{
    f
}

/// The built-in emotion formulas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuiltinEmotion {
    Anger,
    Disgust,
    Fear,
    /// `cheek_weight` is the share of AU6 in the blend, `[0.0, 1.0]`.
    Happiness {
        cheek_weight: f32,
    },
    Sadness,
    Smile,
    Surprise,
}

impl BuiltinEmotion {
    /// All built-ins in table order.
    pub fn all(cheek_weight: f32) -> [BuiltinEmotion; 7] {
        [
            Self::Anger,
            Self::Disgust,
            Self::Fear,
            Self::Happiness { cheek_weight },
            Self::Sadness,
            Self::Smile,
            Self::Surprise,
        ]
    }

    /// Happiness with the default cheek weight.
    pub fn happiness() -> Self {
        Self::Happiness {
            cheek_weight: DEFAULT_CHEEK_WEIGHT,
        }
    }

    /// Look up the built-in formula for `kind`.
    pub fn from_kind(kind: &EmotionKind, cheek_weight: f32) -> Option<Self> {
        Self::all(cheek_weight)
            .into_iter()
            .find(|builtin| &builtin.kind() == kind)
    }

    pub fn kind(&self) -> EmotionKind {
        match self {
            Self::Anger => EmotionKind::ANGER,
            Self::Disgust => EmotionKind::DISGUST,
            Self::Fear => EmotionKind::FEAR,
            Self::Happiness { .. } => EmotionKind::HAPPINESS,
            Self::Sadness => EmotionKind::SADNESS,
            Self::Smile => EmotionKind::SMILE,
            Self::Surprise => EmotionKind::SURPRISE,
        }
    }
}

impl ActivationFunction for BuiltinEmotion {
    fn activate(&self, frame: &FaceFrame) -> Result<f32, ActivationError> {
        let au = |unit| frame.try_intensity(unit);

        let value = match *self {
            Self::Anger => {
                (au(BrowLowerer)? + au(LidTightener)? + au(LipTightener)?.max(au(LipPressor)?))
                    / 3.0
            }
            Self::Disgust => (au(NoseWrinkler)? + au(UpperLipRaiser)?) * 0.5,
            Self::Fear => {
                (au(InnerBrowRaiser)?.max(au(OuterBrowRaiser)?)
                    + au(UpperLidRaiser)?
                    + au(LipStretcher)?)
                    / 3.0
            }
            Self::Happiness { cheek_weight } => {
                (1.0 - cheek_weight) * au(LipCornerPuller)? + cheek_weight * au(CheekRaiser)?
            }
            Self::Sadness => {
                (au(InnerBrowRaiser)? + au(LipCornerDepressor)? + au(ChinRaiser)?) / 3.0
            }
            Self::Smile => au(LipCornerPuller)?,
            Self::Surprise => {
                (au(InnerBrowRaiser)?.max(au(OuterBrowRaiser)?)
                    + au(UpperLidRaiser)?
                    + au(JawDrop)?)
                    / 3.0
            }
        };

        Ok(value)
    }
}
