//! Facial Action Coding System (FACS) action units.
//!
//! Only the units read by the built-in activation formulas are modelled.
//! Units are serialized by their FACS code (`"AU12"`) so frame logs stay
//! readable next to the output of common face trackers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A facial action unit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaceActionUnit {
    #[serde(rename = "AU1")]
    InnerBrowRaiser,
    #[serde(rename = "AU2")]
    OuterBrowRaiser,
    #[serde(rename = "AU4")]
    BrowLowerer,
    #[serde(rename = "AU5")]
    UpperLidRaiser,
    #[serde(rename = "AU6")]
    CheekRaiser,
    #[serde(rename = "AU7")]
    LidTightener,
    #[serde(rename = "AU9")]
    NoseWrinkler,
    #[serde(rename = "AU10")]
    UpperLipRaiser,
    #[serde(rename = "AU12")]
    LipCornerPuller,
    #[serde(rename = "AU15")]
    LipCornerDepressor,
    #[serde(rename = "AU17")]
    ChinRaiser,
    #[serde(rename = "AU20")]
    LipStretcher,
    #[serde(rename = "AU23")]
    LipTightener,
    #[serde(rename = "AU24")]
    LipPressor,
    #[serde(rename = "AU26")]
    JawDrop,
}

impl FaceActionUnit {
    /// Every modelled unit, in FACS numbering order.
    pub const ALL: [FaceActionUnit; 15] = [
        Self::InnerBrowRaiser,
        Self::OuterBrowRaiser,
        Self::BrowLowerer,
        Self::UpperLidRaiser,
        Self::CheekRaiser,
        Self::LidTightener,
        Self::NoseWrinkler,
        Self::UpperLipRaiser,
        Self::LipCornerPuller,
        Self::LipCornerDepressor,
        Self::ChinRaiser,
        Self::LipStretcher,
        Self::LipTightener,
        Self::LipPressor,
        Self::JawDrop,
    ];

    /// FACS number (the `12` in `AU12`).
    pub fn number(self) -> u8 {
        match self {
            Self::InnerBrowRaiser => 1,
            Self::OuterBrowRaiser => 2,
            Self::BrowLowerer => 4,
            Self::UpperLidRaiser => 5,
            Self::CheekRaiser => 6,
            Self::LidTightener => 7,
            Self::NoseWrinkler => 9,
            Self::UpperLipRaiser => 10,
            Self::LipCornerPuller => 12,
            Self::LipCornerDepressor => 15,
            Self::ChinRaiser => 17,
            Self::LipStretcher => 20,
            Self::LipTightener => 23,
            Self::LipPressor => 24,
            Self::JawDrop => 26,
        }
    }

    /// FACS code, e.g. `"AU12"`.
    pub fn code(self) -> &'static str {
        match self {
            Self::InnerBrowRaiser => "AU1",
            Self::OuterBrowRaiser => "AU2",
            Self::BrowLowerer => "AU4",
            Self::UpperLidRaiser => "AU5",
            Self::CheekRaiser => "AU6",
            Self::LidTightener => "AU7",
            Self::NoseWrinkler => "AU9",
            Self::UpperLipRaiser => "AU10",
            Self::LipCornerPuller => "AU12",
            Self::LipCornerDepressor => "AU15",
            Self::ChinRaiser => "AU17",
            Self::LipStretcher => "AU20",
            Self::LipTightener => "AU23",
            Self::LipPressor => "AU24",
            Self::JawDrop => "AU26",
        }
    }

    /// Human-readable muscle movement name.
    pub fn description(self) -> &'static str {
        match self {
            Self::InnerBrowRaiser => "inner brow raiser",
            Self::OuterBrowRaiser => "outer brow raiser",
            Self::BrowLowerer => "brow lowerer",
            Self::UpperLidRaiser => "upper lid raiser",
            Self::CheekRaiser => "cheek raiser",
            Self::LidTightener => "lid tightener",
            Self::NoseWrinkler => "nose wrinkler",
            Self::UpperLipRaiser => "upper lip raiser",
            Self::LipCornerPuller => "lip corner puller",
            Self::LipCornerDepressor => "lip corner depressor",
            Self::ChinRaiser => "chin raiser",
            Self::LipStretcher => "lip stretcher",
            Self::LipTightener => "lip tightener",
            Self::LipPressor => "lip pressor",
            Self::JawDrop => "jaw drop",
        }
    }
}

impl fmt::Display for FaceActionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for FaceActionUnit {
    type Err = UnknownActionUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|au| au.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownActionUnit {
                code: trimmed.to_string(),
            })
    }
}

/// Returned when a string does not name a modelled action unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action unit: {code}")]
pub struct UnknownActionUnit {
    pub code: String,
}
