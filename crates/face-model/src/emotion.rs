//! Emotion kind identifiers.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an emotion channel.
///
/// Kinds are open: any non-empty string names a channel, and the engine
/// rejects an empty name at registration. The built-in kinds are provided
/// as constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionKind(Cow<'static, str>);

impl EmotionKind {
    pub const ANGER: EmotionKind = EmotionKind::from_static("anger");
    pub const DISGUST: EmotionKind = EmotionKind::from_static("disgust");
    pub const FEAR: EmotionKind = EmotionKind::from_static("fear");
    pub const HAPPINESS: EmotionKind = EmotionKind::from_static("happiness");
    pub const SADNESS: EmotionKind = EmotionKind::from_static("sadness");
    pub const SMILE: EmotionKind = EmotionKind::from_static("smile");
    pub const SURPRISE: EmotionKind = EmotionKind::from_static("surprise");

    /// Kinds that ship with a built-in activation formula.
    pub const BUILTIN: [EmotionKind; 7] = [
        Self::ANGER,
        Self::DISGUST,
        Self::FEAR,
        Self::HAPPINESS,
        Self::SADNESS,
        Self::SMILE,
        Self::SURPRISE,
    ];

    /// Create a kind from a static name.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Create a kind from any name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this kind has a built-in activation formula.
    pub fn is_builtin(&self) -> bool {
        Self::BUILTIN.contains(self)
    }
}

impl fmt::Display for EmotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&'static str> for EmotionKind {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for EmotionKind {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for EmotionKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_static_and_owned_kinds_compare_equal() {
        assert_eq!(EmotionKind::HAPPINESS, EmotionKind::new("happiness"));

        let mut set = HashSet::new();
        set.insert(EmotionKind::SMILE);
        assert!(set.contains(&EmotionKind::new(String::from("smile"))));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&EmotionKind::SURPRISE).unwrap();
        assert_eq!(json, "\"surprise\"");
        let kind: EmotionKind = serde_json::from_str("\"contempt\"").unwrap();
        assert_eq!(kind.as_str(), "contempt");
    }
}
