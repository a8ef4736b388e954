use serde::{Deserialize, Serialize};

/// Primary emotional reading of a single inbound message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmotionalCategory {
    Discouraged,
    Deflecting,
    #[default]
    Neutral,
    /// Set only on the crisis path; the classifier never produces it.
    Crisis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalState {
    pub primary: EmotionalCategory,
    pub confidence: f64,
    pub triggers: Vec<String>,
    pub requires_support: bool,
}

impl EmotionalState {
    pub fn neutral() -> Self {
        Self {
            primary: EmotionalCategory::Neutral,
            confidence: super::classifier::NEUTRAL_CONFIDENCE,
            triggers: Vec::new(),
            requires_support: false,
        }
    }
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Voice the coach uses to phrase a reply.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Tone {
    Hype,
    #[default]
    Pragmatist,
    ToughLove,
}
