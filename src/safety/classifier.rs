use super::keywords::{KeywordTable, matched_phrases, normalize};
use super::types::{EmotionalCategory, EmotionalState};

pub const NEUTRAL_CONFIDENCE: f64 = 0.5;
const MATCHED_BASE_CONFIDENCE: f64 = 0.7;
const CONFIDENCE_STEP_PER_EXTRA_TRIGGER: f64 = 0.1;
const MATCHED_MAX_CONFIDENCE: f64 = 0.95;

/// Keyword-driven emotional state classifier.
///
/// Discouraged triggers take precedence over deflecting ones; a message with
/// no trigger is neutral.
#[derive(Debug, Clone)]
pub struct EmotionalClassifier {
    discouraged: Vec<String>,
    deflecting: Vec<String>,
}

impl EmotionalClassifier {
    pub fn new(table: &KeywordTable) -> Self {
        Self {
            discouraged: table.discouraged.clone(),
            deflecting: table.deflecting.clone(),
        }
    }

    pub fn classify(&self, text: &str) -> EmotionalState {
        let haystack = normalize(text);

        let discouraged = matched_phrases(&haystack, &self.discouraged);
        if !discouraged.is_empty() {
            return matched_state(EmotionalCategory::Discouraged, &discouraged);
        }

        let deflecting = matched_phrases(&haystack, &self.deflecting);
        if !deflecting.is_empty() {
            return matched_state(EmotionalCategory::Deflecting, &deflecting);
        }

        EmotionalState::neutral()
    }
}

impl Default for EmotionalClassifier {
    fn default() -> Self {
        Self::new(&KeywordTable::default())
    }
}

fn matched_state(primary: EmotionalCategory, triggers: &[&str]) -> EmotionalState {
    EmotionalState {
        primary,
        confidence: confidence_for(triggers.len()),
        triggers: triggers.iter().map(|t| (*t).to_string()).collect(),
        requires_support: true,
    }
}

fn confidence_for(trigger_count: usize) -> f64 {
    let extra = u32::try_from(trigger_count.saturating_sub(1)).unwrap_or(u32::MAX);
    (MATCHED_BASE_CONFIDENCE + f64::from(extra) * CONFIDENCE_STEP_PER_EXTRA_TRIGGER)
        .min(MATCHED_MAX_CONFIDENCE)
}
