use super::keywords::{KeywordTable, matched_phrases, normalize};
use serde::{Deserialize, Serialize};

/// Fixed reply for the crisis path. Independent of user context.
pub const CRISIS_MESSAGE: &str = "I'm really concerned about what you're sharing, and I'm glad you said it out loud. \
You don't have to carry this alone. Please reach out to someone right now:\n\n\
- Call or text 988 (Suicide & Crisis Lifeline, 24/7)\n\
- Text HOME to 741741 (Crisis Text Line)\n\
- Chat online at 988lifeline.org\n\n\
Losing a job is painful, but it does not define your worth. You matter, and people are ready to help.";

pub const LIFELINE_NAME: &str = "988 Suicide & Crisis Lifeline";
pub const LIFELINE_CONTACT: &str = "Call or text 988";
pub const TEXT_LINE_NAME: &str = "Crisis Text Line";
pub const TEXT_LINE_CONTACT: &str = "Text HOME to 741741";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisResource {
    pub name: String,
    pub contact: String,
}

pub fn crisis_resources() -> Vec<CrisisResource> {
    vec![
        CrisisResource {
            name: LIFELINE_NAME.to_string(),
            contact: LIFELINE_CONTACT.to_string(),
        },
        CrisisResource {
            name: TEXT_LINE_NAME.to_string(),
            contact: TEXT_LINE_CONTACT.to_string(),
        },
    ]
}

/// Scans raw user text for crisis phrases.
#[derive(Debug, Clone)]
pub struct CrisisDetector {
    phrases: Vec<String>,
}

impl CrisisDetector {
    pub fn new(table: &KeywordTable) -> Self {
        Self {
            phrases: table.crisis.clone(),
        }
    }

    pub fn detect(&self, text: &str) -> bool {
        let haystack = normalize(text);
        self.phrases
            .iter()
            .any(|phrase| !phrase.is_empty() && haystack.contains(phrase.as_str()))
    }

    /// Every crisis phrase present in `text`, in table order.
    pub fn matches(&self, text: &str) -> Vec<String> {
        let haystack = normalize(text);
        matched_phrases(&haystack, &self.phrases)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl Default for CrisisDetector {
    fn default() -> Self {
        Self::new(&KeywordTable::default())
    }
}
