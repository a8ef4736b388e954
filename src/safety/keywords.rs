use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Phrases that indicate possible self-harm risk.
pub const DEFAULT_CRISIS_PHRASES: [&str; 7] = [
    "suicide",
    "kill myself",
    "end it all",
    "not worth living",
    "better off dead",
    "harm myself",
    "self harm",
];

pub const DEFAULT_DISCOURAGED_TRIGGERS: [&str; 8] = [
    "hopeless",
    "lost",
    "worthless",
    "failure",
    "burnt out",
    "depressed",
    "giving up",
    "can't do this",
];

pub const DEFAULT_DEFLECTING_TRIGGERS: [&str; 7] = [
    "lazy",
    "they screwed me",
    "no one will hire me",
    "this is rigged",
    "it's not fair",
    "blame",
    "everyone else",
];

/// Keyword tables driving the crisis detector and the emotional classifier.
///
/// The tables are data so they can be replaced from a TOML file without
/// touching the matching code. Phrases are stored normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub crisis: Vec<String>,
    #[serde(default)]
    pub discouraged: Vec<String>,
    #[serde(default)]
    pub deflecting: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            crisis: to_owned_list(&DEFAULT_CRISIS_PHRASES),
            discouraged: to_owned_list(&DEFAULT_DISCOURAGED_TRIGGERS),
            deflecting: to_owned_list(&DEFAULT_DEFLECTING_TRIGGERS),
        }
    }
}

impl KeywordTable {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let parsed: Self = toml::from_str(raw)
            .map_err(|error| ConfigError::Load(format!("keyword table: {error}")))?;
        parsed.normalized()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Normalize every phrase and reject tables that would disable crisis
    /// detection.
    fn normalized(self) -> Result<Self, ConfigError> {
        let table = Self {
            crisis: normalize_list(self.crisis),
            discouraged: normalize_list(self.discouraged),
            deflecting: normalize_list(self.deflecting),
        };

        if table.crisis.is_empty() {
            return Err(ConfigError::Validation(
                "keyword table must contain at least one crisis phrase".into(),
            ));
        }

        Ok(table)
    }
}

/// Canonical form used on both sides of every keyword match.
///
/// Lowercases, folds typographic apostrophes to `'`, treats hyphens as
/// spaces and collapses whitespace runs.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        let c = match c {
            '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
            '-' | '\u{2010}' | '\u{2011}' => ' ',
            other => other,
        };

        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.extend(c.to_lowercase());
    }

    out
}

/// Phrases from `phrases` that occur in the already-normalized `haystack`,
/// in table order.
pub fn matched_phrases<'a>(haystack: &str, phrases: &'a [String]) -> Vec<&'a str> {
    phrases
        .iter()
        .filter(|phrase| !phrase.is_empty() && haystack.contains(phrase.as_str()))
        .map(String::as_str)
        .collect()
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| normalize(item)).collect()
}

fn normalize_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let phrase = normalize(&item);
        if !phrase.is_empty() && !out.contains(&phrase) {
            out.push(phrase);
        }
    }
    out
}
