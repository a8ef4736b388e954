use crate::error::{CoachError, Result};
use crate::safety::{CrisisResource, EmotionalState, Tone};
use crate::usage::Tier;
use serde::{Deserialize, Serialize};

/// Length of the structured recovery plan.
pub const PLAN_LENGTH_DAYS: u32 = 30;

/// Who is talking to the coach. Lives for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub days_since_layoff: Option<u32>,
    #[serde(default)]
    pub plan_day: Option<u32>,
    #[serde(default)]
    pub tier: Tier,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_days_since_layoff(mut self, days: u32) -> Self {
        self.days_since_layoff = Some(days);
        self
    }

    pub fn with_plan_day(mut self, day: u32) -> Self {
        self.plan_day = Some(day);
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_user_id(&self.user_id)?;
        if self.plan_day == Some(0) {
            return Err(CoachError::validation("plan day starts at 1"));
        }
        Ok(())
    }
}

/// User ids become part of storage keys, so the key separator is rejected.
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(CoachError::validation("user id is required"));
    }
    if user_id.contains('/') || user_id.chars().any(char::is_control) {
        return Err(CoachError::validation(
            "user id must not contain '/' or control characters",
        ));
    }
    Ok(())
}

/// Where the text of a [`CoachResponse`] came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponseSource {
    #[default]
    Model,
    Cached,
    Crisis,
}

/// Reply envelope returned by `send_message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachResponse {
    pub message: String,
    pub tone: Tone,
    pub emotional_state: EmotionalState,
    pub requires_professional_help: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<CrisisResource>,
    pub tokens_used: u64,
    #[serde(default)]
    pub source: ResponseSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    pub score: u8,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFeedback {
    pub name: String,
    pub quality: u8,
    pub suggestions: Vec<String>,
}

/// Structured resume review. Scores are percentages (0-100).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub overall_score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub keyword_match: KeywordMatch,
    pub sections: Vec<SectionFeedback>,
    pub ai_insights: String,
}
