use crate::safety::Tone;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    pub created_at: String,
}

impl ConversationMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            tone: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn assistant(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
            tone: Some(tone),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// One user's coach conversation. Appended to on every exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub id: String,
    pub user_id: String,
    pub messages: Vec<ConversationMessage>,
    pub created_at: String,
    pub updated_at: String,
}

impl ConversationRecord {
    pub fn new(user_id: impl Into<String>) -> Self {
        let timestamp = Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            messages: Vec::new(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }

    /// Drop the oldest messages so at most `max_messages` remain.
    pub fn trim_to(&mut self, max_messages: usize) -> usize {
        let excess = self.messages.len().saturating_sub(max_messages);
        if excess > 0 {
            self.messages.drain(..excess);
        }
        excess
    }
}
