use super::types::{ConversationMessage, ConversationRecord};
use crate::error::{Result, StorageError};
use crate::safety::Tone;
use crate::storage::KvStore;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub fn conversation_key(user_id: &str) -> String {
    format!("coach/conversation/{user_id}")
}

/// Conversation history persisted as one JSON document per user.
///
/// Appends are read-modify-write on that document, so writers for the same
/// user are serialized through a per-user lock.
pub struct ConversationStore {
    store: Arc<dyn KvStore>,
    max_messages: usize,
    user_locks: Mutex<BTreeMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ConversationStore {
    pub fn new(store: Arc<dyn KvStore>, max_messages: usize) -> Self {
        Self {
            store,
            max_messages: max_messages.max(2),
            user_locks: Mutex::new(BTreeMap::new()),
        }
    }

    fn user_lock(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .user_locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        locks
            .entry(user_id.to_owned())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    pub async fn load(&self, user_id: &str) -> Result<Option<ConversationRecord>> {
        let key = conversation_key(user_id);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };

        let record = serde_json::from_str::<ConversationRecord>(&raw).map_err(|error| {
            StorageError::Corrupt {
                key,
                message: error.to_string(),
            }
        })?;
        Ok(Some(record))
    }

    /// Append a user message and the coach reply. Both texts must already be
    /// redacted.
    pub async fn append_exchange(
        &self,
        user_id: &str,
        user_text: &str,
        assistant_text: &str,
        tone: Tone,
    ) -> Result<ConversationRecord> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let mut record = match self.load(user_id).await {
            Ok(Some(record)) => record,
            Ok(None) => ConversationRecord::new(user_id),
            Err(error) => {
                // An unreadable record would otherwise block every future save.
                tracing::warn!(user_id, "Replacing unreadable conversation record: {error}");
                ConversationRecord::new(user_id)
            }
        };

        record.messages.push(ConversationMessage::user(user_text));
        record
            .messages
            .push(ConversationMessage::assistant(assistant_text, tone));
        let trimmed = record.trim_to(self.max_messages);
        if trimmed > 0 {
            tracing::debug!(user_id, trimmed, "Trimmed conversation history");
        }
        record.updated_at = Utc::now().to_rfc3339();

        let serialized = serde_json::to_string(&record)
            .map_err(|error| anyhow::anyhow!("serialize conversation record: {error}"))?;
        self.store
            .set(&conversation_key(user_id), &serialized)
            .await?;
        Ok(record)
    }

    pub async fn history(&self, user_id: &str) -> Result<Vec<ConversationRecord>> {
        Ok(self.load(user_id).await?.into_iter().collect())
    }

    pub async fn clear(&self, user_id: &str) -> Result<bool> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;
        Ok(self.store.remove(&conversation_key(user_id)).await?)
    }
}
