use super::fallback::{CachedResponse, cached_responses, select_cached_response};
use super::prompts::{
    coach_system_prompt, resume_analysis_system_prompt, rewrite_section_system_prompt,
};
use super::resume::parse_resume_analysis;
use super::types::{
    CoachResponse, ResponseSource, ResumeAnalysis, UserContext, validate_user_id,
};
use crate::config::Config;
use crate::conversation::{ConversationRecord, ConversationStore};
use crate::error::{CoachError, Result};
use crate::llm::{self, ChatProvider, CompletionRequest, sanitize_api_error};
use crate::safety::{
    CRISIS_MESSAGE, CrisisDetector, EmotionalCategory, EmotionalClassifier, EmotionalState,
    KeywordTable, Tone, crisis_resources, redact,
};
use crate::storage::{self, KvStore};
use crate::usage::{Clock, QuotaStatus, QuotaTracker, SystemClock, Tier, TokenLedger, UsagePeriod};
use std::sync::Arc;

const CRISIS_CONFIDENCE: f64 = 1.0;
const DEFAULT_MAX_MESSAGE_CHARS: usize = 2_000;
const DEFAULT_MAX_HISTORY_MESSAGES: usize = 200;

/// Model settings applied to every upstream request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        let provider = crate::config::ProviderConfig::default();
        Self {
            model: provider.model,
            temperature: provider.temperature,
            max_tokens: provider.max_tokens,
        }
    }
}

/// Coach safety and response pipeline.
///
/// Every dependency is injected through [`CoachEngineBuilder`]; nothing is
/// looked up from global state.
pub struct CoachEngine {
    provider: Arc<dyn ChatProvider>,
    crisis: CrisisDetector,
    classifier: EmotionalClassifier,
    quota: QuotaTracker,
    tokens: TokenLedger,
    conversations: ConversationStore,
    settings: CompletionSettings,
    max_message_chars: usize,
}

pub struct CoachEngineBuilder {
    provider: Arc<dyn ChatProvider>,
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    keywords: KeywordTable,
    quota: crate::config::QuotaConfig,
    settings: CompletionSettings,
    max_message_chars: usize,
    max_history_messages: usize,
}

impl CoachEngineBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn free_daily_limit(mut self, limit: u32) -> Self {
        self.quota.free_daily_limit = limit;
        self
    }

    pub fn settings(mut self, settings: CompletionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn max_message_chars(mut self, max: usize) -> Self {
        self.max_message_chars = max;
        self
    }

    pub fn max_history_messages(mut self, max: usize) -> Self {
        self.max_history_messages = max;
        self
    }

    /// Copy quota, model, history and safety limits from `config`.
    pub fn config(mut self, config: &Config) -> Self {
        self.quota = config.quota.clone();
        self.settings = CompletionSettings {
            model: config.provider.model.clone(),
            temperature: config.provider.temperature,
            max_tokens: config.provider.max_tokens,
        };
        self.max_message_chars = config.safety.max_message_chars;
        self.max_history_messages = config.conversation.max_messages;
        self
    }

    pub fn build(self) -> CoachEngine {
        CoachEngine {
            crisis: CrisisDetector::new(&self.keywords),
            classifier: EmotionalClassifier::new(&self.keywords),
            quota: QuotaTracker::new(Arc::clone(&self.store), Arc::clone(&self.clock), &self.quota),
            tokens: TokenLedger::new(Arc::clone(&self.store), self.clock),
            conversations: ConversationStore::new(self.store, self.max_history_messages),
            provider: self.provider,
            settings: self.settings,
            max_message_chars: self.max_message_chars,
        }
    }
}

impl CoachEngine {
    pub fn builder(provider: Arc<dyn ChatProvider>, store: Arc<dyn KvStore>) -> CoachEngineBuilder {
        CoachEngineBuilder {
            provider,
            store,
            clock: Arc::new(SystemClock),
            keywords: KeywordTable::default(),
            quota: crate::config::QuotaConfig::default(),
            settings: CompletionSettings::default(),
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            max_history_messages: DEFAULT_MAX_HISTORY_MESSAGES,
        }
    }

    /// Wire the engine from configuration: storage backend, provider and
    /// optional keyword override file.
    pub async fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = storage::create_store(config).await?;
        let provider: Arc<dyn ChatProvider> = Arc::from(llm::create_provider(config));
        let keywords = match &config.safety.keywords_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading keyword tables");
                KeywordTable::load(path)?
            }
            None => KeywordTable::default(),
        };

        Ok(Self::builder(provider, store)
            .keywords(keywords)
            .config(config)
            .build())
    }

    fn validate_message(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(CoachError::validation("message is empty"));
        }
        let chars = text.chars().count();
        if chars > self.max_message_chars {
            return Err(CoachError::validation(format!(
                "message is {chars} characters; the limit is {}",
                self.max_message_chars
            )));
        }
        Ok(())
    }

    /// Run one coach exchange.
    ///
    /// Quota is checked before anything else, so an exhausted free user is
    /// blocked even when the message contains crisis language. Crisis
    /// messages return the fixed hotline reply without calling the model.
    /// Provider failures fall back to a cached reply, and history persistence
    /// failures are logged without discarding the reply.
    pub async fn send_message(&self, text: &str, context: &UserContext) -> Result<CoachResponse> {
        context.validate()?;
        self.validate_message(text)?;
        let user_id = context.user_id.as_str();

        let remaining = self.quota.check_and_increment(user_id, context.tier).await?;
        tracing::debug!(user_id, remaining, tier = %context.tier, "Message admitted");

        let crisis_matches = self.crisis.matches(text);
        if !crisis_matches.is_empty() {
            tracing::warn!(
                user_id,
                phrases = crisis_matches.len(),
                "Crisis language detected; returning hotline resources"
            );
            return Ok(crisis_response(crisis_matches));
        }

        let state = self.classifier.classify(text);
        let tone = crate::safety::select_tone(&state);
        tracing::debug!(
            user_id,
            primary = %state.primary,
            confidence = state.confidence,
            tone = %tone,
            "Classified message"
        );

        let redacted_message = redact(text);
        let request = CompletionRequest::new(
            redacted_message.to_string(),
            self.settings.model.as_str(),
            self.settings.temperature,
        )
        .with_system_prompt(coach_system_prompt(tone, context, &state))
        .with_max_tokens(self.settings.max_tokens);

        let (reply, tokens_used, source) = match self.provider.complete(&request).await {
            Ok(response) if !response.content.trim().is_empty() => (
                response.content.trim().to_string(),
                response.tokens_used(),
                ResponseSource::Model,
            ),
            Ok(_) => self.fallback_reply(user_id, text, tone, "empty completion"),
            Err(error) => {
                let reason = sanitize_api_error(&error.to_string());
                self.fallback_reply(user_id, text, tone, &reason)
            }
        };

        if tokens_used > 0
            && let Err(error) = self.tokens.record(user_id, tokens_used).await
        {
            tracing::warn!(user_id, tokens = tokens_used, "Failed to record token usage: {error}");
        }

        let reply = redact(&reply).into_owned();
        if let Err(error) = self
            .conversations
            .append_exchange(user_id, &redacted_message, &reply, tone)
            .await
        {
            tracing::warn!(user_id, "Failed to persist conversation: {error}");
        }

        Ok(CoachResponse {
            message: reply,
            tone,
            emotional_state: state,
            requires_professional_help: false,
            resources: Vec::new(),
            tokens_used,
            source,
        })
    }

    fn fallback_reply(
        &self,
        user_id: &str,
        text: &str,
        tone: Tone,
        reason: &str,
    ) -> (String, u64, ResponseSource) {
        let cached = select_cached_response(text, tone);
        tracing::warn!(
            user_id,
            provider = self.provider.name(),
            category = %cached.category,
            "Chat completion failed, using cached response: {reason}"
        );
        (cached.response.to_string(), 0, ResponseSource::Cached)
    }

    pub fn detect_emotional_state(&self, text: &str) -> EmotionalState {
        self.classifier.classify(text)
    }

    pub fn select_tone(&self, state: &EmotionalState) -> Tone {
        crate::safety::select_tone(state)
    }

    pub fn is_crisis(&self, text: &str) -> bool {
        self.crisis.detect(text)
    }

    pub async fn get_conversation_history(&self, user_id: &str) -> Result<Vec<ConversationRecord>> {
        validate_user_id(user_id)?;
        self.conversations.history(user_id).await
    }

    pub async fn clear_conversation_history(&self, user_id: &str) -> Result<()> {
        validate_user_id(user_id)?;
        let removed = self.conversations.clear(user_id).await?;
        tracing::info!(user_id, removed, "Cleared conversation history");
        Ok(())
    }

    pub async fn get_message_count(&self, user_id: &str, period: UsagePeriod) -> Result<u32> {
        validate_user_id(user_id)?;
        self.quota.message_count(user_id, period).await
    }

    pub async fn get_remaining_messages(&self, user_id: &str, tier: Tier) -> Result<u32> {
        validate_user_id(user_id)?;
        self.quota.remaining(user_id, tier).await
    }

    pub async fn get_quota_status(&self, user_id: &str, tier: Tier) -> Result<QuotaStatus> {
        validate_user_id(user_id)?;
        self.quota.status(user_id, tier).await
    }

    pub async fn get_token_usage(&self, user_id: &str, period: UsagePeriod) -> Result<u64> {
        validate_user_id(user_id)?;
        self.tokens.total(user_id, period).await
    }

    pub fn get_cached_responses(&self) -> &'static [CachedResponse] {
        cached_responses()
    }

    /// Review a resume against a target role. No cached fallback exists here;
    /// provider failures and unparseable replies surface as errors.
    pub async fn analyze_resume(&self, resume_text: &str, target_role: &str) -> Result<ResumeAnalysis> {
        require_text("resume text", resume_text)?;
        require_text("target role", target_role)?;

        let request = CompletionRequest::new(
            redact(resume_text).into_owned(),
            self.settings.model.as_str(),
            self.settings.temperature,
        )
        .with_system_prompt(resume_analysis_system_prompt(target_role.trim()))
        .with_max_tokens(self.settings.max_tokens.max(1_000));

        let content = self.complete_strict(&request).await?;
        parse_resume_analysis(&content).map_err(|message| {
            CoachError::external(self.provider.name(), sanitize_api_error(&message))
        })
    }

    pub async fn rewrite_section(
        &self,
        section_text: &str,
        section_name: &str,
        target_role: &str,
    ) -> Result<String> {
        require_text("section text", section_text)?;
        require_text("section name", section_name)?;
        require_text("target role", target_role)?;

        let request = CompletionRequest::new(
            redact(section_text).into_owned(),
            self.settings.model.as_str(),
            self.settings.temperature,
        )
        .with_system_prompt(rewrite_section_system_prompt(
            section_name.trim(),
            target_role.trim(),
        ))
        .with_max_tokens(self.settings.max_tokens);

        self.complete_strict(&request).await
    }

    async fn complete_strict(&self, request: &CompletionRequest) -> Result<String> {
        let response = self.provider.complete(request).await.map_err(|error| {
            CoachError::external(self.provider.name(), sanitize_api_error(&error.to_string()))
        })?;
        let content = response.content.trim();
        if content.is_empty() {
            return Err(CoachError::external(
                self.provider.name(),
                "empty completion",
            ));
        }
        Ok(content.to_string())
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoachError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn crisis_response(triggers: Vec<String>) -> CoachResponse {
    CoachResponse {
        message: CRISIS_MESSAGE.to_string(),
        tone: Tone::Pragmatist,
        emotional_state: EmotionalState {
            primary: EmotionalCategory::Crisis,
            confidence: CRISIS_CONFIDENCE,
            triggers,
            requires_support: true,
        },
        requires_professional_help: true,
        resources: crisis_resources(),
        tokens_used: 0,
        source: ResponseSource::Crisis,
    }
}
