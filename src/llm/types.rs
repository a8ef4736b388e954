use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One chat-completion call: a system prompt plus a single user turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system_prompt: Option<String>,
    pub message: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(message: impl Into<String>, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            system_prompt: None,
            message: message.into(),
            model: model.into(),
            temperature,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn from_api(value: Option<&str>) -> Self {
        match value {
            Some("stop") => Self::Stop,
            Some("length") => Self::Length,
            Some("content_filter") => Self::ContentFilter,
            Some(_) | None => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub model: Option<String>,
    pub finish_reason: FinishReason,
}

impl CompletionResponse {
    pub fn text_only(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            input_tokens: None,
            output_tokens: None,
            model: None,
            finish_reason: FinishReason::Stop,
        }
    }

    pub fn with_usage(content: impl Into<String>, input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens: Some(input_tokens),
            output_tokens: Some(output_tokens),
            ..Self::text_only(content)
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Total billed tokens, 0 when the provider did not report usage.
    pub fn tokens_used(&self) -> u64 {
        self.input_tokens.unwrap_or(0) + self.output_tokens.unwrap_or(0)
    }
}

/// Non-2xx reply from a provider endpoint. The body is already sanitized.
#[derive(Debug, Error)]
#[error("{provider} API error ({status}): {body}")]
pub struct ProviderStatusError {
    pub provider: String,
    pub status: u16,
    pub body: String,
}

impl ProviderStatusError {
    /// 4xx errors other than timeouts and rate limits won't resolve with
    /// retries, and neither will an exhausted billing quota.
    pub fn is_retryable(&self) -> bool {
        if is_quota_exhausted(&self.body) {
            return false;
        }
        !(400..500).contains(&self.status) || self.status == 408 || self.status == 429
    }
}

fn is_quota_exhausted(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("insufficient_quota")
        || lower.contains("exceeded your current quota")
        || lower.contains("billing")
}
