//! OpenAI-compatible chat completions provider.
//! Any endpoint that accepts `POST {base_url}/chat/completions` works here.

use super::scrub::sanitize_api_error;
use super::traits::{ChatProvider, CompletionFuture};
use super::types::{CompletionRequest, CompletionResponse, FinishReason, ProviderStatusError};
use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub fn build_provider_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}

pub struct OpenAiCompatibleProvider {
    pub(crate) name: String,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
    cached_auth: Option<String>,
    cached_chat_url: String,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(name: &str, base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let cached_chat_url = if base_url.ends_with("chat/completions") {
            base_url.clone()
        } else {
            format!("{base_url}/chat/completions")
        };
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(ToString::to_string);

        Self {
            name: name.to_string(),
            cached_auth: api_key.as_ref().map(|key| format!("Bearer {key}")),
            api_key,
            base_url,
            cached_chat_url,
            client: build_provider_client(timeout_secs),
        }
    }

    fn chat_completions_url(&self) -> &str {
        &self.cached_chat_url
    }

    async fn call_chat_completions(&self, request: &ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        let Some(auth) = &self.cached_auth else {
            anyhow::bail!(
                "{} API key not set. Set NEXT_CHAPTER_API_KEY or provider.api_key in config.toml.",
                self.name
            );
        };

        let response = self
            .client
            .post(self.chat_completions_url())
            .header("Authorization", auth)
            .json(request)
            .send()
            .await
            .with_context(|| format!("{} chat completions request failed", self.name))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
            return Err(ProviderStatusError {
                provider: self.name.clone(),
                status: status.as_u16(),
                body: sanitize_api_error(&body),
            }
            .into());
        }

        response
            .json()
            .await
            .with_context(|| format!("{} chat completions JSON decode failed", self.name))
    }

    async fn complete_internal(
        &self,
        request: &CompletionRequest,
    ) -> anyhow::Result<CompletionResponse> {
        let capacity = if request.system_prompt.is_some() { 2 } else { 1 };
        let mut messages = Vec::with_capacity(capacity);
        if let Some(system) = request.system_prompt.as_deref() {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }
        messages.push(Message {
            role: "user",
            content: &request.message,
        });

        let chat_request = ChatRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let chat_response = self.call_chat_completions(&chat_request).await?;
        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No response from {}", self.name))?;
        let text = choice
            .message
            .content
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| anyhow::anyhow!("{} returned an empty completion", self.name))?;

        let mut response = match chat_response.usage {
            Some(usage) => {
                CompletionResponse::with_usage(text, usage.prompt_tokens, usage.completion_tokens)
            }
            None => CompletionResponse::text_only(text),
        };
        response.finish_reason = FinishReason::from_api(choice.finish_reason.as_deref());
        if let Some(model) = chat_response.model {
            response = response.with_model(model);
        }
        Ok(response)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(self.complete_internal(request))
    }
}
