use super::traits::{ChatProvider, CompletionFuture};
use super::types::{CompletionRequest, ProviderStatusError};
use std::time::Duration;

const MAX_BACKOFF_MS: u64 = 10_000;

/// Check if an error is non-retryable (client errors that won't resolve with retries).
fn is_non_retryable(err: &anyhow::Error) -> bool {
    if let Some(status) = err.downcast_ref::<ProviderStatusError>() {
        return !status.is_retryable();
    }
    if let Some(reqwest_err) = err.downcast_ref::<reqwest::Error>()
        && let Some(status) = reqwest_err.status()
    {
        let code = status.as_u16();
        return status.is_client_error() && code != 429 && code != 408;
    }
    err.to_string().contains("API key not set")
}

/// Provider wrapper with retry + fallback behavior.
pub struct ReliableProvider {
    providers: Vec<(String, Box<dyn ChatProvider>)>,
    max_retries: u32,
    base_backoff_ms: u64,
}

impl ReliableProvider {
    pub fn new(
        providers: Vec<(String, Box<dyn ChatProvider>)>,
        max_retries: u32,
        base_backoff_ms: u64,
    ) -> Self {
        Self {
            providers,
            max_retries,
            base_backoff_ms: base_backoff_ms.max(1),
        }
    }

    pub fn single(provider: Box<dyn ChatProvider>, max_retries: u32, base_backoff_ms: u64) -> Self {
        let name = provider.name().to_string();
        Self::new(vec![(name, provider)], max_retries, base_backoff_ms)
    }
}

impl ChatProvider for ReliableProvider {
    fn name(&self) -> &str {
        self.providers
            .first()
            .map_or("reliable", |(name, _)| name.as_str())
    }

    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(async move {
            let mut failures = Vec::new();

            for (provider_name, provider) in &self.providers {
                let mut backoff_ms = self.base_backoff_ms;

                for attempt in 0..=self.max_retries {
                    match provider.complete(request).await {
                        Ok(response) => {
                            if attempt > 0 {
                                tracing::info!(
                                    provider = provider_name.as_str(),
                                    attempt,
                                    "Provider recovered after retries"
                                );
                            }
                            return Ok(response);
                        }
                        Err(e) => {
                            let non_retryable = is_non_retryable(&e);
                            failures.push(format!(
                                "{provider_name} attempt {}/{}: {e}",
                                attempt + 1,
                                self.max_retries + 1
                            ));

                            if non_retryable {
                                tracing::warn!(
                                    provider = provider_name.as_str(),
                                    "Non-retryable error, switching provider"
                                );
                                break;
                            }

                            if attempt < self.max_retries {
                                tracing::warn!(
                                    provider = provider_name.as_str(),
                                    attempt = attempt + 1,
                                    max_retries = self.max_retries,
                                    "Provider call failed, retrying"
                                );
                                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                                backoff_ms = backoff_ms.saturating_mul(2).min(MAX_BACKOFF_MS);
                            }
                        }
                    }
                }
            }

            anyhow::bail!("All providers failed. Attempts:\n{}", failures.join("\n"))
        })
    }
}
