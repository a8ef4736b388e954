pub mod compatible;
pub mod reliable;
pub mod scrub;
pub mod traits;
pub mod types;

pub use compatible::{OpenAiCompatibleProvider, build_provider_client};
pub use reliable::ReliableProvider;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::{ChatProvider, CompletionFuture};
pub use types::{CompletionRequest, CompletionResponse, FinishReason, ProviderStatusError};

use crate::config::Config;

/// Build the configured upstream provider wrapped in retry handling.
pub fn create_provider(config: &Config) -> Box<dyn ChatProvider> {
    let provider = &config.provider;
    tracing::debug!(
        provider = provider.name.as_str(),
        model = provider.model.as_str(),
        "Creating chat provider"
    );
    let inner = OpenAiCompatibleProvider::new(
        &provider.name,
        &provider.base_url,
        provider.api_key.as_deref(),
        provider.timeout_secs,
    );
    Box::new(ReliableProvider::single(
        Box::new(inner),
        config.reliability.max_retries,
        config.reliability.base_backoff_ms,
    ))
}
