use super::types::{CompletionRequest, CompletionResponse};
use std::future::Future;
use std::pin::Pin;

pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = anyhow::Result<CompletionResponse>> + Send + 'a>>;

/// Upstream chat-completion capability.
pub trait ChatProvider: Send + Sync {
    /// Provider identifier (e.g. "openai").
    fn name(&self) -> &str;

    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;
}
