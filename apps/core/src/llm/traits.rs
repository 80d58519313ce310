use crate::error::AppError;
use async_trait::async_trait;

/// Defines the public interface for a chat-completion backend.
///
/// This trait abstracts the specific provider, allowing the rewrite service to
/// run against OpenRouter in production and against scripted stubs in tests.
#[async_trait]
pub trait ChatCompletion: Send + Sync + 'static {
    /// Sends one system + user exchange and returns the assistant's text.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: Option<f32>,
    ) -> Result<String, AppError>;
}
