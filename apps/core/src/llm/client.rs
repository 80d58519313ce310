use crate::config::LlmSettings;
use crate::error::AppError;
use crate::llm::traits::ChatCompletion;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for the OpenRouter chat-completions endpoint.
///
/// Rate-limited calls (HTTP 429) are retried with exponential backoff; every
/// other failure is returned immediately.
pub struct OpenRouterClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl OpenRouterClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, AppError> {
        let api_key = settings.api_key.clone().ok_or_else(|| {
            let msg = "OPENROUTER_API_KEY is not set. Rewrites cannot reach the model without it.";
            error!("{}", msg);
            AppError::Config(msg.to_string())
        })?;

        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            max_retries: settings.max_retries.max(1),
            retry_base_delay: settings.retry_base_delay,
        })
    }

    /// Delay before retry number `attempt` (0-based): base, 2x base, 4x base...
    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[async_trait]
impl ChatCompletion for OpenRouterClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: Option<f32>,
    ) -> Result<String, AppError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            max_tokens: self.max_tokens,
            temperature: temperature.unwrap_or(self.temperature),
        };

        let mut attempt = 0;
        let response = loop {
            let response = self
                .client
                .post(&self.api_url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                break response;
            }

            attempt += 1;
            if attempt >= self.max_retries {
                warn!("Rate limited after {} attempts", attempt);
                return Err(AppError::RateLimited);
            }

            let wait = self.backoff(attempt - 1);
            info!(
                "Rate limited, retrying in {:?} (attempt {}/{})",
                wait, attempt, self.max_retries
            );
            tokio::time::sleep(wait).await;
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "Completion request failed with status {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Malformed completion body: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| AppError::Llm("No content in completion response".to_string()))?;

        debug!("Completion received ({} chars)", content.chars().count());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> LlmSettings {
        LlmSettings {
            api_url: format!("{}/chat/completions", server.uri()),
            api_key: Some("sk-test".to_string()),
            retry_base_delay: Duration::from_millis(5),
            ..LlmSettings::default()
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let settings = LlmSettings::default();
        assert!(matches!(OpenRouterClient::new(&settings), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_complete_success() {
        // 1. Arrange
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Polished.")))
            .expect(1)
            .mount(&mock_server)
            .await;
        let client = OpenRouterClient::new(&settings_for(&mock_server)).unwrap();

        // 2. Act
        let result = client.complete("system", "user", None).await;

        // 3. Assert
        assert_eq!(result.unwrap(), "Polished.");
    }

    #[tokio::test]
    async fn test_server_error_is_llm_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;
        let client = OpenRouterClient::new(&settings_for(&mock_server)).unwrap();

        let result = client.complete("system", "user", None).await;

        if let Err(AppError::Llm(msg)) = result {
            assert!(msg.contains("status 500"));
            assert!(msg.contains("Internal Server Error"));
        } else {
            panic!("Expected AppError::Llm, got {:?}", result);
        }
    }

    #[tokio::test]
    async fn test_persistent_rate_limit_uses_all_attempts() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .expect(3)
            .mount(&mock_server)
            .await;
        let client = OpenRouterClient::new(&settings_for(&mock_server)).unwrap();

        let result = client.complete("system", "user", None).await;

        assert!(matches!(result, Err(AppError::RateLimited)));
    }

    #[tokio::test]
    async fn test_rate_limit_then_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .mount(&mock_server)
            .await;
        let client = OpenRouterClient::new(&settings_for(&mock_server)).unwrap();

        let result = client.complete("system", "user", Some(0.3)).await;

        assert_eq!(result.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_empty_choices_is_llm_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&mock_server)
            .await;
        let client = OpenRouterClient::new(&settings_for(&mock_server)).unwrap();

        let result = client.complete("system", "user", None).await;

        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[tokio::test]
    async fn test_backoff_doubles() {
        let settings = LlmSettings {
            api_key: Some("k".into()),
            retry_base_delay: Duration::from_secs(1),
            ..LlmSettings::default()
        };
        let client = OpenRouterClient::new(&settings).unwrap();
        assert_eq!(client.backoff(0), Duration::from_secs(1));
        assert_eq!(client.backoff(1), Duration::from_secs(2));
        assert_eq!(client.backoff(2), Duration::from_secs(4));
    }
}
