use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Text-in, text-out access to a language model.
///
/// Implementations may return quasi-structured output wrapped in a code
/// fence; callers strip it with [`crate::ai::strip_code_fence`].
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError` when the model is unavailable or the call fails.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl LlmConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("STUDY_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("STUDY_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("STUDY_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        let timeout = env::var("STUDY_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map_or(Duration::from_secs(120), Duration::from_secs);
        Some(Self {
            base_url,
            api_key,
            model,
            temperature: 0.3,
            timeout,
        })
    }
}

/// OpenAI-compatible chat completions client.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    config: Option<LlmConfig>,
}

impl ChatCompletionsClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(LlmConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<LlmConfig>) -> Self {
        let client = match &config {
            Some(config) => Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_default(),
            None => Client::new(),
        };
        Self { client, config }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionsClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let config = self.config.as_ref().ok_or(LlmError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: config.temperature,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LlmError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_client_is_disabled() {
        let client = ChatCompletionsClient::new(None);
        assert!(!client.enabled());
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Disabled));
    }

    #[test]
    fn parses_chat_response_shape() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":" [] "}}]}"#;
        let body: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.choices[0].message.content.as_deref(), Some(" [] "));
    }
}
