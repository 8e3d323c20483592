use std::env;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AiClientError;

/// Per-request deadline for AI calls. The upstream oracle contract has no
/// timeout, so a stuck call would otherwise block the quiz indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiConfig {
    /// Read the AI configuration from `RECAP_AI_*` environment variables.
    ///
    /// Returns `None` when no API key is set; the client then reports
    /// `AiClientError::Disabled` instead of making requests.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("RECAP_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("RECAP_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("RECAP_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Minimal chat-completions client shared by the generator and the oracle.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    config: Option<AiConfig>,
}

impl AiClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<AiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Generate free text from a prompt.
    ///
    /// # Errors
    ///
    /// Returns `AiClientError` when the client is disabled, the request fails
    /// or times out, or the response is empty.
    pub async fn generate(&self, prompt: &str) -> Result<String, AiClientError> {
        let config = self.config.as_ref().ok_or(AiClientError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AiClientError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AiClientError::EmptyResponse)?;

        if content.trim().is_empty() {
            return Err(AiClientError::EmptyResponse);
        }
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
