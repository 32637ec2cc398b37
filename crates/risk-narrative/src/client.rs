//! Hosted chat-completion client
//!
//! OpenAI-style `/chat/completions` over reqwest. The endpoint, key, and
//! model come from configuration; the request shape is {model, role-tagged
//! messages, temperature} and the response is the first choice's content.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chat-completion errors. All of these are "hosted-service faults" to the
/// caller: they short-circuit the quality gate and surface as a fixed
/// user-facing message, never as a crash.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("API key is not configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("response contained no choices")]
    EmptyResponse,
}

/// Role-tagged message in a completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the chat-completion API.
    pub api_base: String,
    /// Bearer token; absent means every call fails with `MissingApiKey`.
    pub api_key: Option<String>,
    /// Model identifier sent with each request.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_sec: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4".to_string(),
            timeout_sec: 60,
        }
    }
}

impl ChatConfig {
    /// Read configuration from the environment (OPENAI_API_KEY,
    /// OPENAI_API_BASE, OPENAI_MODEL), falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base: std::env::var("OPENAI_API_BASE").unwrap_or(defaults.api_base),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            timeout_sec: defaults.timeout_sec,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// The seam between the narrative engine and the hosted service. Implemented
/// by `ChatClient` for production and by scripted fakes in tests.
pub trait CompletionBackend: Send + Sync {
    fn complete(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f64,
    ) -> BoxFuture<'_, Result<String, ChatError>>;
}

/// reqwest-backed chat-completion client.
pub struct ChatClient {
    config: ChatConfig,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_sec))
            .build()
            .expect("Failed to create HTTP client");
        Self { config, client }
    }

    pub fn from_env() -> Self {
        Self::new(ChatConfig::from_env())
    }

    async fn complete_inner(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
    ) -> Result<String, ChatError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ChatError::MissingApiKey)?;

        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or(ChatError::EmptyResponse)
    }
}

impl CompletionBackend for ChatClient {
    fn complete(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f64,
    ) -> BoxFuture<'_, Result<String, ChatError>> {
        Box::pin(async move { self.complete_inner(&messages, temperature).await })
    }
}
