//! OpenAI-compatible chat-completion client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LlmError;

use super::prompt::Prompt;

/// Endpoint base used when no custom base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Sampling temperature for every summary request.
pub const TEMPERATURE: f32 = 0.7;

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Trait for turning a prompt into summary text.
///
/// This abstraction allows mocking the remote API in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Send one request and return the generated text. Never retries.
    async fn summarize(&self, prompt: &Prompt, max_tokens: u32) -> Result<String, LlmError>;
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

/// Connection settings for [`ChatClient`].
///
/// The API key is passed in explicitly; the client never reads it from the
/// environment.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub model: String,
    /// Base for API-compatible providers, e.g. `http://localhost:11434/v1`.
    pub base_url: Option<String>,
    pub timeout: Duration,
}

/// Chat-completion client for OpenAI and API-compatible providers.
pub struct ChatClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
    timeout_secs: u64,
}

impl ChatClient {
    pub fn new(settings: ClientSettings) -> Result<Self, LlmError> {
        if settings.api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential);
        }

        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| LlmError::ClientBuild(e.to_string()))?;

        let endpoint = chat_endpoint(settings.base_url.as_deref());
        debug!(%endpoint, model = %settings.model, "Constructed chat-completion client");

        Ok(Self {
            http,
            api_key: settings.api_key,
            model: settings.model,
            endpoint,
            timeout_secs: settings.timeout.as_secs(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Build the chat-completions URL from an optional base.
fn chat_endpoint(base_url: Option<&str>) -> String {
    let base = base_url
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(DEFAULT_BASE_URL);
    format!("{}/chat/completions", base.trim_end_matches('/'))
}

/// Pull the first choice's text out of a response body.
fn extract_content(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("malformed JSON: {e}")))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?
        .message
        .content
        .ok_or_else(|| LlmError::InvalidResponse("choice has no content".to_string()))?;

    if content.trim().is_empty() {
        return Err(LlmError::InvalidResponse("content is empty".to_string()));
    }

    Ok(content.trim().to_string())
}

#[async_trait]
impl Summarizer for ChatClient {
    async fn summarize(&self, prompt: &Prompt, max_tokens: u32) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens,
        };

        info!(url = %self.endpoint, model = %self.model, max_tokens, "Requesting summary");
        debug!(
            system_len = prompt.system.len(),
            user_len = prompt.user.len(),
            "Prompt sizes"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout_secs)
            } else {
                LlmError::Network(e.to_string())
            }
        })?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let content = extract_content(&body)?;
        debug!(response_len = content.len(), "Received summary");
        Ok(content)
    }
}
