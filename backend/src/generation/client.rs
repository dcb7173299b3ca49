//! Client for OpenAI-compatible chat completion endpoints.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

use super::TextGenerator;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for [`ChatCompletionClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// API root, e.g. `https://api.openai.com/v1`
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl GenerationConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load the settings from environment variables.
    ///
    /// # Environment Variables
    /// - `LLM_API_URL` (required): API root
    /// - `LLM_API_KEY` (optional): bearer key
    /// - `LLM_MODEL` (optional, default: gpt-4o-mini)
    /// - `LLM_TEMPERATURE` (optional, default: 0.7)
    /// - `LLM_MAX_TOKENS` (optional, default: 4096)
    /// - `LLM_TIMEOUT_SECS` (optional, default: 120)
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("LLM_API_URL").context("LLM_API_URL environment variable not set")?;
        let mut config = Self::new(api_url);

        config.api_key = env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());
        if let Ok(model) = env::var("LLM_MODEL") {
            config.model = model;
        }
        if let Ok(v) = env::var("LLM_TEMPERATURE") {
            config.temperature = v.parse().context("LLM_TEMPERATURE must be a number")?;
        }
        if let Ok(v) = env::var("LLM_MAX_TOKENS") {
            config.max_tokens = v.parse().context("LLM_MAX_TOKENS must be a whole number")?;
        }
        if let Ok(v) = env::var("LLM_TIMEOUT_SECS") {
            config.timeout_secs = v.parse().context("LLM_TIMEOUT_SECS must be a whole number")?;
        }

        Ok(config)
    }
}

/// Chat client for `{api_url}/chat/completions`.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl ChatCompletionClient {
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_url)
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send request to the text generator")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Text generator request failed with status {}: {}", status, body);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse text generator response")?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("No choices in text generator response")?;
        debug!(chars = content.len(), "Text generator replied");
        Ok(content)
    }
}
