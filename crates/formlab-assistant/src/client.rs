//! The [`Assistant`] trait and its HTTP implementation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use formlab_config::config::AssistantConfig;

use crate::error::{AssistantError, Result};

/// API version header sent with every request.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anything that turns a prompt into a completion.
pub trait Assistant {
    fn complete(&self, prompt: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ---------------------------------------------------------------------------
// HttpAssistant
// ---------------------------------------------------------------------------

/// Client for an Anthropic-style `/v1/messages` endpoint.
pub struct HttpAssistant {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: Option<String>,
    api_key_env: String,
}

impl HttpAssistant {
    /// Builds a client from config, reading the key from `api-key-env`.
    pub fn from_config(config: &AssistantConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::new(config, api_key)
    }

    pub fn new(config: &AssistantConfig, api_key: Option<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        Self {
            agent,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_key,
            api_key_env: config.api_key_env.clone(),
        }
    }
}

impl Assistant for HttpAssistant {
    fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AssistantError::MissingApiKey {
                var: self.api_key_env.clone(),
            })?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(endpoint = %self.endpoint, model = %self.model, chars = prompt.chars().count(), "sending prompt");
        let mut response = self
            .agent
            .post(self.endpoint.as_str())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send_json(&body)?;

        let parsed: MessagesResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| AssistantError::Malformed(e.to_string()))?;
        let text = parsed.into_text().ok_or(AssistantError::EmptyResponse)?;

        info!(model = %self.model, chars = text.chars().count(), "assistant answered");
        Ok(text)
    }
}
