use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::base::{ApiBackend, BackendConfig, send_llm_request};
use crate::error::{CodelensError, Result};
use crate::llm::Operation;
use crate::llm::prompt::{self, PromptStyle};

/// Messages path appended to the base URL.
pub const MESSAGES_PATH: &str = "/messages";

/// Anthropic API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic message-style provider
///
/// Sends a top-level `system` prompt plus one user message to
/// `POST {base}/messages`, authenticated with `x-api-key`. The message API has no
/// structured-output switch, so the persona demands JSON and the reply is the
/// first `text` content block.
pub struct ClaudeProvider {
    client: Client,
    config: BackendConfig,
    endpoint: String,
}

#[derive(Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<MessagePayload<'a>>,
}

#[derive(Serialize)]
struct MessagePayload<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl ClaudeProvider {
    pub fn new(client: Client, config: BackendConfig) -> Self {
        let endpoint = config.endpoint(MESSAGES_PATH);
        Self {
            client,
            config,
            endpoint,
        }
    }
}

#[async_trait]
impl ApiBackend for ClaudeProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn call_api(&self, operation: Operation, code: &str, language: &str) -> Result<String> {
        let system = prompt::system_prompt(operation, PromptStyle::JsonOnly);
        let user = prompt::user_prompt(operation, code, language);

        let request = ClaudeRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: operation.temperature(),
            system: &system,
            messages: vec![MessagePayload {
                role: "user",
                content: &user,
            }],
        };

        tracing::debug!(
            "Claude API request: op={}, model={}, max_tokens={}, system_len={}, user_len={}",
            operation,
            self.config.model,
            self.config.max_tokens,
            system.len(),
            user.len()
        );

        let response: ClaudeResponse = send_llm_request(
            &self.client,
            &self.endpoint,
            &[
                ("x-api-key", self.config.api_key.as_str()),
                ("anthropic-version", ANTHROPIC_VERSION),
            ],
            &request,
            &self.config.name,
            self.config.timeout,
        )
        .await?;

        response
            .content
            .into_iter()
            .find(|block| block.content_type == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| CodelensError::MalformedResponse {
                provider: self.config.name.clone(),
                reason: "response contains no text content block".to_string(),
                raw: String::new(),
            })
    }
}
