use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::base::{ApiBackend, BackendConfig, send_llm_request};
use crate::error::{CodelensError, Result};
use crate::llm::Operation;
use crate::llm::prompt::{self, PromptStyle};

/// Chat-completion path appended to the base URL.
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// OpenAI-style chat-completion provider
///
/// Serves every backend that speaks `POST {base}/chat/completions` natively:
/// OpenAI and xAI with JSON mode, Perplexity with prompted JSON.
///
/// # Request shape
/// ```json
/// {
///   "model": "gpt-4o",
///   "messages": [
///     {"role": "system", "content": "<persona>"},
///     {"role": "user", "content": "<template + code>"}
///   ],
///   "temperature": 0.3,
///   "response_format": {"type": "json_object"}
/// }
/// ```
///
/// The reply text is `choices[0].message.content`.
pub struct OpenAIProvider {
    client: Client,
    config: BackendConfig,
    endpoint: String,
    json_mode: bool,
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<MessagePayload<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct MessagePayload<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
pub(crate) struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIResponse {
    /// First choice's message text.
    pub(crate) fn into_text(self, provider: &str) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CodelensError::MalformedResponse {
                provider: provider.to_string(),
                reason: "response contains no choices".to_string(),
                raw: String::new(),
            })
    }
}

impl OpenAIProvider {
    /// Builds a chat-completion provider.
    ///
    /// `json_mode` adds `response_format: json_object`; without it the system
    /// prompt insists on JSON instead.
    pub fn new(client: Client, config: BackendConfig, json_mode: bool) -> Self {
        let endpoint = config.endpoint(CHAT_COMPLETIONS_PATH);
        Self {
            client,
            config,
            endpoint,
            json_mode,
        }
    }

    fn prompt_style(&self) -> PromptStyle {
        if self.json_mode {
            PromptStyle::StructuredOutput
        } else {
            PromptStyle::JsonOnly
        }
    }
}

#[async_trait]
impl ApiBackend for OpenAIProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn call_api(&self, operation: Operation, code: &str, language: &str) -> Result<String> {
        let system = prompt::system_prompt(operation, self.prompt_style());
        let user = prompt::user_prompt(operation, code, language);

        let request = OpenAIRequest {
            model: &self.config.model,
            messages: vec![
                MessagePayload {
                    role: "system",
                    content: &system,
                },
                MessagePayload {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: operation.temperature(),
            response_format: self.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        tracing::debug!(
            "{} API request: op={}, model={}, temperature={}, json_mode={}, system_len={}, user_len={}",
            self.config.name,
            operation,
            self.config.model,
            operation.temperature(),
            self.json_mode,
            system.len(),
            user.len()
        );

        let auth_header = format!("Bearer {}", self.config.api_key);
        let response: OpenAIResponse = send_llm_request(
            &self.client,
            &self.endpoint,
            &[("Authorization", auth_header.as_str())],
            &request,
            &self.config.name,
            self.config.timeout,
        )
        .await?;

        response.into_text(&self.config.name)
    }
}
