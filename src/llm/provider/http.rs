use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::base::{ApiBackend, BackendConfig, DecodePolicy, send_llm_request};
use super::openai::{CHAT_COMPLETIONS_PATH, OpenAIResponse};
use crate::error::Result;
use crate::llm::Operation;
use crate::llm::prompt::{self, PromptStyle};

/// Generic OpenAI-compatible HTTP provider
///
/// Used for Cohere, Mistral, HuggingFace and Together: base URL plus bearer
/// token, chat-completions body with short personas and an explicit
/// `max_tokens`. A reply that is not JSON degrades to
/// `{error: "Invalid JSON response", content}` instead of failing.
pub struct HttpProvider {
    client: Client,
    config: BackendConfig,
    endpoint: String,
}

#[derive(Serialize)]
struct HttpRequest<'a> {
    model: &'a str,
    messages: Vec<MessagePayload<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct MessagePayload<'a> {
    role: &'static str,
    content: &'a str,
}

impl HttpProvider {
    pub fn new(client: Client, config: BackendConfig) -> Self {
        let endpoint = config.endpoint(CHAT_COMPLETIONS_PATH);
        Self {
            client,
            config,
            endpoint,
        }
    }
}

#[async_trait]
impl ApiBackend for HttpProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn call_api(&self, operation: Operation, code: &str, language: &str) -> Result<String> {
        let system = prompt::system_prompt(operation, PromptStyle::Generic);
        let user = prompt::user_prompt(operation, code, language);

        let request = HttpRequest {
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
            max_tokens: self.config.max_tokens,
        };

        tracing::debug!(
            "{} API request: op={}, model={}, endpoint={}, timeout={:?}",
            self.config.name,
            operation,
            self.config.model,
            self.endpoint,
            self.config.timeout
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

    fn decode_policy(&self) -> DecodePolicy {
        DecodePolicy::DegradeOnInvalidJson
    }
}
