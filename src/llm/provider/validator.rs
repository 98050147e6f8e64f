//! Credential probe
//!
//! One cheap request per backend to confirm a key is accepted. Every failure,
//! including an unknown backend, collapses to `false`.

use reqwest::Client;
use serde::Serialize;

use super::base::{BackendConfig, probe_get, probe_post};
use super::catalog::{self, ProviderDescriptor, ProviderId};
use super::claude::{ANTHROPIC_VERSION, MESSAGES_PATH};
use super::gemini::{
    GeminiContent, GeminiPart, GeminiRequest, GenerationConfig, generate_content_path,
};
use super::openai::CHAT_COMPLETIONS_PATH;
use super::utils::mask_api_key;
use super::{ProviderFactory, create_http_client};
use crate::config::AppConfig;
use crate::error::Result;

const ANTHROPIC_PROBE_MODEL: &str = "claude-3-haiku-20240307";
const GEMINI_PROBE_MODEL: &str = "gemini-1.5-flash";
const PERPLEXITY_PROBE_MODEL: &str = "llama-3.1-sonar-small-128k-online";
const COHERE_PROBE_MODEL: &str = "command";
const MISTRAL_PROBE_MODEL: &str = "mistral-small-latest";
const HUGGINGFACE_PROBE_PATH: &str = "/microsoft/DialoGPT-large";
const TOGETHER_PROBE_MODEL: &str = "meta-llama/Llama-2-7b-chat-hf";

#[derive(Serialize)]
struct ChatProbe<'a> {
    model: &'a str,
    messages: [ProbeMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ProbeMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct CohereProbe<'a> {
    model: &'a str,
    message: &'a str,
    max_tokens: u32,
}

#[derive(Serialize)]
struct InferenceProbe<'a> {
    inputs: &'a str,
}

impl<'a> ChatProbe<'a> {
    fn new(model: &'a str, content: &'a str) -> Self {
        Self {
            model,
            messages: [ProbeMessage {
                role: "user",
                content,
            }],
            max_tokens: 1,
        }
    }
}

/// Checks whether a backend accepts a credential.
///
/// Holds no state besides the HTTP client and the endpoint overrides from
/// [`AppConfig`].
#[derive(Clone)]
pub struct CredentialValidator {
    client: Client,
    config: AppConfig,
}

impl CredentialValidator {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: create_http_client(&config.network)?,
            config: config.clone(),
        })
    }

    /// Validator sharing a factory's client and config.
    pub fn from_factory(factory: &ProviderFactory) -> Self {
        Self {
            client: factory.client().clone(),
            config: factory.config().clone(),
        }
    }

    /// `true` when the probe call for `backend_id` succeeds with `credential`.
    ///
    /// Never fails: unknown backends, blank keys, non-2xx statuses and
    /// connection errors all yield `false`.
    pub async fn validate(&self, backend_id: &str, credential: &str) -> bool {
        let Ok(descriptor) = catalog::describe(backend_id) else {
            tracing::debug!("Credential probe skipped: unknown provider '{}'", backend_id);
            return false;
        };
        if credential.trim().is_empty() {
            return false;
        }

        tracing::debug!(
            "Probing {} with key {}",
            descriptor.id,
            mask_api_key(credential.trim())
        );

        match self.probe(descriptor, credential).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("{} credential rejected: {}", descriptor.id, e);
                false
            }
        }
    }

    async fn probe(&self, descriptor: &'static ProviderDescriptor, credential: &str) -> Result<()> {
        let backend = BackendConfig::resolve(
            descriptor,
            &self.config,
            credential,
            descriptor.default_model(),
        );
        let bearer = format!("Bearer {}", backend.api_key);
        let auth = [("Authorization", bearer.as_str())];
        let name = backend.name.as_str();

        match descriptor.id {
            ProviderId::OpenAI | ProviderId::XAI => {
                probe_get(&self.client, &backend.endpoint("/models"), &auth, name).await
            }
            ProviderId::Anthropic => {
                let request = ChatProbe::new(ANTHROPIC_PROBE_MODEL, "Hi");
                probe_post(
                    &self.client,
                    &backend.endpoint(MESSAGES_PATH),
                    &[
                        ("x-api-key", backend.api_key.as_str()),
                        ("anthropic-version", ANTHROPIC_VERSION),
                    ],
                    &request,
                    name,
                )
                .await
            }
            ProviderId::Gemini => {
                let request = GeminiRequest {
                    contents: vec![GeminiContent {
                        role: "user",
                        parts: vec![GeminiPart { text: "Test" }],
                    }],
                    generation_config: GenerationConfig {
                        temperature: None,
                        response_mime_type: None,
                        max_output_tokens: Some(1),
                    },
                };
                probe_post(
                    &self.client,
                    &backend.endpoint(&generate_content_path(GEMINI_PROBE_MODEL)),
                    &[("x-goog-api-key", backend.api_key.as_str())],
                    &request,
                    name,
                )
                .await
            }
            ProviderId::Perplexity | ProviderId::Mistral | ProviderId::Together => {
                let model = match descriptor.id {
                    ProviderId::Perplexity => PERPLEXITY_PROBE_MODEL,
                    ProviderId::Mistral => MISTRAL_PROBE_MODEL,
                    _ => TOGETHER_PROBE_MODEL,
                };
                let request = ChatProbe::new(model, "Test");
                probe_post(
                    &self.client,
                    &backend.endpoint(CHAT_COMPLETIONS_PATH),
                    &auth,
                    &request,
                    name,
                )
                .await
            }
            ProviderId::Cohere => {
                let request = CohereProbe {
                    model: COHERE_PROBE_MODEL,
                    message: "Test",
                    max_tokens: 1,
                };
                probe_post(&self.client, &backend.endpoint("/generate"), &auth, &request, name)
                    .await
            }
            ProviderId::HuggingFace => {
                let request = InferenceProbe { inputs: "Test" };
                probe_post(
                    &self.client,
                    &backend.endpoint(HUGGINGFACE_PROBE_PATH),
                    &auth,
                    &request,
                    name,
                )
                .await
            }
        }
    }
}
