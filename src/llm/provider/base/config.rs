//! Per-adapter settings
//!
//! Everything an adapter needs besides the HTTP client: who it talks to,
//! with which key and model.

use std::time::Duration;

use crate::config::AppConfig;
use crate::llm::provider::catalog::{ProviderDescriptor, ProviderId};
use crate::llm::provider::utils::mask_api_key;

/// Resolved settings for one adapter instance.
#[derive(Clone)]
pub struct BackendConfig {
    pub provider: ProviderId,
    /// Display name used in logs and errors (`"OpenAI"`, `"Mistral AI"`, ...).
    pub name: String,
    pub api_key: String,
    /// Base URL without trailing slash; operation paths are appended.
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Per-request timeout overriding the client default.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("provider", &self.provider)
            .field("name", &self.name)
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BackendConfig {
    /// Builds settings from the catalog entry and application config.
    ///
    /// `[llm.providers.<id>] endpoint` replaces the catalog base URL.
    pub fn resolve(
        descriptor: &ProviderDescriptor,
        config: &AppConfig,
        api_key: &str,
        model: &str,
    ) -> Self {
        let base_url = config
            .llm
            .endpoint_for(descriptor.id)
            .unwrap_or_else(|| descriptor.base_url.to_string());

        Self {
            provider: descriptor.id,
            name: descriptor.name.to_string(),
            api_key: api_key.trim().to_string(),
            base_url,
            model: model.to_string(),
            max_tokens: config.llm.max_tokens_for(descriptor.id),
            timeout: None,
        }
    }

    /// Full URL for an operation path.
    pub fn endpoint(&self, path: &str) -> String {
        super::super::utils::complete_endpoint(&self.base_url, path)
    }
}
