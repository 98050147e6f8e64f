//! LLM provider configuration structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CodelensError, Result};
use crate::llm::provider::catalog::ProviderId;

/// Per-provider overrides.
///
/// Settings for one entry under `[llm.providers.<id>]`. Keys are catalog
/// identifiers (`openai`, `anthropic`, `mistral`, ...).
///
/// # Example
/// ```toml
/// [llm.providers.openai]
/// endpoint = "https://openai-proxy.example.com/v1"
/// max_tokens = 2000
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Base URL replacing the catalog default.
    ///
    /// Operation paths (`/chat/completions`, `/messages`, ...) are appended to it.
    pub endpoint: Option<String>,

    /// Overrides `llm.max_tokens` for this provider.
    pub max_tokens: Option<u32>,
}

impl ProviderConfig {
    /// Validates provider configuration.
    pub fn validate(&self, name: &str) -> Result<()> {
        if let Some(ref endpoint) = self.endpoint {
            let trimmed = endpoint.trim();
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(CodelensError::Config(format!(
                    "Provider '{}': endpoint '{}' must start with http:// or https://",
                    name, endpoint
                )));
            }
        }
        if self.max_tokens == Some(0) {
            return Err(CodelensError::Config(format!(
                "Provider '{}': max_tokens cannot be 0",
                name
            )));
        }
        Ok(())
    }
}

/// LLM configuration.
///
/// # Fields
/// - `default_provider`: catalog identifier used when `--provider` is omitted
/// - `allow_unlisted_models`: accept model identifiers missing from the catalog
/// - `max_tokens`: completion budget sent with message-style and generic requests (default: `4000`)
/// - `providers`: per-provider overrides
///
/// # Example
/// ```toml
/// [llm]
/// default_provider = "anthropic"
/// allow_unlisted_models = false
/// max_tokens = 4000
///
/// [llm.providers.together]
/// endpoint = "https://api.together.xyz/v1"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LLMConfig {
    /// Catalog identifier used by default.
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Skip the catalog membership check on model identifiers.
    #[serde(default)]
    pub allow_unlisted_models: bool,

    /// Completion token budget.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Provider overrides keyed by catalog identifier.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            allow_unlisted_models: false,
            max_tokens: default_max_tokens(),
            providers: HashMap::new(),
        }
    }
}

impl LLMConfig {
    /// Validates LLM configuration.
    pub fn validate(&self) -> Result<()> {
        self.default_provider
            .parse::<ProviderId>()
            .map_err(|_| {
                CodelensError::Config(format!(
                    "llm.default_provider '{}' is not a known provider",
                    self.default_provider
                ))
            })?;

        if self.max_tokens == 0 {
            return Err(CodelensError::Config("llm.max_tokens cannot be 0".into()));
        }

        for (name, provider) in &self.providers {
            if name.parse::<ProviderId>().is_err() {
                return Err(CodelensError::Config(format!(
                    "[llm.providers.{}] does not name a known provider",
                    name
                )));
            }
            provider.validate(name)?;
        }
        Ok(())
    }

    /// Override entry for a provider, if configured.
    pub fn provider(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Endpoint override for a provider, trimmed of trailing slashes.
    pub fn endpoint_for(&self, id: ProviderId) -> Option<String> {
        self.provider(id)
            .and_then(|p| p.endpoint.as_deref())
            .map(|e| e.trim().trim_end_matches('/').to_string())
    }

    /// Effective token budget for a provider.
    pub fn max_tokens_for(&self, id: ProviderId) -> u32 {
        self.provider(id)
            .and_then(|p| p.max_tokens)
            .unwrap_or(self.max_tokens)
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}
