pub mod base;
pub mod catalog;
pub mod claude;
pub mod gemini;
pub mod http;
pub mod openai;
pub mod utils;
pub mod validator;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{AppConfig, NetworkConfig};
use crate::error::{CodelensError, Result};
use crate::llm::{AnalysisRequest, Operation};
use base::{ApiBackend, BackendConfig, DecodePolicy, validate_api_key};
use catalog::{AdapterFamily, ProviderDescriptor};

pub use validator::CredentialValidator;

/// 创建 HTTP 客户端
///
/// 由 `ProviderFactory` 持有并在其创建的所有 adapter 间共享连接池。
/// `NetworkConfig` 决定 timeout 配置。
pub(crate) fn create_http_client(network_config: &NetworkConfig) -> Result<Client> {
    let user_agent = format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(network_config.request_timeout))
        .connect_timeout(Duration::from_secs(network_config.connect_timeout))
        .build()
        .map_err(|e| CodelensError::Config(format!("failed to create HTTP client: {}", e)))
}

/// A constructed adapter, one variant per family.
///
/// The families are a closed set; [`ProviderFactory::create`] picks the variant
/// from the catalog entry. Every variant satisfies
/// [`AnalysisProvider`](crate::llm::AnalysisProvider).
pub enum Adapter {
    ChatCompletion(openai::OpenAIProvider),
    Message(claude::ClaudeProvider),
    GenerativeContent(gemini::GeminiProvider),
    GenericHttp(http::HttpProvider),
}

impl Adapter {
    fn backend(&self) -> &dyn ApiBackend {
        match self {
            Adapter::ChatCompletion(p) => p,
            Adapter::Message(p) => p,
            Adapter::GenerativeContent(p) => p,
            Adapter::GenericHttp(p) => p,
        }
    }

    /// Family this adapter belongs to.
    pub fn family_name(&self) -> &'static str {
        match self {
            Adapter::ChatCompletion(_) => "chat-completion",
            Adapter::Message(_) => "message",
            Adapter::GenerativeContent(_) => "generative-content",
            Adapter::GenericHttp(_) => "generic-http",
        }
    }
}

#[async_trait]
impl ApiBackend for Adapter {
    fn name(&self) -> &str {
        self.backend().name()
    }

    fn model(&self) -> &str {
        self.backend().model()
    }

    async fn call_api(&self, operation: Operation, code: &str, language: &str) -> Result<String> {
        self.backend().call_api(operation, code, language).await
    }

    fn decode_policy(&self) -> DecodePolicy {
        self.backend().decode_policy()
    }
}

/// Builds adapters from catalog entries.
///
/// Owns the HTTP client and the application config; construction never
/// touches the network.
///
/// # Example
/// ```
/// use codelens::config::AppConfig;
/// use codelens::llm::AnalysisProvider;
/// use codelens::llm::provider::ProviderFactory;
///
/// # fn main() -> codelens::error::Result<()> {
/// # let _ = rustls::crypto::ring::default_provider().install_default();
/// let factory = ProviderFactory::new(&AppConfig::default())?;
/// let adapter = factory.create("anthropic", "sk-ant-test", None)?;
/// assert_eq!(adapter.model(), "claude-sonnet-4-20250514");
///
/// assert!(factory.create("not-a-real-backend", "key", None).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProviderFactory {
    client: Client,
    config: AppConfig,
}

impl ProviderFactory {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: create_http_client(&config.network)?,
            config: config.clone(),
        })
    }

    /// Factory sharing an existing client.
    pub fn with_client(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Creates the adapter for `backend_id`.
    ///
    /// `model` defaults to the backend's first catalog model. A model outside the
    /// catalog list is rejected unless `llm.allow_unlisted_models` is set.
    ///
    /// # Errors
    /// - `UnsupportedProvider` when `backend_id` is not in the catalog
    /// - `MissingCredential` for a blank credential
    /// - `UnknownModel` for a model the backend does not list
    pub fn create(&self, backend_id: &str, credential: &str, model: Option<&str>) -> Result<Adapter> {
        let descriptor = catalog::describe(backend_id)
            .map_err(|_| CodelensError::UnsupportedProvider(backend_id.trim().to_string()))?;
        validate_api_key(descriptor, credential)?;

        let model = self.resolve_model(descriptor, model)?;
        let mut backend = BackendConfig::resolve(descriptor, &self.config, credential, model);

        tracing::debug!(
            "Creating {} adapter: model={}, base_url={}",
            descriptor.id,
            backend.model,
            backend.base_url
        );

        let client = self.client.clone();
        let adapter = match descriptor.family {
            AdapterFamily::ChatCompletion { json_mode } => {
                Adapter::ChatCompletion(openai::OpenAIProvider::new(client, backend, json_mode))
            }
            AdapterFamily::Message => Adapter::Message(claude::ClaudeProvider::new(client, backend)),
            AdapterFamily::GenerativeContent => {
                Adapter::GenerativeContent(gemini::GeminiProvider::new(client, backend))
            }
            AdapterFamily::GenericHttp => {
                backend.timeout = Some(self.config.network.generic_timeout());
                Adapter::GenericHttp(http::HttpProvider::new(client, backend))
            }
        };
        Ok(adapter)
    }

    /// Creates the adapter an [`AnalysisRequest`] names.
    pub fn create_for(&self, request: &AnalysisRequest) -> Result<Adapter> {
        self.create(
            request.provider.as_str(),
            &request.credential,
            Some(request.model.as_str()),
        )
    }

    fn resolve_model<'a>(
        &self,
        descriptor: &'static ProviderDescriptor,
        model: Option<&'a str>,
    ) -> Result<&'a str> {
        let model = match model.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => m,
            None => return Ok(descriptor.default_model()),
        };

        if descriptor.has_model(model) {
            return Ok(model);
        }
        if self.config.llm.allow_unlisted_models {
            tracing::warn!("{} model '{}' is not in the catalog, using it anyway", descriptor.id, model);
            return Ok(model);
        }
        Err(CodelensError::UnknownModel {
            provider: descriptor.id.to_string(),
            model: model.to_string(),
        })
    }
}
