//! Test utilities for provider tests
//!
//! Provides common configuration builders to reduce duplication
//! across provider test suites.

use crate::config::{AppConfig, ProviderConfig};
use crate::llm::provider::catalog::ProviderId;

use super::base::BackendConfig;

/// 在测试中安装 rustls crypto provider
///
/// reqwest 0.13 + rustls-no-provider 需要手动安装 crypto provider，
/// 生产代码在 main.rs 中完成，测试需要单独调用。
/// 多次调用是安全的（install_default 失败时忽略即可）。
pub fn ensure_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// `AppConfig` whose listed providers all point at `base_url` (e.g. a `mockito::Server`).
///
/// # Example
/// ```
/// use codelens::llm::provider::catalog::ProviderId;
/// use codelens::llm::provider::test_utils::test_app_config;
///
/// let config = test_app_config("http://127.0.0.1:1234", &[ProviderId::OpenAI]);
/// assert_eq!(
///     config.llm.endpoint_for(ProviderId::OpenAI).as_deref(),
///     Some("http://127.0.0.1:1234")
/// );
/// ```
pub fn test_app_config(base_url: &str, providers: &[ProviderId]) -> AppConfig {
    let mut config = AppConfig::default();
    for id in providers {
        config.llm.providers.insert(
            id.as_str().to_string(),
            ProviderConfig {
                endpoint: Some(base_url.to_string()),
                max_tokens: None,
            },
        );
    }
    config
}

/// `BackendConfig` for one provider against a mock server.
pub fn test_backend_config(id: ProviderId, base_url: &str, model: &str) -> BackendConfig {
    BackendConfig::resolve(
        id.descriptor(),
        &test_app_config(base_url, &[id]),
        "sk-test-key-123456",
        model,
    )
}
