//! Provider 验证辅助函数
//!
//! 凭据检查与最小探测请求。

use reqwest::Client;
use serde::Serialize;

use super::request::{send_get, send_json};
use crate::error::{CodelensError, Result};
use crate::llm::provider::catalog::ProviderDescriptor;

/// 验证 API key 是否为空
///
/// # 返回
/// - 空白 key 返回 `CodelensError::MissingCredential`
/// - 否则返回 `Ok(())`
///
/// # 示例
/// ```
/// use codelens::llm::provider::base::validation::validate_api_key;
/// use codelens::llm::provider::catalog::ProviderId;
///
/// let openai = ProviderId::OpenAI.descriptor();
/// assert!(validate_api_key(openai, "sk-test").is_ok());
/// assert!(validate_api_key(openai, "  ").is_err());
/// ```
pub fn validate_api_key(descriptor: &ProviderDescriptor, api_key: &str) -> Result<()> {
    if api_key.trim().is_empty() {
        return Err(CodelensError::MissingCredential {
            provider: descriptor.id.to_string(),
            slot: descriptor.credential_slot.to_string(),
        });
    }
    Ok(())
}

/// 发送最小的 POST 探测请求
///
/// 通常设置 `max_tokens=1` 以降低成本。任何 2xx 视为成功。
pub async fn probe_post<T: Serialize>(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    test_request: &T,
    provider_name: &str,
) -> Result<()> {
    tracing::debug!("Validating {} API connection...", provider_name);
    send_json(client, endpoint, headers, test_request, provider_name, None).await?;
    tracing::debug!("{} API connection validated successfully", provider_name);
    Ok(())
}

/// 发送 GET 探测请求（例如列出模型）
pub async fn probe_get(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    provider_name: &str,
) -> Result<()> {
    tracing::debug!("Validating {} API connection...", provider_name);
    send_get(client, endpoint, headers, provider_name).await?;
    tracing::debug!("{} API connection validated successfully", provider_name);
    Ok(())
}
