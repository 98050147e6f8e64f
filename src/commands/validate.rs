use super::session::Session;
use crate::config::AppConfig;
use crate::error::{CodelensError, Result};
use crate::llm::provider::CredentialValidator;
use crate::llm::provider::catalog::ProviderId;
use crate::llm::provider::utils::mask_api_key;
use crate::ui;

/// 探测 provider 是否接受凭据
///
/// 未传 `--key` 时使用会话记录或环境变量中的凭据。返回探测结果。
pub async fn run(provider: &str, key: Option<&str>, config: &AppConfig) -> Result<bool> {
    let colored = config.ui.colored;
    let id: ProviderId = provider
        .parse()
        .map_err(|_| CodelensError::UnsupportedProvider(provider.to_string()))?;

    let credential = match key {
        Some(key) => key.to_string(),
        None => Session::load(config)?.credential_for(config, id)?,
    };

    let validator = CredentialValidator::new(config)?;
    let spinner = ui::Spinner::new(
        &format!("Validating {} key {}...", id.descriptor().name, mask_api_key(&credential)),
        colored,
    );
    let valid = validator.validate(id.as_str(), &credential).await;
    spinner.finish_and_clear();

    if valid {
        ui::success(&format!("{} accepted the credential", id.descriptor().name), colored);
    } else {
        ui::error(&format!("{} rejected the credential", id.descriptor().name), colored);
    }
    Ok(valid)
}
