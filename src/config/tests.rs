// 配置模块测试

use super::*;
use crate::error::CodelensError;
use crate::llm::provider::catalog::ProviderId;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;
use std::io::Write;

/// RAII 环境变量 guard，确保测试后清理
struct EnvGuard {
    key: String,
    original: Option<String>,
}

impl EnvGuard {
    fn set(key: &str, value: &str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: 测试环境中修改环境变量是安全的，且使用 serial_test 确保串行执行
        unsafe { env::set_var(key, value) };
        Self {
            key: key.to_string(),
            original,
        }
    }

    fn remove(key: &str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: 同上
        unsafe { env::remove_var(key) };
        Self {
            key: key.to_string(),
            original,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: 测试环境中修改环境变量是安全的
        match &self.original {
            Some(v) => unsafe { env::set_var(&self.key, v) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// === 默认值 ===

#[test]
fn test_app_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.llm.default_provider, "openai");
    assert!(!config.llm.allow_unlisted_models);
    assert_eq!(config.llm.max_tokens, 4000);
    assert_eq!(config.network.request_timeout, 120);
    assert_eq!(config.network.connect_timeout, 10);
    assert_eq!(config.network.generic_request_timeout, 60);
    assert!(config.ui.colored);
    assert!(!config.ui.verbose);
    assert!(config.vault.key.is_none());
    assert!(config.validate().is_ok());
}

// === 校验 ===

#[test]
fn test_validate_rejects_unknown_default_provider() {
    let mut config = AppConfig::default();
    config.llm.default_provider = "deepthought".to_string();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, CodelensError::Config(msg) if msg.contains("deepthought")));
}

#[test]
fn test_validate_rejects_zero_timeouts() {
    let mut config = AppConfig::default();
    config.network.generic_request_timeout = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.network.request_timeout = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_endpoint_override() {
    let mut config = AppConfig::default();
    config.llm.providers.insert(
        "mistral".to_string(),
        ProviderConfig {
            endpoint: Some("ftp://mistral".to_string()),
            max_tokens: None,
        },
    );
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("http://"));
}

#[test]
fn test_validate_rejects_unknown_provider_section() {
    let mut config = AppConfig::default();
    config
        .llm
        .providers
        .insert("ollama".to_string(), ProviderConfig::default());
    assert!(config.validate().is_err());
}

#[test]
fn test_endpoint_and_token_overrides() {
    let mut config = AppConfig::default();
    config.llm.providers.insert(
        "together".to_string(),
        ProviderConfig {
            endpoint: Some("https://proxy.local/v1/".to_string()),
            max_tokens: Some(512),
        },
    );

    assert_eq!(
        config.llm.endpoint_for(ProviderId::Together).as_deref(),
        Some("https://proxy.local/v1")
    );
    assert_eq!(config.llm.max_tokens_for(ProviderId::Together), 512);
    assert_eq!(config.llm.endpoint_for(ProviderId::OpenAI), None);
    assert_eq!(config.llm.max_tokens_for(ProviderId::OpenAI), 4000);
}

// === vault key ===

#[test]
#[serial]
fn test_vault_key_prefers_config() {
    let _guard = EnvGuard::set(VAULT_KEY_ENV, "from-env");
    let vault = VaultConfig {
        key: Some("  from-config ".to_string()),
        credentials_file: None,
    };
    assert_eq!(vault.resolve_key().unwrap(), "from-config");
}

#[test]
#[serial]
fn test_vault_key_falls_back_to_env() {
    let _guard = EnvGuard::set(VAULT_KEY_ENV, "from-env");
    let vault = VaultConfig::default();
    assert_eq!(vault.resolve_key().unwrap(), "from-env");
}

#[test]
#[serial]
fn test_vault_key_missing_is_config_error() {
    let _guard = EnvGuard::remove(VAULT_KEY_ENV);
    let vault = VaultConfig {
        key: Some("   ".to_string()),
        credentials_file: None,
    };
    let err = vault.resolve_key().unwrap_err();
    assert!(matches!(err, CodelensError::Config(_)));
    assert!(err.suggestion().unwrap().contains("vault keygen"));
}

#[test]
fn test_vault_debug_masks_key() {
    let vault = VaultConfig {
        key: Some("abcdefghijklmnopqrstuvwxyz".to_string()),
        credentials_file: None,
    };
    let debug = format!("{:?}", vault);
    assert!(!debug.contains("abcdefghijklmnopqrstuvwxyz"));
}

#[test]
fn test_vault_credentials_path_override() {
    let vault = VaultConfig {
        key: None,
        credentials_file: Some("/tmp/creds.enc".into()),
    };
    assert_eq!(
        vault.credentials_path(),
        Some(std::path::PathBuf::from("/tmp/creds.enc"))
    );
}

// === 加载 ===

#[test]
#[serial]
fn test_load_from_file() {
    let file = write_config(
        r#"
[llm]
default_provider = "anthropic"
max_tokens = 2048

[llm.providers.mistral]
endpoint = "https://mistral.internal/v1"

[network]
request_timeout = 30

[ui]
colored = false
"#,
    );

    let config = load_config_from(Some(file.path())).unwrap();
    assert_eq!(config.llm.default_provider, "anthropic");
    assert_eq!(config.llm.max_tokens, 2048);
    assert_eq!(config.network.request_timeout, 30);
    assert_eq!(config.network.connect_timeout, 10);
    assert!(!config.ui.colored);
    assert_eq!(
        config.llm.endpoint_for(ProviderId::Mistral).as_deref(),
        Some("https://mistral.internal/v1")
    );
}

#[test]
#[serial]
fn test_missing_file_uses_defaults() {
    let config =
        load_config_from(Some(std::path::Path::new("/nonexistent/codelens.toml"))).unwrap();
    assert_eq!(config.llm.default_provider, "openai");
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let file = write_config(
        r#"
[llm]
default_provider = "anthropic"
"#,
    );
    let _provider = EnvGuard::set("CODELENS__LLM__DEFAULT_PROVIDER", "gemini");
    let _timeout = EnvGuard::set("CODELENS__NETWORK__GENERIC_REQUEST_TIMEOUT", "15");

    let config = load_config_from(Some(file.path())).unwrap();
    assert_eq!(config.llm.default_provider, "gemini");
    assert_eq!(config.network.generic_request_timeout, 15);
}

#[test]
#[serial]
fn test_load_rejects_invalid_file() {
    let file = write_config(
        r#"
[network]
connect_timeout = 0
"#,
    );
    let err = load_config_from(Some(file.path())).unwrap_err();
    assert!(matches!(err, CodelensError::Config(_)));
}
