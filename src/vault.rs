//! 凭据加密存储
//!
//! [`CredentialVault`] 用对称密钥（Fernet）加解密 `credential slot -> secret` 映射；
//! [`CredentialRecord`] 是 CLI 持久化的会话记录，只保存加密后的 blob。

use std::collections::BTreeMap;
use std::path::Path;

use fernet::Fernet;
use serde::{Deserialize, Serialize};

use crate::config::VaultConfig;
use crate::error::{CodelensError, Result};
use crate::llm::provider::catalog::ProviderId;

/// Credential-slot name to secret.
pub type CredentialMap = BTreeMap<String, String>;

/// Symmetric encryption of credential maps.
///
/// The key is fixed for the vault's lifetime and never generated on the fly:
/// a blob written by one process must decrypt in the next.
///
/// # Example
/// ```
/// use std::collections::BTreeMap;
/// use codelens::vault::CredentialVault;
///
/// # fn main() -> codelens::error::Result<()> {
/// let vault = CredentialVault::new(&CredentialVault::generate_key())?;
/// let mut keys = BTreeMap::new();
/// keys.insert("OPENAI_API_KEY".to_string(), "sk-123".to_string());
///
/// let blob = vault.encrypt(&keys)?;
/// assert_eq!(vault.decrypt(&blob), keys);
/// assert!(vault.decrypt("garbage").is_empty());
/// # Ok(())
/// # }
/// ```
pub struct CredentialVault {
    fernet: Fernet,
}

impl CredentialVault {
    /// Builds a vault from a URL-safe base64 Fernet key.
    ///
    /// # Errors
    /// [`CodelensError::Vault`] when the key is not a valid Fernet key.
    pub fn new(key: &str) -> Result<Self> {
        let fernet = Fernet::new(key.trim()).ok_or_else(|| {
            CodelensError::Vault("key must be 32 bytes of URL-safe base64".to_string())
        })?;
        Ok(Self { fernet })
    }

    /// Vault for `[vault] key`, falling back to `ENCRYPTION_KEY`.
    pub fn from_config(config: &VaultConfig) -> Result<Self> {
        Self::new(&config.resolve_key()?)
    }

    /// Fresh random key suitable for `[vault] key`.
    pub fn generate_key() -> String {
        Fernet::generate_key()
    }

    /// Encrypts the map as a JSON document.
    pub fn encrypt(&self, credentials: &CredentialMap) -> Result<String> {
        let plaintext = serde_json::to_vec(credentials)?;
        Ok(self.fernet.encrypt(&plaintext))
    }

    /// Decrypts a blob produced by [`encrypt`](Self::encrypt).
    ///
    /// Returns an empty map when the blob is empty, was sealed with another key,
    /// or is corrupted.
    pub fn decrypt(&self, blob: &str) -> CredentialMap {
        self.try_decrypt(blob).unwrap_or_else(|e| {
            tracing::warn!("Ignoring stored credentials: {}", e);
            CredentialMap::new()
        })
    }

    /// Like [`decrypt`](Self::decrypt) but reports why a non-empty blob is unreadable.
    ///
    /// # Errors
    /// [`CodelensError::Vault`] when the blob was sealed with another key, is
    /// corrupted, or does not hold a JSON map.
    pub fn try_decrypt(&self, blob: &str) -> Result<CredentialMap> {
        let blob = blob.trim();
        if blob.is_empty() {
            return Ok(CredentialMap::new());
        }

        let plaintext = self.fernet.decrypt(blob).map_err(|_| {
            CodelensError::Vault(
                "stored credentials cannot be decrypted with the configured key".to_string(),
            )
        })?;

        serde_json::from_slice(&plaintext).map_err(|e| {
            CodelensError::Vault(format!("decrypted credentials are not a JSON map: {}", e))
        })
    }
}

/// Secret from the environment variable named by the backend's credential slot.
pub fn credential_from_env(provider: ProviderId) -> Option<String> {
    std::env::var(provider.descriptor().credential_slot)
        .ok()
        .map(|secret| secret.trim().to_string())
        .filter(|secret| !secret.is_empty())
}

/// Per-session selection plus encrypted credentials.
///
/// Persisted as JSON; secrets only ever appear inside `api_keys`, encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub session_id: String,
    pub provider: ProviderId,
    pub model: String,
    /// Encrypted [`CredentialMap`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_keys: Option<String>,
}

impl CredentialRecord {
    /// New record with OpenAI and its default model selected.
    pub fn new(session_id: impl Into<String>) -> Self {
        let provider = ProviderId::OpenAI;
        Self {
            session_id: session_id.into(),
            provider,
            model: provider.descriptor().default_model().to_string(),
            api_keys: None,
        }
    }

    /// Selects a backend and model; the model defaults to the backend's first.
    ///
    /// # Errors
    /// - `UnknownProvider` for an id outside the catalog
    /// - `UnknownModel` for a model the backend does not list
    pub fn select(&mut self, provider: &str, model: Option<&str>) -> Result<()> {
        let id: ProviderId = provider.parse()?;
        let descriptor = id.descriptor();
        let model = match model.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) if descriptor.has_model(m) => m,
            Some(m) => {
                return Err(CodelensError::UnknownModel {
                    provider: id.to_string(),
                    model: m.to_string(),
                });
            }
            None => descriptor.default_model(),
        };

        self.provider = id;
        self.model = model.to_string();
        Ok(())
    }

    /// Decrypted credentials; empty when none are stored.
    pub fn credentials(&self, vault: &CredentialVault) -> CredentialMap {
        self.api_keys
            .as_deref()
            .map(|blob| vault.decrypt(blob))
            .unwrap_or_default()
    }

    /// Merges non-blank `updates` into the stored credentials and re-encrypts.
    ///
    /// Blank values leave the existing secret untouched.
    ///
    /// # Errors
    /// [`CodelensError::Vault`] when an existing blob cannot be decrypted with
    /// `vault`; the record is left unchanged.
    pub fn store_credentials(&mut self, vault: &CredentialVault, updates: &CredentialMap) -> Result<()> {
        let mut credentials = match self.api_keys.as_deref() {
            Some(blob) => vault.try_decrypt(blob)?,
            None => CredentialMap::new(),
        };
        for (slot, value) in updates {
            let value = value.trim();
            if !value.is_empty() {
                credentials.insert(slot.trim().to_string(), value.to_string());
            }
        }

        self.api_keys = if credentials.is_empty() {
            None
        } else {
            Some(vault.encrypt(&credentials)?)
        };
        Ok(())
    }

    /// Secret for the selected backend.
    ///
    /// Looks in the stored map first, then in the environment variable named by
    /// the backend's credential slot.
    ///
    /// # Errors
    /// `MissingCredential` when neither source has a non-blank value.
    pub fn resolve_credential(&self, vault: &CredentialVault) -> Result<String> {
        let slot = self.provider.descriptor().credential_slot;

        if let Some(secret) = self.credentials(vault).remove(slot)
            && !secret.trim().is_empty()
        {
            return Ok(secret);
        }

        credential_from_env(self.provider).ok_or_else(|| CodelensError::MissingCredential {
            provider: self.provider.to_string(),
            slot: slot.to_string(),
        })
    }

    /// Loads a record, or `None` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Writes the record, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    fn vault() -> CredentialVault {
        CredentialVault::new(&CredentialVault::generate_key()).unwrap()
    }

    fn map(entries: &[(&str, &str)]) -> CredentialMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_round_trip() {
        let vault = vault();
        let keys = map(&[("OPENAI_API_KEY", "sk-1"), ("GEMINI_API_KEY", "AIza-2")]);
        let blob = vault.encrypt(&keys).unwrap();
        assert!(!blob.contains("sk-1"));
        assert_eq!(vault.decrypt(&blob), keys);
    }

    #[test]
    fn test_decrypt_never_fails() {
        let vault = vault();
        assert!(vault.decrypt("").is_empty());
        assert!(vault.decrypt("   ").is_empty());
        assert!(vault.decrypt("garbage").is_empty());
        assert!(vault.decrypt("gAAAAABnot-really-a-token==").is_empty());
    }

    #[test]
    fn test_other_key_cannot_decrypt() {
        let blob = vault().encrypt(&map(&[("XAI_API_KEY", "xai-1")])).unwrap();
        assert!(vault().decrypt(&blob).is_empty());
    }

    #[test]
    fn test_invalid_key_rejected() {
        assert!(matches!(CredentialVault::new("short"), Err(CodelensError::Vault(_))));
    }

    #[test]
    #[serial]
    fn test_from_config_without_key_fails() {
        // SAFETY: serial 测试，不会并发修改环境变量
        unsafe { std::env::remove_var("ENCRYPTION_KEY") };
        let err = CredentialVault::from_config(&VaultConfig::default()).err().unwrap();
        assert!(matches!(err, CodelensError::Config(_)));
    }

    #[test]
    fn test_from_config_with_key() {
        let config = VaultConfig {
            key: Some(CredentialVault::generate_key()),
            credentials_file: None,
        };
        assert!(CredentialVault::from_config(&config).is_ok());
    }

    #[test]
    fn test_new_record_defaults() {
        let record = CredentialRecord::new("s1");
        assert_eq!(record.provider, ProviderId::OpenAI);
        assert_eq!(record.model, "gpt-4o");
        assert!(record.api_keys.is_none());
    }

    #[test]
    fn test_select() {
        let mut record = CredentialRecord::new("s1");
        record.select("anthropic", None).unwrap();
        assert_eq!(record.provider, ProviderId::Anthropic);
        assert_eq!(record.model, "claude-sonnet-4-20250514");

        record.select("Gemini", Some("gemini-1.5-flash")).unwrap();
        assert_eq!(record.model, "gemini-1.5-flash");

        assert!(record.select("nope", None).is_err());
        assert!(record.select("gemini", Some("gpt-4o")).is_err());
        // 失败时保持原选择
        assert_eq!(record.provider, ProviderId::Gemini);
    }

    #[test]
    fn test_store_merges_and_skips_blank() {
        let vault = vault();
        let mut record = CredentialRecord::new("s1");
        record
            .store_credentials(&vault, &map(&[("OPENAI_API_KEY", " sk-1 ")]))
            .unwrap();
        record
            .store_credentials(
                &vault,
                &map(&[("OPENAI_API_KEY", "  "), ("MISTRAL_API_KEY", "m-2")]),
            )
            .unwrap();

        assert_eq!(
            record.credentials(&vault),
            map(&[("MISTRAL_API_KEY", "m-2"), ("OPENAI_API_KEY", "sk-1")])
        );
    }

    #[test]
    fn test_store_with_other_key_keeps_existing_blob() {
        let original = vault();
        let mut record = CredentialRecord::new("s1");
        record
            .store_credentials(
                &original,
                &map(&[("OPENAI_API_KEY", "sk-1"), ("GEMINI_API_KEY", "AIza-2")]),
            )
            .unwrap();
        let blob = record.api_keys.clone();

        let err = record
            .store_credentials(&vault(), &map(&[("XAI_API_KEY", "x-new")]))
            .unwrap_err();

        assert!(matches!(err, CodelensError::Vault(_)));
        assert_eq!(record.api_keys, blob);
        assert_eq!(
            record.credentials(&original),
            map(&[("GEMINI_API_KEY", "AIza-2"), ("OPENAI_API_KEY", "sk-1")])
        );
    }

    #[test]
    fn test_try_decrypt_reports_foreign_blob() {
        let blob = vault().encrypt(&map(&[("XAI_API_KEY", "xai-1")])).unwrap();
        assert!(matches!(vault().try_decrypt(&blob), Err(CodelensError::Vault(_))));
        assert!(vault().try_decrypt("  ").unwrap().is_empty());
    }

    #[test]
    fn test_store_nothing_keeps_record_empty() {
        let vault = vault();
        let mut record = CredentialRecord::new("s1");
        record.store_credentials(&vault, &map(&[("OPENAI_API_KEY", "")])).unwrap();
        assert!(record.api_keys.is_none());
    }

    #[test]
    #[serial]
    fn test_resolve_credential_prefers_stored() {
        let vault = vault();
        let mut record = CredentialRecord::new("s1");
        record
            .store_credentials(&vault, &map(&[("OPENAI_API_KEY", "sk-stored")]))
            .unwrap();
        // SAFETY: serial 测试，不会并发修改环境变量
        unsafe { std::env::set_var("OPENAI_API_KEY", "sk-env") };
        let resolved = record.resolve_credential(&vault);
        unsafe { std::env::remove_var("OPENAI_API_KEY") };
        assert_eq!(resolved.unwrap(), "sk-stored");
    }

    #[test]
    #[serial]
    fn test_resolve_credential_env_fallback_and_missing() {
        let vault = vault();
        let mut record = CredentialRecord::new("s1");
        record.select("together", None).unwrap();

        // SAFETY: serial 测试，不会并发修改环境变量
        unsafe { std::env::set_var("TOGETHER_API_KEY", "tg-env") };
        assert_eq!(record.resolve_credential(&vault).unwrap(), "tg-env");

        unsafe { std::env::remove_var("TOGETHER_API_KEY") };
        let err = record.resolve_credential(&vault).unwrap_err();
        assert!(matches!(err, CodelensError::MissingCredential { slot, .. } if slot == "TOGETHER_API_KEY"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        assert!(CredentialRecord::load(&path).unwrap().is_none());

        let vault = vault();
        let mut record = CredentialRecord::new("s1");
        record.select("cohere", None).unwrap();
        record
            .store_credentials(&vault, &map(&[("COHERE_API_KEY", "co-1")]))
            .unwrap();
        record.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"provider\": \"cohere\""));
        assert!(!content.contains("co-1"));

        let loaded = CredentialRecord::load(&path).unwrap().unwrap();
        assert_eq!(loaded, record);
        assert_eq!(loaded.resolve_credential(&vault).unwrap(), "co-1");
    }
}
