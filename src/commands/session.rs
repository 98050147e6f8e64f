//! CLI 会话记录：加载、保存与凭据解析

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::{CodelensError, Result};
use crate::llm::provider::catalog::ProviderId;
use crate::vault::{CredentialRecord, CredentialVault, credential_from_env};

/// Session identifier used for the local record.
pub const LOCAL_SESSION_ID: &str = "local";

/// The session record plus where it lives.
pub struct Session {
    pub record: CredentialRecord,
    path: Option<PathBuf>,
}

impl Session {
    /// Loads the record from `[vault] credentials_file`.
    ///
    /// A missing file yields a fresh record selecting `llm.default_provider`.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let path = config.vault.credentials_path();
        let existing = match &path {
            Some(p) => CredentialRecord::load(p)?,
            None => None,
        };

        let record = match existing {
            Some(record) => record,
            None => {
                let mut record = CredentialRecord::new(LOCAL_SESSION_ID);
                record.select(&config.llm.default_provider, None)?;
                record
            }
        };

        Ok(Self { record, path })
    }

    pub fn save(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or_else(|| {
            CodelensError::Config(
                "could not determine where to store the session; set [vault] credentials_file"
                    .to_string(),
            )
        })?;
        self.record.save(path)?;
        tracing::debug!("Session record written to {}", path.display());
        Ok(())
    }

    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Credential for `provider`: stored secret first, then the environment.
    ///
    /// Only the environment is consulted when no vault key is configured and
    /// nothing is stored.
    ///
    /// # Errors
    /// - `Vault` when the configured key is not a valid Fernet key
    /// - `Config` when credentials are stored but no key is configured
    /// - `MissingCredential` when no source has a secret
    pub fn credential_for(&self, config: &AppConfig, provider: ProviderId) -> Result<String> {
        let mut record = self.record.clone();
        record.provider = provider;

        let has_stored = record
            .api_keys
            .as_deref()
            .is_some_and(|blob| !blob.trim().is_empty());

        match config.vault.resolve_key() {
            Ok(key) => record.resolve_credential(&CredentialVault::new(&key)?),
            Err(e) if has_stored => Err(e),
            Err(_) => credential_from_env(provider).ok_or_else(|| {
                CodelensError::MissingCredential {
                    provider: provider.to_string(),
                    slot: provider.descriptor().credential_slot.to_string(),
                }
            }),
        }
    }
}
