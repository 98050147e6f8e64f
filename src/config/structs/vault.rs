//! Credential vault configuration.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{CodelensError, Result};

/// Environment variable consulted when `[vault] key` is not set.
pub const VAULT_KEY_ENV: &str = "ENCRYPTION_KEY";

/// Vault configuration.
///
/// # Fields
/// - `key`: URL-safe base64 Fernet key (never serialized back to disk)
/// - `credentials_file`: session record file holding the encrypted credential blob
///   (default: `<data dir>/codelens/session.json`)
///
/// # Example
/// ```toml
/// [vault]
/// key = "mJ3k...="
/// credentials_file = "/home/me/.codelens-credentials"
/// ```
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct VaultConfig {
    /// Symmetric key; falls back to `ENCRYPTION_KEY`.
    #[serde(default, skip_serializing)]
    pub key: Option<String>,

    /// Location of the session record holding the encrypted credentials.
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
}

impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::llm::provider::utils::mask_api_key;
        let masked_key = self.key.as_deref().map(mask_api_key);
        f.debug_struct("VaultConfig")
            .field("key", &masked_key)
            .field("credentials_file", &self.credentials_file)
            .finish()
    }
}

impl VaultConfig {
    /// Returns the configured key, or `ENCRYPTION_KEY` from the environment.
    ///
    /// # Errors
    /// [`CodelensError::Config`] when neither source yields a non-blank key.
    pub fn resolve_key(&self) -> Result<String> {
        if let Some(key) = self.key.as_deref()
            && !key.trim().is_empty()
        {
            return Ok(key.trim().to_string());
        }

        match std::env::var(VAULT_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(CodelensError::Config(format!(
                "no vault key configured: set [vault] key or {}",
                VAULT_KEY_ENV
            ))),
        }
    }

    /// Path of the session record file.
    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.credentials_file.clone().or_else(|| {
            ProjectDirs::from("", "", "codelens")
                .map(|dirs| dirs.data_dir().join("session.json"))
        })
    }
}
