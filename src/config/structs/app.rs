//! Top-level application configuration and UI settings.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::llm::LLMConfig;
use super::network::NetworkConfig;
use super::vault::VaultConfig;

/// Application configuration.
///
/// Effective configuration is merged from multiple sources (low to high):
/// 1. Rust defaults (`Default` + `serde(default)`)
/// 2. User-level config file (platform-specific config directory)
/// 3. `CODELENS__*` environment variables
///
/// # Configuration File Locations
/// - Linux: `~/.config/codelens/config.toml`
/// - macOS: `~/Library/Application Support/codelens/config.toml`
/// - Windows: `%APPDATA%\codelens\config\config.toml`
///
/// # Example
/// ```toml
/// [llm]
/// default_provider = "anthropic"
///
/// [llm.providers.mistral]
/// endpoint = "https://mistral-proxy.internal/v1"
///
/// [network]
/// request_timeout = 90
///
/// [vault]
/// key = "<output of `codelens vault keygen`>"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Provider selection and request shaping.
    #[serde(default)]
    pub llm: LLMConfig,

    /// HTTP timeouts.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Credential encryption settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Terminal UI behavior.
    #[serde(default)]
    pub ui: UIConfig,
}

impl AppConfig {
    /// Validates configuration consistency.
    ///
    /// The vault key is checked separately by [`VaultConfig::resolve_key`] because
    /// read-only commands (`providers`, `detect`) run without one.
    pub fn validate(&self) -> Result<()> {
        self.llm.validate()?;
        self.network.validate()?;
        Ok(())
    }
}

/// UI configuration.
///
/// # Example
/// ```toml
/// [ui]
/// colored = false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UIConfig {
    /// Whether to enable color output.
    #[serde(default = "default_true")]
    pub colored: bool,

    /// Print raw LLM traffic at debug level.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            colored: true,
            verbose: false,
        }
    }
}

fn default_true() -> bool {
    true
}
