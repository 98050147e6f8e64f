//! Network and HTTP configuration structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CodelensError, Result};

/// Network configuration.
///
/// Every outbound call is bounded: native adapters use `request_timeout`
/// through the shared client, the generic HTTP adapter overrides it per request
/// with `generic_request_timeout`.
///
/// # Fields
/// - `request_timeout`: HTTP request timeout in seconds (default: `120`)
/// - `connect_timeout`: HTTP connect timeout in seconds (default: `10`)
/// - `generic_request_timeout`: timeout for OpenAI-compatible generic backends (default: `60`)
///
/// # Example
/// ```toml
/// [network]
/// request_timeout = 30
/// connect_timeout = 10
/// generic_request_timeout = 60
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// HTTP connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Per-request timeout applied by the generic HTTP adapter.
    #[serde(default = "default_generic_request_timeout")]
    pub generic_request_timeout: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            generic_request_timeout: default_generic_request_timeout(),
        }
    }
}

impl NetworkConfig {
    /// Validates network configuration.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout == 0 {
            return Err(CodelensError::Config(
                "network.request_timeout cannot be 0".into(),
            ));
        }
        if self.connect_timeout == 0 {
            return Err(CodelensError::Config(
                "network.connect_timeout cannot be 0".into(),
            ));
        }
        if self.generic_request_timeout == 0 {
            return Err(CodelensError::Config(
                "network.generic_request_timeout cannot be 0".into(),
            ));
        }
        Ok(())
    }

    pub fn generic_timeout(&self) -> Duration {
        Duration::from_secs(self.generic_request_timeout)
    }
}

fn default_request_timeout() -> u64 {
    120
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_generic_request_timeout() -> u64 {
    60
}
