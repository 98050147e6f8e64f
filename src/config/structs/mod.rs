mod app;
mod llm;
mod network;
mod vault;

pub use app::{AppConfig, UIConfig};
pub use llm::{LLMConfig, ProviderConfig};
pub use network::NetworkConfig;
pub use vault::{VAULT_KEY_ENV, VaultConfig};
