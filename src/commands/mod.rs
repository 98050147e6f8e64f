//! Command implementations.
//!
//! # Modules
//! - `analyze` - Run analysis operations against a provider.
//! - `providers` - List the provider catalog.
//! - `detect` - Language detection for a file.
//! - `validate` - Credential probe.
//! - `keys` - Encrypted session credentials.
//! - `vault` - Vault key utilities.
//! - `session` - Session record loading and credential resolution.
//! - `format` - Output format definition.
//! - `options` - Command option structs.
//! - `json` - JSON output helpers.
//! - `markdown` - Markdown report rendering.
//!
//! # Architecture
//! ```text
//! CLI (cli.rs)
//!   ├── commands/analyze.rs ─> session.rs ─> vault
//!   │                       └─> llm::provider::ProviderFactory
//!   ├── commands/validate.rs ─> llm::provider::CredentialValidator
//!   ├── commands/keys.rs ─> session.rs
//!   └── commands/providers.rs, detect.rs, vault.rs
//! ```

/// Analysis command flow.
pub mod analyze;
/// Language detection command.
pub mod detect;
/// Output format types and parsing helpers.
pub mod format;
/// Shared JSON output helpers.
pub mod json;
/// Session credential management.
pub mod keys;
/// Markdown report rendering.
pub mod markdown;
/// Shared command option structs.
pub mod options;
/// Provider catalog listing.
pub mod providers;
/// Session record persistence.
pub mod session;
/// Credential probe command.
pub mod validate;
/// Vault key generation.
pub mod vault;

pub use format::OutputFormat;
pub use options::{AnalysisScope, AnalyzeOptions};
