use clap::{Parser, Subcommand, builder::styling};

const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::Green.on_default().bold())
    .usage(styling::AnsiColor::Green.on_default().bold())
    .literal(styling::AnsiColor::Cyan.on_default().bold())
    .placeholder(styling::AnsiColor::Cyan.on_default());

#[derive(Parser)]
#[command(name = "codelens")]
#[command(author, version, long_about = None)]
#[command(about = "Code review, test generation and improvement suggestions from any of nine LLM backends")]
#[command(styles = STYLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported providers and their models
    Providers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the detected language of a file
    Detect {
        /// Path to file
        file: String,
    },

    /// Analyze a source file
    Analyze {
        /// Path to file
        file: String,

        /// Provider to use (defaults to the session selection)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model to use (defaults to the provider's first model)
        #[arg(short, long)]
        model: Option<String>,

        /// Operation: quality | tests | suggestions | all
        #[arg(short, long, default_value = "all")]
        operation: String,

        /// Override the detected language tag
        #[arg(short, long)]
        language: Option<String>,

        /// Output format: text | json | markdown
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Shortcut for --format json
        #[arg(long)]
        json: bool,
    },

    /// Check that a provider accepts a credential
    Validate {
        /// Provider identifier
        #[arg(short, long)]
        provider: String,

        /// Credential to check (defaults to the stored or environment credential)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Manage the encrypted session credentials
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Vault key utilities
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeysAction {
    /// Store a credential (SLOT may be a slot name or a provider id)
    Set {
        /// Credential slot, e.g. OPENAI_API_KEY
        slot: String,

        /// Secret value
        value: String,
    },

    /// Show stored credentials (masked) and the current selection
    List,

    /// Select the provider and model used by `analyze`
    Select {
        /// Provider identifier
        provider: String,

        /// Model identifier
        model: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum VaultAction {
    /// Print a fresh key for `[vault] key`
    Keygen,
}
