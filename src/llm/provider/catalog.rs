//! Static provider catalog.
//!
//! Every supported backend, its selectable models, the credential slot that
//! holds its secret and the adapter family that speaks its wire format.
//! The table is compiled in and never mutated, so lookups are safe from any thread.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CodelensError, Result};

/// Backend identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[serde(rename = "openai")]
    OpenAI,
    Anthropic,
    Gemini,
    #[serde(rename = "xai")]
    XAI,
    Perplexity,
    Cohere,
    Mistral,
    #[serde(rename = "huggingface")]
    HuggingFace,
    Together,
}

impl ProviderId {
    /// Catalog order.
    pub const ALL: [ProviderId; 9] = [
        ProviderId::OpenAI,
        ProviderId::Anthropic,
        ProviderId::Gemini,
        ProviderId::XAI,
        ProviderId::Perplexity,
        ProviderId::Cohere,
        ProviderId::Mistral,
        ProviderId::HuggingFace,
        ProviderId::Together,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Gemini => "gemini",
            ProviderId::XAI => "xai",
            ProviderId::Perplexity => "perplexity",
            ProviderId::Cohere => "cohere",
            ProviderId::Mistral => "mistral",
            ProviderId::HuggingFace => "huggingface",
            ProviderId::Together => "together",
        }
    }

    /// Descriptor for this backend.
    pub fn descriptor(&self) -> &'static ProviderDescriptor {
        // ALL 与 DESCRIPTORS 顺序一致
        &DESCRIPTORS[*self as usize]
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = CodelensError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == needle)
            .ok_or_else(|| CodelensError::UnknownProvider(s.to_string()))
    }
}

/// Wire format a backend speaks, which decides the adapter built for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterFamily {
    /// `POST /chat/completions` with system + user messages.
    ///
    /// `json_mode` requests `response_format: json_object`; without it the
    /// system prompt alone asks for JSON.
    ChatCompletion { json_mode: bool },
    /// `POST /messages` with a top-level system prompt.
    Message,
    /// `POST /models/{model}:generateContent` with a single combined prompt.
    GenerativeContent,
    /// OpenAI-compatible `POST /chat/completions` behind a bearer token,
    /// tolerant of non-JSON replies.
    GenericHttp,
}

/// One model entry: identifier and display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub label: &'static str,
}

/// Immutable description of one backend.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub name: &'static str,
    /// Selectable models; the first is the default.
    pub models: &'static [ModelInfo],
    /// Environment-variable style key under which the secret is stored.
    pub credential_slot: &'static str,
    pub family: AdapterFamily,
    pub base_url: &'static str,
}

impl ProviderDescriptor {
    /// Model used when a session picks this backend without choosing one.
    pub fn default_model(&self) -> &'static str {
        self.models[0].id
    }

    pub fn has_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m.id == model)
    }
}

macro_rules! models {
    ($($id:literal => $label:literal),+ $(,)?) => {
        &[$(ModelInfo { id: $id, label: $label }),+]
    };
}

static DESCRIPTORS: [ProviderDescriptor; 9] = [
    ProviderDescriptor {
        id: ProviderId::OpenAI,
        name: "OpenAI",
        models: models![
            "gpt-4o" => "GPT-4o (Latest)",
            "gpt-4o-mini" => "GPT-4o Mini",
            "gpt-4-turbo" => "GPT-4 Turbo",
            "gpt-4-turbo-preview" => "GPT-4 Turbo Preview",
            "gpt-4" => "GPT-4",
            "gpt-4-0613" => "GPT-4 (June 2023)",
            "gpt-3.5-turbo" => "GPT-3.5 Turbo",
            "gpt-3.5-turbo-16k" => "GPT-3.5 Turbo 16K",
            "gpt-3.5-turbo-1106" => "GPT-3.5 Turbo (Nov 2023)",
        ],
        credential_slot: "OPENAI_API_KEY",
        family: AdapterFamily::ChatCompletion { json_mode: true },
        base_url: "https://api.openai.com/v1",
    },
    ProviderDescriptor {
        id: ProviderId::Anthropic,
        name: "Anthropic Claude",
        models: models![
            "claude-sonnet-4-20250514" => "Claude 4.0 Sonnet (Latest)",
            "claude-3-7-sonnet-20250219" => "Claude 3.7 Sonnet",
            "claude-3-5-sonnet-20241022" => "Claude 3.5 Sonnet",
            "claude-3-5-haiku-20241022" => "Claude 3.5 Haiku",
            "claude-3-opus-20240229" => "Claude 3 Opus",
            "claude-3-sonnet-20240229" => "Claude 3 Sonnet",
            "claude-3-haiku-20240307" => "Claude 3 Haiku",
            "claude-2.1" => "Claude 2.1",
            "claude-2.0" => "Claude 2.0",
            "claude-instant-1.2" => "Claude Instant 1.2",
        ],
        credential_slot: "ANTHROPIC_API_KEY",
        family: AdapterFamily::Message,
        base_url: "https://api.anthropic.com/v1",
    },
    ProviderDescriptor {
        id: ProviderId::Gemini,
        name: "Google Gemini",
        models: models![
            "gemini-2.5-pro" => "Gemini 2.5 Pro (Latest)",
            "gemini-2.5-flash" => "Gemini 2.5 Flash",
            "gemini-1.5-pro" => "Gemini 1.5 Pro",
            "gemini-1.5-flash" => "Gemini 1.5 Flash",
            "gemini-1.0-pro" => "Gemini 1.0 Pro",
            "gemini-pro" => "Gemini Pro",
            "gemini-pro-vision" => "Gemini Pro Vision",
        ],
        credential_slot: "GEMINI_API_KEY",
        family: AdapterFamily::GenerativeContent,
        base_url: "https://generativelanguage.googleapis.com/v1beta",
    },
    ProviderDescriptor {
        id: ProviderId::XAI,
        name: "xAI Grok",
        models: models![
            "grok-2-vision-1212" => "Grok 2 Vision (Latest)",
            "grok-2-1212" => "Grok 2",
            "grok-vision-beta" => "Grok Vision Beta",
            "grok-beta" => "Grok Beta",
            "grok-1" => "Grok 1",
        ],
        credential_slot: "XAI_API_KEY",
        family: AdapterFamily::ChatCompletion { json_mode: true },
        base_url: "https://api.x.ai/v1",
    },
    ProviderDescriptor {
        id: ProviderId::Perplexity,
        name: "Perplexity",
        models: models![
            "llama-3.1-sonar-huge-128k-online" => "Llama 3.1 Sonar Huge (Online)",
            "llama-3.1-sonar-large-128k-online" => "Llama 3.1 Sonar Large (Online)",
            "llama-3.1-sonar-small-128k-online" => "Llama 3.1 Sonar Small (Online)",
            "llama-3.1-sonar-large-128k-chat" => "Llama 3.1 Sonar Large (Chat)",
            "llama-3.1-sonar-small-128k-chat" => "Llama 3.1 Sonar Small (Chat)",
            "llama-3.1-8b-instruct" => "Llama 3.1 8B Instruct",
            "llama-3.1-70b-instruct" => "Llama 3.1 70B Instruct",
            "codellama-34b-instruct" => "CodeLlama 34B Instruct",
            "codellama-70b-instruct" => "CodeLlama 70B Instruct",
            "mistral-7b-instruct" => "Mistral 7B Instruct",
            "mixtral-8x7b-instruct" => "Mixtral 8x7B Instruct",
        ],
        credential_slot: "PERPLEXITY_API_KEY",
        family: AdapterFamily::ChatCompletion { json_mode: false },
        base_url: "https://api.perplexity.ai",
    },
    ProviderDescriptor {
        id: ProviderId::Cohere,
        name: "Cohere",
        models: models![
            "command-r-plus" => "Command R+ (Latest)",
            "command-r" => "Command R",
            "command" => "Command",
            "command-nightly" => "Command Nightly",
            "command-light" => "Command Light",
            "command-light-nightly" => "Command Light Nightly",
        ],
        credential_slot: "COHERE_API_KEY",
        family: AdapterFamily::GenericHttp,
        base_url: "https://api.cohere.ai/v1",
    },
    ProviderDescriptor {
        id: ProviderId::Mistral,
        name: "Mistral AI",
        models: models![
            "mistral-large-latest" => "Mistral Large (Latest)",
            "mistral-medium-latest" => "Mistral Medium",
            "mistral-small-latest" => "Mistral Small",
            "open-mistral-7b" => "Open Mistral 7B",
            "open-mixtral-8x7b" => "Open Mixtral 8x7B",
            "open-mixtral-8x22b" => "Open Mixtral 8x22B",
            "codestral-latest" => "Codestral (Code)",
            "mistral-embed" => "Mistral Embed",
        ],
        credential_slot: "MISTRAL_API_KEY",
        family: AdapterFamily::GenericHttp,
        base_url: "https://api.mistral.ai/v1",
    },
    ProviderDescriptor {
        id: ProviderId::HuggingFace,
        name: "HuggingFace",
        models: models![
            "meta-llama/Llama-2-70b-chat-hf" => "Llama 2 70B Chat",
            "meta-llama/Llama-2-13b-chat-hf" => "Llama 2 13B Chat",
            "meta-llama/Llama-2-7b-chat-hf" => "Llama 2 7B Chat",
            "codellama/CodeLlama-34b-Instruct-hf" => "CodeLlama 34B Instruct",
            "microsoft/DialoGPT-large" => "DialoGPT Large",
            "microsoft/CodeBERT-base" => "CodeBERT Base",
            "Salesforce/codegen-16B-mono" => "CodeGen 16B",
            "bigcode/starcoder" => "StarCoder",
        ],
        credential_slot: "HUGGINGFACE_API_KEY",
        family: AdapterFamily::GenericHttp,
        base_url: "https://api-inference.huggingface.co/models",
    },
    ProviderDescriptor {
        id: ProviderId::Together,
        name: "Together AI",
        models: models![
            "meta-llama/Llama-2-70b-chat-hf" => "Llama 2 70B Chat",
            "meta-llama/Llama-2-13b-chat-hf" => "Llama 2 13B Chat",
            "meta-llama/Llama-2-7b-chat-hf" => "Llama 2 7B Chat",
            "codellama/CodeLlama-34b-Instruct-hf" => "CodeLlama 34B Instruct",
            "codellama/CodeLlama-13b-Instruct-hf" => "CodeLlama 13B Instruct",
            "codellama/CodeLlama-7b-Instruct-hf" => "CodeLlama 7B Instruct",
            "WizardLM/WizardCoder-Python-34B-V1.0" => "WizardCoder Python 34B",
            "Phind/Phind-CodeLlama-34B-v2" => "Phind CodeLlama 34B v2",
        ],
        credential_slot: "TOGETHER_API_KEY",
        family: AdapterFamily::GenericHttp,
        base_url: "https://api.together.xyz/v1",
    },
];

/// All descriptors in catalog order.
pub fn list() -> &'static [ProviderDescriptor] {
    &DESCRIPTORS
}

/// Looks up a descriptor by identifier.
///
/// # Errors
/// [`CodelensError::UnknownProvider`] when `id` names no backend.
pub fn describe(id: &str) -> Result<&'static ProviderDescriptor> {
    id.parse::<ProviderId>().map(|id| id.descriptor())
}
