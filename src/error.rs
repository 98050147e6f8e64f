use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodelensError>;

#[derive(Error, Debug)]
pub enum CodelensError {
    /// 目录中不存在该 provider（catalog 查询失败）
    #[error("Unknown provider: '{0}'")]
    UnknownProvider(String),

    /// 工厂无法为该标识构造 adapter
    #[error("Unsupported AI provider: '{0}'")]
    UnsupportedProvider(String),

    #[error("Model '{model}' is not offered by provider '{provider}'")]
    UnknownModel { provider: String, model: String },

    /// 调用方从未为所选 provider 提供密钥
    #[error("No credential configured for {provider} (expected {slot})")]
    MissingCredential { provider: String, slot: String },

    /// 非 2xx 响应或连接失败；连接层失败时 status 为 None
    #[error("{provider} transport error ({}): {body}", display_status(.status))]
    Transport {
        provider: String,
        status: Option<u16>,
        body: String,
    },

    /// 回复不是合法 JSON，或不符合预期 schema
    #[error("Malformed {provider} response: {reason}")]
    MalformedResponse {
        provider: String,
        reason: String,
        raw: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Vault error: {0}")]
    Vault(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration parsing error: {0}")]
    ConfigParse(#[from] config::ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn display_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no response".to_string(),
    }
}

impl CodelensError {
    /// HTTP 状态码（仅 Transport 错误携带）
    pub fn status(&self) -> Option<u16> {
        match self {
            CodelensError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// 获取错误的解决建议
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            CodelensError::UnknownProvider(_) | CodelensError::UnsupportedProvider(_) => {
                Some("Run 'codelens providers' to see the supported provider identifiers")
            }
            CodelensError::UnknownModel { .. } => Some(
                "Pick a model listed by 'codelens providers', or set llm.allow_unlisted_models = true",
            ),
            CodelensError::MissingCredential { .. } => Some(
                "Store a key with 'codelens keys set <SLOT> <key>' or export the slot as an environment variable",
            ),
            CodelensError::Transport { status: None, .. } => {
                Some("Cannot reach the API server. Check endpoint URL, network, or proxy settings")
            }
            CodelensError::Transport {
                status: Some(401 | 403),
                ..
            } => Some("Check if your API key is valid and has not expired"),
            CodelensError::Transport {
                status: Some(429), ..
            } => Some("Rate limit exceeded. Wait a moment and try again, or upgrade your API plan"),
            CodelensError::Transport {
                status: Some(500..=599),
                ..
            } => Some("API service is temporarily unavailable. Try again in a few moments"),
            CodelensError::MalformedResponse { .. } => {
                Some("Try using --verbose flag to see the full LLM response and debug the issue")
            }
            CodelensError::Config(msg) if msg.contains("vault key") => Some(
                "Generate a key with 'codelens vault keygen' and set it as [vault] key or ENCRYPTION_KEY",
            ),
            CodelensError::Network(_) => {
                Some("Check your network connection, proxy settings, or API endpoint configuration")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(status: Option<u16>) -> CodelensError {
        CodelensError::Transport {
            provider: "OpenAI".to_string(),
            status,
            body: "nope".to_string(),
        }
    }

    #[test]
    fn test_transport_display_includes_status() {
        let err = transport(Some(401));
        assert_eq!(err.to_string(), "OpenAI transport error (401): nope");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_transport_display_without_status() {
        let err = transport(None);
        assert!(err.to_string().contains("no response"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_suggestion_unauthorized() {
        let suggestion = transport(Some(401)).suggestion().unwrap();
        assert!(suggestion.contains("API key"));
    }

    #[test]
    fn test_suggestion_rate_limit() {
        let suggestion = transport(Some(429)).suggestion().unwrap();
        assert!(suggestion.contains("Rate limit"));
    }

    #[test]
    fn test_suggestion_server_error() {
        let suggestion = transport(Some(503)).suggestion().unwrap();
        assert!(suggestion.contains("temporarily unavailable"));
    }

    #[test]
    fn test_suggestion_connection_failure() {
        let suggestion = transport(None).suggestion().unwrap();
        assert!(suggestion.contains("endpoint URL"));
    }

    #[test]
    fn test_suggestion_missing_credential() {
        let err = CodelensError::MissingCredential {
            provider: "openai".to_string(),
            slot: "OPENAI_API_KEY".to_string(),
        };
        assert!(err.suggestion().unwrap().contains("keys set"));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_suggestion_missing_vault_key() {
        let err = CodelensError::Config("no vault key configured".to_string());
        assert!(err.suggestion().unwrap().contains("vault keygen"));
    }

    #[test]
    fn test_suggestion_returns_none_for_other_errors() {
        let cases = vec![
            CodelensError::InvalidInput("bad input".to_string()),
            CodelensError::Vault("corrupt".to_string()),
            CodelensError::Config("some random config error".to_string()),
            transport(Some(418)),
        ];

        for err in cases {
            assert!(
                err.suggestion().is_none(),
                "Expected None for {:?}, got {:?}",
                err,
                err.suggestion()
            );
        }
    }
}
