use serde::Serialize;

use crate::error::{CodelensError, Result};

/// JSON 错误输出结构（统一）
#[derive(Debug, Serialize)]
pub struct ErrorJson {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorJson {
    /// 从 CodelensError 创建 ErrorJson
    pub fn from_error(err: &CodelensError) -> Self {
        Self {
            code: error_to_code(err),
            message: err.to_string(),
            status: err.status(),
            suggestion: err.suggestion().map(String::from),
        }
    }
}

/// 通用的 JSON 输出结构
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorJson>,
}

/// 输出成功结果
pub fn output_json_success<T: Serialize>(data: T) -> Result<()> {
    let output = JsonOutput {
        success: true,
        data: Some(data),
        error: None,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// 输出 JSON 格式的错误（通用函数）
///
/// # 示例
/// ```no_run
/// use codelens::commands::json;
/// use codelens::error::CodelensError;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// json::output_json_error::<String>(&CodelensError::UnsupportedProvider("x".into()))?;
/// # Ok(())
/// # }
/// ```
pub fn output_json_error<T: Serialize>(err: &CodelensError) -> Result<()> {
    let output = JsonOutput::<T> {
        success: false,
        data: None,
        error: Some(ErrorJson::from_error(err)),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// 将错误类型映射为 code 字符串
pub fn error_to_code(err: &CodelensError) -> String {
    match err {
        CodelensError::UnknownProvider(_) => "UNKNOWN_PROVIDER",
        CodelensError::UnsupportedProvider(_) => "UNSUPPORTED_PROVIDER",
        CodelensError::UnknownModel { .. } => "UNKNOWN_MODEL",
        CodelensError::MissingCredential { .. } => "MISSING_CREDENTIAL",
        CodelensError::Transport { .. } => "TRANSPORT_ERROR",
        CodelensError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
        CodelensError::Config(_) | CodelensError::ConfigParse(_) => "CONFIG_ERROR",
        CodelensError::Vault(_) => "VAULT_ERROR",
        CodelensError::Network(_) => "NETWORK_ERROR",
        CodelensError::Io(_) => "IO_ERROR",
        CodelensError::Serde(_) => "SERIALIZATION_ERROR",
        CodelensError::InvalidInput(_) => "INVALID_INPUT",
    }
    .to_string()
}
