// 配置加载逻辑
//
// 此文件负责从文件和环境变量加载配置。

use config::{Config, Environment, File};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use super::structs::AppConfig;
use crate::error::Result;

/// 加载应用配置
///
/// 配置加载优先级（从高到低）：
/// 1. 环境变量（CODELENS__* 前缀，双下划线表示嵌套）
///    - 例如：`CODELENS__LLM__DEFAULT_PROVIDER=anthropic`
///    - 例如：`CODELENS__NETWORK__REQUEST_TIMEOUT=30`
/// 2. 配置文件（~/.config/codelens/config.toml）
/// 3. 默认值（Default trait 和 serde(default) 属性）
pub fn load_config() -> Result<AppConfig> {
    load_config_from(get_config_path().as_deref())
}

/// 从指定配置文件加载（文件不存在时跳过）
pub fn load_config_from(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    // 1. 加载配置文件（如果存在）
    if let Some(path) = config_path
        && path.exists()
    {
        tracing::debug!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path));
    }

    // 2. 加载环境变量（CODELENS__*，优先级最高）
    // 双下划线作为嵌套分隔符，避免与字段名中的单下划线冲突
    builder = builder.add_source(
        Environment::with_prefix("CODELENS")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;

    Ok(app_config)
}

/// 获取配置文件路径
///
/// 返回 ~/.config/codelens/config.toml
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// 获取配置目录路径
pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "codelens").map(|dirs| dirs.config_dir().to_path_buf())
}
