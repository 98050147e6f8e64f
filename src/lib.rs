//! # codelens
//!
//! One analysis contract over nine LLM backends: code-quality review, test
//! generation and improvement suggestions.
//!
//! ## 功能
//! - **统一接口**：[`llm::AnalysisProvider`] 对所有 backend 暴露同样的三个操作
//! - **多 Provider 支持**：OpenAI, Anthropic, Gemini, xAI, Perplexity, Cohere, Mistral, HuggingFace, Together
//! - **语言检测**：按扩展名和内容启发式判断语言标签
//! - **凭据保险箱**：Fernet 加密的会话凭据
//!
//! ## 快速开始
//!
//! ### 作为 CLI 使用
//! ```bash
//! # 生成 vault key 并导出
//! export ENCRYPTION_KEY=$(codelens vault keygen)
//!
//! # 保存凭据并选择 provider
//! codelens keys set openai sk-...
//! codelens keys select openai gpt-4o-mini
//!
//! # 分析文件
//! codelens analyze src/app.py --operation quality
//! ```
//!
//! ### 作为库使用
//! ```no_run
//! use codelens::config::AppConfig;
//! use codelens::language;
//! use codelens::llm::AnalysisProvider;
//! use codelens::llm::provider::ProviderFactory;
//!
//! # async fn example() -> codelens::error::Result<()> {
//! let code = std::fs::read_to_string("app.py")?;
//! let language = language::detect("app.py", &code);
//!
//! let factory = ProviderFactory::new(&AppConfig::default())?;
//! let adapter = factory.create("anthropic", "sk-ant-...", None)?;
//!
//! let suite = adapter.generate_tests(&code, language).await?;
//! println!("{:?}", suite);
//! # Ok(())
//! # }
//! ```
//!
//! ## 核心模块
//! - [`llm`] - 分析接口、catalog、adapter 与工厂
//! - [`language`] - 语言检测
//! - [`vault`] - 凭据加解密与会话记录
//! - [`config`] - 配置管理
//! - [`commands`] - CLI 命令实现
//! - [`error`] - 统一错误类型
//! - [`ui`] - 终端输出工具
//!
//! ## 配置
//! 配置文件位置：
//! - Linux: `~/.config/codelens/config.toml`
//! - macOS: `~/Library/Application Support/codelens/config.toml`
//! - Windows: `%APPDATA%\codelens\config\config.toml`
//!
//! 示例配置：
//! ```toml
//! [llm]
//! default_provider = "anthropic"
//! max_tokens = 4000
//!
//! [llm.providers.openai]
//! endpoint = "https://my-proxy.local/v1"
//!
//! [network]
//! request_timeout = 120
//! generic_request_timeout = 60
//!
//! [vault]
//! key = "..."
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod language;
pub mod llm;
pub mod ui;
pub mod vault;
