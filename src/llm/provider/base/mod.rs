//! Provider 公共抽象和辅助函数
//!
//! 提取各 Provider 的通用逻辑，减少重复代码。
//!
//! 模块结构：
//! - `config` - 单个 adapter 的解析后配置
//! - `request` - HTTP 请求发送（单次，不重试）
//! - `response` - 响应清理、解码与校验
//! - `validation` - 凭据与探测辅助函数
//! - `ApiBackend` trait - 各 provider 只需实现独有部分，通用逻辑由 blanket impl 提供

pub mod config;
pub mod request;
pub mod response;
pub mod validation;

pub use config::BackendConfig;
pub use request::{send_get, send_json, send_llm_request};
pub use response::*;
pub use validation::*;

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::{AnalysisOutcome, AnalysisProvider, Operation, QualityReport, SuggestionSet, TestSuite};

/// 模型回复不是 JSON 时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// 返回 `MalformedResponse`
    Strict,
    /// 返回 `{error: "Invalid JSON response", content}` 降级结果
    DegradeOnInvalidJson,
}

/// 内部 trait：每个 provider 只需实现自己独有的部分
///
/// 通过 blanket impl 自动为所有 `ApiBackend` 实现者提供 `AnalysisProvider`。
#[async_trait]
pub(crate) trait ApiBackend: Send + Sync {
    /// Provider 名称
    fn name(&self) -> &str;

    /// 模型名称
    fn model(&self) -> &str;

    /// 为一个操作构造 prompt、发送一次请求并返回模型回复文本
    async fn call_api(&self, operation: Operation, code: &str, language: &str) -> Result<String>;

    /// 回复解码策略
    fn decode_policy(&self) -> DecodePolicy {
        DecodePolicy::Strict
    }
}

#[async_trait]
impl<T: ApiBackend> AnalysisProvider for T {
    async fn analyze_quality(
        &self,
        code: &str,
        language: &str,
    ) -> Result<AnalysisOutcome<QualityReport>> {
        let reply = self.call_api(Operation::Quality, code, language).await?;
        decode_reply(ApiBackend::name(self), &reply, self.decode_policy())
    }

    async fn generate_tests(
        &self,
        code: &str,
        language: &str,
    ) -> Result<AnalysisOutcome<TestSuite>> {
        let reply = self.call_api(Operation::Tests, code, language).await?;
        decode_reply(ApiBackend::name(self), &reply, self.decode_policy())
    }

    async fn suggest_improvements(
        &self,
        code: &str,
        language: &str,
    ) -> Result<AnalysisOutcome<SuggestionSet>> {
        let reply = self.call_api(Operation::Suggestions, code, language).await?;
        decode_reply(ApiBackend::name(self), &reply, self.decode_policy())
    }

    fn name(&self) -> &str {
        ApiBackend::name(self)
    }

    fn model(&self) -> &str {
        ApiBackend::model(self)
    }
}
