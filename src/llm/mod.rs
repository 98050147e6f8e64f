//! LLM abstractions, shared types, and the analysis contract.
//!
//! [`AnalysisProvider`] is the one interface every backend satisfies. Concrete
//! adapters live under [`provider`]; callers obtain them from
//! [`ProviderFactory`](provider::ProviderFactory).

/// Prompt templates for the analysis operations.
pub mod prompt;
/// Catalog, adapters, factory and credential probe.
pub mod provider;
/// Structured analysis results.
pub mod schema;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::{CodelensError, Result};
use provider::catalog::ProviderId;
pub use schema::*;

/// The three fixed analysis operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Quality,
    Tests,
    Suggestions,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Quality, Operation::Tests, Operation::Suggestions];

    /// Sampling temperature sent with the request.
    pub fn temperature(&self) -> f32 {
        match self {
            Operation::Tests => 0.4,
            Operation::Quality | Operation::Suggestions => 0.3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Quality => "quality",
            Operation::Tests => "tests",
            Operation::Suggestions => "suggestions",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CodelensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "quality" => Ok(Operation::Quality),
            "tests" | "test" => Ok(Operation::Tests),
            "suggestions" | "suggest" => Ok(Operation::Suggestions),
            other => Err(CodelensError::InvalidInput(format!(
                "unknown operation '{}', expected quality, tests or suggestions",
                other
            ))),
        }
    }
}

/// Everything one analysis call needs.
///
/// Transient: built by the caller per request and dropped afterwards.
#[derive(Clone)]
pub struct AnalysisRequest {
    pub code: String,
    pub language: String,
    pub provider: ProviderId,
    pub model: String,
    pub credential: String,
}

impl fmt::Debug for AnalysisRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use provider::utils::mask_api_key;
        f.debug_struct("AnalysisRequest")
            .field("code_len", &self.code.len())
            .field("language", &self.language)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("credential", &mask_api_key(&self.credential))
            .finish()
    }
}

/// Uniform contract over every backend.
///
/// Each operation sends exactly one request and never retries. Failures come
/// back typed: [`CodelensError::Transport`] for non-success statuses and
/// connection problems, [`CodelensError::MalformedResponse`] when the reply does
/// not decode into the expected schema.
///
/// # Example
/// ```no_run
/// use codelens::config::AppConfig;
/// use codelens::llm::AnalysisProvider;
/// use codelens::llm::provider::ProviderFactory;
///
/// # async fn example() -> codelens::error::Result<()> {
/// let factory = ProviderFactory::new(&AppConfig::default())?;
/// let adapter = factory.create("openai", "sk-...", Some("gpt-4o-mini"))?;
/// let report = adapter.analyze_quality("print('hi')", "python").await?;
/// println!("{:?}", report);
/// # Ok(())
/// # }
/// ```
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Quality review: score, issues, metrics, summary.
    async fn analyze_quality(
        &self,
        code: &str,
        language: &str,
    ) -> Result<AnalysisOutcome<QualityReport>>;

    /// Test-case generation.
    async fn generate_tests(&self, code: &str, language: &str)
    -> Result<AnalysisOutcome<TestSuite>>;

    /// Refactoring, architecture and dependency suggestions.
    async fn suggest_improvements(
        &self,
        code: &str,
        language: &str,
    ) -> Result<AnalysisOutcome<SuggestionSet>>;

    /// Backend display name (used for logs and error messages).
    fn name(&self) -> &str;

    /// Model identifier requests are sent with.
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_temperatures() {
        assert_eq!(Operation::Quality.temperature(), 0.3);
        assert_eq!(Operation::Tests.temperature(), 0.4);
        assert_eq!(Operation::Suggestions.temperature(), 0.3);
    }

    #[test]
    fn test_operation_parse() {
        assert_eq!("Tests".parse::<Operation>().unwrap(), Operation::Tests);
        assert!("lint".parse::<Operation>().is_err());
    }

    #[test]
    fn test_request_debug_masks_credential() {
        let request = AnalysisRequest {
            code: "x = 1".to_string(),
            language: "python".to_string(),
            provider: ProviderId::OpenAI,
            model: "gpt-4o".to_string(),
            credential: "sk-abcdefghijklmnop".to_string(),
        };
        let debug = format!("{:?}", request);
        assert!(!debug.contains("sk-abcdefghijklmnop"));
        assert!(debug.contains("sk-a...mnop"));
    }

    #[tokio::test]
    async fn test_mock_provider_satisfies_contract() {
        let mut mock = MockAnalysisProvider::new();
        mock.expect_generate_tests().returning(|_, _| {
            Ok(AnalysisOutcome::Parsed(TestSuite {
                test_framework: "pytest".to_string(),
                test_cases: vec![],
                coverage_suggestions: vec![],
                mocking_suggestions: vec![],
            }))
        });

        let provider: &dyn AnalysisProvider = &mock;
        let suite = provider.generate_tests("x", "python").await.unwrap();
        assert_eq!(suite.parsed().unwrap().test_framework, "pytest");
    }
}
