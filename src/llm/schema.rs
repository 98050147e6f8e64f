//! Structured results of the three analysis operations.
//!
//! Field names follow the JSON the prompts ask the model to emit, so these types
//! deserialize model replies directly and serialize back into the same shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Result of a quality review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Overall score in `[0, 100]`.
    pub quality_score: f64,
    #[serde(default)]
    pub issues: Vec<Issue>,
    pub metrics: Metrics,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// A single finding in a [`QualityReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Level,
    /// 1-based line number, when the model could pin one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub message: String,
    #[serde(default)]
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Error,
    Warning,
    Suggestion,
}

/// Three-step scale shared by severity, priority and complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub complexity: Level,
    pub maintainability: f64,
    pub readability: f64,
    pub security: f64,
}

/// Result of test generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuite {
    #[serde(default)]
    pub test_framework: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default)]
    pub coverage_suggestions: Vec<String>,
    #[serde(default)]
    pub mocking_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TestKind,
    pub priority: Level,
    #[serde(default)]
    pub test_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Unit,
    Integration,
    EdgeCase,
}

/// Result of improvement suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    #[serde(default)]
    pub refactoring_suggestions: Vec<RefactoringSuggestion>,
    #[serde(default)]
    pub architecture_suggestions: Vec<String>,
    #[serde(default)]
    pub dependency_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefactoringSuggestion {
    pub category: SuggestionCategory,
    pub description: String,
    #[serde(default)]
    pub before_code: String,
    #[serde(default)]
    pub after_code: String,
    /// Why the change matters.
    #[serde(rename = "explanation", default)]
    pub rationale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Performance,
    Security,
    Maintainability,
    Style,
}

/// Reply text that could not be parsed as JSON.
///
/// Only the generic HTTP adapter produces this; every other adapter reports
/// [`MalformedResponse`](crate::error::CodelensError::MalformedResponse).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedResponse {
    pub error: String,
    pub content: String,
}

impl DegradedResponse {
    pub const INVALID_JSON: &'static str = "Invalid JSON response";

    pub fn invalid_json(content: impl Into<String>) -> Self {
        Self {
            error: Self::INVALID_JSON.to_string(),
            content: content.into(),
        }
    }
}

/// What an analysis operation hands back.
///
/// Serialized untagged, so a degraded reply keeps the
/// `{"error": "Invalid JSON response", "content": ...}` shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome<T> {
    Parsed(T),
    Degraded(DegradedResponse),
}

impl<T> AnalysisOutcome<T> {
    pub fn parsed(self) -> Option<T> {
        match self {
            AnalysisOutcome::Parsed(value) => Some(value),
            AnalysisOutcome::Degraded(_) => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, AnalysisOutcome::Degraded(_))
    }
}

/// Post-decode checks a result must pass before reaching the caller.
pub trait Validate {
    /// Returns a human-readable reason when the value is out of contract.
    fn check(&self) -> std::result::Result<(), String>;
}

fn check_score(field: &str, value: f64) -> std::result::Result<(), String> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} {} out of range [0, 100]", field, value))
    }
}

impl Validate for QualityReport {
    fn check(&self) -> std::result::Result<(), String> {
        check_score("quality_score", self.quality_score)?;
        check_score("metrics.maintainability", self.metrics.maintainability)?;
        check_score("metrics.readability", self.metrics.readability)?;
        check_score("metrics.security", self.metrics.security)?;
        Ok(())
    }
}

impl Validate for TestSuite {
    fn check(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

impl Validate for SuggestionSet {
    fn check(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Marker for the three result types.
pub trait AnalysisResult: DeserializeOwned + Validate + Send + 'static {}

impl AnalysisResult for QualityReport {}
impl AnalysisResult for TestSuite {}
impl AnalysisResult for SuggestionSet {}
