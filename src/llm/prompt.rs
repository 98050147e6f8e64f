//! Prompt templates for the three analysis operations.
//!
//! Each operation has a persona (system role) and a user template that embeds
//! the language tag, the JSON schema the reply must follow, and the verbatim code.

use super::Operation;

/// How strongly the system prompt has to insist on JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// The request itself enforces JSON (`response_format`), persona only.
    StructuredOutput,
    /// No structured-output switch on the wire: the persona demands JSON.
    JsonOnly,
    /// Short personas used for OpenAI-compatible generic backends.
    Generic,
}

const QUALITY_PERSONA: &str = "You are an expert code reviewer and static analysis tool. Provide detailed, actionable feedback on code quality, security, and best practices.";

const TESTS_PERSONA: &str = "You are an expert test engineer. Generate comprehensive, practical test cases that follow testing best practices and cover edge cases.";

const SUGGESTIONS_PERSONA: &str = "You are a senior software architect and code mentor. Provide actionable, specific suggestions for code improvement.";

const JSON_ONLY_SUFFIX: &str = " Always respond with valid JSON.";

/// System-role prompt for an operation.
pub fn system_prompt(operation: Operation, style: PromptStyle) -> String {
    match style {
        PromptStyle::StructuredOutput => persona(operation).to_string(),
        PromptStyle::JsonOnly => format!("{}{}", persona(operation), JSON_ONLY_SUFFIX),
        PromptStyle::Generic => generic_persona(operation).to_string(),
    }
}

fn persona(operation: Operation) -> &'static str {
    match operation {
        Operation::Quality => QUALITY_PERSONA,
        Operation::Tests => TESTS_PERSONA,
        Operation::Suggestions => SUGGESTIONS_PERSONA,
    }
}

fn generic_persona(operation: Operation) -> &'static str {
    match operation {
        Operation::Quality => {
            "You are an expert code reviewer. Analyze the code and provide detailed feedback in JSON format."
        }
        Operation::Tests => {
            "You are a test engineer. Generate comprehensive test cases in JSON format."
        }
        Operation::Suggestions => {
            "You are a senior developer. Provide code improvement suggestions in JSON format."
        }
    }
}

/// User-role prompt: instructions, schema and code.
pub fn user_prompt(operation: Operation, code: &str, language: &str) -> String {
    match operation {
        Operation::Quality => quality_prompt(code, language),
        Operation::Tests => tests_prompt(code, language),
        Operation::Suggestions => suggestions_prompt(code, language),
    }
}

/// Single prompt for backends that take no separate system role.
///
/// The persona's lead sentence is folded in front of the user template.
pub fn combined_prompt(operation: Operation, code: &str, language: &str) -> String {
    let lead = persona(operation)
        .split_inclusive(". ")
        .next()
        .unwrap_or_default()
        .trim_end();
    format!("{} {}", lead, user_prompt(operation, code, language))
}

fn quality_prompt(code: &str, language: &str) -> String {
    format!(
        r#"Analyze the following {language} code for quality, best practices, and potential issues.
Provide a comprehensive analysis in JSON format with the following structure:
{{
    "quality_score": <number between 0-100>,
    "issues": [
        {{
            "type": "error|warning|suggestion",
            "severity": "high|medium|low",
            "line": <line_number_or_null>,
            "message": "description of the issue",
            "suggestion": "how to fix it"
        }}
    ],
    "metrics": {{
        "complexity": "low|medium|high",
        "maintainability": <number between 0-100>,
        "readability": <number between 0-100>,
        "security": <number between 0-100>
    }},
    "summary": "Overall summary of code quality",
    "recommendations": [
        "list of general recommendations for improvement"
    ]
}}

Code to analyze:
{code}
"#
    )
}

fn tests_prompt(code: &str, language: &str) -> String {
    format!(
        r#"Generate comprehensive test cases for the following {language} code.
Provide the response in JSON format with the following structure:
{{
    "test_framework": "recommended testing framework for {language}",
    "test_cases": [
        {{
            "name": "test case name",
            "description": "what this test validates",
            "type": "unit|integration|edge_case",
            "priority": "high|medium|low",
            "test_code": "actual test code implementation"
        }}
    ],
    "coverage_suggestions": [
        "areas that need more test coverage"
    ],
    "mocking_suggestions": [
        "components that should be mocked and why"
    ]
}}

Code to generate tests for:
{code}
"#
    )
}

fn suggestions_prompt(code: &str, language: &str) -> String {
    format!(
        r#"Provide specific code improvement suggestions for the following {language} code.
Focus on performance, security, maintainability, and best practices.
Respond in JSON format:
{{
    "refactoring_suggestions": [
        {{
            "category": "performance|security|maintainability|style",
            "description": "what to improve",
            "before_code": "current problematic code snippet",
            "after_code": "improved code snippet",
            "explanation": "why this improvement matters"
        }}
    ],
    "architecture_suggestions": [
        "high-level architectural improvements"
    ],
    "dependency_suggestions": [
        "library or framework recommendations"
    ]
}}

Code to improve:
{code}
"#
    )
}
