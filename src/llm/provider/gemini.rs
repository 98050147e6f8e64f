use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::base::{ApiBackend, BackendConfig, send_llm_request};
use crate::error::{CodelensError, Result};
use crate::llm::Operation;
use crate::llm::prompt;

/// Google Gemini generative-content provider
///
/// The generative-content API takes one combined prompt: the persona's lead
/// sentence is folded into the user template. JSON output is requested through
/// `generationConfig.responseMimeType`.
///
/// # Endpoint
/// `POST {base}/models/{model}:generateContent` with `x-goog-api-key`.
pub struct GeminiProvider {
    client: Client,
    config: BackendConfig,
}

// ============================================================================
// Request/response structure
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiRequest<'a> {
    pub(crate) contents: Vec<GeminiContent<'a>>,
    pub(crate) generation_config: GenerationConfig,
}

#[derive(Serialize)]
pub(crate) struct GeminiContent<'a> {
    pub(crate) role: &'static str,
    pub(crate) parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
pub(crate) struct GeminiPart<'a> {
    pub(crate) text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Option<Vec<GeminiResponsePart>>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// `models/{model}:generateContent` path for a model.
pub fn generate_content_path(model: &str) -> String {
    format!("/models/{}:generateContent", model)
}

impl GeminiProvider {
    pub fn new(client: Client, config: BackendConfig) -> Self {
        Self { client, config }
    }

    fn no_content(&self, reason: &str) -> CodelensError {
        CodelensError::MalformedResponse {
            provider: self.config.name.clone(),
            reason: reason.to_string(),
            raw: String::new(),
        }
    }
}

#[async_trait]
impl ApiBackend for GeminiProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn call_api(&self, operation: Operation, code: &str, language: &str) -> Result<String> {
        let prompt = prompt::combined_prompt(operation, code, language);
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: Some(operation.temperature()),
                response_mime_type: Some("application/json"),
                max_output_tokens: None,
            },
        };

        tracing::debug!(
            "Gemini API request: op={}, model={}, temperature={}, prompt_len={}",
            operation,
            self.config.model,
            operation.temperature(),
            prompt.len()
        );

        let endpoint = self
            .config
            .endpoint(&generate_content_path(&self.config.model));
        let response: GeminiResponse = send_llm_request(
            &self.client,
            &endpoint,
            &[("x-goog-api-key", self.config.api_key.as_str())],
            &request,
            &self.config.name,
            self.config.timeout,
        )
        .await?;

        let candidate = response
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| self.no_content("response contains no candidates"))?;

        // 非正常结束（SAFETY, RECITATION 等）
        if let Some(reason) = &candidate.finish_reason {
            match reason.as_str() {
                "STOP" => {}
                "MAX_TOKENS" => tracing::warn!("Gemini response truncated (MAX_TOKENS)"),
                other => tracing::warn!("Gemini response finished with reason: {}", other),
            }
        }

        candidate
            .content
            .and_then(|c| c.parts)
            .and_then(|parts| parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                let reason = match candidate.finish_reason.as_deref() {
                    Some(r) if r != "STOP" => format!("candidate has no text (finishReason {})", r),
                    _ => "candidate has no text".to_string(),
                };
                self.no_content(&reason)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;

    use crate::llm::AnalysisProvider;
    use crate::llm::provider::catalog::ProviderId;
    use crate::llm::provider::test_utils::{ensure_crypto_provider, test_backend_config};

    const MODEL: &str = "gemini-1.5-flash";

    fn provider(url: &str) -> GeminiProvider {
        GeminiProvider::new(
            Client::new(),
            test_backend_config(ProviderId::Gemini, url, MODEL),
        )
    }

    fn candidate_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": text}], "role": "model"},
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_gemini_quality_success() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let reply = r#"{"quality_score": 55.5, "issues": [{"type": "error", "severity": "high", "line": 3, "message": "Division by zero", "suggestion": "Guard the divisor"}], "metrics": {"complexity": "high", "maintainability": 40, "readability": 60, "security": 70}, "summary": "Risky", "recommendations": ["Add guards"]}"#;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_header("x-goog-api-key", "sk-test-key-123456")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "generationConfig": {"responseMimeType": "application/json", "temperature": 0.3}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body(reply))
            .expect(1)
            .create_async()
            .await;

        let report = provider(&server.url())
            .analyze_quality("x = 1 / 0", "python")
            .await
            .unwrap()
            .parsed()
            .unwrap();

        assert_eq!(report.quality_score, 55.5);
        assert_eq!(report.issues[0].line, Some(3));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gemini_prompt_is_combined() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_body(Matcher::Regex(
                "You are an expert test engineer. Generate comprehensive test cases".to_string(),
            ))
            .with_status(200)
            .with_body(candidate_body(r#"{"test_framework": "JUnit 5", "test_cases": []}"#))
            .create_async()
            .await;

        let suite = provider(&server.url())
            .generate_tests("class A {}", "java")
            .await
            .unwrap();
        assert_eq!(suite.parsed().unwrap().test_framework, "JUnit 5");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gemini_api_error_401() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .with_status(401)
            .with_body("Unauthorized")
            .expect(1)
            .create_async()
            .await;

        let err = provider(&server.url())
            .analyze_quality("x", "python")
            .await
            .unwrap_err();
        assert!(matches!(err, CodelensError::Transport { status: Some(401), .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gemini_safety_block_is_malformed() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
            .create_async()
            .await;

        let err = provider(&server.url())
            .suggest_improvements("x", "python")
            .await
            .unwrap_err();
        match err {
            CodelensError::MalformedResponse { reason, .. } => assert!(reason.contains("SAFETY")),
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_gemini_non_json_reply_is_malformed() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .with_status(200)
            .with_body(candidate_body("plain prose"))
            .create_async()
            .await;

        let err = provider(&server.url())
            .generate_tests("x", "python")
            .await
            .unwrap_err();
        assert!(matches!(err, CodelensError::MalformedResponse { .. }));
    }
}
