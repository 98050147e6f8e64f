//! Response handling and JSON cleaning
//!
//! Turns the model's reply text into a validated analysis result.

use crate::error::{CodelensError, Result};
use crate::llm::schema::{AnalysisOutcome, AnalysisResult, DegradedResponse};

use super::DecodePolicy;

/// Error preview maximum length
const ERROR_PREVIEW_LENGTH: usize = 500;

/// Clean JSON response (remove markdown code block tags)
pub fn clean_json_response(response: &str) -> &str {
    let trimmed = response.trim();

    // Extract content between { to }
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && start < end
    {
        return &trimmed[start..=end];
    }

    let without_prefix = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|s| s.trim_start())
        .unwrap_or(trimmed);

    without_prefix
        .strip_suffix("```")
        .map(|s| s.trim_end())
        .unwrap_or(without_prefix)
        .trim()
}

/// Truncate string for error preview (safe handling of multibyte characters)
pub fn truncate_for_preview(s: &str) -> String {
    if s.len() <= ERROR_PREVIEW_LENGTH {
        return s.to_string();
    }
    let boundary = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= ERROR_PREVIEW_LENGTH)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..boundary])
}

fn malformed(provider: &str, reason: String, raw: &str) -> CodelensError {
    CodelensError::MalformedResponse {
        provider: provider.to_string(),
        reason,
        raw: raw.to_string(),
    }
}

/// Decode a model reply into `T`.
///
/// Invalid JSON is fatal under [`DecodePolicy::Strict`] and yields a
/// [`DegradedResponse`] under [`DecodePolicy::DegradeOnInvalidJson`]. JSON that
/// parses but misses the schema, or fails range checks, is always
/// `MalformedResponse`.
pub fn decode_reply<T: AnalysisResult>(
    provider: &str,
    raw: &str,
    policy: DecodePolicy,
) -> Result<AnalysisOutcome<T>> {
    tracing::debug!("{} reply ({} chars)", provider, raw.len());

    let cleaned = clean_json_response(raw);
    let value: serde_json::Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(e) => {
            return match policy {
                DecodePolicy::DegradeOnInvalidJson => {
                    tracing::warn!(
                        "{} returned non-JSON content, passing it through: {}",
                        provider,
                        truncate_for_preview(raw)
                    );
                    Ok(AnalysisOutcome::Degraded(DegradedResponse::invalid_json(raw)))
                }
                DecodePolicy::Strict => Err(malformed(
                    provider,
                    format!("reply is not valid JSON: {}", e),
                    raw,
                )),
            };
        }
    };

    let parsed: T = serde_json::from_value(value)
        .map_err(|e| malformed(provider, format!("reply does not match schema: {}", e), raw))?;
    parsed.check().map_err(|reason| malformed(provider, reason, raw))?;

    Ok(AnalysisOutcome::Parsed(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::schema::{QualityReport, SuggestionSet, TestSuite};
    use pretty_assertions::assert_eq;

    const QUALITY: &str = r#"{"quality_score": 88, "issues": [], "metrics": {"complexity": "medium", "maintainability": 70, "readability": 80, "security": 95}, "summary": "ok", "recommendations": []}"#;

    // === clean_json_response ===

    #[test]
    fn test_clean_json_plain() {
        let input = r#"{"key": "value"}"#;
        assert_eq!(clean_json_response(input), r#"{"key": "value"}"#);
    }

    #[test]
    fn test_clean_json_markdown_lowercase() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(clean_json_response(input), r#"{"key": "value"}"#);
    }

    #[test]
    fn test_clean_json_with_both_prefix_suffix() {
        let input = "Result:\n{\"key\": \"value\"}\nDone.";
        assert_eq!(clean_json_response(input), r#"{"key": "value"}"#);
    }

    #[test]
    fn test_clean_json_no_braces() {
        let input = "Just some text without JSON";
        assert_eq!(clean_json_response(input), "Just some text without JSON");
    }

    // === truncate_for_preview ===

    #[test]
    fn test_truncate_long_string() {
        let long = "a".repeat(600);
        let result = truncate_for_preview(&long);
        assert!(result.ends_with("..."));
        assert_eq!(result.len(), ERROR_PREVIEW_LENGTH + 3);
    }

    #[test]
    fn test_truncate_multibyte_chars() {
        let chinese = "你".repeat(200);
        let result = truncate_for_preview(&chinese);
        assert!(result.ends_with("..."));
        assert!(result.len() <= ERROR_PREVIEW_LENGTH + 3 + 3);
    }

    // === decode_reply ===

    #[test]
    fn test_decode_quality_fenced() {
        let raw = format!("```json\n{}\n```", QUALITY);
        let outcome =
            decode_reply::<QualityReport>("OpenAI", &raw, DecodePolicy::Strict).unwrap();
        let report = outcome.parsed().unwrap();
        assert_eq!(report.quality_score, 88.0);
    }

    #[test]
    fn test_decode_non_json_strict_is_malformed() {
        let err = decode_reply::<TestSuite>("OpenAI", "I cannot help with that", DecodePolicy::Strict)
            .unwrap_err();
        match err {
            CodelensError::MalformedResponse { raw, provider, .. } => {
                assert_eq!(raw, "I cannot help with that");
                assert_eq!(provider, "OpenAI");
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_non_json_degrades_for_generic() {
        let outcome = decode_reply::<SuggestionSet>(
            "Mistral AI",
            "Here are some thoughts",
            DecodePolicy::DegradeOnInvalidJson,
        )
        .unwrap();
        assert_eq!(
            outcome,
            AnalysisOutcome::Degraded(DegradedResponse {
                error: "Invalid JSON response".to_string(),
                content: "Here are some thoughts".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_schema_mismatch_is_malformed_even_when_degrading() {
        let err = decode_reply::<QualityReport>(
            "Mistral AI",
            r#"{"score": 10}"#,
            DecodePolicy::DegradeOnInvalidJson,
        )
        .unwrap_err();
        assert!(matches!(err, CodelensError::MalformedResponse { .. }));
    }

    #[test]
    fn test_decode_out_of_range_score_rejected() {
        let raw = QUALITY.replace("\"quality_score\": 88", "\"quality_score\": 140");
        let err = decode_reply::<QualityReport>("Gemini", &raw, DecodePolicy::Strict).unwrap_err();
        assert!(
            matches!(err, CodelensError::MalformedResponse { reason, .. } if reason.contains("quality_score"))
        );
    }
}
