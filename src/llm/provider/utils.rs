//! Provider utility functions
//!
//! URL joining and key masking.

/// Joins an operation path onto a base URL.
///
/// # Behavior
/// 1. Remove trailing slashes from the base
/// 2. Keep the URL as is when it already ends with the path
/// 3. Otherwise append the path with exactly one separating slash
///
/// # Example
/// ```
/// use codelens::llm::provider::utils::complete_endpoint;
///
/// assert_eq!(
///     complete_endpoint("https://api.mistral.ai/v1", "/chat/completions"),
///     "https://api.mistral.ai/v1/chat/completions"
/// );
///
/// assert_eq!(
///     complete_endpoint("https://proxy.local/v1/chat/completions", "/chat/completions"),
///     "https://proxy.local/v1/chat/completions"
/// );
/// ```
pub fn complete_endpoint(base_url: &str, path: &str) -> String {
    let url = base_url.trim().trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() || url.ends_with(&format!("/{}", path)) {
        return url.to_string();
    }

    format!("{}/{}", url, path)
}

/// Mask API key to prevent log leaks
///
/// # rule
/// - length > 8: display first 4 characters + `...` + last 4 characters
/// - length <= 8: display `****`
///
/// # Example
/// ```
/// use codelens::llm::provider::utils::mask_api_key;
///
/// assert_eq!(mask_api_key("sk-ant-api03-abcdefgh"), "sk-a...efgh");
/// assert_eq!(mask_api_key("short"), "****");
/// assert_eq!(mask_api_key(""), "****");
/// ```
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}
