//! HTTP 请求发送
//!
//! 每个操作只发一次请求：不重试，不退避。失败统一映射为 `Transport`。

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::response::truncate_for_preview;
use crate::error::{CodelensError, Result};

/// 将 reqwest 网络层错误映射为 Transport（status 为 None 表示未收到响应）
pub(crate) fn transport_error(provider_name: &str, e: reqwest::Error) -> CodelensError {
    let error_type = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connection failed"
    } else if e.is_request() {
        "request error"
    } else if e.is_body() {
        "body error"
    } else {
        "unknown"
    };

    tracing::debug!("{} API request failed [{}]: {}", provider_name, error_type, e);

    CodelensError::Transport {
        provider: provider_name.to_string(),
        status: e.status().map(|s| s.as_u16()),
        body: format!("{}: {}", error_type, e),
    }
}

fn with_headers(mut req: RequestBuilder, headers: &[(&str, &str)]) -> RequestBuilder {
    for (key, value) in headers {
        req = req.header(*key, *value);
    }
    req
}

/// 读取响应 body；非 2xx 状态转为 Transport
pub(crate) async fn read_success_body(provider_name: &str, response: Response) -> Result<String> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(provider_name, e))?;

    tracing::debug!("{} API response status: {}", provider_name, status);
    tracing::debug!(
        "{} API response body: {}",
        provider_name,
        truncate_for_preview(&text)
    );

    if !status.is_success() {
        return Err(CodelensError::Transport {
            provider: provider_name.to_string(),
            status: Some(status.as_u16()),
            body: text,
        });
    }
    Ok(text)
}

/// 发送一次 JSON POST，返回成功响应的原始 body
pub async fn send_json<Req: Serialize + ?Sized>(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    request_body: &Req,
    provider_name: &str,
    timeout: Option<Duration>,
) -> Result<String> {
    let mut req = with_headers(
        client
            .post(endpoint)
            .header("Content-Type", "application/json"),
        headers,
    );
    if let Some(timeout) = timeout {
        req = req.timeout(timeout);
    }

    tracing::debug!("Sending request to: {}", endpoint);

    let response = req
        .json(request_body)
        .send()
        .await
        .map_err(|e| transport_error(provider_name, e))?;

    read_success_body(provider_name, response).await
}

/// 发送 LLM API 请求并解析响应外层结构（envelope）
///
/// 外层结构不是合法 JSON 时返回 `MalformedResponse`；
/// 模型回复内容本身的解析由 [`super::response::decode_reply`] 负责。
pub async fn send_llm_request<Req, Resp>(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    request_body: &Req,
    provider_name: &str,
    timeout: Option<Duration>,
) -> Result<Resp>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let response_text = send_json(
        client,
        endpoint,
        headers,
        request_body,
        provider_name,
        timeout,
    )
    .await?;

    serde_json::from_str(&response_text).map_err(|e| CodelensError::MalformedResponse {
        provider: provider_name.to_string(),
        reason: format!("unexpected response envelope: {}", e),
        raw: response_text,
    })
}

/// 发送一次 GET（用于 `/models` 之类的探测）
pub async fn send_get(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    provider_name: &str,
) -> Result<String> {
    tracing::debug!("Sending GET to: {}", endpoint);
    let response = with_headers(client.get(endpoint), headers)
        .send()
        .await
        .map_err(|e| transport_error(provider_name, e))?;
    read_success_body(provider_name, response).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::test_utils::ensure_crypto_provider;
    use mockito::Server;
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    struct Envelope {
        ok: bool,
    }

    #[tokio::test]
    async fn test_send_llm_request_parses_envelope() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/echo")
            .match_header("authorization", "Bearer t")
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .expect(1)
            .create_async()
            .await;

        let client = Client::new();
        let envelope: Envelope = send_llm_request(
            &client,
            &format!("{}/echo", server.url()),
            &[("Authorization", "Bearer t")],
            &serde_json::json!({"q": 1}),
            "Test",
            None,
        )
        .await
        .unwrap();
        assert!(envelope.ok);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/echo")
            .with_status(503)
            .with_body("overloaded")
            .expect(1)
            .create_async()
            .await;

        let client = Client::new();
        let err = send_json(
            &client,
            &format!("{}/echo", server.url()),
            &[],
            &serde_json::json!({}),
            "Test",
            None,
        )
        .await
        .unwrap_err();

        match err {
            CodelensError::Transport { status, body, .. } => {
                assert_eq!(status, Some(503));
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected Transport, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bad_envelope_is_malformed() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/echo")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let client = Client::new();
        let err = send_llm_request::<_, Envelope>(
            &client,
            &format!("{}/echo", server.url()),
            &[],
            &serde_json::json!({}),
            "Test",
            None,
        )
        .await
        .unwrap_err();
        assert!(
            matches!(err, CodelensError::MalformedResponse { raw, .. } if raw.contains("gateway"))
        );
    }

    #[tokio::test]
    async fn test_connection_refused_has_no_status() {
        ensure_crypto_provider();
        let client = Client::new();
        // 端口 1 通常无人监听
        let err = send_json(
            &client,
            "http://127.0.0.1:1/never",
            &[],
            &serde_json::json!({}),
            "Test",
            Some(Duration::from_secs(2)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CodelensError::Transport { status: None, .. }));
    }
}
