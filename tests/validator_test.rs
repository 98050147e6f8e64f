//! CredentialValidator 集成测试：每个 catalog 条目的探测都只看状态码

use codelens::llm::provider::catalog::{self, ProviderId};
use codelens::llm::provider::test_utils::{ensure_crypto_provider, test_app_config};
use codelens::llm::provider::{CredentialValidator, ProviderFactory};
use mockito::{Matcher, ServerGuard};

fn all_ids() -> Vec<ProviderId> {
    catalog::list().iter().map(|d| d.id).collect()
}

async fn validator_for(server: &ServerGuard) -> CredentialValidator {
    ensure_crypto_provider();
    CredentialValidator::new(&test_app_config(&server.url(), &all_ids())).unwrap()
}

#[tokio::test]
async fn test_rejected_key_is_false_for_every_backend() {
    let mut server = mockito::Server::new_async().await;
    let _get = server
        .mock("GET", Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error": "invalid api key"}"#)
        .create_async()
        .await;
    let _post = server
        .mock("POST", Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error": "invalid api key"}"#)
        .create_async()
        .await;

    let validator = validator_for(&server).await;
    for id in all_ids() {
        assert!(
            !validator.validate(id.as_str(), "obviously-invalid-key").await,
            "{} accepted a rejected key",
            id
        );
    }
}

#[tokio::test]
async fn test_accepted_key_is_true_for_every_backend() {
    let mut server = mockito::Server::new_async().await;
    let _get = server
        .mock("GET", Matcher::Any)
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create_async()
        .await;
    let _post = server
        .mock("POST", Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let validator = validator_for(&server).await;
    for id in all_ids() {
        assert!(
            validator.validate(id.as_str(), "sk-valid-looking-key").await,
            "{} rejected an accepted key",
            id
        );
    }
}

#[tokio::test]
async fn test_unknown_backend_is_false_without_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let validator = validator_for(&server).await;
    assert!(!validator.validate("not-a-backend", "sk-anything").await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_validator_shares_factory_client() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer sk-from-factory")
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create_async()
        .await;

    ensure_crypto_provider();
    let factory =
        ProviderFactory::new(&test_app_config(&server.url(), &[ProviderId::XAI])).unwrap();
    let validator = CredentialValidator::from_factory(&factory);

    assert!(validator.validate("xai", "sk-from-factory").await);
    mock.assert_async().await;
}
