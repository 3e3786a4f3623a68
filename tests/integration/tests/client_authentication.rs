//! Token endpoint request shape.

use wiremock::matchers::{basic_auth, body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{alice_id_token, sign, token_response, SigningKey, TestRealm, CLIENT_ID};

fn tokens(realm: &TestRealm) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(token_response(
        &sign(&realm.alice_claims(), SigningKey::Realm),
        &alice_id_token(),
    ))
}

/// Public clients post their client ID with the password grant.
#[tokio::test]
async fn test_public_client_form() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    Mock::given(method("POST"))
        .and(path(TestRealm::token_path()))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=correct"))
        .and(body_string_contains(format!("client_id={CLIENT_ID}")))
        .respond_with(tokens(&realm))
        .expect(1)
        .mount(&realm.server)
        .await;

    realm
        .provider(&realm.adapter_config_with_static_key())?
        .authenticate_credentials("alice", "correct")
        .await?;
    Ok(())
}

/// Confidential clients authenticate with HTTP Basic.
#[tokio::test]
async fn test_confidential_client_basic_auth() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    Mock::given(method("POST"))
        .and(path(TestRealm::token_path()))
        .and(basic_auth(CLIENT_ID, "s3cr3t"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(tokens(&realm))
        .expect(1)
        .mount(&realm.server)
        .await;

    let result = realm
        .provider(&realm.confidential_adapter_config("s3cr3t"))?
        .authenticate_credentials("alice", "correct")
        .await?;
    assert_eq!(result.principal().subject(), "alice-id");

    let requests = realm.server.received_requests().await.unwrap_or_default();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(!body.contains("client_id="));
    Ok(())
}

/// A configured scope is requested.
#[tokio::test]
async fn test_scope_is_sent() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    Mock::given(method("POST"))
        .and(path(TestRealm::token_path()))
        .and(body_string_contains("scope=openid"))
        .respond_with(tokens(&realm))
        .expect(1)
        .mount(&realm.server)
        .await;

    let mut adapter = realm.adapter_config_with_static_key();
    adapter.scope = Some("openid".to_string());
    realm
        .provider(&adapter)?
        .authenticate_credentials("alice", "correct")
        .await?;
    Ok(())
}

/// Form values are URL-encoded.
#[tokio::test]
async fn test_credentials_are_form_encoded() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    Mock::given(method("POST"))
        .and(path(TestRealm::token_path()))
        .and(body_string_contains("username=alice%40example.com"))
        .and(body_string_contains("password=p%26ss+word"))
        .respond_with(tokens(&realm))
        .expect(1)
        .mount(&realm.server)
        .await;

    realm
        .provider(&realm.adapter_config_with_static_key())?
        .authenticate_credentials("alice@example.com", "p&ss word")
        .await?;
    Ok(())
}
