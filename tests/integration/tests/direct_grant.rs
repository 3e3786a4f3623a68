//! Direct access grant login outcomes.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use kc_auth::{
    AuthError, AuthenticationProvider, AuthenticationRequest, Authority, ProviderChain, RequestKind,
    Role, SimpleAuthorityMapper,
};
use kc_core::PrincipalAttribute;
use wiremock::ResponseTemplate;

use crate::common::{alice_id_token, authority_names, id_token, set, SigningKey, TestRealm};

/// Alice logs in and receives realm and resource roles as authorities.
#[tokio::test]
async fn test_alice_login_succeeds() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm.mount_jwks(1).await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Realm, &alice_id_token())
        .await;

    let provider = realm.provider(&realm.adapter_config())?;
    let result = provider.authenticate_credentials("alice", "correct").await?;

    assert_eq!(result.principal().subject(), "alice-id");
    assert_eq!(authority_names(&result), set(&["user", "admin", "reports:view"]));

    let context = result.principal().security_context();
    assert_eq!(context.refresh_token(), Some("refresh-token"));
    assert_eq!(context.id_token_claims().email.as_deref(), Some("alice@example.com"));
    Ok(())
}

/// The principal name follows the configured attribute.
#[tokio::test]
async fn test_principal_attribute() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Realm, &alice_id_token())
        .await;

    let mut adapter = realm.adapter_config_with_static_key();
    adapter.principal_attribute = PrincipalAttribute::PreferredUsername;

    let result = realm
        .provider(&adapter)?
        .authenticate_credentials("alice", "correct")
        .await?;
    assert_eq!(result.principal().name(), "alice");
    assert_eq!(result.principal().subject(), "alice-id");
    Ok(())
}

/// A 400 from the token endpoint is a service failure, not a credential judgment.
#[tokio::test]
async fn test_http_400_is_unavailable() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm
        .mount_token_response(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_request",
            "error_description": "Missing form parameter: grant_type"
        })))
        .await;

    let error = realm
        .provider(&realm.adapter_config_with_static_key())?
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();

    assert!(matches!(error, AuthError::AuthenticationUnavailable(_)));
    assert!(error.to_string().contains("try again later"));
    Ok(())
}

/// Wrong password: Keycloak answers 401 `invalid_grant`.
#[tokio::test]
async fn test_invalid_grant_is_unavailable() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm
        .mount_token_response(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid user credentials"
        })))
        .await;

    let error = realm
        .provider(&realm.adapter_config_with_static_key())?
        .authenticate_credentials("alice", "wrong")
        .await
        .unwrap_err();

    assert!(error.is_unavailable());
    Ok(())
}

/// A non-JSON 200 body is a malformed response.
#[tokio::test]
async fn test_malformed_body_is_unavailable() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm
        .mount_token_response(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .await;

    let error = realm
        .provider(&realm.adapter_config_with_static_key())?
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();

    assert!(error.is_unavailable());
    Ok(())
}

/// An unreachable server is a service failure.
#[tokio::test]
async fn test_connection_refused_is_unavailable() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    let mut adapter = realm.adapter_config_with_static_key();
    adapter.auth_server_url = "http://127.0.0.1:1".to_string();

    let error = realm
        .provider(&adapter)?
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();

    assert!(error.is_unavailable());
    Ok(())
}

/// A token signed by a key the realm never published is rejected.
#[tokio::test]
async fn test_untrusted_signature_is_rejected() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Rogue, &alice_id_token())
        .await;

    let error = realm
        .provider(&realm.adapter_config_with_static_key())?
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();

    assert!(matches!(error, AuthError::CredentialsRejected(_)));
    assert_eq!(error.to_string(), "invalid username or password");
    Ok(())
}

/// An ID token whose payload is not JSON is rejected.
#[tokio::test]
async fn test_id_token_payload_not_json_is_rejected() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Realm, &id_token("not json at all"))
        .await;

    let error = realm
        .provider(&realm.adapter_config_with_static_key())?
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();

    assert!(error.is_credentials_rejected());
    Ok(())
}

/// An expired access token is rejected.
#[tokio::test]
async fn test_expired_token_is_rejected() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    let mut claims = realm.alice_claims();
    claims.exp = (Utc::now() - Duration::minutes(5)).timestamp();
    realm.mount_tokens(&claims, SigningKey::Realm, &alice_id_token()).await;

    let error = realm
        .provider(&realm.adapter_config_with_static_key())?
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();

    assert!(error.is_credentials_rejected());
    Ok(())
}

/// A token issued for another realm is rejected.
#[tokio::test]
async fn test_issuer_mismatch_is_rejected() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    let mut claims = realm.alice_claims();
    claims.iss = format!("{}/realms/other", realm.server.uri());
    realm.mount_tokens(&claims, SigningKey::Realm, &alice_id_token()).await;

    let error = realm
        .provider(&realm.adapter_config_with_static_key())?
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();

    assert!(error.is_credentials_rejected());
    Ok(())
}

/// Audience is only enforced when configured.
#[tokio::test]
async fn test_audience_verification() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    let claims = realm.alice_claims().with_audience("account");
    realm.mount_tokens(&claims, SigningKey::Realm, &alice_id_token()).await;

    let mut adapter = realm.adapter_config_with_static_key();
    realm
        .provider(&adapter)?
        .authenticate_credentials("alice", "correct")
        .await?;

    adapter.verify_token_audience = true;
    let error = realm
        .provider(&adapter)?
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();
    assert!(error.is_credentials_rejected());
    Ok(())
}

/// The mapper's output replaces the role set as-is.
#[tokio::test]
async fn test_authorities_mapper() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Realm, &alice_id_token())
        .await;
    let adapter = realm.adapter_config_with_static_key();

    let provider = realm.provider(&adapter)?.with_mapper(SimpleAuthorityMapper::new());
    let result = provider.authenticate_credentials("alice", "correct").await?;
    assert_eq!(
        authority_names(&result),
        set(&["ROLE_admin", "ROLE_reports:view", "ROLE_user"])
    );

    let provider = realm
        .provider(&adapter)?
        .with_mapper(|_: &BTreeSet<Role>| -> Vec<Authority> { Vec::new() });
    let result = provider.authenticate_credentials("alice", "correct").await?;
    assert!(result.authorities().is_empty());
    assert_eq!(result.roles().len(), 3);
    Ok(())
}

/// Dispatch through a provider chain.
#[tokio::test]
async fn test_provider_chain_dispatch() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Realm, &alice_id_token())
        .await;

    let provider = Arc::new(realm.provider(&realm.adapter_config_with_static_key())?);
    assert!(provider.supports(RequestKind::DirectAccessGrant));
    assert!(provider.supports(RequestKind::UsernamePassword));
    assert!(!provider.supports(RequestKind::KeycloakBearer));
    assert!(!provider.supports(RequestKind::PreAuthenticated));
    assert!(!provider.supports(RequestKind::Anonymous));

    let chain = ProviderChain::new().with_provider(provider);

    let result = chain
        .authenticate(&AuthenticationRequest::username_password("alice", "correct"))
        .await?;
    assert_eq!(result.principal().subject(), "alice-id");

    let bearer = AuthenticationRequest::new(
        RequestKind::KeycloakBearer,
        kc_auth::Credentials::new("alice", "correct"),
    );
    assert!(matches!(
        chain.authenticate(&bearer).await,
        Err(AuthError::ProviderNotFound(RequestKind::KeycloakBearer))
    ));
    Ok(())
}

/// A `keycloak.json` document drives the whole login.
#[tokio::test]
async fn test_login_from_adapter_json() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm.mount_jwks(1).await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Realm, &alice_id_token())
        .await;

    let json = serde_json::json!({
        "realm": crate::common::REALM,
        "auth-server-url": realm.server.uri(),
        "resource": crate::common::CLIENT_ID,
        "public-client": true,
        "principal-attribute": "preferred_username",
        "ssl-required": "external"
    });
    let adapter = kc_core::AdapterConfig::from_json(&json.to_string())?;
    assert_eq!(adapter.principal_attribute, PrincipalAttribute::PreferredUsername);

    let result = realm
        .provider(&adapter)?
        .authenticate_credentials("alice", "correct")
        .await?;
    assert_eq!(result.principal().name(), "alice");
    Ok(())
}
