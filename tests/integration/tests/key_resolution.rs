//! Realm key resolution through the JWKS endpoint.

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{alice_id_token, sign, token_response, SigningKey, TestRealm, REALM_JWKS};

/// The JWKS is downloaded once and reused across logins.
#[tokio::test]
async fn test_jwks_is_cached_across_logins() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm.mount_jwks(1).await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Realm, &alice_id_token())
        .await;

    let provider = realm.provider(&realm.adapter_config())?;
    for _ in 0..3 {
        let result = provider.authenticate_credentials("alice", "correct").await?;
        assert_eq!(result.principal().subject(), "alice-id");
    }
    Ok(())
}

/// A `kid` missing from the JWKS is rejected.
#[tokio::test]
async fn test_unknown_kid_is_rejected() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm.mount_jwks(1).await;

    let token = sign(&realm.alice_claims(), SigningKey::Realm);
    let (header, rest) = token.split_once('.').unwrap_or_default();
    let mut decoded: serde_json::Value = serde_json::from_slice(
        &base64::Engine::decode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, header)?,
    )?;
    decoded["kid"] = serde_json::json!("rotated-away");
    // header change breaks the signature, but the key lookup fails first
    let token = format!(
        "{}.{rest}",
        base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            serde_json::to_vec(&decoded)?
        )
    );
    realm
        .mount_token_response(
            ResponseTemplate::new(200).set_body_json(token_response(&token, &alice_id_token())),
        )
        .await;

    let error = realm
        .provider(&realm.adapter_config())?
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();
    assert!(error.is_credentials_rejected());
    Ok(())
}

/// A JWKS outage is a service failure.
#[tokio::test]
async fn test_jwks_outage_is_unavailable() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    Mock::given(method("GET"))
        .and(path(TestRealm::jwks_path()))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&realm.server)
        .await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Realm, &alice_id_token())
        .await;

    let error = realm
        .provider(&realm.adapter_config())?
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();
    assert!(error.is_unavailable());
    Ok(())
}

/// A token signed by an unpublished key fails against the JWKS too.
#[tokio::test]
async fn test_rogue_key_with_jwks_is_rejected() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    realm.mount_jwks(1).await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Rogue, &alice_id_token())
        .await;

    let error = realm
        .provider(&realm.adapter_config())?
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();
    assert!(error.is_credentials_rejected());
    Ok(())
}

/// A realm that recovers from a JWKS outage is usable right away.
#[tokio::test]
async fn test_jwks_recovers_after_outage() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    Mock::given(method("GET"))
        .and(path(TestRealm::jwks_path()))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&realm.server)
        .await;
    realm.mount_jwks(1).await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Realm, &alice_id_token())
        .await;

    let provider = realm.provider(&realm.adapter_config())?;
    let error = provider
        .authenticate_credentials("alice", "correct")
        .await
        .unwrap_err();
    assert!(error.is_unavailable());

    let result = provider.authenticate_credentials("alice", "correct").await?;
    assert_eq!(result.principal().subject(), "alice-id");
    Ok(())
}

/// Logins racing on a cold key cache all succeed.
#[tokio::test]
async fn test_concurrent_first_logins() -> anyhow::Result<()> {
    let realm = TestRealm::start().await;
    Mock::given(method("GET"))
        .and(path(TestRealm::jwks_path()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(REALM_JWKS, "application/json")
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .expect(1..=2)
        .mount(&realm.server)
        .await;
    realm
        .mount_tokens(&realm.alice_claims(), SigningKey::Realm, &alice_id_token())
        .await;

    let provider = realm.provider(&realm.adapter_config())?;
    let (first, second) = tokio::join!(
        provider.authenticate_credentials("alice", "correct"),
        provider.authenticate_credentials("alice", "correct"),
    );
    assert_eq!(first?.principal().subject(), "alice-id");
    assert_eq!(second?.principal().subject(), "alice-id");
    Ok(())
}
