//! Common test utilities and fixtures.

use std::collections::BTreeSet;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use kc_auth::{AuthenticationResult, Authority, DirectAccessGrantAuthenticationProvider};
use kc_core::{AdapterConfig, ClientCredentials};
use kc_protocol_oidc::{AccessTokenClaims, DirectGrantClient, ProviderConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Realm name used by every test.
pub const REALM: &str = "demo";

/// Client ID used by every test.
pub const CLIENT_ID: &str = "reports-app";

/// Key ID of the realm signing key.
pub const REALM_KID: &str = "realm-key-1";

const REALM_PRIVATE_KEY: &str = include_str!("../fixtures/realm-private.pem");
const REALM_PUBLIC_KEY: &str = include_str!("../fixtures/realm-public.pem");
const ROGUE_PRIVATE_KEY: &str = include_str!("../fixtures/rogue-private.pem");
/// Realm JWKS publishing the realm key.
pub const REALM_JWKS: &str = include_str!("../fixtures/realm-jwks.json");

/// Signing keys available to tests.
#[derive(Debug, Clone, Copy)]
pub enum SigningKey {
    /// The realm key published in the JWKS.
    Realm,
    /// A key the realm never published.
    Rogue,
}

/// A mock Keycloak realm.
pub struct TestRealm {
    /// Mock identity provider.
    pub server: MockServer,
}

impl TestRealm {
    /// Starts a mock realm.
    pub async fn start() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("kc_protocol_oidc=debug,kc_auth=debug,kc_security_event=info")
            .with_test_writer()
            .try_init();

        Self {
            server: MockServer::start().await,
        }
    }

    /// Expected issuer of realm tokens.
    pub fn issuer(&self) -> String {
        format!("{}/realms/{REALM}", self.server.uri())
    }

    /// Token endpoint path.
    pub fn token_path() -> String {
        format!("/realms/{REALM}/protocol/openid-connect/token")
    }

    /// JWKS endpoint path.
    pub fn jwks_path() -> String {
        format!("/realms/{REALM}/protocol/openid-connect/certs")
    }

    /// Public-client adapter configuration resolving keys through the JWKS.
    pub fn adapter_config(&self) -> AdapterConfig {
        AdapterConfig::new(self.server.uri(), REALM, CLIENT_ID)
    }

    /// Public-client adapter configuration with a pinned realm key.
    pub fn adapter_config_with_static_key(&self) -> AdapterConfig {
        let mut config = self.adapter_config();
        config.realm_public_key = Some(REALM_PUBLIC_KEY.to_string());
        config
    }

    /// Confidential-client adapter configuration.
    pub fn confidential_adapter_config(&self, secret: &str) -> AdapterConfig {
        let mut config = self.adapter_config_with_static_key();
        config.public_client = false;
        config.credentials = Some(ClientCredentials {
            secret: secret.to_string(),
        });
        config
    }

    /// Builds a provider for the given configuration.
    pub fn provider(
        &self,
        adapter: &AdapterConfig,
    ) -> anyhow::Result<DirectAccessGrantAuthenticationProvider<DirectGrantClient>> {
        let config = ProviderConfig::from_adapter_config(adapter)?;
        Ok(DirectAccessGrantAuthenticationProvider::new(
            DirectGrantClient::new(config),
        ))
    }

    /// Claims of a valid realm access token.
    pub fn claims(&self, subject: &str) -> AccessTokenClaims {
        AccessTokenClaims::new(self.issuer(), subject.to_string(), Utc::now() + Duration::minutes(5))
            .with_azp(CLIENT_ID)
    }

    /// Claims of alice's access token.
    pub fn alice_claims(&self) -> AccessTokenClaims {
        self.claims("alice-id")
            .with_realm_access(vec!["user".to_string(), "admin".to_string()])
            .with_resource_access(CLIENT_ID, vec!["reports:view".to_string()])
            .with_preferred_username("alice")
    }

    /// Publishes the realm JWKS.
    pub async fn mount_jwks(&self, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(Self::jwks_path()))
            .respond_with(ResponseTemplate::new(200).set_body_raw(REALM_JWKS, "application/json"))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Answers the token endpoint with the given response.
    pub async fn mount_token_response(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(Self::token_path()))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Answers the token endpoint with tokens for `claims`.
    pub async fn mount_tokens(&self, claims: &AccessTokenClaims, key: SigningKey, id_token: &str) {
        let body = token_response(&sign(claims, key), id_token);
        self.mount_token_response(ResponseTemplate::new(200).set_body_json(body))
            .await;
    }
}

/// Signs access token claims.
pub fn sign(claims: &AccessTokenClaims, key: SigningKey) -> String {
    let pem = match key {
        SigningKey::Realm => REALM_PRIVATE_KEY,
        SigningKey::Rogue => ROGUE_PRIVATE_KEY,
    };
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(REALM_KID.to_string());
    encode(
        &header,
        claims,
        &EncodingKey::from_rsa_pem(pem.as_bytes()).expect("fixture key"),
    )
    .expect("token signing")
}

/// Builds an ID token whose payload segment is `payload`.
pub fn id_token(payload: &str) -> String {
    format!(
        "{}.{}.c2lnbmF0dXJl",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload)
    )
}

/// ID token for alice.
pub fn alice_id_token() -> String {
    id_token(r#"{"sub":"alice-id","preferred_username":"alice","email":"alice@example.com"}"#)
}

/// Token endpoint success body.
pub fn token_response(access_token: &str, id_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "expires_in": 300,
        "refresh_expires_in": 1800,
        "refresh_token": "refresh-token",
        "token_type": "Bearer",
        "id_token": id_token,
        "not-before-policy": 0,
        "session_state": "3f1c6c2e",
        "scope": "openid profile email"
    })
}

/// Authority names of a result.
pub fn authority_names(result: &AuthenticationResult) -> BTreeSet<String> {
    result
        .authorities()
        .iter()
        .map(Authority::to_string)
        .collect()
}

/// Builds an owned string set.
pub fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(ToString::to_string).collect()
}
