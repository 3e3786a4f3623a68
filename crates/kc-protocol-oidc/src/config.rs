//! Immutable provider configuration for the grant exchange.

use chrono::Duration;
use kc_core::{AdapterConfig, Error, PrincipalAttribute};
use kc_crypto::RealmPublicKey;
use std::fmt;
use url::Url;

/// Where realm verification keys come from.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// A single key pinned in configuration (`realm-public-key`).
    Static(RealmPublicKey),
    /// The realm JWKS endpoint.
    Jwks(Url),
}

/// How the client authenticates at the token endpoint.
#[derive(Clone)]
pub enum ClientAuthentication {
    /// Public client: `client_id` is sent as a form field.
    Public,
    /// Confidential client: HTTP Basic with the client secret.
    ClientSecret(String),
}

impl fmt::Debug for ClientAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("Public"),
            Self::ClientSecret(_) => f.write_str("ClientSecret([REDACTED])"),
        }
    }
}

/// JWKS cache timings.
#[derive(Debug, Clone, Copy)]
pub struct KeyCachePolicy {
    /// How long a fetched key set stays valid.
    pub ttl: Duration,
    /// Minimum interval between two JWKS fetches.
    pub min_refresh_interval: Duration,
}

impl Default for KeyCachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(86_400),
            min_refresh_interval: Duration::seconds(10),
        }
    }
}

/// Configuration of a direct grant client.
///
/// Built once, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Token endpoint URL.
    pub token_url: Url,
    /// Expected `iss` of access tokens (the realm URL).
    pub issuer: String,
    /// Realm name, used in events and logs.
    pub realm: String,
    /// Client ID (`resource`).
    pub client_id: String,
    /// Client authentication mode.
    pub client_auth: ClientAuthentication,
    /// Realm key source.
    pub key_source: KeySource,
    /// Optional `scope` form parameter.
    pub scope: Option<String>,
    /// Allowed clock skew for `exp` and `nbf`, in seconds.
    pub clock_skew: u64,
    /// Require `aud` to contain [`Self::client_id`].
    pub verify_audience: bool,
    /// Claim used as principal name.
    pub principal_attribute: PrincipalAttribute,
    /// JWKS cache timings.
    pub key_cache: KeyCachePolicy,
}

impl ProviderConfig {
    /// Creates a public-client configuration with a pinned realm key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the server URL is invalid.
    pub fn with_static_key(
        auth_server_url: &str,
        realm: &str,
        client_id: &str,
        key: RealmPublicKey,
    ) -> kc_core::Result<Self> {
        let adapter = AdapterConfig::new(auth_server_url, realm, client_id);
        let mut config = Self::from_adapter_config(&adapter)?;
        config.key_source = KeySource::Static(key);
        Ok(config)
    }

    /// Derives the provider configuration from a `keycloak.json` model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the adapter configuration is invalid or
    /// the realm public key cannot be parsed.
    pub fn from_adapter_config(adapter: &AdapterConfig) -> kc_core::Result<Self> {
        adapter.validate()?;

        let realm_url = adapter.realm_url()?;
        let key_source = match adapter.realm_public_key.as_deref() {
            Some(key) if !key.trim().is_empty() => KeySource::Static(
                RealmPublicKey::parse(key)
                    .map_err(|e| Error::Config(format!("invalid realm-public-key: {e}")))?,
            ),
            _ => KeySource::Jwks(adapter.jwks_url()?),
        };

        let client_auth = match adapter.client_secret() {
            Some(secret) if !adapter.public_client => {
                ClientAuthentication::ClientSecret(secret.to_string())
            }
            _ => ClientAuthentication::Public,
        };

        Ok(Self {
            token_url: adapter.token_url()?,
            issuer: realm_url.as_str().trim_end_matches('/').to_string(),
            realm: adapter.realm.clone(),
            client_id: adapter.resource.clone(),
            client_auth,
            key_source,
            scope: adapter.scope.clone().filter(|s| !s.trim().is_empty()),
            clock_skew: adapter.allowed_clock_skew,
            verify_audience: adapter.verify_token_audience,
            principal_attribute: adapter.principal_attribute.clone(),
            key_cache: KeyCachePolicy {
                ttl: seconds(adapter.public_key_cache_ttl),
                min_refresh_interval: seconds(adapter.min_time_between_jwks_requests),
            },
        })
    }

    /// Sets the key source.
    #[must_use]
    pub fn with_key_source(mut self, key_source: KeySource) -> Self {
        self.key_source = key_source;
        self
    }

    /// Switches to a confidential client.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_auth = ClientAuthentication::ClientSecret(secret.into());
        self
    }

    /// Sets the requested scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the allowed clock skew in seconds.
    #[must_use]
    pub const fn with_clock_skew(mut self, seconds: u64) -> Self {
        self.clock_skew = seconds;
        self
    }

    /// Enables audience verification.
    #[must_use]
    pub const fn with_audience_verification(mut self, enabled: bool) -> Self {
        self.verify_audience = enabled;
        self
    }

    /// Sets the principal attribute.
    #[must_use]
    pub fn with_principal_attribute(mut self, attribute: PrincipalAttribute) -> Self {
        self.principal_attribute = attribute;
        self
    }
}

fn seconds(value: u64) -> Duration {
    i64::try_from(value)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}
