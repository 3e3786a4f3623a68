//! Adapter configuration.
//!
//! Models the `keycloak.json` file exported from the Keycloak admin console
//! for a client ("Installation" tab, "Keycloak OIDC JSON"). Only the keys the
//! direct access grant needs are read; unknown keys are ignored so exported
//! files can be used unchanged.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default minimum interval between two JWKS downloads, in seconds.
pub const DEFAULT_MIN_TIME_BETWEEN_JWKS_REQUESTS: u64 = 10;

/// Default lifetime of a downloaded JWKS, in seconds.
pub const DEFAULT_PUBLIC_KEY_CACHE_TTL: u64 = 86_400;

/// Largest accepted `allowed-clock-skew`, in seconds.
pub const MAX_CLOCK_SKEW: u64 = 3_600;

/// Keycloak adapter configuration (`keycloak.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdapterConfig {
    /// Realm name.
    pub realm: String,

    /// Base URL of the Keycloak server (e.g. `https://sso.example.com`).
    pub auth_server_url: String,

    /// Client ID of this application.
    pub resource: String,

    /// Whether the client is public (has no secret).
    #[serde(default)]
    pub public_client: bool,

    /// Client credentials for confidential clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<ClientCredentials>,

    /// Realm public key (base64 DER or PEM). When absent the realm JWKS is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm_public_key: Option<String>,

    /// Claim used as the principal name.
    #[serde(default)]
    pub principal_attribute: PrincipalAttribute,

    /// Whether the access token audience must contain `resource`.
    #[serde(default)]
    pub verify_token_audience: bool,

    /// Tolerated clock skew when checking `exp` / `nbf`, in seconds.
    #[serde(default)]
    pub allowed_clock_skew: u64,

    /// Minimum interval between two JWKS downloads, in seconds.
    #[serde(default = "default_min_time_between_jwks_requests")]
    pub min_time_between_jwks_requests: u64,

    /// Lifetime of a downloaded JWKS, in seconds.
    #[serde(default = "default_public_key_cache_ttl")]
    pub public_key_cache_ttl: u64,

    /// Scope requested from the token endpoint (e.g. `openid`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

const fn default_min_time_between_jwks_requests() -> u64 {
    DEFAULT_MIN_TIME_BETWEEN_JWKS_REQUESTS
}

const fn default_public_key_cache_ttl() -> u64 {
    DEFAULT_PUBLIC_KEY_CACHE_TTL
}

/// Client credentials section of `keycloak.json`.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientCredentials {
    /// Client secret.
    pub secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Claim used to name the authenticated principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrincipalAttribute {
    /// Subject identifier (`sub`).
    #[default]
    Sub,
    /// `preferred_username`.
    PreferredUsername,
    /// `email`.
    Email,
    /// `name`.
    Name,
    /// `given_name`.
    GivenName,
    /// `family_name`.
    FamilyName,
    /// `nickname`.
    Nickname,
    /// Any other top-level string claim.
    Other(String),
}

impl PrincipalAttribute {
    /// Returns the claim name.
    #[must_use]
    pub fn claim_name(&self) -> &str {
        match self {
            Self::Sub => "sub",
            Self::PreferredUsername => "preferred_username",
            Self::Email => "email",
            Self::Name => "name",
            Self::GivenName => "given_name",
            Self::FamilyName => "family_name",
            Self::Nickname => "nickname",
            Self::Other(claim) => claim,
        }
    }
}

impl From<String> for PrincipalAttribute {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sub" => Self::Sub,
            "preferred_username" => Self::PreferredUsername,
            "email" => Self::Email,
            "name" => Self::Name,
            "given_name" => Self::GivenName,
            "family_name" => Self::FamilyName,
            "nickname" => Self::Nickname,
            _ => Self::Other(value),
        }
    }
}

impl From<PrincipalAttribute> for String {
    fn from(value: PrincipalAttribute) -> Self {
        value.claim_name().to_string()
    }
}

impl AdapterConfig {
    /// Creates a configuration for a public client with default settings.
    #[must_use]
    pub fn new(
        auth_server_url: impl Into<String>,
        realm: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            realm: realm.into(),
            auth_server_url: auth_server_url.into(),
            resource: resource.into(),
            public_client: true,
            credentials: None,
            realm_public_key: None,
            principal_attribute: PrincipalAttribute::default(),
            verify_token_audience: false,
            allowed_clock_skew: 0,
            min_time_between_jwks_requests: DEFAULT_MIN_TIME_BETWEEN_JWKS_REQUESTS,
            public_key_cache_ttl: DEFAULT_PUBLIC_KEY_CACHE_TTL,
            scope: None,
        }
    }

    /// Parses and validates a `keycloak.json` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a `keycloak.json` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.realm.trim().is_empty() {
            return Err(Error::Config("realm must not be empty".to_string()));
        }
        if self.resource.trim().is_empty() {
            return Err(Error::Config("resource must not be empty".to_string()));
        }
        self.server_url()?;

        if self.allowed_clock_skew > MAX_CLOCK_SKEW {
            return Err(Error::Config(format!(
                "allowed-clock-skew must not exceed {MAX_CLOCK_SKEW} seconds, got {}",
                self.allowed_clock_skew
            )));
        }

        if !self.public_client && self.client_secret().is_none() {
            return Err(Error::Config(
                "confidential client requires credentials.secret".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the client secret, if one is configured.
    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.credentials
            .as_ref()
            .map(|c| c.secret.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Realm URL, which is also the expected token issuer.
    ///
    /// # Errors
    ///
    /// Returns an error if `auth-server-url` is not a valid http(s) URL.
    pub fn realm_url(&self) -> Result<Url> {
        self.realm_path(&[])
    }

    /// Token endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `auth-server-url` is not a valid http(s) URL.
    pub fn token_url(&self) -> Result<Url> {
        self.realm_path(&["protocol", "openid-connect", "token"])
    }

    /// JWKS (realm certificates) endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `auth-server-url` is not a valid http(s) URL.
    pub fn jwks_url(&self) -> Result<Url> {
        self.realm_path(&["protocol", "openid-connect", "certs"])
    }

    fn server_url(&self) -> Result<Url> {
        let url = Url::parse(&self.auth_server_url).map_err(|e| {
            Error::Config(format!("invalid auth-server-url '{}': {e}", self.auth_server_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "auth-server-url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(url)
    }

    fn realm_path(&self, tail: &[&str]) -> Result<Url> {
        let mut url = self.server_url()?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::Config(format!("auth-server-url '{}' cannot be a base", self.auth_server_url))
            })?;
            segments.pop_if_empty().push("realms").push(&self.realm);
            segments.extend(tail);
        }
        Ok(url)
    }
}
