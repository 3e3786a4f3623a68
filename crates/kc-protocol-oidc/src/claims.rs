//! JWT claim types for tokens returned by the token endpoint.
//!
//! Implements token claims as defined in:
//! - RFC 7519 (JSON Web Token)
//! - `OpenID` Connect Core 1.0
//!
//! plus the Keycloak role claims (`realm_access`, `resource_access`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    // === Standard JWT Claims (RFC 7519) ===
    /// Issuer - URL of the realm.
    pub iss: String,

    /// Subject - unique identifier for the user.
    pub sub: String,

    /// Audience - intended recipient(s) of the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at time (Unix timestamp).
    #[serde(default)]
    pub iat: i64,

    /// Not before time (Unix timestamp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// JWT ID - unique identifier for the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    // === OIDC Standard Claims ===
    /// Authorized party - client ID that requested the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,

    /// Session ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    /// Scope - space-separated list of scopes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    // === Keycloak-specific Claims ===
    /// Token type (usually "Bearer").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    /// Realm access (realm-level roles).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm_access: Option<RealmAccess>,

    /// Resource access (client-level roles), keyed by client ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_access: Option<HashMap<String, ResourceAccess>>,

    /// Preferred username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,

    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Given (first) name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    /// Family (last) name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Nickname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    /// Additional claims (protocol mappers).
    #[serde(flatten)]
    pub additional: HashMap<String, serde_json::Value>,
}

impl AccessTokenClaims {
    /// Creates new access token claims.
    #[must_use]
    pub fn new(issuer: String, subject: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            iss: issuer,
            sub: subject,
            aud: None,
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
            nbf: None,
            jti: None,
            azp: None,
            sid: None,
            scope: None,
            typ: Some("Bearer".to_string()),
            realm_access: None,
            resource_access: None,
            preferred_username: None,
            email: None,
            given_name: None,
            family_name: None,
            name: None,
            nickname: None,
            additional: HashMap::new(),
        }
    }

    /// Sets the audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<Audience>) -> Self {
        self.aud = Some(audience.into());
        self
    }

    /// Sets the authorized party (client ID).
    #[must_use]
    pub fn with_azp(mut self, client_id: impl Into<String>) -> Self {
        self.azp = Some(client_id.into());
        self
    }

    /// Sets realm access (roles).
    #[must_use]
    pub fn with_realm_access(mut self, roles: Vec<String>) -> Self {
        self.realm_access = Some(RealmAccess { roles });
        self
    }

    /// Adds client-level roles for a resource.
    #[must_use]
    pub fn with_resource_access(mut self, resource: impl Into<String>, roles: Vec<String>) -> Self {
        self.resource_access
            .get_or_insert_with(HashMap::new)
            .insert(resource.into(), ResourceAccess { roles });
        self
    }

    /// Sets the preferred username.
    #[must_use]
    pub fn with_preferred_username(mut self, username: impl Into<String>) -> Self {
        self.preferred_username = Some(username.into());
        self
    }

    /// Realm-level roles, empty when the claim is absent.
    #[must_use]
    pub fn realm_roles(&self) -> &[String] {
        self.realm_access
            .as_ref()
            .map(|access| access.roles.as_slice())
            .unwrap_or_default()
    }

    /// Client-level roles of every resource, in no particular order.
    pub fn resource_roles(&self) -> impl Iterator<Item = &str> {
        self.resource_access
            .iter()
            .flat_map(HashMap::values)
            .flat_map(|access| access.roles.iter().map(String::as_str))
    }

    /// Client-level roles of one resource.
    #[must_use]
    pub fn roles_for_resource(&self, resource: &str) -> &[String] {
        self.resource_access
            .as_ref()
            .and_then(|access| access.get(resource))
            .map(|access| access.roles.as_slice())
            .unwrap_or_default()
    }

    /// Looks up a string claim by name, including standard profile claims.
    #[must_use]
    pub fn string_claim(&self, name: &str) -> Option<&str> {
        match name {
            "sub" => Some(self.sub.as_str()),
            "iss" => Some(self.iss.as_str()),
            "azp" => self.azp.as_deref(),
            "preferred_username" => self.preferred_username.as_deref(),
            "email" => self.email.as_deref(),
            "given_name" => self.given_name.as_deref(),
            "family_name" => self.family_name.as_deref(),
            "name" => self.name.as_deref(),
            "nickname" => self.nickname.as_deref(),
            other => self.additional.get(other).and_then(serde_json::Value::as_str),
        }
    }
}

/// ID token claims.
///
/// Only decoded, never trusted on their own: identity attributes are read
/// after the access token from the same response has been verified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// Issuer.
    #[serde(default)]
    pub iss: String,

    /// Subject - unique identifier for the user.
    #[serde(default)]
    pub sub: String,

    /// Audience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,

    /// Expiration time (Unix timestamp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at time (Unix timestamp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Authentication time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_time: Option<i64>,

    /// Authorized party.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,

    /// Session ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    /// Full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Given (first) name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    /// Family (last) name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Nickname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    /// Preferred username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,

    /// Locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Email verified flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,

    /// Additional claims.
    #[serde(flatten)]
    pub additional: HashMap<String, serde_json::Value>,
}

/// JWT audience claim (can be single string or array).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Audience {
    /// Single audience.
    Single(String),
    /// Multiple audiences.
    Multiple(Vec<String>),
}

impl Audience {
    /// Checks if the audience contains a specific value.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Single(s) => s == value,
            Self::Multiple(v) => v.iter().any(|s| s == value),
        }
    }
}

impl From<String> for Audience {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<&str> for Audience {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<Vec<String>> for Audience {
    fn from(v: Vec<String>) -> Self {
        Self::Multiple(v)
    }
}

/// Realm access (roles) claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealmAccess {
    /// List of realm-level roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Resource (client) access claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceAccess {
    /// List of client-level roles.
    #[serde(default)]
    pub roles: Vec<String>,
}
