//! Token endpoint wire types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// OAuth 2.0 form parameter names used by the direct access grant.
pub mod params {
    /// `grant_type`
    pub const GRANT_TYPE: &str = "grant_type";
    /// `username`
    pub const USERNAME: &str = "username";
    /// `password`
    pub const PASSWORD: &str = "password";
    /// `client_id`
    pub const CLIENT_ID: &str = "client_id";
    /// `scope`
    pub const SCOPE: &str = "scope";
}

/// OAuth 2.0 grant types issued by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrantType {
    /// Resource owner password credentials grant (RFC 6749 Section 4.3).
    #[serde(rename = "password")]
    Password,
}

impl GrantType {
    /// Returns the `grant_type` parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token endpoint response.
///
/// Keycloak always returns an ID token for the password grant of an OIDC
/// client; a refresh token may be disabled per client.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenExchangeResponse {
    /// The access token.
    pub access_token: String,

    /// The ID token.
    pub id_token: String,

    /// Refresh token (if issued).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type (normally "Bearer").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Access token lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    /// Refresh token lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_expires_in: Option<i64>,

    /// Granted scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Session state for session management.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_state: Option<String>,
}

impl fmt::Debug for TokenExchangeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenExchangeResponse")
            .field("access_token", &"[REDACTED]")
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("session_state", &self.session_state)
            .finish()
    }
}
