//! Verified token bundle.

use std::fmt;

use crate::claims::{AccessTokenClaims, IdTokenClaims};

/// Tokens of a successful direct access grant.
///
/// Only created after the access token has been verified, so holding one is
/// proof of verification. Immutable; wrap in `Arc` to share.
#[derive(Clone)]
pub struct SecurityContext {
    access_token: String,
    access_token_claims: AccessTokenClaims,
    id_token: String,
    id_token_claims: IdTokenClaims,
    refresh_token: Option<String>,
}

impl SecurityContext {
    pub(crate) const fn new(
        access_token: String,
        access_token_claims: AccessTokenClaims,
        id_token: String,
        id_token_claims: IdTokenClaims,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            access_token,
            access_token_claims,
            id_token,
            id_token_claims,
            refresh_token,
        }
    }

    /// Raw access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Verified access token claims.
    #[must_use]
    pub const fn access_token_claims(&self) -> &AccessTokenClaims {
        &self.access_token_claims
    }

    /// Raw ID token.
    #[must_use]
    pub fn id_token(&self) -> &str {
        &self.id_token
    }

    /// Decoded ID token claims.
    #[must_use]
    pub const fn id_token_claims(&self) -> &IdTokenClaims {
        &self.id_token_claims
    }

    /// Raw refresh token, if one was issued.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Subject of the verified access token.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.access_token_claims.sub
    }

    /// Looks up a string claim, access token first, then ID token.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.access_token_claims.string_claim(name).or_else(|| {
            let id = &self.id_token_claims;
            match name {
                "sub" => Some(id.sub.as_str()).filter(|s| !s.is_empty()),
                "preferred_username" => id.preferred_username.as_deref(),
                "email" => id.email.as_deref(),
                "name" => id.name.as_deref(),
                "given_name" => id.given_name.as_deref(),
                "family_name" => id.family_name.as_deref(),
                "nickname" => id.nickname.as_deref(),
                other => id.additional.get(other).and_then(serde_json::Value::as_str),
            }
        })
    }
}

impl fmt::Debug for SecurityContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityContext")
            .field("subject", &self.access_token_claims.sub)
            .field("issuer", &self.access_token_claims.iss)
            .field("access_token", &"[REDACTED]")
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}
