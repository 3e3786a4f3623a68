//! Error types for the direct access grant exchange.
//!
//! Two families are kept apart so callers can tell "the provider could not be
//! reached or answered garbage at the HTTP level" ([`TransportError`]) from
//! "the provider issued a token we cannot trust" ([`VerificationError`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed error used for transport-specific causes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Network / HTTP level failure talking to the identity provider.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the response not read.
    #[error("HTTP request failed: {0}")]
    Request(#[source] BoxError),

    /// The provider answered with a non-success status.
    #[error("identity provider returned HTTP {status}{}", describe(.error.as_ref()))]
    Status {
        /// HTTP status code.
        status: u16,
        /// OAuth 2.0 error body, when the provider sent one.
        error: Option<ErrorResponse>,
    },

    /// The response body was not the expected JSON document.
    #[error("malformed response from identity provider: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

fn describe(error: Option<&ErrorResponse>) -> String {
    match error {
        Some(ErrorResponse {
            error,
            error_description: Some(description),
            ..
        }) => format!(": {error} ({description})"),
        Some(ErrorResponse { error, .. }) => format!(": {error}"),
        None => String::new(),
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(Box::new(error))
    }
}

/// A token returned by the provider failed verification or decoding.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The access token could not be decoded.
    #[error("malformed access token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    /// The token is signed with an algorithm the realm key cannot verify.
    #[error("unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// No realm key matches the token header.
    #[error("no realm key found for token (kid: {})", .0.as_deref().unwrap_or("<none>"))]
    UnknownKey(Option<String>),

    /// The realm key cannot be used with the token algorithm.
    #[error("realm key cannot verify token: {0}")]
    InvalidKey(String),

    /// Signature does not match the realm key.
    #[error("token signature is invalid")]
    BadSignature,

    /// Token `exp` is in the past.
    #[error("token is expired")]
    Expired,

    /// Token `nbf` is in the future.
    #[error("token is not yet valid")]
    NotYetValid,

    /// Token was issued by another realm or server.
    #[error("token issuer does not match realm '{expected}'")]
    InvalidIssuer {
        /// Expected issuer.
        expected: String,
    },

    /// Token audience does not contain this client.
    #[error("token audience does not contain '{expected}'")]
    InvalidAudience {
        /// Expected audience.
        expected: String,
    },

    /// A mandatory claim is absent.
    #[error("token is missing required claim '{0}'")]
    MissingClaim(String),

    /// Token `typ` is not `Bearer`.
    #[error("unexpected token type '{0}'")]
    InvalidTokenType(String),

    /// ID token is not a three-part JWS.
    #[error("unable to verify ID token: {0}")]
    MalformedIdToken(&'static str),

    /// ID token payload segment is not valid base64url.
    #[error("unable to verify ID token: {0}")]
    IdTokenEncoding(#[source] base64::DecodeError),

    /// ID token payload is not valid claims JSON.
    #[error("unable to verify ID token: {0}")]
    IdTokenPayload(#[source] serde_json::Error),
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match error.kind() {
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::MissingRequiredClaim(claim) => Self::MissingClaim(claim.clone()),
            ErrorKind::InvalidAlgorithm => Self::UnsupportedAlgorithm(error.to_string()),
            ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidEcdsaKey | ErrorKind::InvalidKeyFormat => {
                Self::InvalidKey(error.to_string())
            }
            _ => Self::Malformed(error),
        }
    }
}

/// Error returned by a direct access grant exchange.
#[derive(Debug, Error)]
pub enum GrantError {
    /// Provider unreachable or response envelope unusable.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Provider issued a token that cannot be trusted.
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl GrantError {
    /// Returns true for verification failures.
    #[must_use]
    pub const fn is_verification(&self) -> bool {
        matches!(self, Self::Verification(_))
    }

    /// Returns true for transport failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// OAuth 2.0 error response (RFC 6749 section 5.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// URI with more information about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}

/// Result type for grant operations.
pub type GrantResult<T> = Result<T, GrantError>;
