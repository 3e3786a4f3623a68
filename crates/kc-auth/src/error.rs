//! Authentication error types.
//!
//! Only two outcomes reach the user: the credentials were rejected, or the
//! service could not decide. Causes are kept as [`std::error::Error::source`]
//! for logs and never shown in the message.

use std::error::Error as StdError;
use std::fmt;

use crate::request::RequestKind;

/// Boxed failure cause.
pub type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// Authentication operation errors.
#[derive(Debug)]
pub enum AuthError {
    /// The identity provider issued a token that failed verification.
    CredentialsRejected(Cause),
    /// Transport, configuration or other non-credential failure.
    AuthenticationUnavailable(Cause),
    /// No registered provider supports the request kind.
    ProviderNotFound(RequestKind),
}

impl AuthError {
    /// Wraps a verification failure.
    pub fn rejected(cause: impl Into<Cause>) -> Self {
        Self::CredentialsRejected(cause.into())
    }

    /// Wraps a service failure.
    pub fn unavailable(cause: impl Into<Cause>) -> Self {
        Self::AuthenticationUnavailable(cause.into())
    }

    /// Checks if the credentials were rejected.
    #[must_use]
    pub const fn is_credentials_rejected(&self) -> bool {
        matches!(self, Self::CredentialsRejected(_))
    }

    /// Checks if the service was unavailable.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::AuthenticationUnavailable(_))
    }

    /// Short machine-readable code used in security events.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CredentialsRejected(_) => "invalid_user_credentials",
            Self::AuthenticationUnavailable(_) => "authentication_unavailable",
            Self::ProviderNotFound(_) => "provider_not_found",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CredentialsRejected(_) => write!(f, "invalid username or password"),
            Self::AuthenticationUnavailable(_) => {
                write!(f, "authentication service unavailable, try again later")
            }
            Self::ProviderNotFound(kind) => {
                write!(f, "no authentication provider supports {kind} requests")
            }
        }
    }
}

impl StdError for AuthError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::CredentialsRejected(cause) | Self::AuthenticationUnavailable(cause) => {
                Some(cause.as_ref())
            }
            Self::ProviderNotFound(_) => None,
        }
    }
}

impl From<kc_core::Error> for AuthError {
    fn from(error: kc_core::Error) -> Self {
        Self::unavailable(error)
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
