//! Authentication requests and their kinds.

use std::fmt;

/// Kind of an authentication request, used by providers to declare support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Username and password for a Keycloak direct access grant.
    DirectAccessGrant,
    /// Generic username and password form login.
    UsernamePassword,
    /// Bearer token presented by an API client.
    KeycloakBearer,
    /// Identity established by an upstream component.
    PreAuthenticated,
    /// No identity.
    Anonymous,
}

impl RequestKind {
    /// All request kinds.
    pub const ALL: [Self; 5] = [
        Self::DirectAccessGrant,
        Self::UsernamePassword,
        Self::KeycloakBearer,
        Self::PreAuthenticated,
        Self::Anonymous,
    ];

    /// Returns the kind name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DirectAccessGrant => "direct-access-grant",
            Self::UsernamePassword => "username-password",
            Self::KeycloakBearer => "keycloak-bearer",
            Self::PreAuthenticated => "pre-authenticated",
            Self::Anonymous => "anonymous",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Username and password for one authentication attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A request handed to an authentication provider.
#[derive(Debug, Clone)]
pub struct AuthenticationRequest {
    /// Request kind.
    pub kind: RequestKind,
    /// Presented credentials.
    pub credentials: Credentials,
}

impl AuthenticationRequest {
    /// Creates a request of the given kind.
    #[must_use]
    pub const fn new(kind: RequestKind, credentials: Credentials) -> Self {
        Self { kind, credentials }
    }

    /// Creates a direct access grant request.
    #[must_use]
    pub fn direct_grant(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(RequestKind::DirectAccessGrant, Credentials::new(username, password))
    }

    /// Creates a generic username/password request.
    #[must_use]
    pub fn username_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(RequestKind::UsernamePassword, Credentials::new(username, password))
    }
}
