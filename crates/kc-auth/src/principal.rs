//! Authenticated principal, roles and authorities.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use kc_protocol_oidc::SecurityContext;

/// A role label taken from verified access token claims.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Role(String);

impl Role {
    /// Creates a role.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the role name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// An authority granted to the principal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Authority(String);

impl Authority {
    /// Creates an authority.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the authority name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Authority {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<Role> for Authority {
    fn from(role: Role) -> Self {
        Self(role.0)
    }
}

/// The user behind a successful login.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    subject: String,
    name: String,
    context: Arc<SecurityContext>,
}

impl AuthenticatedPrincipal {
    /// Wraps a verified context; `name` is resolved by the configured
    /// principal attribute.
    #[must_use]
    pub fn new(context: Arc<SecurityContext>, name: impl Into<String>) -> Self {
        Self {
            subject: context.subject().to_string(),
            name: name.into(),
            context,
        }
    }

    /// Verified subject (`sub`).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Display name of the principal.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Verified tokens.
    #[must_use]
    pub fn security_context(&self) -> &Arc<SecurityContext> {
        &self.context
    }
}

impl fmt::Display for AuthenticatedPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Outcome of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    principal: AuthenticatedPrincipal,
    roles: BTreeSet<Role>,
    authorities: Vec<Authority>,
}

impl AuthenticationResult {
    /// Creates a result.
    #[must_use]
    pub const fn new(
        principal: AuthenticatedPrincipal,
        roles: BTreeSet<Role>,
        authorities: Vec<Authority>,
    ) -> Self {
        Self {
            principal,
            roles,
            authorities,
        }
    }

    /// The authenticated principal.
    #[must_use]
    pub const fn principal(&self) -> &AuthenticatedPrincipal {
        &self.principal
    }

    /// Roles extracted from the access token, before mapping.
    #[must_use]
    pub const fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Granted authorities.
    #[must_use]
    pub fn authorities(&self) -> &[Authority] {
        &self.authorities
    }

    /// Checks whether an authority was granted.
    #[must_use]
    pub fn has_authority(&self, name: &str) -> bool {
        self.authorities.iter().any(|a| a.as_str() == name)
    }
}
