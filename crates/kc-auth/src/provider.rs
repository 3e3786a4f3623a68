//! Direct access grant authentication provider.
//!
//! Logs a user in through a [`DirectAccessGrantService`], derives the role set
//! from the verified access token and applies the optional
//! [`AuthoritiesMapper`].
//!
//! ## NIST 800-53 Rev5: AC-7 (Unsuccessful Logon Attempts)
//!
//! Every attempt emits a `LOGIN` or `LOGIN_ERROR` security event.

use async_trait::async_trait;
use kc_core::{Event, EventType};
use kc_protocol_oidc::{
    AccessTokenClaims, DirectAccessGrantService, DirectGrantClient, GrantError, SecurityContext,
};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::authenticator::AuthenticationProvider;
use crate::error::{AuthError, AuthResult};
use crate::mapper::AuthoritiesMapper;
use crate::principal::{AuthenticatedPrincipal, AuthenticationResult, Authority, Role};
use crate::request::{AuthenticationRequest, RequestKind};

/// Provider ID.
pub const PROVIDER_ID: &str = "keycloak-direct-access-grant";

/// Authenticates username/password requests against a Keycloak realm.
pub struct DirectAccessGrantAuthenticationProvider<S = DirectGrantClient> {
    service: S,
    mapper: Option<Arc<dyn AuthoritiesMapper>>,
}

impl<S> std::fmt::Debug for DirectAccessGrantAuthenticationProvider<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectAccessGrantAuthenticationProvider")
            .field("mapper", &self.mapper.as_ref().map(|_| "<mapper>"))
            .finish_non_exhaustive()
    }
}

impl<S: DirectAccessGrantService> DirectAccessGrantAuthenticationProvider<S> {
    /// Creates a provider without an authorities mapper.
    #[must_use]
    pub const fn new(service: S) -> Self {
        Self {
            service,
            mapper: None,
        }
    }

    /// Sets the authorities mapper.
    #[must_use]
    pub fn with_mapper(mut self, mapper: impl AuthoritiesMapper + 'static) -> Self {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    /// Returns the grant service.
    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Checks if `kind` is a username/password request.
    #[must_use]
    pub const fn supports_kind(kind: RequestKind) -> bool {
        matches!(kind, RequestKind::DirectAccessGrant | RequestKind::UsernamePassword)
    }

    /// Authenticates a username and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CredentialsRejected`] when a returned token fails
    /// verification and [`AuthError::AuthenticationUnavailable`] for every
    /// other failure.
    pub async fn authenticate_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AuthResult<AuthenticationResult> {
        let context = match self.service.login(username, password).await {
            Ok(context) => Arc::new(context),
            Err(error) => {
                let error = translate(error);
                self.event(EventType::LoginError, username)
                    .failure(error.code())
                    .build()
                    .emit();
                return Err(error);
            }
        };

        let roles = extract_roles(context.access_token_claims());
        let authorities = self.map_authorities(&roles);
        let principal = self.principal(context);

        self.event(EventType::Login, username)
            .success()
            .subject(principal.subject())
            .detail("authorities", authorities.len().to_string())
            .build()
            .emit();

        Ok(AuthenticationResult::new(principal, roles, authorities))
    }

    fn map_authorities(&self, roles: &BTreeSet<Role>) -> Vec<Authority> {
        match &self.mapper {
            Some(mapper) => mapper.map_authorities(roles),
            None => roles.iter().cloned().map(Authority::from).collect(),
        }
    }

    fn principal(&self, context: Arc<SecurityContext>) -> AuthenticatedPrincipal {
        let attribute = &self.service.config().principal_attribute;
        let name = context
            .claim(attribute.claim_name())
            .unwrap_or_else(|| context.subject())
            .to_string();
        AuthenticatedPrincipal::new(context, name)
    }

    fn event(&self, event_type: EventType, username: &str) -> kc_core::EventBuilder {
        let config = self.service.config();
        Event::builder(event_type)
            .realm(&config.realm)
            .client(&config.client_id)
            .username(username)
            .detail("auth_method", "direct_access_grant")
    }
}

#[async_trait]
impl<S: DirectAccessGrantService> AuthenticationProvider for DirectAccessGrantAuthenticationProvider<S> {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn supports(&self, kind: RequestKind) -> bool {
        Self::supports_kind(kind)
    }

    async fn authenticate(&self, request: &AuthenticationRequest) -> AuthResult<AuthenticationResult> {
        self.authenticate_credentials(&request.credentials.username, &request.credentials.password)
            .await
    }
}

/// Realm roles and the roles of every resource, deduplicated.
#[must_use]
pub fn extract_roles(claims: &AccessTokenClaims) -> BTreeSet<Role> {
    claims
        .realm_roles()
        .iter()
        .map(String::as_str)
        .chain(claims.resource_roles())
        .map(Role::from)
        .collect()
}

fn translate(error: GrantError) -> AuthError {
    match error {
        GrantError::Verification(_) => AuthError::rejected(error),
        GrantError::Transport(_) => AuthError::unavailable(error),
    }
}
