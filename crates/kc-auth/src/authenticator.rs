//! Authentication provider trait and provider chain.
//!
//! Providers declare which request kinds they accept through
//! [`AuthenticationProvider::supports`]; the dispatcher never hands them
//! anything else.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{AuthError, AuthResult};
use crate::principal::AuthenticationResult;
use crate::request::{AuthenticationRequest, RequestKind};

/// Authentication provider trait.
#[async_trait]
pub trait AuthenticationProvider: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &'static str;

    /// Checks if this provider accepts requests of `kind`.
    fn supports(&self, kind: RequestKind) -> bool;

    /// Authenticates the request.
    ///
    /// Does not check the request kind: callers consult
    /// [`supports`](Self::supports) first.
    async fn authenticate(&self, request: &AuthenticationRequest) -> AuthResult<AuthenticationResult>;
}

/// Ordered list of providers tried in turn.
#[derive(Default, Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn AuthenticationProvider>>,
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.providers.iter().map(|p| p.id()).collect();
        f.debug_struct("ProviderChain").field("providers", &ids).finish()
    }
}

impl ProviderChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn AuthenticationProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Checks if the chain has no providers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Authenticates with the first provider that succeeds.
    ///
    /// A rejection ends the attempt. An unavailable provider hands over to
    /// the next supporting one; if none succeeds, the last error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ProviderNotFound`] when no provider supports the
    /// request kind, otherwise the error of the deciding provider.
    pub async fn authenticate(&self, request: &AuthenticationRequest) -> AuthResult<AuthenticationResult> {
        let mut last_error = None;

        for provider in self.providers.iter().filter(|p| p.supports(request.kind)) {
            tracing::debug!(provider = provider.id(), kind = %request.kind, "trying authentication provider");
            match provider.authenticate(request).await {
                Ok(result) => return Ok(result),
                Err(error @ (AuthError::CredentialsRejected(_) | AuthError::ProviderNotFound(_))) => {
                    return Err(error)
                }
                Err(error) => {
                    tracing::debug!(provider = provider.id(), error = %error, "provider unavailable");
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or(AuthError::ProviderNotFound(request.kind)))
    }
}
