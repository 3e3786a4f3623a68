//! Direct access grant client.
//!
//! Exchanges a username and password at the realm token endpoint
//! (`grant_type=password`) and turns the response into a verified
//! [`SecurityContext`].

use async_trait::async_trait;

use crate::config::{ClientAuthentication, ProviderConfig};
use crate::context::SecurityContext;
use crate::error::GrantResult;
use crate::resolver::RealmKeyResolver;
use crate::token::{parse_id_token, TokenVerifier};
use crate::transport::{FormRequest, ReqwestTransport, TokenTransport};
use crate::types::{params, GrantType, TokenExchangeResponse};

/// Logs a user in with the resource owner password credentials grant.
#[async_trait]
pub trait DirectAccessGrantService: Send + Sync {
    /// Exchanges credentials for verified tokens.
    ///
    /// Makes exactly one token endpoint call. A JWKS download may follow
    /// when the realm key is not cached.
    async fn login(&self, username: &str, password: &str) -> GrantResult<SecurityContext>;

    /// Configuration the service was built with.
    fn config(&self) -> &ProviderConfig;
}

/// [`DirectAccessGrantService`] over a [`TokenTransport`].
#[derive(Debug)]
pub struct DirectGrantClient<T = ReqwestTransport> {
    config: ProviderConfig,
    transport: T,
    resolver: RealmKeyResolver,
    verifier: TokenVerifier,
}

impl DirectGrantClient<ReqwestTransport> {
    /// Creates a client using `reqwest`.
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: TokenTransport> DirectGrantClient<T> {
    /// Creates a client over the given transport.
    #[must_use]
    pub fn with_transport(config: ProviderConfig, transport: T) -> Self {
        let resolver = RealmKeyResolver::new(config.key_source.clone(), config.key_cache);
        let verifier = TokenVerifier::from_config(&config);
        Self {
            config,
            transport,
            resolver,
            verifier,
        }
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    fn token_request(&self, username: &str, password: &str) -> FormRequest {
        let mut request = FormRequest::new(self.config.token_url.clone())
            .param(params::GRANT_TYPE, GrantType::Password.as_str())
            .param(params::USERNAME, username)
            .param(params::PASSWORD, password);

        request = match &self.config.client_auth {
            ClientAuthentication::Public => request.param(params::CLIENT_ID, &self.config.client_id),
            ClientAuthentication::ClientSecret(secret) => {
                request.basic_auth(&self.config.client_id, secret)
            }
        };

        if let Some(scope) = &self.config.scope {
            request = request.param(params::SCOPE, scope);
        }
        request
    }

    /// Calls the token endpoint.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the call fails, the status is not 2xx, or
    /// the body is not a token response.
    pub async fn request_tokens(&self, username: &str, password: &str) -> GrantResult<TokenExchangeResponse> {
        let request = self.token_request(username, password);
        tracing::debug!(
            realm = %self.config.realm,
            client_id = %self.config.client_id,
            username,
            "requesting direct access grant"
        );

        let response = self.transport.post_form(&request).await?;
        Ok(response.json::<TokenExchangeResponse>().inspect_err(|e| {
            tracing::debug!(realm = %self.config.realm, error = %e, "token endpoint call failed");
        })?)
    }

    /// Verifies a token endpoint response.
    ///
    /// # Errors
    ///
    /// Returns a verification error if the access token is not trusted or the
    /// ID token payload cannot be decoded, and a transport error if the realm
    /// keys cannot be downloaded.
    pub async fn verify(&self, response: TokenExchangeResponse) -> GrantResult<SecurityContext> {
        let header = TokenVerifier::inspect_header(&response.access_token)?;
        let key = self
            .resolver
            .resolve(&self.transport, header.kid.as_deref(), header.algorithm)
            .await?;

        let access_claims =
            self.verifier
                .verify_access_token(&response.access_token, &key, header.algorithm)?;
        let id_claims = parse_id_token(&response.id_token).inspect_err(|e| {
            tracing::warn!(sub = %access_claims.sub, error = %e, "ID token rejected");
        })?;

        Ok(SecurityContext::new(
            response.access_token,
            access_claims,
            response.id_token,
            id_claims,
            response.refresh_token,
        ))
    }
}

#[async_trait]
impl<T: TokenTransport> DirectAccessGrantService for DirectGrantClient<T> {
    async fn login(&self, username: &str, password: &str) -> GrantResult<SecurityContext> {
        let response = self.request_tokens(username, password).await?;
        self.verify(response).await
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}
