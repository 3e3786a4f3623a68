//! # kc-auth
//!
//! Authentication provider for Keycloak direct access grants.
//!
//! Turns a username and password into an [`AuthenticationResult`]: the
//! credentials are exchanged at the realm, the returned access token is
//! verified, and its realm and resource roles become the principal's
//! authorities, optionally through an [`AuthoritiesMapper`].
//!
//! ## Outcomes
//!
//! - Success: principal plus authorities
//! - [`AuthError::CredentialsRejected`]: "invalid username or password"
//! - [`AuthError::AuthenticationUnavailable`]: "try again later"
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - IA-2: Identification and Authentication
//! - AC-7: Unsuccessful Logon Attempts
//!
//! ## Example
//!
//! ```ignore
//! use kc_auth::{DirectAccessGrantAuthenticationProvider, SimpleAuthorityMapper};
//! use kc_protocol_oidc::{DirectGrantClient, ProviderConfig};
//!
//! let config = ProviderConfig::from_adapter_config(&kc_core::AdapterConfig::load("keycloak.json")?)?;
//! let provider = DirectAccessGrantAuthenticationProvider::new(DirectGrantClient::new(config))
//!     .with_mapper(SimpleAuthorityMapper::new());
//! let result = provider.authenticate_credentials("alice", "correct").await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod authenticator;
pub mod error;
pub mod mapper;
pub mod principal;
pub mod provider;
pub mod request;

pub use authenticator::{AuthenticationProvider, ProviderChain};
pub use error::{AuthError, AuthResult};
pub use mapper::{AuthoritiesMapper, CaseConversion, SimpleAuthorityMapper};
pub use principal::{AuthenticatedPrincipal, AuthenticationResult, Authority, Role};
pub use provider::{extract_roles, DirectAccessGrantAuthenticationProvider, PROVIDER_ID};
pub use request::{AuthenticationRequest, Credentials, RequestKind};
