//! # kc-protocol-oidc
//!
//! `OpenID` Connect direct access grant for Keycloak realms.
//!
//! [`DirectGrantClient`] exchanges a username and password at the realm token
//! endpoint, verifies the returned access token against the realm key, decodes
//! the ID token and hands back an immutable [`SecurityContext`].
//!
//! ## Modules
//!
//! - [`claims`] - JWT claim types for access and ID tokens
//! - [`client`] - Direct access grant client
//! - [`config`] - Provider configuration derived from `keycloak.json`
//! - [`context`] - Verified token bundle
//! - [`error`] - Transport and verification error taxonomy
//! - [`jwks`] - JSON Web Key Set types for the realm `/certs` endpoint
//! - [`resolver`] - Realm key resolution and JWKS caching
//! - [`token`] - Access token verification and ID token decoding
//! - [`transport`] - HTTP transport seam
//! - [`types`] - Token endpoint wire types

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod claims;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod jwks;
pub mod resolver;
pub mod token;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use claims::{AccessTokenClaims, Audience, IdTokenClaims, RealmAccess, ResourceAccess};
pub use client::{DirectAccessGrantService, DirectGrantClient};
pub use config::{ClientAuthentication, KeyCachePolicy, KeySource, ProviderConfig};
pub use context::SecurityContext;
pub use error::{ErrorResponse, GrantError, GrantResult, TransportError, VerificationError};
pub use jwks::{EcCurve, JsonWebKey, JsonWebKeySet, KeyType};
pub use resolver::RealmKeyResolver;
pub use token::{parse_id_token, TokenHeader, TokenVerifier};
pub use transport::{FormRequest, HttpResponse, ReqwestTransport, TokenTransport};
pub use types::{GrantType, TokenExchangeResponse};
