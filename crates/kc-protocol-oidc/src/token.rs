//! Verification of tokens returned by the token endpoint.
//!
//! The access token is the trust anchor: its signature, lifetime, issuer and
//! type are checked against the realm. The ID token from the same response is
//! only decoded for identity attributes.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use kc_core::config::MAX_CLOCK_SKEW;
use kc_crypto::SignatureAlgorithm;

use crate::claims::{AccessTokenClaims, IdTokenClaims};
use crate::config::ProviderConfig;
use crate::error::VerificationError;

/// Expected `typ` of an access token.
pub const BEARER: &str = "Bearer";

/// Algorithm and key ID from a token header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHeader {
    /// Signature algorithm.
    pub algorithm: SignatureAlgorithm,
    /// Key ID, if the header names one.
    pub kid: Option<String>,
}

/// Verifies realm access tokens.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    issuer: String,
    audience: Option<String>,
    leeway: u64,
}

impl TokenVerifier {
    /// Creates a verifier expecting the given issuer.
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: None,
            leeway: 0,
        }
    }

    /// Creates a verifier from a provider configuration.
    #[must_use]
    pub fn from_config(config: &ProviderConfig) -> Self {
        let verifier = Self::new(config.issuer.clone()).with_leeway(config.clock_skew);
        if config.verify_audience {
            verifier.with_audience(config.client_id.clone())
        } else {
            verifier
        }
    }

    /// Requires `aud` to contain `audience`.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Sets the tolerated clock skew in seconds.
    #[must_use]
    pub const fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = if seconds > MAX_CLOCK_SKEW {
            MAX_CLOCK_SKEW
        } else {
            seconds
        };
        self
    }

    /// Returns the expected issuer.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Reads the JOSE header of a token without verifying it.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is malformed or names a symmetric
    /// or unknown algorithm.
    pub fn inspect_header(token: &str) -> Result<TokenHeader, VerificationError> {
        let header = decode_header(token).map_err(VerificationError::Malformed)?;
        Ok(TokenHeader {
            algorithm: signature_algorithm(header.alg)?,
            kid: header.kid,
        })
    }

    /// Verifies an access token with the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature, lifetime, issuer, audience, subject
    /// or token type check fails.
    pub fn verify_access_token(
        &self,
        token: &str,
        key: &DecodingKey,
        algorithm: SignatureAlgorithm,
    ) -> Result<AccessTokenClaims, VerificationError> {
        let mut validation = Validation::new(jwt_algorithm(algorithm));
        validation.leeway = self.leeway;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let claims = decode::<AccessTokenClaims>(token, key, &validation)
            .map_err(|e| self.classify(e))
            .inspect_err(|e| tracing::warn!(issuer = %self.issuer, error = %e, "access token rejected"))?
            .claims;

        if let Some(typ) = claims.typ.as_deref() {
            if !typ.eq_ignore_ascii_case(BEARER) {
                tracing::warn!(typ, "access token has unexpected type");
                return Err(VerificationError::InvalidTokenType(typ.to_string()));
            }
        }

        tracing::debug!(sub = %claims.sub, "access token verified");
        Ok(claims)
    }

    fn classify(&self, error: jsonwebtoken::errors::Error) -> VerificationError {
        match error.kind() {
            ErrorKind::InvalidIssuer => VerificationError::InvalidIssuer {
                expected: self.issuer.clone(),
            },
            ErrorKind::InvalidAudience => VerificationError::InvalidAudience {
                expected: self.audience.clone().unwrap_or_default(),
            },
            _ => error.into(),
        }
    }
}

/// Decodes the payload of an ID token without verifying its signature.
///
/// # Errors
///
/// Returns an error if the token is not a three-part JWS or the payload is
/// not a JSON claims object.
pub fn parse_id_token(token: &str) -> Result<IdTokenClaims, VerificationError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => {
            return Err(VerificationError::MalformedIdToken(
                "expected three dot-separated segments",
            ))
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(VerificationError::IdTokenEncoding)?;
    serde_json::from_slice(&bytes).map_err(VerificationError::IdTokenPayload)
}

fn signature_algorithm(algorithm: Algorithm) -> Result<SignatureAlgorithm, VerificationError> {
    match algorithm {
        Algorithm::RS256 => Ok(SignatureAlgorithm::Rs256),
        Algorithm::RS384 => Ok(SignatureAlgorithm::Rs384),
        Algorithm::RS512 => Ok(SignatureAlgorithm::Rs512),
        Algorithm::PS256 => Ok(SignatureAlgorithm::Ps256),
        Algorithm::PS384 => Ok(SignatureAlgorithm::Ps384),
        Algorithm::PS512 => Ok(SignatureAlgorithm::Ps512),
        Algorithm::ES256 => Ok(SignatureAlgorithm::Es256),
        Algorithm::ES384 => Ok(SignatureAlgorithm::Es384),
        other => Err(VerificationError::UnsupportedAlgorithm(format!("{other:?}"))),
    }
}

const fn jwt_algorithm(algorithm: SignatureAlgorithm) -> Algorithm {
    match algorithm {
        SignatureAlgorithm::Rs256 => Algorithm::RS256,
        SignatureAlgorithm::Rs384 => Algorithm::RS384,
        SignatureAlgorithm::Rs512 => Algorithm::RS512,
        SignatureAlgorithm::Ps256 => Algorithm::PS256,
        SignatureAlgorithm::Ps384 => Algorithm::PS384,
        SignatureAlgorithm::Ps512 => Algorithm::PS512,
        SignatureAlgorithm::Es256 => Algorithm::ES256,
        SignatureAlgorithm::Es384 => Algorithm::ES384,
    }
}
