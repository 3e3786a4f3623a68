//! JSON Web Key Set (JWKS) types.
//!
//! Implements JWKS as defined in:
//! - [RFC 7517](https://tools.ietf.org/html/rfc7517) (JSON Web Key)
//! - [RFC 7518](https://tools.ietf.org/html/rfc7518) (JSON Web Algorithms)
//!
//! Keycloak serves the realm set at `/realms/{realm}/protocol/openid-connect/certs`.

use jsonwebtoken::DecodingKey;
use kc_crypto::{KeyFamily, SignatureAlgorithm};
use serde::{Deserialize, Serialize};

use crate::error::VerificationError;

/// JSON Web Key Set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    /// Array of JSON Web Keys.
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Finds a key by its ID.
    #[must_use]
    pub fn find_key(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }

    /// Finds keys suitable for signature verification.
    pub fn signing_keys(&self) -> impl Iterator<Item = &JsonWebKey> {
        self.keys.iter().filter(|k| k.is_signing_key())
    }

    /// Selects the key that verifies a token with the given header values.
    ///
    /// With a `kid` the key must carry that ID; without one, the first signing
    /// key usable with `algorithm` is chosen.
    #[must_use]
    pub fn select(&self, kid: Option<&str>, algorithm: SignatureAlgorithm) -> Option<&JsonWebKey> {
        match kid {
            Some(kid) => self
                .find_key(kid)
                .filter(|k| k.is_signing_key() && k.supports(algorithm)),
            None => self.signing_keys().find(|k| k.supports(algorithm)),
        }
    }
}

/// JSON Web Key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Key type (e.g., "RSA", "EC").
    pub kty: KeyType,

    /// Public key use ("sig" for signature, "enc" for encryption).
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,

    /// Algorithm intended for use with the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Key ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// X.509 certificate chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5c: Option<Vec<String>>,

    // === RSA Key Parameters ===
    /// RSA modulus (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA exponent (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    // === EC Key Parameters ===
    /// EC curve name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<EcCurve>,

    /// EC x coordinate (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// EC y coordinate (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

impl JsonWebKey {
    /// Checks if this is an RSA key.
    #[must_use]
    pub const fn is_rsa(&self) -> bool {
        matches!(self.kty, KeyType::Rsa)
    }

    /// Checks if this is an EC key.
    #[must_use]
    pub const fn is_ec(&self) -> bool {
        matches!(self.kty, KeyType::Ec)
    }

    /// Checks if this key is for signing.
    #[must_use]
    pub fn is_signing_key(&self) -> bool {
        self.key_use.as_deref() == Some("sig") || self.key_use.is_none()
    }

    /// Returns the key ID if present.
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Checks whether a token signed with `algorithm` can be verified by this key.
    #[must_use]
    pub fn supports(&self, algorithm: SignatureAlgorithm) -> bool {
        let family_matches = match algorithm.key_family() {
            KeyFamily::Rsa => self.is_rsa(),
            KeyFamily::Ec => self.is_ec(),
        };
        family_matches && self.alg.as_deref().map_or(true, |alg| alg == algorithm.jwa_name())
    }

    /// Builds a verification key from the JWK parameters.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::InvalidKey`] when parameters are missing or invalid.
    pub fn decoding_key(&self) -> Result<DecodingKey, VerificationError> {
        let missing = |param: &str| {
            VerificationError::InvalidKey(format!(
                "JWK '{}' is missing parameter '{param}'",
                self.kid.as_deref().unwrap_or("<none>")
            ))
        };

        match self.kty {
            KeyType::Rsa => {
                let n = self.n.as_deref().ok_or_else(|| missing("n"))?;
                let e = self.e.as_deref().ok_or_else(|| missing("e"))?;
                Ok(DecodingKey::from_rsa_components(n, e)?)
            }
            KeyType::Ec => {
                let x = self.x.as_deref().ok_or_else(|| missing("x"))?;
                let y = self.y.as_deref().ok_or_else(|| missing("y"))?;
                Ok(DecodingKey::from_ec_components(x, y)?)
            }
            KeyType::Oct | KeyType::Okp => Err(VerificationError::InvalidKey(format!(
                "unsupported JWK key type {:?}",
                self.kty
            ))),
        }
    }
}

/// Key type for JWK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// RSA key.
    #[serde(rename = "RSA")]
    Rsa,

    /// Elliptic Curve key.
    #[serde(rename = "EC")]
    Ec,

    /// Octet sequence (symmetric key).
    #[serde(rename = "oct")]
    Oct,

    /// Octet Key Pair (Ed25519, X25519).
    #[serde(rename = "OKP")]
    Okp,
}

/// Elliptic curve names for JWK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcCurve {
    /// NIST P-256 curve.
    #[serde(rename = "P-256")]
    P256,

    /// NIST P-384 curve.
    #[serde(rename = "P-384")]
    P384,

    /// NIST P-521 curve.
    #[serde(rename = "P-521")]
    P521,
}
