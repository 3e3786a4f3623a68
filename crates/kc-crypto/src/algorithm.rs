//! Signature algorithm definitions for token verification.
//!
//! Keycloak realms sign tokens with RS256 unless configured otherwise, so the
//! verifier accepts the SHA-256 family alongside the CNSA 2.0 algorithms.
//! [`SignatureAlgorithm::is_cnsa_compliant`] reports which is which.
//!
//! Symmetric (`HS*`) and unsigned (`none`) tokens are never accepted: a realm
//! public key cannot verify them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for algorithm operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlgorithmError {
    /// Algorithm is known but cannot be verified with a public key.
    #[error("algorithm '{0}' is not an asymmetric signature algorithm")]
    NotAsymmetric(String),

    /// Unknown algorithm.
    #[error("unknown algorithm: {0}")]
    Unknown(String),
}

/// Family of public key required by an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    /// RSA public key (PKCS#1 v1.5 and PSS).
    Rsa,
    /// Elliptic curve public key.
    Ec,
}

/// Asymmetric JWS signature algorithms accepted for realm tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// RSA PKCS#1 v1.5 with SHA-256 (Keycloak default).
    #[serde(rename = "RS256")]
    Rs256,

    /// RSA PKCS#1 v1.5 with SHA-384.
    #[serde(rename = "RS384")]
    Rs384,

    /// RSA PKCS#1 v1.5 with SHA-512.
    #[serde(rename = "RS512")]
    Rs512,

    /// RSA-PSS with SHA-256.
    #[serde(rename = "PS256")]
    Ps256,

    /// RSA-PSS with SHA-384.
    #[serde(rename = "PS384")]
    Ps384,

    /// RSA-PSS with SHA-512.
    #[serde(rename = "PS512")]
    Ps512,

    /// ECDSA using P-256 curve and SHA-256 hash.
    #[serde(rename = "ES256")]
    Es256,

    /// ECDSA using P-384 curve and SHA-384 hash.
    #[serde(rename = "ES384")]
    Es384,
}

impl SignatureAlgorithm {
    /// Returns the JWA algorithm name.
    #[must_use]
    pub const fn jwa_name(self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
            Self::Ps256 => "PS256",
            Self::Ps384 => "PS384",
            Self::Ps512 => "PS512",
            Self::Es256 => "ES256",
            Self::Es384 => "ES384",
        }
    }

    /// Returns the key family needed to verify this algorithm.
    #[must_use]
    pub const fn key_family(self) -> KeyFamily {
        match self {
            Self::Es256 | Self::Es384 => KeyFamily::Ec,
            Self::Rs256
            | Self::Rs384
            | Self::Rs512
            | Self::Ps256
            | Self::Ps384
            | Self::Ps512 => KeyFamily::Rsa,
        }
    }

    /// Returns whether this is an ECDSA algorithm.
    #[must_use]
    pub const fn is_ecdsa(self) -> bool {
        matches!(self.key_family(), KeyFamily::Ec)
    }

    /// Returns whether this is an RSA algorithm.
    #[must_use]
    pub const fn is_rsa(self) -> bool {
        matches!(self.key_family(), KeyFamily::Rsa)
    }

    /// Returns true if this algorithm is CNSA 2.0 compliant.
    #[must_use]
    pub const fn is_cnsa_compliant(self) -> bool {
        !matches!(self, Self::Rs256 | Self::Ps256 | Self::Es256)
    }

    /// Parses a JWA algorithm name.
    ///
    /// ## Errors
    ///
    /// Returns an error for symmetric, unsigned or unknown algorithms.
    pub fn from_jwa(name: &str) -> Result<Self, AlgorithmError> {
        match name {
            "RS256" => Ok(Self::Rs256),
            "RS384" => Ok(Self::Rs384),
            "RS512" => Ok(Self::Rs512),
            "PS256" => Ok(Self::Ps256),
            "PS384" => Ok(Self::Ps384),
            "PS512" => Ok(Self::Ps512),
            "ES256" => Ok(Self::Es256),
            "ES384" => Ok(Self::Es384),

            "HS256" | "HS384" | "HS512" | "none" => {
                Err(AlgorithmError::NotAsymmetric(name.to_string()))
            }

            _ => Err(AlgorithmError::Unknown(name.to_string())),
        }
    }
}

impl std::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.jwa_name())
    }
}
