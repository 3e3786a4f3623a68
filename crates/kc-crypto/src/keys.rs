//! Realm public key material.
//!
//! Keycloak publishes the realm key in `keycloak.json` as the base64 encoding
//! of a DER `SubjectPublicKeyInfo`, without PEM armor. Operators also paste
//! full PEM blocks. Both forms are normalized here to a PEM document that
//! JWT libraries can load.

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

const PEM_HEADER: &str = "-----BEGIN PUBLIC KEY-----";
const PEM_FOOTER: &str = "-----END PUBLIC KEY-----";

/// Error type for key parsing.
#[derive(Debug, Error)]
pub enum KeyError {
    /// No key material supplied.
    #[error("public key is empty")]
    Empty,

    /// Key material is not valid base64 or PEM.
    #[error("invalid public key encoding: {0}")]
    InvalidEncoding(String),
}

/// A realm public key, held as a PEM-encoded `SubjectPublicKeyInfo`.
#[derive(Clone, PartialEq, Eq)]
pub struct RealmPublicKey {
    der: Vec<u8>,
    pem: String,
}

impl std::fmt::Debug for RealmPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealmPublicKey")
            .field("der_len", &self.der.len())
            .finish()
    }
}

impl RealmPublicKey {
    /// Parses a key given either as PEM or as bare base64 DER.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or cannot be decoded.
    pub fn parse(input: &str) -> Result<Self, KeyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(KeyError::Empty);
        }

        let body: String = if trimmed.starts_with("-----BEGIN") {
            trimmed
                .lines()
                .filter(|line| !line.starts_with("-----"))
                .collect()
        } else {
            trimmed.to_string()
        };
        let body: String = body.chars().filter(|c| !c.is_whitespace()).collect();

        let der = STANDARD
            .decode(body.as_bytes())
            .map_err(|e| KeyError::InvalidEncoding(e.to_string()))?;
        if der.is_empty() {
            return Err(KeyError::Empty);
        }

        Ok(Self::from_der(der))
    }

    /// Wraps DER-encoded `SubjectPublicKeyInfo` bytes.
    #[must_use]
    pub fn from_der(der: Vec<u8>) -> Self {
        let encoded = STANDARD.encode(&der);
        let mut pem = String::with_capacity(encoded.len() + 80);
        pem.push_str(PEM_HEADER);
        pem.push('\n');
        for chunk in encoded.as_bytes().chunks(64) {
            // base64 output is ASCII
            pem.push_str(&String::from_utf8_lossy(chunk));
            pem.push('\n');
        }
        pem.push_str(PEM_FOOTER);
        pem.push('\n');

        Self { der, pem }
    }

    /// Returns the PEM encoding.
    #[must_use]
    pub fn to_pem(&self) -> &str {
        &self.pem
    }

    /// Returns the DER encoding.
    #[must_use]
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}
