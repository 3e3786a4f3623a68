//! # kc-crypto
//!
//! Cryptographic primitives used to verify tokens issued by a Keycloak realm.
//!
//! ## Modules
//!
//! - [`algorithm`] - JWS signature algorithms accepted for realm tokens
//! - [`keys`] - Realm public key material (PEM / base64 DER)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod algorithm;
pub mod keys;

pub use algorithm::{AlgorithmError, KeyFamily, SignatureAlgorithm};
pub use keys::{KeyError, RealmPublicKey};
