//! # kc-core
//!
//! Configuration, error handling and security events shared by the
//! Keycloak direct access grant crates.
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - AU-2: Event logging framework
//! - SI-11: Error handling

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::{AdapterConfig, ClientCredentials, PrincipalAttribute};
pub use error::{Error, Result};
pub use event::{Event, EventBuilder, EventOutcome, EventType};
