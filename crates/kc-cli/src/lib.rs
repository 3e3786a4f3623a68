//! # kc-cli
//!
//! `kc-login`: logs a user in to a Keycloak realm with the direct access
//! grant and prints the verified principal and its authorities.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
