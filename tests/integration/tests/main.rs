//! End-to-End Integration Tests
//!
//! These tests run the direct access grant against a wiremock realm that
//! serves the token and JWKS endpoints, signing tokens with fixture keys.

mod common;
mod client_authentication;
mod direct_grant;
mod key_resolution;
