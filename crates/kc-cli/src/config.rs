//! CLI configuration.

use kc_core::AdapterConfig;
use kc_protocol_oidc::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

/// Loads `keycloak.json` and derives the provider configuration.
pub fn load_provider_config(path: &Path) -> crate::CliResult<ProviderConfig> {
    let adapter = AdapterConfig::load(path).map_err(|e| {
        crate::CliError::Config(format!("failed to load {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), realm = %adapter.realm, client_id = %adapter.resource, "loaded adapter configuration");
    ProviderConfig::from_adapter_config(&adapter)
        .map_err(|e| crate::CliError::Config(e.to_string()))
}
