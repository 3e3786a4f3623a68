//! CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::config::OutputFormat;

/// Log in to a Keycloak realm with a username and password.
#[derive(Debug, Parser)]
#[command(name = "kc-login")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the client's `keycloak.json`.
    #[arg(short, long, env = "KC_CONFIG", default_value = "keycloak.json")]
    pub config: PathBuf,

    /// Username.
    #[arg(short, long, env = "KC_USERNAME")]
    pub username: String,

    /// Password (prompted for when absent).
    #[arg(short, long, env = "KC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Map roles to authorities with this prefix (e.g. `ROLE_`).
    #[arg(long)]
    pub role_prefix: Option<String>,

    /// Upper-case mapped authorities (requires `--role-prefix`).
    #[arg(long, requires = "role_prefix")]
    pub upper_case: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}
