//! # kc-login
//!
//! Command-line direct access grant login.

#![forbid(unsafe_code)]

use clap::Parser;
use kc_cli::{cli::Cli, commands::run_login, output::error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run_login(cli).await {
        error(&e.to_string());
        std::process::exit(1);
    }
}
