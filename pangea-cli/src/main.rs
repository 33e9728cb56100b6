//! Pangea CLI
//!
//! Command-line interface for submitting requests to Pangea services and
//! awaiting their results.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use pangea_client::config::DEFAULT_DOMAIN;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pangea")]
#[command(about = "Submit requests to Pangea services and await their results", long_about = None)]
struct Cli {
    /// Service name (e.g. file-scan, redact, embargo)
    #[arg(long, short, env = "PANGEA_SERVICE")]
    service: String,

    /// API token
    #[arg(long, env = "PANGEA_TOKEN", hide_env_values = true)]
    token: String,

    /// API domain, or a full http(s) base URL
    #[arg(long, env = "PANGEA_DOMAIN", default_value = DEFAULT_DOMAIN)]
    domain: String,

    /// Use plain HTTP
    #[arg(long)]
    insecure: bool,

    /// Local environment: do not prefix the domain with the service name
    #[arg(long)]
    local: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pangea_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::new(cli.service, cli.token, cli.domain, cli.insecure, cli.local);

    handle_command(cli.command, &config).await
}
