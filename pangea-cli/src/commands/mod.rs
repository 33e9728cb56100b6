//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod request;

pub use request::RequestCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit requests and fetch their results
    Request {
        #[command(subcommand)]
        command: RequestCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Request { command } => request::handle_request_command(command, config).await,
    }
}
