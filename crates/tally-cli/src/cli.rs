//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::api::ApiCommand;
use crate::commands::auth::AuthCommand;

/// Command-line client for the tally budgeting API.
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version = env!("TALLY_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Session management (login, logout, token refresh)
    Auth(AuthCommand),

    /// Authenticated requests against the API
    Api(ApiCommand),
}
