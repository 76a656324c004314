//! Raw API subcommands.
//!
//! Each call goes through the session manager, so an expired access token is
//! refreshed and the request replayed without the user noticing.

mod request;

use anyhow::Result;
use clap::{Args, Subcommand};

use tally_core::Method;

use request::RequestArgs;

#[derive(Args, Debug)]
pub struct ApiCommand {
    #[command(subcommand)]
    pub command: ApiSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ApiSubcommand {
    /// Send a GET request
    Get(RequestArgs),

    /// Send a POST request with a JSON body
    Post(RequestArgs),

    /// Send a PUT request with a JSON body
    Put(RequestArgs),

    /// Send a DELETE request
    Delete(RequestArgs),
}

pub async fn handle(cmd: ApiCommand) -> Result<()> {
    match cmd.command {
        ApiSubcommand::Get(args) => request::run(Method::Get, args).await,
        ApiSubcommand::Post(args) => request::run(Method::Post, args).await,
        ApiSubcommand::Put(args) => request::run(Method::Put, args).await,
        ApiSubcommand::Delete(args) => request::run(Method::Delete, args).await,
    }
}
