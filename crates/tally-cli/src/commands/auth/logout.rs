//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs) -> Result<()> {
    let session = CliSession::resume()?;

    session
        .client
        .logout()
        .await
        .context("Failed to logout")?;

    output::success("Logged out");

    Ok(())
}
