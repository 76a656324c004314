//! Refresh token command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::session::{self, CliSession};

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs) -> Result<()> {
    let session = CliSession::resume()?;
    session::ensure_authenticated(&session)?;

    eprintln!("{}", "Refreshing session...".dimmed());

    // The store writes the rotated pair to the session file
    session
        .client
        .session()
        .refresh()
        .await
        .map_err(|e| session::explain(e, "Failed to refresh session"))?;

    output::success("Session refreshed successfully");
    output::session(session.store.api(), session.client.is_authenticated());

    Ok(())
}
