//! Whoami command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let session = CliSession::resume()?;

    output::session(session.store.api(), session.client.is_authenticated());

    Ok(())
}
