//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use tally_core::LoginCredentials;

use super::DEFAULT_API;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// API base URL
    #[arg(long, env = "TALLY_API_URL", default_value = DEFAULT_API)]
    pub api: String,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let session = CliSession::start(&args.api)?;
    let credentials = LoginCredentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    session
        .client
        .login(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("Email", &args.email);
    output::session(session.store.api(), session.client.is_authenticated());

    Ok(())
}
