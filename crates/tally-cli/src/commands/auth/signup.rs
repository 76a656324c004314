//! Signup command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use tally_core::LoginCredentials;

use super::DEFAULT_API;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct SignupArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// API base URL
    #[arg(long, env = "TALLY_API_URL", default_value = DEFAULT_API)]
    pub api: String,
}

pub async fn run(args: SignupArgs) -> Result<()> {
    let session = CliSession::start(&args.api)?;
    let credentials = LoginCredentials::new(&args.email, &args.password);

    eprintln!("{}", "Creating account...".dimmed());

    session
        .client
        .signup(&credentials, args.name.as_deref())
        .await
        .context("Failed to create account")?;

    output::success("Account created");
    println!();
    output::field("Email", &args.email);
    output::session(session.store.api(), session.client.is_authenticated());

    Ok(())
}
