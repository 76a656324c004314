//! Auth subcommand implementations.

mod login;
mod logout;
mod refresh_token;
mod signup;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};

/// Default API base URL.
pub const DEFAULT_API: &str = "https://api.tally.app";

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Create a new session (login)
    Login(login::LoginArgs),

    /// Create an account and log in
    Signup(signup::SignupArgs),

    /// End the active session
    Logout(logout::LogoutArgs),

    /// Display the active session
    Whoami(whoami::WhoamiArgs),

    /// Refresh the session tokens
    RefreshToken(refresh_token::RefreshTokenArgs),
}

pub async fn handle(cmd: AuthCommand) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args).await,
        AuthSubcommand::Signup(args) => signup::run(args).await,
        AuthSubcommand::Logout(args) => logout::run(args).await,
        AuthSubcommand::Whoami(args) => whoami::run(args).await,
        AuthSubcommand::RefreshToken(args) => refresh_token::run(args).await,
    }
}
