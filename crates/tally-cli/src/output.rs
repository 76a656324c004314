//! Terminal output for command results.
//!
//! Results go to stdout; progress notes and logs go to stderr so that
//! `tally api ...` output can be piped straight into `jq`.

use anyhow::Result;
use colored::Colorize;
use serde_json::Value;

use tally_core::ApiUrl;

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Describe a stored session without revealing any token.
pub fn session(api: &ApiUrl, authenticated: bool) {
    field("API", api.as_str());
    let status = if authenticated {
        "authenticated".green()
    } else {
        "not authenticated".yellow()
    };
    field("Status", &status.to_string());
}

/// Print an API response body. Empty bodies (204, `null`) print nothing.
pub fn response(body: &Value) -> Result<()> {
    if body.is_null() {
        eprintln!("{}", "(empty response)".dimmed());
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}
