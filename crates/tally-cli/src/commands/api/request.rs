//! Generic request command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::Value;

use tally_core::{Method, RequestDescriptor};

use crate::output;
use crate::session::{self, CliSession};

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Path relative to the API base URL (e.g., /budgets)
    pub path: String,

    /// JSON request body
    #[arg(long)]
    pub body: Option<String>,
}

pub async fn run(method: Method, args: RequestArgs) -> Result<()> {
    let session = CliSession::resume()?;
    session::ensure_authenticated(&session)?;

    let mut request = RequestDescriptor::new(method, &args.path);
    if let Some(body) = &args.body {
        if !accepts_body(method) {
            bail!("--body is only accepted for POST and PUT");
        }
        let value: Value = serde_json::from_str(body).context("Body is not valid JSON")?;
        request = request.with_json(&value)?;
    }

    let response: Value = session
        .client
        .send(request)
        .await
        .map_err(|e| session::explain(e, &format!("{method} {} failed", args.path)))?;

    output::response(&response)
}

fn accepts_body(method: Method) -> bool {
    matches!(method, Method::Post | Method::Put)
}
