//! CLI session wiring: persisted tokens plus an API client over them.

pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use tally_core::{ApiUrl, Error};
use tally_http::{ApiClient, SessionConfig};

use storage::FileCredentialStore;

/// Hint shown whenever the stored session can no longer be used.
pub const LOGIN_HINT: &str = "Run 'tally auth login' first.";

/// An API client bound to the session file.
pub struct CliSession {
    pub client: ApiClient,
    pub store: Arc<FileCredentialStore>,
}

impl CliSession {
    /// Start a fresh, unauthenticated session against `api`.
    pub fn start(api: &str) -> Result<Self> {
        let api = ApiUrl::new(api).context("Invalid API URL")?;
        let store = FileCredentialStore::new(storage::session_path()?, api);
        Self::from_store(store)
    }

    /// Resume the saved session.
    pub fn resume() -> Result<Self> {
        let store = FileCredentialStore::load(&storage::session_path()?)
            .context("Failed to load session")?
            .with_context(|| format!("No active session. {LOGIN_HINT}"))?;
        Self::from_store(store)
    }

    fn from_store(store: FileCredentialStore) -> Result<Self> {
        let store = Arc::new(store);
        let api = store.api().clone();
        let client = ApiClient::connect(api, store.clone(), SessionConfig::default())
            .context("Failed to create API client")?;
        Ok(Self { client, store })
    }
}

/// Turn a failed call into an error message that tells the user what to do.
pub fn explain(err: Error, action: &str) -> anyhow::Error {
    if err.requires_reauthentication() {
        anyhow::anyhow!("{action}: session expired. {LOGIN_HINT}")
    } else {
        anyhow::Error::new(err).context(action.to_string())
    }
}

/// Fail early when there is nothing to authenticate with.
pub fn ensure_authenticated(session: &CliSession) -> Result<()> {
    if !session.client.is_authenticated() {
        bail!("Not logged in. {LOGIN_HINT}");
    }
    Ok(())
}
