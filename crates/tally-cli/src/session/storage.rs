//! Session storage for persisting tokens between runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use tally_core::{AccessToken, ApiUrl, CredentialStore, Credentials, RefreshToken};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    api: String,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Get the session file path.
pub fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "tally").context("Could not determine config directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// A credential store that writes every token rotation to disk.
///
/// Refreshes performed by the session manager during a command land in the
/// session file, so the next run starts from the newest pair.
pub struct FileCredentialStore {
    path: PathBuf,
    api: ApiUrl,
    tokens: RwLock<Credentials>,
}

impl FileCredentialStore {
    /// A store for `api` with no tokens yet. Nothing is written until the
    /// first [`CredentialStore::set`].
    pub fn new(path: PathBuf, api: ApiUrl) -> Self {
        Self {
            path,
            api,
            tokens: RwLock::new(Credentials::empty()),
        }
    }

    /// Load a previously saved session, if any.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path).context("Failed to read session file")?;
        let stored: StoredSession = serde_json::from_str(&json).context("Invalid session file")?;
        let api = ApiUrl::new(&stored.api).context("Invalid API URL in session")?;

        let credentials = match (stored.access_token, stored.refresh_token) {
            (Some(access), Some(refresh)) => {
                Credentials::new(AccessToken::new(access), RefreshToken::new(refresh))
            }
            _ => Credentials::empty(),
        };

        Ok(Some(Self {
            path: path.to_path_buf(),
            api,
            tokens: RwLock::new(credentials),
        }))
    }

    /// The API this session belongs to.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        let stored = StoredSession {
            api: self.api.to_string(),
            access_token: credentials
                .access_token
                .as_ref()
                .map(|t| t.as_str().to_string()),
            refresh_token: credentials
                .refresh_token
                .as_ref()
                .map(|t| t.as_str().to_string()),
        };

        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, &json).context("Failed to write session file")?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Credentials {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, access_token: AccessToken, refresh_token: RefreshToken) {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        *tokens = Credentials::new(access_token, refresh_token);
        // Blocking write under the lock, called from the async refresh task.
        // Acceptable for a one-shot CLI process; keeps the file in step with
        // memory when rotations race.
        if let Err(e) = self.save(&tokens) {
            warn!(error = %e, path = %self.path.display(), "Failed to persist session");
        }
    }

    fn clear(&self) {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        *tokens = Credentials::empty();
        if let Err(e) = self.remove() {
            warn!(error = %e, path = %self.path.display(), "Failed to remove session file");
        }
    }
}

impl std::fmt::Debug for FileCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCredentialStore")
            .field("path", &self.path)
            .field("api", &self.api)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
