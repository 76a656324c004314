//! In-memory credential store.

use std::sync::{PoisonError, RwLock};

use crate::credentials::Credentials;
use crate::tokens::{AccessToken, RefreshToken};
use crate::traits::CredentialStore;

/// A [`CredentialStore`] holding the token pair behind a single lock.
#[derive(Default)]
pub struct MemoryCredentialStore {
    tokens: RwLock<Credentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with a token pair.
    pub fn with_tokens(access_token: AccessToken, refresh_token: RefreshToken) -> Self {
        Self {
            tokens: RwLock::new(Credentials::new(access_token, refresh_token)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Credentials {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, access_token: AccessToken, refresh_token: RefreshToken) {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        *tokens = Credentials::new(access_token, refresh_token);
    }

    fn clear(&self) {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        *tokens = Credentials::empty();
    }
}

impl std::fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCredentialStore")
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
