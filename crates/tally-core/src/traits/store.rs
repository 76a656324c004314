//! Credential store trait.

use std::fmt::Debug;

use crate::credentials::Credentials;
use crate::tokens::{AccessToken, RefreshToken};

/// Thread-safe holder of the current token pair.
///
/// Implementations must replace the pair atomically: a concurrent
/// [`get`](CredentialStore::get) observes either the old pair or the new
/// one, never a mix of both.
pub trait CredentialStore: Send + Sync + Debug {
    /// Returns a snapshot of the current tokens. Never blocks on network.
    fn get(&self) -> Credentials;

    /// Replace both tokens.
    fn set(&self, access_token: AccessToken, refresh_token: RefreshToken);

    /// Drop both tokens.
    fn clear(&self);
}
