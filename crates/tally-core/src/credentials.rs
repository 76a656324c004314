//! Login credentials and the stored token pair.

use std::fmt;

use crate::tokens::{AccessToken, RefreshToken};

/// Login credentials for password authentication.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use tally_core::LoginCredentials;
///
/// let creds = LoginCredentials::new("alice@example.com", "hunter2");
/// assert_eq!(creds.email(), "alice@example.com");
/// ```
#[derive(Clone)]
pub struct LoginCredentials {
    email: String,
    password: String,
}

impl LoginCredentials {
    /// Create new credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Returns the account email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests.
    /// Never log or display this value.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Snapshot of the current token pair held by a credential store.
///
/// Both tokens are present after a successful login, signup or refresh, and
/// both are absent after logout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
}

impl Credentials {
    /// A full token pair.
    pub fn new(access_token: AccessToken, refresh_token: RefreshToken) -> Self {
        Self {
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
        }
    }

    /// No tokens.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no access token is held.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none()
    }

    /// The bearer value to send; empty when no access token is held.
    pub fn bearer(&self) -> &str {
        self.access_token
            .as_ref()
            .map(AccessToken::as_str)
            .unwrap_or("")
    }
}
