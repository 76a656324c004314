//! API endpoint paths and wire types for the auth endpoints.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Exchange a refresh token for a new token pair.
pub const REFRESH: &str = "/auth/refresh";

/// Password login.
pub const LOGIN: &str = "/auth/login";

/// Account creation.
pub const SIGNUP: &str = "/auth/signup";

/// Server-side session revocation.
pub const LOGOUT: &str = "/auth/logout";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for the refresh endpoint.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Request body for login.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for signup.
#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

/// Response envelope shared by refresh, login and signup.
#[derive(Debug, Deserialize)]
pub struct SessionEnvelope {
    pub session: SessionTokens,
}

/// Token pair inside a [`SessionEnvelope`].
#[derive(Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl SessionTokens {
    /// Both tokens are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Error body format returned by the API.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
