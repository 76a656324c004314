//! Session layer configuration.

use std::time::Duration;

use crate::endpoints::REFRESH;

/// Default bound on the refresh exchange.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(6);

/// Default bound on ordinary requests made by the reqwest transport.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for the session manager and the reqwest transport.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Path of the refresh endpoint, relative to the API base URL.
    pub refresh_path: String,
    /// How long the refresh exchange may take before it counts as failed.
    pub refresh_timeout: Duration,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_path: REFRESH.to_string(),
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("tally/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SessionConfig {
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
