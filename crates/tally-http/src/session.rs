//! Authenticated session manager.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, instrument};

use tally_core::error::AuthError;
use tally_core::{ApiResponse, ApiUrl, CredentialStore, HttpTransport, RequestDescriptor, Result};

use crate::config::SessionConfig;
use crate::refresh::{RefreshCoordinator, Waiter};
use crate::transport::ReqwestTransport;

/// Executes API calls with bearer-token injection and transparent 401
/// recovery.
///
/// # Thread Safety
///
/// Session managers are cheap to clone (they use an internal `Arc`) and are
/// safe to share across tasks. All clones share one refresh coordinator, so
/// concurrent 401s from any clone converge on a single refresh exchange.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tally_core::{ApiUrl, MemoryCredentialStore, RequestDescriptor};
/// use tally_http::{SessionConfig, SessionManager};
///
/// # async fn example() -> Result<(), tally_core::Error> {
/// let api = ApiUrl::new("https://api.example.com")?;
/// let store = Arc::new(MemoryCredentialStore::new());
/// let session = SessionManager::connect(api, store, SessionConfig::default())?;
///
/// let response = session.request(RequestDescriptor::get("/budgets")).await?;
/// println!("HTTP {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn CredentialStore>,
    coordinator: Arc<RefreshCoordinator>,
}

impl SessionManager {
    /// Create a session manager with the default configuration.
    pub fn new(transport: Arc<dyn HttpTransport>, store: Arc<dyn CredentialStore>) -> Self {
        Self::with_config(transport, store, &SessionConfig::default())
    }

    /// Create a session manager over an explicit transport.
    pub fn with_config(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn CredentialStore>,
        config: &SessionConfig,
    ) -> Self {
        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::clone(&transport),
            Arc::clone(&store),
            config.refresh_path.clone(),
            config.refresh_timeout,
        ));

        Self {
            inner: Arc::new(SessionInner {
                transport,
                store,
                coordinator,
            }),
        }
    }

    /// Create a session manager talking to `api` over reqwest.
    pub fn connect(
        api: ApiUrl,
        store: Arc<dyn CredentialStore>,
        config: SessionConfig,
    ) -> Result<Self> {
        let transport = ReqwestTransport::with_config(api, &config)?;
        Ok(Self::with_config(Arc::new(transport), store, &config))
    }

    /// Execute one logical API call.
    ///
    /// The request is sent with `Authorization: Bearer <access token>`. On a
    /// 401 the request waits for the refresh episode and is replayed once with
    /// the new token, or fails with [`AuthError::RefreshFailed`]. The replay's
    /// response is returned as-is, even if it is another 401. Every other
    /// status is returned untouched.
    ///
    /// The refresh runs in its own task, so dropping this future does not
    /// affect other requests waiting on the same episode.
    ///
    /// # Errors
    ///
    /// Transport failures of the original request are returned as-is and not
    /// retried.
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn request(&self, request: RequestDescriptor) -> Result<ApiResponse> {
        let credentials = self.inner.store.get();
        let authorized = request.authorized(credentials.bearer());

        let response = self.inner.transport.execute(&authorized).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        debug!("Request unauthorized, deferring to refresh");
        let (reply, outcome) = oneshot::channel();
        self.inner
            .coordinator
            .submit(Waiter::Replay { request, reply });

        outcome
            .await
            .unwrap_or_else(|_| Err(AuthError::RefreshFailed.into()))
    }

    /// Force a refresh of the token pair.
    ///
    /// Joins the episode already in flight if there is one. Fails with
    /// [`AuthError::NotAuthenticated`] without starting an episode when no
    /// refresh token is stored.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        if self.inner.store.get().refresh_token.is_none() {
            return Err(AuthError::NotAuthenticated.into());
        }

        let (reply, outcome) = oneshot::channel();
        self.inner.coordinator.submit(Waiter::Refresh { reply });

        outcome
            .await
            .unwrap_or_else(|_| Err(AuthError::RefreshFailed.into()))
    }

    /// Returns true while a refresh episode is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.inner.coordinator.is_refreshing()
    }

    /// The credential store this session reads and rotates.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    /// The bare transport, for calls that must bypass 401 recovery.
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.inner.transport
    }
}

// Custom Debug impl that hides sensitive data
impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("refreshing", &self.is_refreshing())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
