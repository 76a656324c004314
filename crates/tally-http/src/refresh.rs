//! Single-flight token refresh.
//!
//! Every request that comes back 401 hands itself to the [`RefreshCoordinator`]
//! as a [`Waiter`]. The first waiter of an episode becomes the leader and
//! spawns the episode task; the others only join the queue. Every caller,
//! the leader included, then waits on its own reply channel, so an episode
//! outlives any caller that gives up. When the exchange resolves, the task
//! flips the state back to idle, takes the whole queue in the same critical
//! section, and either replays every queued request with the new access token
//! or fails all of them with [`AuthError::RefreshFailed`].

use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{Instrument, debug, info, warn};

use tally_core::error::{AuthError, TransportError};
use tally_core::{
    AccessToken, ApiResponse, CredentialStore, HttpTransport, RefreshToken, RequestDescriptor,
    Result,
};

use crate::endpoints::{RefreshRequest, SessionEnvelope};

/// A caller parked until the current refresh episode resolves.
pub(crate) enum Waiter {
    /// A request that was rejected with 401 and must be sent again.
    Replay {
        request: RequestDescriptor,
        reply: oneshot::Sender<Result<ApiResponse>>,
    },
    /// An explicit refresh with nothing to replay.
    Refresh { reply: oneshot::Sender<Result<()>> },
}

impl Waiter {
    fn fail(self) {
        // Receivers that went away no longer care about the outcome.
        match self {
            Waiter::Replay { reply, .. } => {
                let _ = reply.send(Err(AuthError::RefreshFailed.into()));
            }
            Waiter::Refresh { reply } => {
                let _ = reply.send(Err(AuthError::RefreshFailed.into()));
            }
        }
    }
}

/// Why a refresh exchange failed. Logged, never returned to callers.
#[derive(Debug, Error)]
enum RefreshFailure {
    #[error("no refresh token stored")]
    MissingRefreshToken,

    #[error("could not encode refresh request: {0}")]
    Encode(String),

    #[error("refresh timed out after {0:?}")]
    Timeout(Duration),

    #[error("refresh transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("refresh endpoint answered HTTP {0}")]
    Status(u16),

    #[error("malformed refresh response: {0}")]
    Malformed(String),
}

#[derive(Default)]
struct RefreshState {
    refreshing: bool,
    pending: Vec<Waiter>,
}

/// Guarantees at most one refresh exchange in flight.
pub(crate) struct RefreshCoordinator {
    state: Mutex<RefreshState>,
    exchange_lock: tokio::sync::Mutex<()>,
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn CredentialStore>,
    refresh_path: String,
    timeout: Duration,
}

impl RefreshCoordinator {
    pub(crate) fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn CredentialStore>,
        refresh_path: String,
        timeout: Duration,
    ) -> Self {
        Self {
            state: Mutex::new(RefreshState::default()),
            exchange_lock: tokio::sync::Mutex::new(()),
            transport,
            store,
            refresh_path,
            timeout,
        }
    }

    pub(crate) fn is_refreshing(&self) -> bool {
        self.lock_state().refreshing
    }

    /// Queue `waiter` and, if no episode is running, start a new one.
    ///
    /// The outcome arrives on the waiter's own channel.
    pub(crate) fn submit(self: &Arc<Self>, waiter: Waiter) {
        let leader = {
            let mut state = self.lock_state();
            state.pending.push(waiter);
            !mem::replace(&mut state.refreshing, true)
        };

        if leader {
            let coordinator = Arc::clone(self);
            tokio::spawn(async move { coordinator.run_episode().await }.in_current_span());
        } else {
            debug!("Refresh already in flight, request queued");
        }
    }

    async fn run_episode(&self) {
        let mut episode = Episode {
            coordinator: self,
            finished: false,
        };

        info!("Refreshing session");
        let outcome = {
            let _exclusive = self.exchange_lock.lock().await;
            self.exchange().await
        };

        let pending = episode.finish();
        match outcome {
            Ok(access_token) => {
                info!(queued = pending.len(), "Session refreshed, replaying requests");
                for waiter in pending {
                    self.replay(waiter, &access_token);
                }
            }
            Err(failure) => {
                warn!(error = %failure, queued = pending.len(), "Session refresh failed");
                for waiter in pending {
                    waiter.fail();
                }
            }
        }
    }

    /// The refresh round-trip. Uses the bare transport so a rejected refresh
    /// can never start another episode.
    async fn exchange(&self) -> std::result::Result<AccessToken, RefreshFailure> {
        let credentials = self.store.get();
        let refresh_token = credentials
            .refresh_token
            .as_ref()
            .ok_or(RefreshFailure::MissingRefreshToken)?;

        let request = RequestDescriptor::post(self.refresh_path.as_str())
            .with_json(&RefreshRequest {
                refresh_token: refresh_token.as_str(),
            })
            .map_err(|e| RefreshFailure::Encode(e.to_string()))?
            .authorized(credentials.bearer());

        let response = tokio::time::timeout(self.timeout, self.transport.execute(&request))
            .await
            .map_err(|_| RefreshFailure::Timeout(self.timeout))??;

        if !response.is_success() {
            return Err(RefreshFailure::Status(response.status));
        }

        let envelope: SessionEnvelope = serde_json::from_slice(&response.body)
            .map_err(|e| RefreshFailure::Malformed(e.to_string()))?;
        if !envelope.session.is_complete() {
            return Err(RefreshFailure::Malformed("empty token".to_string()));
        }

        let access_token = AccessToken::new(envelope.session.access_token);
        self.store.set(
            access_token.clone(),
            RefreshToken::new(envelope.session.refresh_token),
        );
        Ok(access_token)
    }

    fn replay(&self, waiter: Waiter, access_token: &AccessToken) {
        match waiter {
            Waiter::Replay { reply, .. } if reply.is_closed() => {
                debug!("Caller went away, skipping replay");
            }
            Waiter::Replay { request, reply } => {
                let transport = Arc::clone(&self.transport);
                let request = request.authorized(access_token.as_str());
                tokio::spawn(async move {
                    let result = transport.execute(&request).await.map_err(Into::into);
                    let _ = reply.send(result);
                });
            }
            Waiter::Refresh { reply } => {
                let _ = reply.send(Ok(()));
            }
        }
    }

    /// Back to idle, handing over everything queued so far.
    fn take_pending(&self) -> Vec<Waiter> {
        let mut state = self.lock_state();
        state.refreshing = false;
        mem::take(&mut state.pending)
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resets the coordinator when the episode task stops, however it stops.
///
/// If the task panics or is aborted mid-exchange the queued waiters are
/// dropped with it; their receivers observe a closed channel, which callers
/// treat as a refresh failure.
struct Episode<'a> {
    coordinator: &'a RefreshCoordinator,
    finished: bool,
}

impl Episode<'_> {
    fn finish(&mut self) -> Vec<Waiter> {
        self.finished = true;
        self.coordinator.take_pending()
    }
}

impl Drop for Episode<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let abandoned = self.coordinator.take_pending();
            warn!(queued = abandoned.len(), "Refresh abandoned before completion");
        }
    }
}
