//! Scripted in-process transport for deterministic session tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use tally_core::error::TransportError;
use tally_core::{
    AccessToken, ApiResponse, HttpTransport, MemoryCredentialStore, RefreshToken,
    RequestDescriptor,
};

pub const REFRESH_PATH: &str = "/auth/refresh";
pub const STALE_ACCESS: &str = "stale-access";
pub const INITIAL_REFRESH: &str = "refresh-0";

/// How long the scripted refresh endpoint takes to fail, so that concurrent
/// callers queue up behind the episode before it resolves.
pub const FAILURE_LATENCY: Duration = Duration::from_millis(50);

/// How the scripted refresh endpoint answers.
#[derive(Debug, Clone)]
pub enum RefreshBehavior {
    /// 200 with `access-<n>` / `refresh-<n>` for the n-th refresh call.
    Succeed { delay: Duration },
    /// The given status with a JSON error body.
    Status(u16),
    /// 200 with a body that is not a session envelope.
    Malformed,
    /// Never answers.
    Hang,
    /// Connection refused.
    Unreachable,
    /// The transport panics mid-exchange.
    Panic,
}

impl RefreshBehavior {
    pub fn succeed_after(delay: Duration) -> Self {
        RefreshBehavior::Succeed { delay }
    }
}

/// Transport that plays both the API and its refresh endpoint.
///
/// Resource paths answer 200 with the path as body when the bearer token
/// equals the accepted token, 401 otherwise. Special prefixes:
/// - `/offline` always fails at the transport level
/// - `/missing` always answers 404
/// - `/flaky` fails at the transport level once authorized
pub struct ScriptedTransport {
    refresh: Mutex<RefreshBehavior>,
    accepted: Mutex<String>,
    refresh_calls: AtomicUsize,
    refresh_requests: Mutex<Vec<RequestDescriptor>>,
    calls: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedTransport {
    pub fn new(refresh: RefreshBehavior) -> Arc<Self> {
        Arc::new(Self {
            refresh: Mutex::new(refresh),
            accepted: Mutex::new("access-1".to_string()),
            refresh_calls: AtomicUsize::new(0),
            refresh_requests: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Change the access token resource paths accept.
    pub fn accept(&self, token: &str) {
        *self.accepted.lock().unwrap() = token.to_string();
    }

    pub fn set_refresh(&self, behavior: RefreshBehavior) {
        *self.refresh.lock().unwrap() = behavior;
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_requests(&self) -> Vec<RequestDescriptor> {
        self.refresh_requests.lock().unwrap().clone()
    }

    /// Every non-refresh request, in arrival order.
    pub fn calls(&self) -> Vec<RequestDescriptor> {
        self.calls.lock().unwrap().clone()
    }

    /// Requests received for `path`, in arrival order.
    pub fn calls_for(&self, path: &str) -> Vec<RequestDescriptor> {
        self.calls()
            .into_iter()
            .filter(|c| c.path() == path)
            .collect()
    }

    async fn answer_refresh(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ApiResponse, TransportError> {
        let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.refresh_requests.lock().unwrap().push(request.clone());
        let behavior = self.refresh.lock().unwrap().clone();

        match behavior {
            RefreshBehavior::Succeed { delay } => {
                tokio::time::sleep(delay).await;
                let body = json!({
                    "session": {
                        "access_token": format!("access-{n}"),
                        "refresh_token": format!("refresh-{n}"),
                    }
                });
                Ok(ApiResponse::new(200, body.to_string()))
            }
            RefreshBehavior::Status(status) => {
                tokio::time::sleep(FAILURE_LATENCY).await;
                Ok(ApiResponse::new(
                    status,
                    r#"{"error":"RefreshRejected","message":"nope"}"#,
                ))
            }
            RefreshBehavior::Malformed => {
                tokio::time::sleep(FAILURE_LATENCY).await;
                Ok(ApiResponse::new(200, r#"{"access_token":"flat-shape"}"#))
            }
            RefreshBehavior::Hang => std::future::pending().await,
            RefreshBehavior::Unreachable => {
                tokio::time::sleep(FAILURE_LATENCY).await;
                Err(TransportError::Connection {
                    message: "connection refused".to_string(),
                })
            }
            RefreshBehavior::Panic => {
                tokio::time::sleep(FAILURE_LATENCY).await;
                panic!("refresh transport blew up");
            }
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<ApiResponse, TransportError> {
        if request.path() == REFRESH_PATH {
            return self.answer_refresh(request).await;
        }

        self.calls.lock().unwrap().push(request.clone());

        if request.path().starts_with("/offline") {
            return Err(TransportError::Connection {
                message: "network unreachable".to_string(),
            });
        }
        if request.path().starts_with("/missing") {
            return Ok(ApiResponse::new(404, r#"{"error":"NotFound"}"#));
        }

        let expected = format!("Bearer {}", self.accepted.lock().unwrap());
        if request.header("authorization") != Some(expected.as_str()) {
            return Ok(ApiResponse::new(401, r#"{"error":"ExpiredToken"}"#));
        }

        if request.path().starts_with("/flaky") {
            return Err(TransportError::Connection {
                message: "connection reset".to_string(),
            });
        }

        Ok(ApiResponse::new(200, request.path().to_string()))
    }
}

/// A store holding an access token the API no longer accepts.
pub fn stale_store() -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::with_tokens(
        AccessToken::new(STALE_ACCESS),
        RefreshToken::new(INITIAL_REFRESH),
    ))
}
