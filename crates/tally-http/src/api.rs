//! Typed API façade over the session manager.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use tally_core::error::{AuthError, DecodeError, ProtocolError, StatusKind};
use tally_core::{
    AccessToken, ApiResponse, ApiUrl, CredentialStore, Error, LoginCredentials, RefreshToken,
    RequestDescriptor, ResponseKind, Result,
};

use crate::config::SessionConfig;
use crate::endpoints::{
    ErrorBody, LOGIN, LOGOUT, LoginRequest, SIGNUP, SessionEnvelope, SignupRequest,
};
use crate::session::SessionManager;

/// JSON API client.
///
/// Encodes request bodies, decodes responses and maps non-success statuses to
/// [`ProtocolError`]. All authenticated calls go through a [`SessionManager`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    session: SessionManager,
}

impl ApiClient {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    /// Create a client talking to `api` over reqwest.
    pub fn connect(
        api: ApiUrl,
        store: Arc<dyn CredentialStore>,
        config: SessionConfig,
    ) -> Result<Self> {
        Ok(Self::new(SessionManager::connect(api, store, config)?))
    }

    /// Returns the underlying session manager.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Returns true if a token pair is stored.
    pub fn is_authenticated(&self) -> bool {
        !self.session.credentials().get().is_empty()
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Log in and store the returned token pair.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<()> {
        info!("Logging in");

        let request = RequestDescriptor::post(LOGIN).with_json(&LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        })?;

        self.open_session(&request).await
    }

    /// Create an account and store the returned token pair.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn signup(&self, credentials: &LoginCredentials, name: Option<&str>) -> Result<()> {
        info!("Creating account");

        let request = RequestDescriptor::post(SIGNUP).with_json(&SignupRequest {
            email: credentials.email(),
            password: credentials.password(),
            name,
        })?;

        self.open_session(&request).await
    }

    /// Revoke the session server-side (best effort) and clear stored tokens.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        if self.is_authenticated() {
            let request = RequestDescriptor::post(LOGOUT).expecting(ResponseKind::Empty);
            match self.session.request(request).await {
                Ok(response) if !response.is_success() => {
                    debug!(status = response.status, "Logout rejected by server");
                }
                Err(e) => debug!(error = %e, "Logout call failed"),
                Ok(_) => {}
            }
        }

        self.session.credentials().clear();
        info!("Logged out");
        Ok(())
    }

    /// Login and signup answer with a session envelope. They go over the bare
    /// transport: there is no token to refresh yet.
    async fn open_session(&self, request: &RequestDescriptor) -> Result<()> {
        let response = self.session.transport().execute(request).await?;

        if matches!(
            StatusKind::from_status(response.status),
            StatusKind::Unauthorized | StatusKind::Forbidden
        ) {
            let error = protocol_error(&response);
            let fallback = error.to_string();
            return Err(AuthError::InvalidCredentials(error.message.unwrap_or(fallback)).into());
        }

        let response = check_status(response)?;
        let envelope: SessionEnvelope = decode_json(&response)?;
        if !envelope.session.is_complete() {
            return Err(
                AuthError::InvalidCredentials("server returned an empty token".into()).into(),
            );
        }

        self.session.credentials().set(
            AccessToken::new(envelope.session.access_token),
            RefreshToken::new(envelope.session.refresh_token),
        );
        debug!("Session stored");
        Ok(())
    }

    // ========================================================================
    // Authenticated JSON endpoints
    // ========================================================================

    /// GET `path` and decode the JSON response.
    pub async fn get<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.send(RequestDescriptor::get(path)).await
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(RequestDescriptor::post(path).with_json(body)?)
            .await
    }

    /// PUT `body` as JSON to `path` and decode the JSON response.
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(RequestDescriptor::put(path).with_json(body)?)
            .await
    }

    /// DELETE `path`, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(RequestDescriptor::delete(path).expecting(ResponseKind::Empty))
            .await
    }

    /// Send a descriptor and decode the body according to its response kind.
    ///
    /// With [`ResponseKind::Empty`], or when the body is empty, `R` is decoded
    /// from JSON `null`, so `()` and `Option<_>` both work.
    pub async fn send<R>(&self, request: RequestDescriptor) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let expects = request.expects();
        let response = self.send_raw(request).await?;

        if expects == ResponseKind::Empty || response.body.is_empty() {
            return serde_json::from_value(serde_json::Value::Null).map_err(|source| {
                DecodeError {
                    status: response.status,
                    source,
                }
                .into()
            });
        }

        decode_json(&response)
    }

    /// Send a descriptor and return the successful response without decoding.
    pub async fn send_raw(&self, request: RequestDescriptor) -> Result<ApiResponse> {
        let response = self.session.request(request).await?;
        check_status(response)
    }
}

/// Map non-success statuses to [`ProtocolError`].
fn check_status(response: ApiResponse) -> Result<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(Error::Protocol(protocol_error(&response)))
    }
}

fn protocol_error(response: &ApiResponse) -> ProtocolError {
    // Error bodies are optional and not always JSON
    let body: ErrorBody = serde_json::from_slice(&response.body).unwrap_or_default();
    ProtocolError::new(response.status, body.error, body.message)
}

fn decode_json<R: DeserializeOwned>(response: &ApiResponse) -> Result<R> {
    serde_json::from_slice(&response.body).map_err(|source| {
        DecodeError {
            status: response.status,
            source,
        }
        .into()
    })
}
