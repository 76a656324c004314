//! Error types for the tally client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, protocol, serialization and input validation
//! errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for tally operations.
///
/// The session layer only ever produces [`Error::Transport`] and
/// [`Error::Auth`]. Status-code interpretation ([`Error::Protocol`]) and JSON
/// handling belong to the API façade.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (refresh failed, invalid credentials).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success HTTP status returned by the API.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Input validation errors (bad URL, header, method).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if the caller has to log in again before retrying.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::RefreshFailed | AuthError::NotAuthenticated)
        )
    }

    /// Returns true if this is the uniform refresh failure signal.
    pub fn is_refresh_failed(&self) -> bool {
        matches!(self, Error::Auth(AuthError::RefreshFailed))
    }
}

/// Transport-level errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// DNS resolution failed.
    #[error("DNS resolution failed: {host}")]
    Dns { host: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP client error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token refresh episode failed; the user must authenticate again.
    #[error("session expired, re-authentication required")]
    RefreshFailed,

    /// Login or signup was rejected.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// No refresh token is stored, so there is nothing to refresh with.
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Classification of a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Unprocessable,
    Server,
    Other,
}

impl StatusKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::Unprocessable,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }
}

/// Protocol-level errors from non-success API responses.
#[derive(Debug, Clone)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Machine-readable error code (if present).
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Returns the status classification.
    pub fn kind(&self) -> StatusKind {
        StatusKind::from_status(self.status)
    }
}

/// A response body did not match the expected shape.
#[derive(Debug, Error)]
#[error("HTTP {status}: {source}")]
pub struct DecodeError {
    /// Status of the response that failed to decode.
    pub status: u16,
    #[source]
    pub source: serde_json::Error,
}

/// Input validation errors.
#[derive(Debug, Clone, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid HTTP method name.
    #[error("invalid HTTP method '{value}'")]
    Method { value: String },

    /// Header name or value not representable on the wire.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },
}
