//! tally-http - HTTP session layer for the tally API.
//!
//! [`SessionManager`] attaches bearer tokens to outgoing requests and recovers
//! from 401 responses through a single shared refresh exchange.
//! [`ApiClient`] layers JSON encoding and status mapping on top of it.

mod api;
mod config;
pub mod endpoints;
mod refresh;
mod session;
mod transport;

pub use api::ApiClient;
pub use config::{DEFAULT_REFRESH_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, SessionConfig};
pub use session::SessionManager;
pub use transport::ReqwestTransport;
