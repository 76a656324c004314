//! HTTP transport trait.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::{ApiResponse, RequestDescriptor};

/// Performs a single request/response exchange.
///
/// A transport never retries and never inspects the status code: any response
/// the server produced, including 401 and 5xx, is returned as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &RequestDescriptor) -> Result<ApiResponse, TransportError>;
}
