//! reqwest-backed HTTP transport.

use async_trait::async_trait;
use tracing::{debug, instrument, trace};

use tally_core::error::TransportError;
use tally_core::types::Headers;
use tally_core::{ApiResponse, ApiUrl, HttpTransport, Method, RequestDescriptor, Result};

use crate::config::SessionConfig;

/// HTTP transport resolving request paths against an API base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    api: ApiUrl,
    timeout_ms: u64,
}

impl ReqwestTransport {
    /// Create a transport with default settings.
    pub fn new(api: ApiUrl) -> Result<Self> {
        Self::with_config(api, &SessionConfig::default())
    }

    /// Create a transport using the timeout and user agent from `config`.
    pub fn with_config(api: ApiUrl, config: &SessionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Http {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api,
            timeout_ms: config.request_timeout.as_millis() as u64,
        })
    }

    /// Returns the API base URL this transport is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: self.timeout_ms,
            }
        } else if err.is_connect() {
            // hyper-util reports resolver failures as "dns error" in the source chain
            if format!("{err:?}").contains("dns error") {
                TransportError::Dns {
                    host: err
                        .url()
                        .and_then(|u| u.host_str())
                        .unwrap_or_default()
                        .to_string(),
                }
            } else {
                TransportError::Connection {
                    message: err.to_string(),
                }
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(
        skip(self, request),
        fields(api = %self.api, method = %request.method(), path = %request.path())
    )]
    async fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> std::result::Result<ApiResponse, TransportError> {
        let url = self.api.endpoint(request.path());
        debug!(%url, "HTTP request");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method()), &url);
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        trace!(status, body_len = body.len(), "HTTP response");

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_creation() {
        let api = ApiUrl::new("https://api.example.com").unwrap();
        let transport = ReqwestTransport::new(api.clone()).unwrap();
        assert_eq!(transport.api().as_str(), api.as_str());
    }

    #[test]
    fn method_mapping() {
        assert_eq!(to_reqwest_method(Method::Get), reqwest::Method::GET);
        assert_eq!(to_reqwest_method(Method::Delete), reqwest::Method::DELETE);
    }
}
