//! Request descriptors and raw responses exchanged with the HTTP transport.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::Serialize;

use crate::error::{Error, InvalidInputError};

/// Header map keyed by lowercase header name.
pub type Headers = BTreeMap<String, String>;

/// Name of the header carrying the bearer token.
pub const AUTHORIZATION: &str = "authorization";

/// Name of the content type header.
pub const CONTENT_TYPE: &str = "content-type";

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(InvalidInputError::Method {
                value: s.to_string(),
            }
            .into()),
        }
    }
}

/// What the caller expects back in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    /// A JSON document.
    #[default]
    Json,
    /// No meaningful body.
    Empty,
}

/// A fully formed, unauthenticated API request.
///
/// Descriptors are built once and never mutated by the session layer;
/// [`RequestDescriptor::authorized`] returns a copy carrying the bearer token.
/// The body is forwarded as opaque bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    headers: Headers,
    body: Option<Bytes>,
    expects: ResponseKind,
}

impl RequestDescriptor {
    /// Create a request for a path relative to the API base URL.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
            expects: ResponseKind::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Set a header. Names are case-insensitive and stored lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::Header`] if the name is not an HTTP token
    /// or the value contains control characters.
    pub fn with_header(
        self,
        name: impl AsRef<str>,
        value: impl Into<String>,
    ) -> Result<Self, Error> {
        let name = name.as_ref();
        let value = value.into();
        validate_header(name, &value)?;
        Ok(self.set_header(name, value))
    }

    fn set_header(mut self, name: &str, value: String) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value);
        self
    }

    /// Attach raw body bytes.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body and set the content type.
    pub fn with_json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, Error> {
        let body = serde_json::to_vec(value).map_err(Error::Encode)?;
        Ok(self
            .set_header(CONTENT_TYPE, "application/json".to_string())
            .with_body(body))
    }

    /// Set the response-type marker.
    pub fn expecting(mut self, expects: ResponseKind) -> Self {
        self.expects = expects;
        self
    }

    /// Returns a copy with `Authorization: Bearer <token>` set.
    ///
    /// An empty token still produces the header; the server rejects it and
    /// the usual 401 recovery applies.
    pub fn authorized(&self, token: &str) -> Self {
        self.clone()
            .set_header(AUTHORIZATION, format!("Bearer {}", token))
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn expects(&self) -> ResponseKind {
        self.expects
    }
}

fn validate_header(name: &str, value: &str) -> Result<(), InvalidInputError> {
    let is_token = |b: u8| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b);
    if name.is_empty() || !name.bytes().all(is_token) {
        return Err(InvalidInputError::Header {
            name: name.to_string(),
            reason: "name must be a non-empty HTTP token".to_string(),
        });
    }
    if value.bytes().any(|b| (b < 0x20 && b != b'\t') || b == 0x7f) {
        return Err(InvalidInputError::Header {
            name: name.to_string(),
            reason: "value contains control characters".to_string(),
        });
    }
    Ok(())
}

// Authorization values never reach Debug output
impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k == AUTHORIZATION {
                    (k.as_str(), "[REDACTED]")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .field("expects", &self.expects)
            .finish()
    }
}

/// A raw response as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for 401 Unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorized_copies_without_mutating_original() {
        let original = RequestDescriptor::get("/budgets");
        let authed = original.authorized("tok");

        assert_eq!(original.header("Authorization"), None);
        assert_eq!(authed.header("Authorization"), Some("Bearer tok"));
        assert_eq!(authed.path(), "/budgets");
    }

    #[test]
    fn authorized_with_empty_token_still_sets_header() {
        let authed = RequestDescriptor::get("/budgets").authorized("");
        assert_eq!(authed.header(AUTHORIZATION), Some("Bearer "));
    }

    #[test]
    fn authorized_replaces_previous_token() {
        let first = RequestDescriptor::get("/budgets").authorized("old");
        let second = first.authorized("new");
        assert_eq!(second.header(AUTHORIZATION), Some("Bearer new"));
    }

    #[test]
    fn with_json_sets_body_and_content_type() {
        let req = RequestDescriptor::post("/categories")
            .with_json(&serde_json::json!({"name": "Groceries"}))
            .unwrap();
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(
            req.body().map(|b| b.as_ref()),
            Some(br#"{"name":"Groceries"}"#.as_ref())
        );
    }

    #[test]
    fn with_header_lowercases_name() {
        let req = RequestDescriptor::get("/budgets")
            .with_header("X-Request-Id", "abc-123")
            .unwrap();
        assert_eq!(req.header("x-request-id"), Some("abc-123"));
    }

    #[test]
    fn with_header_rejects_invalid_name() {
        let err = RequestDescriptor::get("/budgets")
            .with_header("X Request", "abc")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInputError::Header { ref name, .. }) if name == "X Request"
        ));
        assert!(RequestDescriptor::get("/").with_header("", "abc").is_err());
    }

    #[test]
    fn with_header_rejects_control_characters_in_value() {
        let err = RequestDescriptor::get("/budgets")
            .with_header("x-note", "line\r\nInjected: yes")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInputError::Header { .. })
        ));
    }

    #[test]
    fn debug_redacts_authorization() {
        let req = RequestDescriptor::get("/budgets").authorized("secret-token");
        let debug = format!("{:?}", req);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn method_parsing() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
        assert!("TRACE".parse::<Method>().is_err());
    }

    #[test]
    fn response_status_helpers() {
        assert!(ApiResponse::new(204, Bytes::new()).is_success());
        assert!(ApiResponse::new(401, Bytes::new()).is_unauthorized());
        assert!(!ApiResponse::new(500, Bytes::new()).is_success());
    }
}
