//! Core validated types.

mod api_url;
mod request;

pub use api_url::ApiUrl;
pub use request::{
    AUTHORIZATION, ApiResponse, CONTENT_TYPE, Headers, Method, RequestDescriptor, ResponseKind,
};
