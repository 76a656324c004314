//! tally-core - Core types and traits for the tally API client.

pub mod credentials;
pub mod error;
pub mod store;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{Credentials, LoginCredentials};
pub use error::Error;
pub use store::MemoryCredentialStore;
pub use tokens::{AccessToken, RefreshToken};
pub use traits::{CredentialStore, HttpTransport};
pub use types::{ApiResponse, ApiUrl, Method, RequestDescriptor, ResponseKind};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
