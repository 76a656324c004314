//! Core traits for the credential store and HTTP transport seams.

mod store;
mod transport;

pub use store::CredentialStore;
pub use transport::HttpTransport;
