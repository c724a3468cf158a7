//! Transport collaborator for fetching resources.
//!
//! The query engine never talks to the network directly. It calls a
//! [`Transport`], which maps an absolute URI to the raw response body.
//! [`HttpTransport`] is the default implementation, built on `reqwest`.
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_query::transport::{HttpTransport, Transport};
//!
//! let transport = HttpTransport::builder()
//!     .user_agent_prefix("MyApp/1.0")
//!     .build()?;
//!
//! let body = transport.get("https://api.example.com/v1/products").await?;
//! ```
//!
//! # Retry Behavior
//!
//! Transports issue exactly one request per call. Failed requests are
//! surfaced unchanged and never retried.

mod errors;
mod http_transport;

pub use errors::{HttpResponseError, TransportError};
pub use http_transport::{HttpTransport, HttpTransportBuilder, SDK_VERSION};

use std::fmt::Debug;

use async_trait::async_trait;

/// Fetches raw resource bodies.
///
/// Implementations must be `Send + Sync`; nested queries may be executed
/// concurrently by the caller against the same transport.
///
/// Dropping the returned future cancels the request.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Performs a GET request against an absolute URI and returns the body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the request fails or the server answers
    /// with a non-success status.
    async fn get(&self, uri: &str) -> Result<Vec<u8>, TransportError>;
}
