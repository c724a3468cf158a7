//! Transport error types.
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses
//! - [`TransportError`]: Unified error type for all transport failures
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_query::transport::TransportError;
//!
//! match transport.get(uri).await {
//!     Ok(body) => println!("{} bytes", body.len()),
//!     Err(TransportError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(TransportError::Network(e)) => println!("Network error: {}", e),
//!     Err(TransportError::Custom(message)) => println!("Transport error: {}", message),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// # Example
///
/// ```rust
/// use rest_query::transport::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: r#"{"error":"Not found"}"#.to_string(),
///     error_reference: Some("abc-123".to_string()),
/// };
///
/// assert_eq!(error.to_string(), r#"HTTP 404: {"error":"Not found"}"#);
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The response body, decoded lossily as UTF-8.
    pub message: String,
    /// Reference ID for error reporting (from X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Unified error type for transport failures.
///
/// Surfaced unchanged to the caller through
/// [`QueryError::Transport`](crate::QueryError::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failure reported by a non-HTTP transport implementation.
    #[error("Transport error: {0}")]
    Custom(String),
}
