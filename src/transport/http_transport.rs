//! HTTP transport built on `reqwest`.
//!
//! This module provides the [`HttpTransport`] type, the default
//! [`Transport`] used by [`QueryableBuilder`](crate::QueryableBuilder).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::transport::{HttpResponseError, Transport, TransportError};

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP transport for fetching REST resources.
///
/// The transport handles:
/// - Default headers including User-Agent and `Accept: application/json`
/// - An optional per-request timeout
/// - Mapping non-2xx responses to [`TransportError::Response`]
///
/// # Thread Safety
///
/// `HttpTransport` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust
/// use rest_query::transport::HttpTransport;
///
/// let transport = HttpTransport::new().unwrap();
/// assert_eq!(
///     transport.default_headers().get("Accept"),
///     Some(&"application/json".to_string())
/// );
/// ```
#[derive(Clone, Debug)]
pub struct HttpTransport {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpTransport>();
};

impl HttpTransport {
    /// Creates a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the underlying reqwest client
    /// cannot be created (e.g., TLS initialization failure).
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    /// Creates a builder for customizing the transport.
    #[must_use]
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Returns the default headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    fn user_agent(prefix: Option<&str>) -> String {
        let prefix = prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        format!("{prefix}rest-query v{SDK_VERSION} | Rust {rust_version}")
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, uri: &str) -> Result<Vec<u8>, TransportError> {
        tracing::debug!("GET {}", uri);

        let mut req_builder = self.client.get(uri);
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let request_id = res
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = res.bytes().await?;

        if !(200..300).contains(&code) {
            tracing::warn!("GET {} failed with status {}", uri, code);
            return Err(TransportError::Response(HttpResponseError {
                code,
                message: String::from_utf8_lossy(&body).into_owned(),
                error_reference: request_id,
            }));
        }

        Ok(body.to_vec())
    }
}

/// Builder for [`HttpTransport`].
///
/// # Defaults
///
/// - `user_agent_prefix`: `None`
/// - `timeout`: `None` (no timeout)
/// - extra headers: none
#[derive(Clone, Debug, Default)]
pub struct HttpTransportBuilder {
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    headers: HashMap<String, String>,
}

impl HttpTransportBuilder {
    /// Sets a prefix for the User-Agent header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets a timeout applied to each request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the reqwest client cannot be
    /// created.
    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let mut default_headers = HashMap::new();
        default_headers.insert(
            "User-Agent".to_string(),
            HttpTransport::user_agent(self.user_agent_prefix.as_deref()),
        );
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.extend(self.headers);

        let mut client_builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let client = client_builder.build()?;

        Ok(HttpTransport {
            client,
            default_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_user_agent_header_format() {
        let transport = HttpTransport::new().unwrap();

        let user_agent = transport.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("rest-query v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let transport = HttpTransport::builder()
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        let user_agent = transport.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("rest-query"));
    }

    #[test]
    fn test_extra_headers_are_merged() {
        let transport = HttpTransport::builder()
            .header("X-Tenant", "acme")
            .build()
            .unwrap();

        assert_eq!(
            transport.default_headers().get("X-Tenant"),
            Some(&"acme".to_string())
        );
        assert_eq!(
            transport.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpTransport>();
    }

    #[tokio::test]
    async fn test_get_returns_body_on_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/products"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"name":"a"}]"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let body = transport
            .get(&format!("{}/api/v1/products", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(body, br#"[{"name":"a"}]"#.to_vec());
    }

    #[tokio::test]
    async fn test_get_maps_error_status_to_response_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/products"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("X-Request-Id", "req-123")
                    .set_body_string(r#"{"error":"Not Found"}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let result = transport
            .get(&format!("{}/api/v1/products", mock_server.uri()))
            .await;

        match result {
            Err(TransportError::Response(error)) => {
                assert_eq!(error.code, 404);
                assert_eq!(error.message, r#"{"error":"Not Found"}"#);
                assert_eq!(error.error_reference, Some("req-123".to_string()));
            }
            other => panic!("Expected Response error, got: {other:?}"),
        }
    }
}
