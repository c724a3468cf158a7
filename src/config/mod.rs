//! Configuration of root queries.
//!
//! # Overview
//!
//! - [`QueryableBuilder`]: collects settings and builds a root [`Query`]
//! - [`RootUri`]: a validated service root URI
//!
//! The builder is the only place where the query engine is wired together:
//! it creates the transport, the resource retriever and the queryable
//! factory, and resolves the dependency cycle between the last two.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use rest_query::entity::{Entity, EntityShape, FromRecord, Member, Record};
//! use rest_query::resolve::DeserializationError;
//! use rest_query::{Query, QueryableBuilder};
//!
//! struct Product {
//!     id: u64,
//! }
//!
//! impl FromRecord for Product {
//!     fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
//!         Ok(Self { id: record.field("id")? })
//!     }
//! }
//!
//! impl Entity for Product {
//!     const SHAPE: &'static EntityShape =
//!         &EntityShape::new("Product", &[Member::identifier("id")]);
//! }
//!
//! let products: Query<Product> = QueryableBuilder::new()
//!     .root("https://example.com/api/v1")
//!     .user_agent_prefix("MyApp/1.0")
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(products.uri().unwrap(), "https://example.com/api/v1/products");
//! ```

mod newtypes;

pub use newtypes::RootUri;

use std::sync::Arc;
use std::time::Duration;

use crate::entity::Entity;
use crate::error::ConfigError;
use crate::query::{FilterEncoder, Query, QueryBinder, QueryProvider, ResourceBase};
use crate::resolve::{Deserializer, JsonDeserializer, QueryableFactory, ResourceRetriever};
use crate::transport::{HttpTransport, Transport};

/// Builder for root [`Query`] instances.
///
/// `root` is the only required setting. Building validates every setting
/// and fails before any transport call is attempted.
///
/// # Defaults
///
/// - `transport`: [`HttpTransport`], configured with `user_agent_prefix`
///   and `timeout`
/// - `deserializer`: [`JsonDeserializer`]
/// - `filter_encoder`: `None` (queries with filters fail to bind)
/// - `user_agent_prefix`: `None`
/// - `timeout`: `None`
///
/// `user_agent_prefix` and `timeout` only apply to the default transport.
#[derive(Clone, Debug, Default)]
pub struct QueryableBuilder {
    root: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    deserializer: Option<Arc<dyn Deserializer>>,
    filter_encoder: Option<Arc<dyn FilterEncoder>>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
}

// Verify QueryableBuilder is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<QueryableBuilder>();
};

impl QueryableBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service root URI (required).
    #[must_use]
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Sets the transport.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Sets a transport shared with other owners.
    #[must_use]
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the response deserializer.
    #[must_use]
    pub fn deserializer(mut self, deserializer: impl Deserializer + 'static) -> Self {
        self.deserializer = Some(Arc::new(deserializer));
        self
    }

    /// Sets the encoder for filter parameters.
    #[must_use]
    pub fn filter_encoder(mut self, encoder: impl FilterEncoder + 'static) -> Self {
        self.filter_encoder = Some(Arc::new(encoder));
        self
    }

    /// Sets the user agent prefix of the default transport.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the request timeout of the default transport.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds a root query over the full collection of `T`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingRequiredField`] if `root` is not set
    /// - [`ConfigError::InvalidRootUri`] if `root` is not an absolute URI
    /// - [`ConfigError::TransportInit`] if the default transport cannot be
    ///   created
    pub fn build<T: Entity>(&self) -> Result<Query<T>, ConfigError> {
        let root = self
            .root
            .as_deref()
            .ok_or(ConfigError::MissingRequiredField { field: "root" })?;
        let root = RootUri::new(root)?;

        let transport: Arc<dyn Transport> = match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(self.default_transport()?),
        };
        let deserializer: Arc<dyn Deserializer> = match &self.deserializer {
            Some(deserializer) => Arc::clone(deserializer),
            None => Arc::new(JsonDeserializer),
        };
        let binder = QueryBinder::default();

        // Resolve circular dependency: the factory closes over the
        // retriever and is bound into it afterwards.
        let retriever = Arc::new(ResourceRetriever::new(transport, deserializer));
        let factory = QueryableFactory::new(&retriever, binder)
            .with_filter_encoder(self.filter_encoder.clone());
        retriever.bind_factory(factory)?;

        let provider = QueryProvider::new(retriever, binder, ResourceBase::Root(root))
            .with_filter_encoder(self.filter_encoder.clone());

        tracing::debug!("Built root query over {}", T::SHAPE.name());

        Ok(Query::new(Arc::new(provider)))
    }

    fn default_transport(&self) -> Result<HttpTransport, ConfigError> {
        let mut builder = HttpTransport::builder();
        if let Some(prefix) = &self.user_agent_prefix {
            builder = builder.user_agent_prefix(prefix.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|e| ConfigError::TransportInit {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityShape, FromRecord, Member, Record};
    use crate::resolve::DeserializationError;
    use crate::transport::TransportError;
    use async_trait::async_trait;

    struct Item;

    impl FromRecord for Item {
        fn from_record(_record: &mut Record) -> Result<Self, DeserializationError> {
            Ok(Self)
        }
    }

    impl Entity for Item {
        const SHAPE: &'static EntityShape =
            &EntityShape::new("Item", &[Member::identifier("id"), Member::field("name")]);
    }

    #[derive(Debug)]
    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn get(&self, _uri: &str) -> Result<Vec<u8>, TransportError> {
            Err(TransportError::Custom("unreachable".to_string()))
        }
    }

    #[test]
    fn test_builder_requires_root() {
        let result = QueryableBuilder::new().transport(FailingTransport).build::<Item>();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "root" })
        ));
    }

    #[test]
    fn test_builder_rejects_invalid_root() {
        let result = QueryableBuilder::new().root("example.com").build::<Item>();

        assert!(matches!(result, Err(ConfigError::InvalidRootUri { .. })));
    }

    #[test]
    fn test_builder_wires_factory_into_retriever() {
        let query = QueryableBuilder::new()
            .root("http://example.com/api/v1")
            .transport(FailingTransport)
            .build::<Item>()
            .unwrap();

        assert!(query.provider().retriever().is_bound());
        assert_eq!(
            query.provider().base(),
            &ResourceBase::Root(RootUri::new("http://example.com/api/v1/").unwrap())
        );
        assert_eq!(query.uri().unwrap(), "http://example.com/api/v1/items");
    }

    #[test]
    fn test_builder_is_reusable() {
        let builder = QueryableBuilder::new()
            .root("http://example.com/")
            .user_agent_prefix("MyApp/1.0")
            .timeout(Duration::from_secs(5));

        let first = builder.build::<Item>().unwrap();
        let second = builder.build::<Item>().unwrap();

        assert_eq!(first, second);
        assert!(!Arc::ptr_eq(first.provider(), second.provider()));
    }

    #[test]
    fn test_builder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryableBuilder>();
    }
}
