//! The resource retriever.

use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};

use crate::entity::{camel_case, EntityShape, FromRecord, MemberKind, Record};
use crate::error::{ConfigError, QueryError};
use crate::query::{ProjectedFields, ResourceUri};
use crate::resolve::{DeserializationError, Deserializer, QueryableFactory};
use crate::transport::Transport;

/// Fetches a resource and turns its records into projected [`Record`]s.
///
/// Each call to [`retrieve`](Self::retrieve) issues exactly one GET. No
/// retry, no caching. Queryable members are never read from the response:
/// they receive a deferred query at
/// `{resource path}/{identifier}/`, created by the bound
/// [`QueryableFactory`].
///
/// # Two-phase initialization
///
/// The retriever is created without a factory. The factory is created
/// next, closing over the retriever, and is then bound exactly once with
/// [`bind_factory`](Self::bind_factory). Retrieving before that fails with
/// [`QueryError::FactoryUnbound`].
///
/// ```rust
/// use std::sync::Arc;
/// use rest_query::query::QueryBinder;
/// use rest_query::resolve::{JsonDeserializer, QueryableFactory, ResourceRetriever};
/// use rest_query::transport::HttpTransport;
///
/// let retriever = Arc::new(ResourceRetriever::new(
///     Arc::new(HttpTransport::new().unwrap()),
///     Arc::new(JsonDeserializer),
/// ));
/// assert!(!retriever.is_bound());
///
/// let factory = QueryableFactory::new(&retriever, QueryBinder::default());
/// retriever.bind_factory(factory.clone()).unwrap();
///
/// assert!(retriever.is_bound());
/// assert!(retriever.bind_factory(factory).is_err());
/// ```
#[derive(Debug)]
pub struct ResourceRetriever {
    transport: Arc<dyn Transport>,
    deserializer: Arc<dyn Deserializer>,
    factory: OnceLock<QueryableFactory>,
}

// Verify ResourceRetriever is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceRetriever>();
};

impl ResourceRetriever {
    /// Creates a retriever with no factory bound.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, deserializer: Arc<dyn Deserializer>) -> Self {
        Self {
            transport,
            deserializer,
            factory: OnceLock::new(),
        }
    }

    /// Binds the queryable factory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FactoryAlreadyBound`] if a factory was bound
    /// before.
    pub fn bind_factory(&self, factory: QueryableFactory) -> Result<(), ConfigError> {
        self.factory
            .set(factory)
            .map_err(|_| ConfigError::FactoryAlreadyBound)
    }

    /// Returns `true` once a factory is bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.factory.get().is_some()
    }

    /// Returns the transport used for retrieval.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Retrieves `uri` and projects each returned record.
    ///
    /// Records keep the server's order.
    ///
    /// # Errors
    ///
    /// - [`QueryError::FactoryUnbound`] if no factory is bound; no request
    ///   is made
    /// - [`QueryError::Transport`] if the request fails
    /// - [`QueryError::Deserialization`] if the body is not a sequence of
    ///   objects, or a record needed for sub-resource navigation has no
    ///   identifier value
    pub async fn retrieve(&self, uri: &ResourceUri, projected: &ProjectedFields) -> Result<Vec<Record>, QueryError> {
        let factory = self.factory.get().ok_or(QueryError::FactoryUnbound)?;
        let shape = projected.shape();

        let body = self.transport.get(&uri.to_string()).await?;
        let raw = self.deserializer.parse(&body, shape)?;

        tracing::debug!("Retrieved {} {} record(s) from {}", raw.len(), shape.name(), uri);

        raw.iter()
            .enumerate()
            .map(|(index, record)| {
                projected.projector().project(record, |element| {
                    let identifier = identifier_value(shape, record).ok_or_else(|| {
                        DeserializationError::MissingIdentifier {
                            shape: shape.name().to_string(),
                            index,
                        }
                    })?;
                    factory.create(element, derived_uri(uri.path(), &identifier))
                })
            })
            .collect()
    }

    /// Retrieves `uri` and builds a `T` from each projected record.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`retrieve`](Self::retrieve), and
    /// [`QueryError::Deserialization`] if a record cannot be converted.
    pub async fn retrieve_as<T: FromRecord>(
        &self,
        uri: &ResourceUri,
        projected: &ProjectedFields,
    ) -> Result<Vec<T>, QueryError> {
        let records = self.retrieve(uri, projected).await?;
        records
            .into_iter()
            .map(|mut record| T::from_record(&mut record).map_err(QueryError::from))
            .collect()
    }
}

/// Reads the identifier of a raw record as a path segment.
fn identifier_value(shape: &EntityShape, record: &Map<String, Value>) -> Option<String> {
    let identifier = shape.identifier()?;

    let value = record
        .get(&identifier.wire_name())
        .filter(|value| !value.is_null())
        .or_else(|| match identifier.kind() {
            MemberKind::Identifier {
                derived_from: Some(from),
            } => record.get(&camel_case(from)),
            _ => None,
        })?;

    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn derived_uri(path: &str, identifier: &str) -> String {
    format!(
        "{}/{}/",
        path.trim_end_matches('/'),
        urlencoding::encode(identifier)
    )
}
