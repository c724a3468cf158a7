//! Creation of deferred sub-queries for queryable members.

use std::sync::{Arc, Weak};

use crate::entity::{Entity, EntityShape};
use crate::error::QueryError;
use crate::query::{FilterEncoder, Query, QueryBinder, QueryExpr, QueryProvider, ResourceBase};
use crate::resolve::{DeserializationError, ResourceRetriever};

/// Creates deferred queries rooted at derived sub-resource URIs.
///
/// The factory closes over the [`ResourceRetriever`] that will execute the
/// queries it creates. It holds the retriever weakly: the retriever owns
/// the factory once it is bound.
#[derive(Clone, Debug)]
pub struct QueryableFactory {
    retriever: Weak<ResourceRetriever>,
    binder: QueryBinder,
    filter_encoder: Option<Arc<dyn FilterEncoder>>,
}

impl QueryableFactory {
    /// Creates a factory producing queries executed by `retriever`.
    #[must_use]
    pub fn new(retriever: &Arc<ResourceRetriever>, binder: QueryBinder) -> Self {
        Self {
            retriever: Arc::downgrade(retriever),
            binder,
            filter_encoder: None,
        }
    }

    /// Sets the filter encoder handed to created queries.
    #[must_use]
    pub fn with_filter_encoder(mut self, encoder: Option<Arc<dyn FilterEncoder>>) -> Self {
        self.filter_encoder = encoder;
        self
    }

    /// Creates a deferred query over `shape` at `uri`.
    ///
    /// No request is made until the returned query is executed.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::FactoryUnbound`] if the retriever the factory
    /// was created for no longer exists.
    pub fn create(&self, shape: &'static EntityShape, uri: String) -> Result<SubQuery, QueryError> {
        let retriever = self.retriever.upgrade().ok_or(QueryError::FactoryUnbound)?;

        tracing::debug!("Deferred query over {} at {}", shape.name(), uri);

        let provider = QueryProvider::new(retriever, self.binder, ResourceBase::Resource(uri))
            .with_filter_encoder(self.filter_encoder.clone());

        Ok(SubQuery {
            shape,
            provider: Arc::new(provider),
        })
    }
}

/// An untyped deferred query placed in a queryable member of a record.
///
/// [`Record::query`](crate::entity::Record::query) turns it into a typed
/// [`Query`].
#[derive(Clone, Debug)]
pub struct SubQuery {
    shape: &'static EntityShape,
    provider: Arc<QueryProvider>,
}

impl SubQuery {
    /// Returns the element shape of the sub-query.
    #[must_use]
    pub const fn shape(&self) -> &'static EntityShape {
        self.shape
    }

    /// Renders the URI of the unprojected sub-query.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the element shape is malformed.
    pub fn uri(&self) -> Result<String, QueryError> {
        self.provider
            .render(&QueryExpr::Source(self.shape))
            .map(|uri| uri.to_string())
    }

    pub(crate) fn into_query<E: Entity>(self, member: &str) -> Result<Query<E>, DeserializationError> {
        if !self.shape.same_as(E::SHAPE) {
            return Err(DeserializationError::ShapeMismatch {
                member: member.to_string(),
                expected: E::SHAPE.name().to_string(),
                actual: self.shape.name().to_string(),
            });
        }
        Ok(Query::new(self.provider))
    }
}
