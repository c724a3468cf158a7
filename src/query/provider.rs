//! The query provider: binds, renders and executes query syntax trees.

use std::sync::Arc;

use crate::entity::FromRecord;
use crate::error::QueryError;
use crate::query::{build_uri, FilterEncoder, ProjectedFields, QueryBinder, QueryExpr, ResourceBase, ResourceUri};
use crate::resolve::ResourceRetriever;

/// Executes queries against one resource base.
///
/// A provider is shared by every [`Query`](crate::Query) derived from the
/// same root or sub-resource. Rendering never touches the transport;
/// execution performs exactly one retrieval per call.
#[derive(Debug)]
pub struct QueryProvider {
    retriever: Arc<ResourceRetriever>,
    binder: QueryBinder,
    base: ResourceBase,
    filter_encoder: Option<Arc<dyn FilterEncoder>>,
}

// Verify QueryProvider is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<QueryProvider>();
};

impl QueryProvider {
    /// Creates a provider for queries under `base`.
    #[must_use]
    pub const fn new(retriever: Arc<ResourceRetriever>, binder: QueryBinder, base: ResourceBase) -> Self {
        Self {
            retriever,
            binder,
            base,
            filter_encoder: None,
        }
    }

    /// Sets the encoder used for filter parameters.
    #[must_use]
    pub fn with_filter_encoder(mut self, encoder: Option<Arc<dyn FilterEncoder>>) -> Self {
        self.filter_encoder = encoder;
        self
    }

    /// Returns the resource base of this provider.
    #[must_use]
    pub const fn base(&self) -> &ResourceBase {
        &self.base
    }

    /// Returns the retriever used for execution.
    #[must_use]
    pub const fn retriever(&self) -> &Arc<ResourceRetriever> {
        &self.retriever
    }

    /// Returns the binder used for this provider's queries.
    #[must_use]
    pub const fn binder(&self) -> QueryBinder {
        self.binder
    }

    /// Returns the configured filter encoder, if any.
    #[must_use]
    pub fn filter_encoder(&self) -> Option<&Arc<dyn FilterEncoder>> {
        self.filter_encoder.as_ref()
    }

    /// Binds a query syntax tree.
    ///
    /// # Errors
    ///
    /// See [`QueryBinder::bind`].
    pub fn bind(&self, expr: &QueryExpr) -> Result<ProjectedFields, QueryError> {
        self.binder.bind(expr)
    }

    /// Renders the canonical URI of a query without executing it.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MalformedEntity`] or
    /// [`QueryError::MalformedQuery`] if the query cannot be bound.
    pub fn render(&self, expr: &QueryExpr) -> Result<ResourceUri, QueryError> {
        let projected = self.bind(expr)?;
        self.uri_for(&projected)
    }

    /// Executes a query and returns its results in server order.
    ///
    /// # Errors
    ///
    /// Returns binding errors before any transport call, then any
    /// transport, deserialization or factory error of the retrieval.
    pub async fn execute<T: FromRecord>(&self, expr: &QueryExpr) -> Result<Vec<T>, QueryError> {
        let projected = self.bind(expr)?;
        let uri = self.uri_for(&projected)?;
        self.retriever.retrieve_as::<T>(&uri, &projected).await
    }

    fn uri_for(&self, projected: &ProjectedFields) -> Result<ResourceUri, QueryError> {
        Ok(build_uri(
            &self.base,
            projected.shape(),
            projected,
            self.filter_encoder.as_deref(),
        )?)
    }
}
