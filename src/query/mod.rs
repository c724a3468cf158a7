//! Deferred, composable queries over REST resources.
//!
//! A [`Query`] is an immutable value pairing a [`QueryProvider`] with a
//! query syntax tree. Chaining [`Query::select`] or [`Query::filter`]
//! returns a new query and leaves the receiver untouched. Nothing happens
//! until the query is rendered with [`Query::uri`] (pure, no I/O) or
//! executed with [`Query::execute`] (exactly one transport call).
//!
//! # Overview
//!
//! - [`QueryExpr`], [`Projection`], [`Filter`]: the query syntax tree
//! - [`QueryBinder`]: resolves a tree into [`ProjectedFields`]
//! - [`build_uri`]: renders the canonical [`ResourceUri`]
//! - [`QueryProvider`]: binds, renders and executes
//! - [`QueryResult`]: a rendered URI with its materialized objects
//!
//! # Example
//!
//! ```rust,no_run
//! use rest_query::entity::{Entity, EntityShape, FromRecord, Member, Record};
//! use rest_query::query::{Projection, Query};
//! use rest_query::resolve::DeserializationError;
//! use rest_query::QueryableBuilder;
//!
//! struct Product {
//!     id: u64,
//!     title: String,
//! }
//!
//! impl FromRecord for Product {
//!     fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
//!         Ok(Self { id: record.field("id")?, title: record.field("title")? })
//!     }
//! }
//!
//! impl Entity for Product {
//!     const SHAPE: &'static EntityShape = &EntityShape::new(
//!         "Product",
//!         &[Member::identifier("id"), Member::field("title")],
//!     );
//! }
//!
//! struct Title {
//!     title: String,
//! }
//!
//! impl FromRecord for Title {
//!     fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
//!         Ok(Self { title: record.field("title")? })
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let products: Query<Product> = QueryableBuilder::new()
//!     .root("https://example.com/api/v1")
//!     .build()?;
//!
//! let titles = products.select::<Title>(Projection::of(["title"]));
//! assert_eq!(titles.uri()?, "https://example.com/api/v1/products?fields=title");
//!
//! for title in titles.execute().await? {
//!     println!("{}", title.title);
//! }
//! # Ok(())
//! # }
//! ```

mod ast;
mod binder;
mod errors;
mod provider;
mod result;
mod uri;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

pub use ast::{Filter, FilterOp, MemberAccess, Projection, QueryExpr};
pub use binder::{FieldDeclaration, ProjectedFields, Projector, QueryBinder};
pub use errors::BindError;
pub use provider::QueryProvider;
pub use result::QueryResult;
pub use uri::{build_uri, FilterEncoder, ResourceBase, ResourceUri};

use crate::entity::{Entity, EntityShape, FromRecord};
use crate::error::QueryError;

/// A deferred query producing values of type `T`.
///
/// Queries compare equal when both render to the same URI.
pub struct Query<T> {
    provider: Arc<QueryProvider>,
    expr: QueryExpr,
    _marker: PhantomData<fn() -> T>,
}

// Verify Query is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Query<()>>();
};

impl<E: Entity> Query<E> {
    /// Creates a query over the full collection of `E` under the provider's
    /// base.
    #[must_use]
    pub fn new(provider: Arc<QueryProvider>) -> Self {
        Self::from_parts(provider, QueryExpr::Source(E::SHAPE))
    }
}

impl<T> Query<T> {
    const fn from_parts(provider: Arc<QueryProvider>, expr: QueryExpr) -> Self {
        Self {
            provider,
            expr,
            _marker: PhantomData,
        }
    }

    /// Returns a new query projecting each result into `R`.
    #[must_use]
    pub fn select<R: FromRecord>(&self, projection: Projection) -> Query<R> {
        Query::from_parts(
            Arc::clone(&self.provider),
            self.expr.clone().select(projection),
        )
    }

    /// Returns a new query keeping only results matching `filter`.
    #[must_use]
    pub fn filter(&self, filter: Filter) -> Self {
        Self::from_parts(Arc::clone(&self.provider), self.expr.clone().filter(filter))
    }

    /// Returns the query syntax tree.
    #[must_use]
    pub const fn expr(&self) -> &QueryExpr {
        &self.expr
    }

    /// Returns the provider executing this query.
    #[must_use]
    pub const fn provider(&self) -> &Arc<QueryProvider> {
        &self.provider
    }

    /// Returns the root entity shape of the query.
    #[must_use]
    pub fn shape(&self) -> &'static EntityShape {
        self.expr.root_shape()
    }

    /// Binds the query without rendering or executing it.
    ///
    /// # Errors
    ///
    /// See [`QueryBinder::bind`].
    pub fn bind(&self) -> Result<ProjectedFields, QueryError> {
        self.provider.bind(&self.expr)
    }

    /// Renders the canonical URI of the query. Never performs I/O.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MalformedEntity`] or
    /// [`QueryError::MalformedQuery`] if the query cannot be bound.
    pub fn uri(&self) -> Result<String, QueryError> {
        self.provider.render(&self.expr).map(|uri| uri.to_string())
    }
}

impl<T: FromRecord> Query<T> {
    /// Executes the query.
    ///
    /// Every call performs a fresh retrieval; results are not cached.
    ///
    /// # Errors
    ///
    /// Returns binding errors before any transport call, then transport,
    /// deserialization or factory errors of the retrieval.
    pub async fn execute(&self) -> Result<Vec<T>, QueryError> {
        self.provider.execute::<T>(&self.expr).await
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self::from_parts(Arc::clone(&self.provider), self.expr.clone())
    }
}

impl<T> PartialEq for Query<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.uri(), other.uri()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("shape", &self.shape().name())
            .field("uri", &self.uri().ok())
            .finish_non_exhaustive()
    }
}
