//! Rendered URI paired with materialized results.

use std::fmt;

use crate::entity::FromRecord;
use crate::error::QueryError;
use crate::query::Query;

/// The canonical URI of a query together with the objects it produced.
///
/// Used to compare executions: two results are equal when both the URIs
/// and the objects are equal.
#[derive(Clone)]
pub struct QueryResult<T> {
    uri: String,
    objects: Vec<T>,
}

impl<T> QueryResult<T> {
    /// Creates a result from its parts.
    #[must_use]
    pub const fn new(uri: String, objects: Vec<T>) -> Self {
        Self { uri, objects }
    }

    /// Returns the rendered URI of the query.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the materialized objects.
    #[must_use]
    pub fn objects(&self) -> &[T] {
        &self.objects
    }

    /// Consumes the result and returns the objects.
    #[must_use]
    pub fn into_objects(self) -> Vec<T> {
        self.objects
    }
}

impl<T: FromRecord> QueryResult<T> {
    /// Renders and executes `query`.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Query::uri`] or [`Query::execute`].
    pub async fn from_query(query: &Query<T>) -> Result<Self, QueryError> {
        let uri = query.uri()?;
        let objects = query.execute().await?;
        Ok(Self::new(uri, objects))
    }
}

impl<T: PartialEq> PartialEq for QueryResult<T> {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.objects == other.objects
    }
}

impl<T: fmt::Debug> fmt::Debug for QueryResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResult")
            .field("uri", &self.uri)
            .field("objects", &self.objects)
            .finish()
    }
}
