//! Canonical resource URIs.
//!
//! A query over a root entity renders as
//! `{root}{resource_name}[?fields=a,b][&filter params]`. A derived
//! sub-query reuses the URI of its parent record verbatim as its path.

use std::fmt;
use std::fmt::Debug;

use crate::config::RootUri;
use crate::entity::EntityShape;
use crate::query::{BindError, Filter, ProjectedFields};

/// Turns bound filters into query-string parameters.
///
/// Filters reach the encoder with members already resolved to their wire
/// names. Pairs are percent-encoded by the URI builder, so encoders return
/// them raw.
///
/// # Example
///
/// ```rust
/// use rest_query::query::{Filter, FilterEncoder};
///
/// #[derive(Debug)]
/// struct SuffixEncoder;
///
/// impl FilterEncoder for SuffixEncoder {
///     fn encode(&self, filters: &[Filter]) -> Vec<(String, String)> {
///         filters
///             .iter()
///             .map(|f| {
///                 let value = f.value().as_str().map_or_else(|| f.value().to_string(), String::from);
///                 (format!("{}__{}", f.member(), f.op().as_str()), value)
///             })
///             .collect()
///     }
/// }
///
/// let pairs = SuffixEncoder.encode(&[Filter::gt("createdAt", "2024")]);
/// assert_eq!(pairs, vec![("createdAt__gt".to_string(), "2024".to_string())]);
/// ```
pub trait FilterEncoder: Send + Sync + Debug {
    /// Encodes the filters as ordered `(name, value)` pairs.
    fn encode(&self, filters: &[Filter]) -> Vec<(String, String)>;
}

/// Where a query's resource path comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceBase {
    /// The query is rooted at the service root; its path is the root
    /// followed by the pluralized resource name.
    Root(RootUri),
    /// The query was derived from a parent record; its path is fixed.
    Resource(String),
}

/// A rendered resource URI, split into path and query string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceUri {
    path: String,
    query: Option<String>,
}

impl ResourceUri {
    /// Returns the URI without its query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query string, without the leading `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.path, query),
            None => f.write_str(&self.path),
        }
    }
}

/// Builds the canonical URI of a bound query.
///
/// The `fields=` parameter is omitted when the projection requests the
/// shape's full field set. Filter parameters follow it, in the encoder's
/// order.
///
/// # Errors
///
/// Returns [`BindError::UnsupportedFilter`] if the query carries filters
/// and no encoder is given.
pub fn build_uri(
    base: &ResourceBase,
    shape: &EntityShape,
    projected: &ProjectedFields,
    encoder: Option<&dyn FilterEncoder>,
) -> Result<ResourceUri, BindError> {
    let path = match base {
        ResourceBase::Root(root) => format!("{}{}", root.as_ref(), shape.resource_name()),
        ResourceBase::Resource(uri) => uri.clone(),
    };

    let mut params: Vec<String> = Vec::new();

    if !projected.is_complete() {
        params.push(format!("fields={}", projected.wire_fields().join(",")));
    }

    if let Some(first) = projected.filters().first() {
        let encoder = encoder.ok_or_else(|| BindError::UnsupportedFilter {
            member: first.member().to_string(),
        })?;
        params.extend(encoder.encode(projected.filters()).into_iter().map(|(name, value)| {
            format!("{}={}", urlencoding::encode(&name), urlencoding::encode(&value))
        }));
    }

    let query = if params.is_empty() {
        None
    } else {
        Some(params.join("&"))
    };

    Ok(ResourceUri { path, query })
}
