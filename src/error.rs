//! Error types for building and executing queries.
//!
//! Two error families exist:
//!
//! - [`ConfigError`]: raised by [`QueryableBuilder`](crate::QueryableBuilder)
//!   when required settings are missing or invalid. Always raised before any
//!   transport call is attempted.
//! - [`QueryError`]: raised while binding, rendering or executing a query.
//!   Wraps the entity, binding, transport and deserialization error kinds so
//!   callers can match on the failing stage.
//!
//! # Example
//!
//! ```rust
//! use rest_query::{ConfigError, QueryableBuilder};
//! # use rest_query::entity::{Entity, EntityShape, FromRecord, Member, Record};
//! # use rest_query::resolve::DeserializationError;
//! # struct Shop { name: String }
//! # impl FromRecord for Shop {
//! #     fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
//! #         Ok(Self { name: record.field("name")? })
//! #     }
//! # }
//! # impl Entity for Shop {
//! #     const SHAPE: &'static EntityShape = &EntityShape::new(
//! #         "Shop",
//! #         &[Member::identifier("name"), Member::field("name_copy")],
//! #     );
//! # }
//!
//! let result = QueryableBuilder::new().build::<Shop>();
//! assert!(matches!(result, Err(ConfigError::MissingRequiredField { field: "root" })));
//! ```

use thiserror::Error;

use crate::entity::EntityError;
use crate::query::BindError;
use crate::resolve::DeserializationError;
use crate::transport::TransportError;

/// Errors that can occur while configuring a root query.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is missing.
    #[error("Missing required field: '{field}'. This field must be set before building a query.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The root URI is invalid.
    #[error("Invalid root URI '{uri}'. Please provide an absolute URI with scheme and host (e.g., 'https://api.example.com/v1/').")]
    InvalidRootUri {
        /// The invalid URI that was provided.
        uri: String,
    },

    /// The default HTTP transport could not be created.
    #[error("Failed to initialize the default HTTP transport: {reason}")]
    TransportInit {
        /// Why initialization failed.
        reason: String,
    },

    /// The resource retriever was already wired to a queryable factory.
    #[error("Resource retriever is already bound to a queryable factory.")]
    FactoryAlreadyBound,
}

/// Errors that can occur while binding, rendering or executing a query.
///
/// Errors are local to the query that raised them. None of them are retried,
/// and a failed execution yields no partial results.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The entity shape violates the entity contract.
    #[error(transparent)]
    MalformedEntity(#[from] EntityError),

    /// The projection or filter chain cannot be bound to the entity shape.
    #[error(transparent)]
    MalformedQuery(#[from] BindError),

    /// The transport failed to fetch the resource.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response payload does not match the expected shape.
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    /// Retrieval was attempted before a queryable factory was injected.
    #[error("Resource retriever has no queryable factory bound. Bind one before retrieving resources.")]
    FactoryUnbound,
}
