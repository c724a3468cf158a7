//! Errors raised when an entity shape violates the entity contract.

use thiserror::Error;

/// The entity shape contract was violated.
///
/// Raised while binding a query, before any transport call. Always fatal to
/// the query being built and never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// The shape has an empty type name or an empty member name.
    #[error("Malformed entity: shape '{shape}' has an empty name or member name")]
    EmptyName {
        /// The offending shape.
        shape: String,
    },

    /// The shape declares no unique identifier.
    #[error("Malformed entity: '{shape}' does not declare a unique identifier")]
    MissingIdentifier {
        /// The offending shape.
        shape: String,
    },

    /// The shape declares more than one unique identifier.
    #[error("Malformed entity: '{shape}' declares multiple unique identifiers: {members:?}")]
    MultipleIdentifiers {
        /// The offending shape.
        shape: String,
        /// All members declared as identifier.
        members: Vec<String>,
    },

    /// A derived identifier names a member that is not a plain field.
    #[error("Malformed entity: identifier of '{shape}' is derived from '{member}', which is not a field")]
    InvalidIdentifierSource {
        /// The offending shape.
        shape: String,
        /// The referenced member.
        member: String,
    },

    /// Two members map to the same name after normalization.
    #[error("Malformed entity: members '{first}' and '{second}' of '{shape}' collide")]
    MemberCollision {
        /// The offending shape.
        shape: String,
        /// The first colliding member.
        first: String,
        /// The second colliding member.
        second: String,
    },

    /// The element shape of a queryable member is itself malformed.
    #[error("Malformed entity: queryable member '{member}' of '{shape}' is invalid: {source}")]
    InvalidNestedShape {
        /// The shape declaring the queryable member.
        shape: String,
        /// The queryable member.
        member: String,
        /// The nested validation failure.
        source: Box<EntityError>,
    },
}
