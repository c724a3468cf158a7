//! Errors raised when a projection or filter chain cannot be bound.

use thiserror::Error;

/// The query cannot be bound to its entity shape.
///
/// Raised before any transport call, during rendering or execution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A projection or filter refers to a member that does not exist at
    /// that point of the chain.
    #[error("Unknown member '{member}' in query over '{shape}'")]
    UnknownMember {
        /// The root shape of the query.
        shape: String,
        /// The unknown member name.
        member: String,
    },

    /// Two member accesses of one projection share a target name.
    #[error("Projection declares target '{target}' more than once")]
    DuplicateTarget {
        /// The repeated target name.
        target: String,
    },

    /// A projection selects no members.
    #[error("Projection must select at least one member")]
    EmptyProjection,

    /// A filter refers to a queryable member.
    #[error("Member '{member}' is a queryable member and cannot be filtered")]
    NotFilterable {
        /// The queryable member name.
        member: String,
    },

    /// The query contains filters but no filter encoder is configured.
    #[error("Filter on '{member}' cannot be encoded: no filter encoder is configured")]
    UnsupportedFilter {
        /// The first filtered member.
        member: String,
    },
}
