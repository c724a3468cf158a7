//! Entity shapes and the entity contract.
//!
//! Every type queried through a [`Query`](crate::Query) root implements
//! [`Entity`], which exposes a static [`EntityShape`] describing its members:
//!
//! - plain **fields**, requested from the server as JSON members
//! - exactly one **identifier**, used to derive sub-resource URIs
//! - **queryable members**, never embedded in the response but resolved as
//!   separate, lazily fetched sub-resources
//!
//! Result types of projections only implement [`FromRecord`], the
//! construction function that rebuilds a typed value from a [`Record`].
//!
//! # Example
//!
//! ```rust
//! use rest_query::entity::{Entity, EntityShape, FromRecord, Member, Record};
//! use rest_query::resolve::DeserializationError;
//! use rest_query::Query;
//!
//! pub struct Order {
//!     pub number: u64,
//!     pub note: Option<String>,
//! }
//!
//! impl FromRecord for Order {
//!     fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
//!         Ok(Self {
//!             number: record.field("number")?,
//!             note: record.field("note")?,
//!         })
//!     }
//! }
//!
//! impl Entity for Order {
//!     const SHAPE: &'static EntityShape = &EntityShape::new(
//!         "Order",
//!         &[Member::identifier("number"), Member::field("note")],
//!     );
//! }
//!
//! pub struct Customer {
//!     pub email: String,
//!     pub orders: Query<Order>,
//! }
//!
//! impl FromRecord for Customer {
//!     fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
//!         Ok(Self {
//!             email: record.field("email")?,
//!             orders: record.query("orders")?,
//!         })
//!     }
//! }
//!
//! impl Entity for Customer {
//!     const SHAPE: &'static EntityShape = &EntityShape::new(
//!         "Customer",
//!         &[Member::identifier("email"), Member::queryable::<Order>("orders")],
//!     );
//! }
//!
//! assert_eq!(Customer::SHAPE.resource_name(), "customers");
//! ```

mod errors;
mod record;
mod shape;
mod validator;

pub use errors::EntityError;
pub use record::Record;
pub use shape::{camel_case, normalize_name, pluralize, shape_of, EntityShape, Member, MemberKind, ShapeFn};
pub use validator::EntityValidator;

use crate::resolve::DeserializationError;

/// Constructs a typed value from a field-keyed [`Record`].
///
/// This is the projector's final step: the record holds the requested
/// members keyed by their target member names, plus any deferred
/// sub-queries placed by the resource retriever.
pub trait FromRecord: Sized + Send + 'static {
    /// Builds `Self` from the record, taking the members it needs.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializationError`] if a member is missing or has an
    /// incompatible type.
    fn from_record(record: &mut Record) -> Result<Self, DeserializationError>;
}

/// A queryable entity shape.
///
/// The shape is static metadata; the structural checks that cannot be
/// expressed in the type system (identifier presence, member name
/// collisions, nested shape validity) are performed by [`EntityValidator`]
/// when a query over the entity is bound.
pub trait Entity: FromRecord {
    /// The entity's shape descriptor.
    const SHAPE: &'static EntityShape;
}
