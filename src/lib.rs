//! # rest-query
//!
//! Composable, deferred queries over REST resources.
//!
//! ## Overview
//!
//! This crate provides:
//! - Immutable [`Query`] values built by chaining projections and filters
//! - Translation of a query into a field list and a canonical resource URI
//!   (`{root}/{resources}?fields=a,b`) without any I/O
//! - Execution through a pluggable [`Transport`](transport::Transport),
//!   one GET per execution
//! - Navigable sub-resources: queryable members of a result are replaced by
//!   deferred queries at `{resource}/{identifier}/`, fetched only when
//!   executed
//! - Validation of entity shapes before any request is made
//!
//! ## Quick Start
//!
//! ```rust
//! use rest_query::entity::{Entity, EntityShape, FromRecord, Member, Record};
//! use rest_query::resolve::DeserializationError;
//! use rest_query::{Projection, Query, QueryableBuilder};
//!
//! struct Product {
//!     id: u64,
//!     title: String,
//!     variants: Query<Variant>,
//! }
//!
//! impl FromRecord for Product {
//!     fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
//!         Ok(Self {
//!             id: record.field("id")?,
//!             title: record.field("title")?,
//!             variants: record.query("variants")?,
//!         })
//!     }
//! }
//!
//! impl Entity for Product {
//!     const SHAPE: &'static EntityShape = &EntityShape::new(
//!         "Product",
//!         &[
//!             Member::identifier("id"),
//!             Member::field("title"),
//!             Member::queryable::<Variant>("variants"),
//!         ],
//!     );
//! }
//!
//! struct Variant {
//!     sku: String,
//! }
//!
//! impl FromRecord for Variant {
//!     fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
//!         Ok(Self { sku: record.field("sku")? })
//!     }
//! }
//!
//! impl Entity for Variant {
//!     const SHAPE: &'static EntityShape =
//!         &EntityShape::new("Variant", &[Member::identifier("sku")]);
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
//! let products: Query<Product> = QueryableBuilder::new()
//!     .root("https://example.com/api/v1")
//!     .build()
//!     .unwrap();
//! assert_eq!(products.uri().unwrap(), "https://example.com/api/v1/products");
//!
//! let titles = products.select::<Title>(Projection::of(["title"]));
//! assert_eq!(titles.uri().unwrap(), "https://example.com/api/v1/products?fields=title");
//! ```
//!
//! ## Execution
//!
//! ```rust,ignore
//! for product in products.execute().await? {
//!     // No request has been made for the variants yet.
//!     println!("{} at {}", product.title, product.variants.uri()?);
//!
//!     for variant in product.variants.execute().await? {
//!         println!("  {}", variant.sku);
//!     }
//! }
//! ```
//!
//! ## Error Handling
//!
//! [`ConfigError`] is returned by [`QueryableBuilder::build`];
//! [`QueryError`] by rendering and execution. Neither is retried.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events for requests, binding and
//! sub-query creation. Install a subscriber to see them.

pub mod config;
pub mod entity;
pub mod error;
pub mod query;
pub mod resolve;
pub mod transport;

// Re-export public types at crate root for convenience
pub use config::{QueryableBuilder, RootUri};
pub use entity::{Entity, EntityShape, FromRecord, Member, Record};
pub use error::{ConfigError, QueryError};
pub use query::{Filter, FilterEncoder, FilterOp, Projection, Query, QueryResult};
