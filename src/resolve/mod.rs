//! Resource retrieval and sub-resource resolution.
//!
//! - [`ResourceRetriever`]: one GET per call, then projection of each record
//! - [`QueryableFactory`]: creates the deferred queries placed in
//!   queryable members, bound to the retriever after construction
//! - [`Deserializer`] / [`JsonDeserializer`]: response body to raw records
//! - [`DeserializationError`]: payloads that do not match the expected shape

mod deserializer;
mod errors;
mod factory;
mod retriever;

pub use deserializer::{Deserializer, JsonDeserializer};
pub use errors::DeserializationError;
pub use factory::{QueryableFactory, SubQuery};
pub use retriever::ResourceRetriever;
