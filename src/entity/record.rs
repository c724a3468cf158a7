//! Field-keyed intermediate records.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::entity::Entity;
use crate::query::Query;
use crate::resolve::{DeserializationError, SubQuery};

/// A projected record, keyed by target member names.
///
/// Records are produced by the resource retriever after the projector ran:
/// plain members hold JSON values, queryable members hold deferred
/// sub-queries. [`FromRecord`](crate::entity::FromRecord) implementations
/// take members out of the record to build typed values.
///
/// # Example
///
/// ```rust
/// use rest_query::entity::Record;
/// use serde_json::json;
///
/// let mut record = Record::from(json!({"name": "Test1"}).as_object().unwrap().clone());
///
/// let name: String = record.field("name").unwrap();
/// let missing: Option<u32> = record.field("number").unwrap();
///
/// assert_eq!(name, "Test1");
/// assert_eq!(missing, None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Record {
    values: Map<String, Value>,
    queries: HashMap<String, SubQuery>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a plain member value.
    pub fn insert_value(&mut self, member: impl Into<String>, value: Value) {
        self.values.insert(member.into(), value);
    }

    /// Sets a queryable member to a deferred sub-query.
    pub(crate) fn insert_query(&mut self, member: impl Into<String>, query: SubQuery) {
        self.queries.insert(member.into(), query);
    }

    /// Returns the raw value of a plain member, if present.
    #[must_use]
    pub fn value(&self, member: &str) -> Option<&Value> {
        self.values.get(member)
    }

    /// Returns the deferred sub-query of a queryable member, if present.
    #[must_use]
    pub fn sub_query(&self, member: &str) -> Option<&SubQuery> {
        self.queries.get(member)
    }

    /// Returns `true` if the record holds a value or sub-query for `member`.
    #[must_use]
    pub fn contains(&self, member: &str) -> bool {
        self.values.contains_key(member) || self.queries.contains_key(member)
    }

    /// Takes a plain member and deserializes it.
    ///
    /// Absent members read as JSON `null`, so `Option<V>` members tolerate
    /// fields the server omitted.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializationError::InvalidField`] if the value cannot be
    /// deserialized into `V`.
    pub fn field<V: DeserializeOwned>(&mut self, member: &str) -> Result<V, DeserializationError> {
        let value = self.values.remove(member).unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|source| DeserializationError::InvalidField {
            member: member.to_string(),
            source,
        })
    }

    /// Takes a queryable member as a typed deferred query.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializationError::MissingQuery`] if the member holds no
    /// sub-query, or [`DeserializationError::ShapeMismatch`] if the
    /// sub-query was created for a different entity shape.
    pub fn query<E: Entity>(&mut self, member: &str) -> Result<Query<E>, DeserializationError> {
        let sub_query =
            self.queries
                .remove(member)
                .ok_or_else(|| DeserializationError::MissingQuery {
                    member: member.to_string(),
                })?;
        sub_query.into_query::<E>(member)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(values: Map<String, Value>) -> Self {
        Self {
            values,
            queries: HashMap::new(),
        }
    }
}
