//! Deserializer collaborator: response bytes to field-keyed records.

use std::fmt::Debug;

use serde_json::{Map, Value};

use crate::entity::EntityShape;
use crate::resolve::DeserializationError;

/// Parses a response body into raw, wire-keyed records.
///
/// The shape is the expected element shape of the sequence. It is passed
/// for diagnostics and for formats that need it; records are returned with
/// wire field names untouched.
pub trait Deserializer: Send + Sync + Debug {
    /// Parses `body` as a sequence of records.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializationError`] if the body is not a sequence of
    /// objects.
    fn parse(&self, body: &[u8], shape: &EntityShape) -> Result<Vec<Map<String, Value>>, DeserializationError>;
}

/// Parses JSON arrays of objects.
///
/// # Example
///
/// ```rust
/// use rest_query::entity::{EntityShape, Member};
/// use rest_query::resolve::{Deserializer, JsonDeserializer};
///
/// static SHAPE: EntityShape = EntityShape::new("Item", &[Member::identifier("name")]);
///
/// let records = JsonDeserializer.parse(br#"[{"name":"Test1"},{"name":"Test2"}]"#, &SHAPE).unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1]["name"], "Test2");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDeserializer;

impl Deserializer for JsonDeserializer {
    fn parse(&self, body: &[u8], shape: &EntityShape) -> Result<Vec<Map<String, Value>>, DeserializationError> {
        let value: Value = serde_json::from_slice(body)?;

        let Value::Array(elements) = value else {
            return Err(DeserializationError::NotASequence {
                shape: shape.name().to_string(),
            });
        };

        elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| match element {
                Value::Object(record) => Ok(record),
                _ => Err(DeserializationError::NotAnObject { index }),
            })
            .collect()
    }
}
