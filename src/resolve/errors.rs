//! Errors raised while turning response bodies into result objects.

use thiserror::Error;

/// The response payload does not match the expected shape.
#[derive(Debug, Error)]
pub enum DeserializationError {
    /// The body is not valid JSON.
    #[error("Response body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The body is valid JSON but not an array.
    #[error("Expected a JSON array of '{shape}' records")]
    NotASequence {
        /// The expected element shape.
        shape: String,
    },

    /// An array element is not a JSON object.
    #[error("Element {index} of the response is not a JSON object")]
    NotAnObject {
        /// Position of the offending element.
        index: usize,
    },

    /// A member value cannot be converted to its declared type.
    #[error("Invalid value for member '{member}': {source}")]
    InvalidField {
        /// The member name.
        member: String,
        /// The underlying conversion error.
        #[source]
        source: serde_json::Error,
    },

    /// A record needed for sub-resource navigation has no usable
    /// identifier value.
    #[error("Record {index} of '{shape}' has no usable identifier value")]
    MissingIdentifier {
        /// The shape of the record.
        shape: String,
        /// Position of the record in the response.
        index: usize,
    },

    /// A queryable member holds no deferred sub-query.
    #[error("Member '{member}' holds no sub-query")]
    MissingQuery {
        /// The member name.
        member: String,
    },

    /// A deferred sub-query was requested as a different entity type.
    #[error("Member '{member}' is a query over '{actual}', not '{expected}'")]
    ShapeMismatch {
        /// The member name.
        member: String,
        /// The requested entity shape.
        expected: String,
        /// The shape the sub-query was created for.
        actual: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_wraps_serde_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: DeserializationError = source.into();
        assert!(error.to_string().starts_with("Response body is not valid JSON"));
    }

    #[test]
    fn test_shape_mismatch_message() {
        let error = DeserializationError::ShapeMismatch {
            member: "orders".to_string(),
            expected: "Order".to_string(),
            actual: "Customer".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Member 'orders' is a query over 'Customer', not 'Order'"
        );
    }
}
