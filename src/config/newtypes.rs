//! Validated newtype wrappers for configuration values.
//!
//! Invalid values are rejected on construction with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated service root URI.
///
/// The root must be absolute, with a scheme and a host, and carry no query
/// string or fragment. A trailing `/` is appended when missing, so resource
/// paths are formed by plain concatenation.
///
/// # Serialization
///
/// `RootUri` serializes to and deserializes from its normalized string:
///
/// ```rust
/// use rest_query::RootUri;
///
/// let root = RootUri::new("https://example.com/api/v1").unwrap();
/// let json = serde_json::to_string(&root).unwrap();
/// assert_eq!(json, r#""https://example.com/api/v1/""#);
/// ```
///
/// # Example
///
/// ```rust
/// use rest_query::RootUri;
///
/// let root = RootUri::new("http://localhost:3000/api/v1/").unwrap();
/// assert_eq!(root.scheme(), "http");
/// assert_eq!(root.host_name(), "localhost");
/// assert_eq!(root.as_ref(), "http://localhost:3000/api/v1/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootUri {
    uri: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl RootUri {
    /// Creates a new validated root URI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRootUri`] if the URI has no scheme or
    /// host, or carries a query string or fragment.
    pub fn new(uri: impl Into<String>) -> Result<Self, ConfigError> {
        let uri = uri.into();
        let mut uri = uri.trim().to_string();
        let invalid = |uri: &str| ConfigError::InvalidRootUri {
            uri: uri.to_string(),
        };

        let scheme_end = uri.find("://").ok_or_else(|| invalid(&uri))?;

        let scheme = &uri[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid(&uri));
        }

        if uri.contains(['?', '#']) {
            return Err(invalid(&uri));
        }

        let host_start = scheme_end + 3;
        let remainder = &uri[host_start..];
        let host_end = remainder
            .find([':', '/'])
            .map_or(uri.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(invalid(&uri));
        }

        if !uri.ends_with('/') {
            uri.push('/');
        }

        Ok(Self {
            uri,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URI scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.uri[..self.scheme_end]
    }

    /// Returns the host name portion of the URI.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.uri[self.host_start..self.host_end]
    }
}

impl AsRef<str> for RootUri {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for RootUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl Serialize for RootUri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.uri)
    }
}

impl<'de> Deserialize<'de> for RootUri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
