//! Shared entities and transports for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rest_query::entity::{Entity, EntityShape, FromRecord, Member, Record};
use rest_query::resolve::DeserializationError;
use rest_query::transport::{HttpResponseError, Transport, TransportError};
use rest_query::{Filter, FilterEncoder, Query, QueryableBuilder};

pub const ROOT: &str = "http://example.com/api/v1/";

pub const FIXTURE: &str = r#"[{"name":"Test1"},{"name":"Test2"}]"#;

pub const IDENTIFIED_FIXTURE: &str =
    r#"[{"uniqueIdentifier":"Test1","name":"Test1"},{"uniqueIdentifier":"Test2","name":"Test2"}]"#;

// ============================================================================
// Entities
// ============================================================================

/// An entity whose unique identifier is its name.
#[derive(Debug, PartialEq)]
pub struct EntityWithSimpleMembers {
    pub name: String,
    pub number: Option<i64>,
}

impl FromRecord for EntityWithSimpleMembers {
    fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
        Ok(Self {
            name: record.field("name")?,
            number: record.field("number")?,
        })
    }
}

impl Entity for EntityWithSimpleMembers {
    const SHAPE: &'static EntityShape = &EntityShape::new(
        "EntityWithSimpleMembers",
        &[
            Member::derived_identifier("unique_identifier", "name"),
            Member::field("name"),
            Member::field("number"),
        ],
    )
    .with_plural("EntityWithSimpleMembers");
}

/// An entity with a nested, separately fetched collection.
#[derive(Debug, PartialEq)]
pub struct EntityWithQueryableMember {
    pub unique_identifier: String,
    pub name: String,
    pub sub_entity: Query<EntityWithSimpleMembers>,
}

impl FromRecord for EntityWithQueryableMember {
    fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
        Ok(Self {
            unique_identifier: record.field("unique_identifier")?,
            name: record.field("name")?,
            sub_entity: record.query("sub_entity")?,
        })
    }
}

impl Entity for EntityWithQueryableMember {
    const SHAPE: &'static EntityShape = &EntityShape::new(
        "EntityWithQueryableMember",
        &[
            Member::derived_identifier("unique_identifier", "name"),
            Member::field("name"),
            Member::queryable::<EntityWithSimpleMembers>("sub_entity"),
        ],
    );
}

/// Projection result keeping identifier and name.
#[derive(Debug, PartialEq)]
pub struct IdentifierAndName {
    pub unique_identifier: String,
    pub name: String,
}

impl FromRecord for IdentifierAndName {
    fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
        Ok(Self {
            unique_identifier: record.field("unique_identifier")?,
            name: record.field("name")?,
        })
    }
}

/// Projection result keeping a single renamed member.
#[derive(Debug, PartialEq)]
pub struct Title {
    pub title: String,
}

impl FromRecord for Title {
    fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
        Ok(Self {
            title: record.field("title")?,
        })
    }
}

/// Projection result keeping the nested query only.
#[derive(Debug)]
pub struct SubEntityOnly {
    pub sub_entity: Query<EntityWithSimpleMembers>,
}

impl FromRecord for SubEntityOnly {
    fn from_record(record: &mut Record) -> Result<Self, DeserializationError> {
        Ok(Self {
            sub_entity: record.query("sub_entity")?,
        })
    }
}

/// An entity without a unique identifier.
#[derive(Debug)]
pub struct EntityWithoutIdentifier;

impl FromRecord for EntityWithoutIdentifier {
    fn from_record(_record: &mut Record) -> Result<Self, DeserializationError> {
        Ok(Self)
    }
}

impl Entity for EntityWithoutIdentifier {
    const SHAPE: &'static EntityShape =
        &EntityShape::new("EntityWithoutIdentifier", &[Member::field("name")]);
}

/// An entity whose members collide on the wire.
#[derive(Debug)]
pub struct EntityWithCollidingMembers;

impl FromRecord for EntityWithCollidingMembers {
    fn from_record(_record: &mut Record) -> Result<Self, DeserializationError> {
        Ok(Self)
    }
}

impl Entity for EntityWithCollidingMembers {
    const SHAPE: &'static EntityShape = &EntityShape::new(
        "EntityWithCollidingMembers",
        &[
            Member::identifier("id"),
            Member::field("user_name"),
            Member::field("username"),
        ],
    );
}

/// A valid entity whose nested collection is malformed.
#[derive(Debug)]
pub struct EntityWithMalformedChild;

impl FromRecord for EntityWithMalformedChild {
    fn from_record(_record: &mut Record) -> Result<Self, DeserializationError> {
        Ok(Self)
    }
}

impl Entity for EntityWithMalformedChild {
    const SHAPE: &'static EntityShape = &EntityShape::new(
        "EntityWithMalformedChild",
        &[
            Member::identifier("id"),
            Member::queryable::<EntityWithoutIdentifier>("children"),
        ],
    );
}

// ============================================================================
// Transports
// ============================================================================

/// In-memory transport serving canned bodies and recording every call.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    responses: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `uri`.
    pub fn with_response(self, uri: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(uri.into(), body.into());
        self
    }

    /// Returns the requested URIs in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn get(&self, uri: &str) -> Result<Vec<u8>, TransportError> {
        self.calls.lock().unwrap().push(uri.to_string());

        self.responses
            .lock()
            .unwrap()
            .get(uri)
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| {
                TransportError::Response(HttpResponseError {
                    code: 404,
                    message: format!("No response for {uri}"),
                    error_reference: None,
                })
            })
    }
}

/// Encodes filters as `member[op]=value`.
#[derive(Debug)]
pub struct BracketEncoder;

impl FilterEncoder for BracketEncoder {
    fn encode(&self, filters: &[Filter]) -> Vec<(String, String)> {
        filters
            .iter()
            .map(|f| {
                let value = f
                    .value()
                    .as_str()
                    .map_or_else(|| f.value().to_string(), String::from);
                (format!("{}[{}]", f.member(), f.op().as_str()), value)
            })
            .collect()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Builds a root query over `T` served by `transport`.
pub fn root_query<T: Entity>(transport: &Arc<RecordingTransport>) -> Query<T> {
    QueryableBuilder::new()
        .root(ROOT)
        .shared_transport(transport.clone())
        .build::<T>()
        .unwrap()
}
