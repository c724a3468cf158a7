//! Integration tests for query rendering.
//!
//! Rendering must produce canonical URIs and never reach the transport.

mod common;

use std::sync::Arc;

use common::{
    root_query, EntityWithCollidingMembers, EntityWithMalformedChild, EntityWithQueryableMember,
    EntityWithSimpleMembers, EntityWithoutIdentifier, IdentifierAndName, RecordingTransport,
    SubEntityOnly, Title,
};
use rest_query::entity::EntityError;
use rest_query::query::BindError;
use rest_query::{Projection, QueryError};

// ============================================================================
// Canonical URIs
// ============================================================================

#[test]
fn test_root_query_renders_pluralized_resource() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithQueryableMember>(&transport);

    assert_eq!(
        query.uri().unwrap(),
        "http://example.com/api/v1/entitywithqueryablemembers"
    );
    assert!(transport.calls().is_empty());
}

#[test]
fn test_partial_projection_renders_fields_in_selection_order() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithQueryableMember>(&transport)
        .select::<IdentifierAndName>(Projection::of(["unique_identifier", "name"]));

    assert_eq!(
        query.uri().unwrap(),
        "http://example.com/api/v1/entitywithqueryablemembers?fields=uniqueIdentifier,name"
    );
    assert!(transport.calls().is_empty());
}

#[test]
fn test_full_projection_renders_without_query_string() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithSimpleMembers>(&transport)
        .select::<EntityWithSimpleMembers>(Projection::of(["number", "name"]));

    assert_eq!(
        query.uri().unwrap(),
        "http://example.com/api/v1/entitywithsimplemembers"
    );
}

#[test]
fn test_projection_of_plain_member_only() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithSimpleMembers>(&transport)
        .select::<Title>(Projection::new().member_as("name", "title"));

    assert_eq!(
        query.uri().unwrap(),
        "http://example.com/api/v1/entitywithsimplemembers?fields=name"
    );
}

#[test]
fn test_projection_of_queryable_member_requests_identifier_source() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithQueryableMember>(&transport)
        .select::<SubEntityOnly>(Projection::of(["sub_entity"]));

    // The identifier derives from `name`, which is the full field set.
    assert_eq!(
        query.uri().unwrap(),
        "http://example.com/api/v1/entitywithqueryablemembers"
    );
}

#[test]
fn test_rendering_is_idempotent() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithQueryableMember>(&transport)
        .select::<IdentifierAndName>(Projection::of(["unique_identifier", "name"]));

    assert_eq!(query.uri().unwrap(), query.uri().unwrap());
    assert!(transport.calls().is_empty());
}

#[test]
fn test_chaining_leaves_receiver_unchanged() {
    let transport = Arc::new(RecordingTransport::new());
    let root = root_query::<EntityWithQueryableMember>(&transport);
    let before = root.uri().unwrap();

    let _projected = root.select::<Title>(Projection::new().member_as("name", "title"));

    assert_eq!(root.uri().unwrap(), before);
}

#[test]
fn test_chained_selects_render_root_members() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithQueryableMember>(&transport)
        .select::<IdentifierAndName>(Projection::of(["unique_identifier", "name"]))
        .select::<Title>(Projection::new().member_as("unique_identifier", "title"));

    assert_eq!(
        query.uri().unwrap(),
        "http://example.com/api/v1/entitywithqueryablemembers?fields=uniqueIdentifier"
    );
}

#[test]
fn test_queries_with_same_uri_are_equal() {
    let transport = Arc::new(RecordingTransport::new());
    let a = root_query::<EntityWithSimpleMembers>(&transport);
    let b = root_query::<EntityWithSimpleMembers>(&transport);

    assert_eq!(a, b);
    assert_eq!(a.clone(), a);
}

// ============================================================================
// Binding Errors
// ============================================================================

#[test]
fn test_unknown_member_fails_rendering() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithSimpleMembers>(&transport)
        .select::<Title>(Projection::of(["title"]));

    assert!(matches!(
        query.uri(),
        Err(QueryError::MalformedQuery(BindError::UnknownMember { ref member, .. })) if member == "title"
    ));
}

#[test]
fn test_entity_without_identifier_is_malformed() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithoutIdentifier>(&transport);

    assert!(matches!(
        query.uri(),
        Err(QueryError::MalformedEntity(EntityError::MissingIdentifier { .. }))
    ));
}

#[test]
fn test_colliding_members_are_malformed() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithCollidingMembers>(&transport);

    assert!(matches!(
        query.uri(),
        Err(QueryError::MalformedEntity(EntityError::MemberCollision { .. }))
    ));
}

#[test]
fn test_malformed_nested_shape_is_malformed() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithMalformedChild>(&transport);

    match query.uri() {
        Err(QueryError::MalformedEntity(EntityError::InvalidNestedShape { member, source, .. })) => {
            assert_eq!(member, "children");
            assert!(matches!(*source, EntityError::MissingIdentifier { .. }));
        }
        other => panic!("Expected InvalidNestedShape, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_entity_fails_execution_before_transport_call() {
    let transport = Arc::new(RecordingTransport::new());
    let query = root_query::<EntityWithoutIdentifier>(&transport);

    let result = query.execute().await;

    assert!(matches!(result, Err(QueryError::MalformedEntity(_))));
    assert!(transport.calls().is_empty());
}
