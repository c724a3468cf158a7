//! Structural validation of entity shapes.

use std::collections::HashMap;

use crate::entity::{normalize_name, EntityError, EntityShape, MemberKind};

/// Validates entity shapes against the entity contract.
///
/// Checks that:
/// - the shape and its members have non-empty names
/// - exactly one member is the unique identifier
/// - a derived identifier refers to a plain field
/// - no two members share a name after normalization
/// - every queryable member's element shape validates, recursively
///
/// Shapes reachable more than once (including cycles) are validated once.
/// Distinct shapes sharing a type name are each validated.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntityValidator;

impl EntityValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates the shape and every shape reachable through its queryable
    /// members.
    ///
    /// # Errors
    ///
    /// Returns the first [`EntityError`] found.
    pub fn validate(&self, shape: &'static EntityShape) -> Result<(), EntityError> {
        let mut visited = Vec::new();
        Self::validate_recursive(shape, &mut visited)
    }

    fn validate_recursive(
        shape: &'static EntityShape,
        visited: &mut Vec<&'static EntityShape>,
    ) -> Result<(), EntityError> {
        if visited.iter().any(|seen| seen.same_as(shape)) {
            return Ok(());
        }
        visited.push(shape);

        Self::validate_flat(shape)?;

        for member in shape.queryable_members() {
            let Some(element) = member.element_shape() else {
                continue;
            };
            Self::validate_recursive(element, visited).map_err(|source| {
                EntityError::InvalidNestedShape {
                    shape: shape.name().to_string(),
                    member: member.name().to_string(),
                    source: Box::new(source),
                }
            })?;
        }

        Ok(())
    }

    /// Checks the shape's own members without descending into queryable
    /// members.
    fn validate_flat(shape: &EntityShape) -> Result<(), EntityError> {
        if shape.name().is_empty() || shape.members().iter().any(|m| m.name().is_empty()) {
            return Err(EntityError::EmptyName {
                shape: shape.name().to_string(),
            });
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        for member in shape.members() {
            if let Some(first) = seen.insert(normalize_name(member.name()), member.name()) {
                return Err(EntityError::MemberCollision {
                    shape: shape.name().to_string(),
                    first: first.to_string(),
                    second: member.name().to_string(),
                });
            }
        }

        let identifiers: Vec<_> = shape.members().iter().filter(|m| m.is_identifier()).collect();
        let identifier = match identifiers.as_slice() {
            [] => {
                return Err(EntityError::MissingIdentifier {
                    shape: shape.name().to_string(),
                })
            }
            [identifier] => identifier,
            _ => {
                return Err(EntityError::MultipleIdentifiers {
                    shape: shape.name().to_string(),
                    members: identifiers.iter().map(|m| m.name().to_string()).collect(),
                })
            }
        };

        if let MemberKind::Identifier {
            derived_from: Some(source),
        } = identifier.kind()
        {
            let is_field = shape
                .member(source)
                .is_some_and(|m| matches!(m.kind(), MemberKind::Field));
            if !is_field {
                return Err(EntityError::InvalidIdentifierSource {
                    shape: shape.name().to_string(),
                    member: source.to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Member;

    static VALID_CHILD: EntityShape =
        EntityShape::new("Child", &[Member::identifier("id"), Member::field("title")]);

    static NO_IDENTIFIER: EntityShape = EntityShape::new("Orphan", &[Member::field("title")]);

    static TWO_IDENTIFIERS: EntityShape = EntityShape::new(
        "Twins",
        &[Member::identifier("id"), Member::identifier("code")],
    );

    static COLLIDING: EntityShape = EntityShape::new(
        "Colliding",
        &[
            Member::identifier("unique_identifier"),
            Member::field("uniqueIdentifier"),
        ],
    );

    static BAD_DERIVATION: EntityShape = EntityShape::new(
        "BadDerivation",
        &[Member::derived_identifier("unique_identifier", "missing")],
    );

    static EMPTY_MEMBER: EntityShape =
        EntityShape::new("EmptyMember", &[Member::identifier("id"), Member::field("")]);

    fn valid_child() -> &'static EntityShape {
        &VALID_CHILD
    }

    fn no_identifier() -> &'static EntityShape {
        &NO_IDENTIFIER
    }

    fn cyclic() -> &'static EntityShape {
        &CYCLIC
    }

    static PARENT: EntityShape = EntityShape::new(
        "Parent",
        &[
            Member::derived_identifier("unique_identifier", "name"),
            Member::field("name"),
            Member::queryable_with("children", valid_child),
        ],
    );

    static BROKEN_PARENT: EntityShape = EntityShape::new(
        "BrokenParent",
        &[
            Member::identifier("id"),
            Member::queryable_with("orphans", no_identifier),
        ],
    );

    static CYCLIC: EntityShape = EntityShape::new(
        "Cyclic",
        &[Member::identifier("id"), Member::queryable_with("self_ref", cyclic)],
    );

    fn same_named_child() -> &'static EntityShape {
        &SAME_NAMED_CHILD
    }

    static SAME_NAMED_CHILD: EntityShape = EntityShape::new("Item", &[Member::field("title")]);

    static SAME_NAMED_PARENT: EntityShape = EntityShape::new(
        "Item",
        &[
            Member::identifier("id"),
            Member::queryable_with("children", same_named_child),
        ],
    );

    #[test]
    fn test_valid_shape_passes() {
        assert!(EntityValidator::new().validate(&PARENT).is_ok());
        assert!(EntityValidator::new().validate(&VALID_CHILD).is_ok());
    }

    #[test]
    fn test_missing_identifier_fails() {
        let result = EntityValidator::new().validate(&NO_IDENTIFIER);
        assert_eq!(
            result,
            Err(EntityError::MissingIdentifier {
                shape: "Orphan".to_string()
            })
        );
    }

    #[test]
    fn test_multiple_identifiers_fail() {
        let result = EntityValidator::new().validate(&TWO_IDENTIFIERS);
        assert!(matches!(
            result,
            Err(EntityError::MultipleIdentifiers { ref members, .. }) if members.len() == 2
        ));
    }

    #[test]
    fn test_member_collision_after_normalization_fails() {
        let result = EntityValidator::new().validate(&COLLIDING);
        assert!(matches!(result, Err(EntityError::MemberCollision { .. })));
    }

    #[test]
    fn test_identifier_derived_from_unknown_member_fails() {
        let result = EntityValidator::new().validate(&BAD_DERIVATION);
        assert!(matches!(
            result,
            Err(EntityError::InvalidIdentifierSource { ref member, .. }) if member == "missing"
        ));
    }

    #[test]
    fn test_empty_member_name_fails() {
        let result = EntityValidator::new().validate(&EMPTY_MEMBER);
        assert!(matches!(result, Err(EntityError::EmptyName { .. })));
    }

    #[test]
    fn test_invalid_nested_shape_fails() {
        let result = EntityValidator::new().validate(&BROKEN_PARENT);
        match result {
            Err(EntityError::InvalidNestedShape { member, source, .. }) => {
                assert_eq!(member, "orphans");
                assert!(matches!(*source, EntityError::MissingIdentifier { .. }));
            }
            other => panic!("Expected InvalidNestedShape, got: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_child_sharing_parent_name_fails() {
        let result = EntityValidator::new().validate(&SAME_NAMED_PARENT);
        match result {
            Err(EntityError::InvalidNestedShape { member, source, .. }) => {
                assert_eq!(member, "children");
                assert_eq!(
                    *source,
                    EntityError::MissingIdentifier {
                        shape: "Item".to_string()
                    }
                );
            }
            other => panic!("Expected InvalidNestedShape, got: {other:?}"),
        }
    }

    #[test]
    fn test_cyclic_shapes_terminate() {
        assert!(EntityValidator::new().validate(&CYCLIC).is_ok());
    }
}
