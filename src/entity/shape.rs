//! Static shape descriptors for entities.
//!
//! Shapes are built in `const` context so an entity can declare its
//! members next to its type:
//!
//! ```rust
//! use rest_query::entity::{EntityShape, Member};
//!
//! const PERSON: EntityShape = EntityShape::new(
//!     "Person",
//!     &[Member::derived_identifier("unique_identifier", "name"), Member::field("name")],
//! );
//!
//! assert_eq!(PERSON.resource_name(), "persons");
//! assert_eq!(PERSON.with_plural("people").resource_name(), "people");
//! ```

use crate::entity::Entity;

/// Returns the shape of an entity type.
///
/// Used as a function pointer by [`Member::queryable`] so shapes can refer
/// to each other, including recursively.
#[must_use]
pub fn shape_of<E: Entity>() -> &'static EntityShape {
    E::SHAPE
}

/// Lazily resolved reference to another entity shape.
pub type ShapeFn = fn() -> &'static EntityShape;

/// The role a member plays in its entity shape.
#[derive(Clone, Copy, Debug)]
pub enum MemberKind {
    /// A plain data member, requested as a JSON field.
    Field,
    /// The unique identifier of the entity.
    Identifier {
        /// Member whose value stands in for the identifier when the wire
        /// record omits it.
        derived_from: Option<&'static str>,
    },
    /// A member resolved as a separate sub-resource.
    Queryable(ShapeFn),
}

/// A single member of an entity shape.
#[derive(Clone, Copy, Debug)]
pub struct Member {
    name: &'static str,
    kind: MemberKind,
}

impl Member {
    /// Declares a plain field.
    #[must_use]
    pub const fn field(name: &'static str) -> Self {
        Self {
            name,
            kind: MemberKind::Field,
        }
    }

    /// Declares the unique identifier, transmitted as its own field.
    #[must_use]
    pub const fn identifier(name: &'static str) -> Self {
        Self {
            name,
            kind: MemberKind::Identifier { derived_from: None },
        }
    }

    /// Declares a unique identifier computed from another field.
    ///
    /// A derived identifier is not part of the entity's wire field set,
    /// but can still be selected explicitly in a projection.
    #[must_use]
    pub const fn derived_identifier(name: &'static str, from: &'static str) -> Self {
        Self {
            name,
            kind: MemberKind::Identifier {
                derived_from: Some(from),
            },
        }
    }

    /// Declares a queryable member whose element shape is `E`.
    #[must_use]
    pub const fn queryable<E: Entity>(name: &'static str) -> Self {
        Self {
            name,
            kind: MemberKind::Queryable(shape_of::<E>),
        }
    }

    /// Declares a queryable member from an explicit shape function.
    #[must_use]
    pub const fn queryable_with(name: &'static str, shape: ShapeFn) -> Self {
        Self {
            name,
            kind: MemberKind::Queryable(shape),
        }
    }

    /// Returns the Rust-side member name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the member kind.
    #[must_use]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Returns the camelCase name used on the wire.
    #[must_use]
    pub fn wire_name(&self) -> String {
        camel_case(self.name)
    }

    /// Returns `true` if the member is resolved as a sub-resource.
    #[must_use]
    pub const fn is_queryable(&self) -> bool {
        matches!(self.kind, MemberKind::Queryable(_))
    }

    /// Returns `true` if the member is the unique identifier.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self.kind, MemberKind::Identifier { .. })
    }

    /// Returns the element shape of a queryable member.
    #[must_use]
    pub fn element_shape(&self) -> Option<&'static EntityShape> {
        match self.kind {
            MemberKind::Queryable(shape) => Some(shape()),
            _ => None,
        }
    }

    /// Compares name and kind. Queryable members compare by the name of
    /// their element shape.
    fn same_as(&self, other: &Self) -> bool {
        self.name == other.name
            && match (self.kind, other.kind) {
                (MemberKind::Field, MemberKind::Field) => true,
                (
                    MemberKind::Identifier { derived_from: a },
                    MemberKind::Identifier { derived_from: b },
                ) => a == b,
                (MemberKind::Queryable(a), MemberKind::Queryable(b)) => a().name() == b().name(),
                _ => false,
            }
    }

    /// Returns `true` if the member is requested when no projection is
    /// applied.
    const fn is_wire_field(&self) -> bool {
        matches!(
            self.kind,
            MemberKind::Field | MemberKind::Identifier { derived_from: None }
        )
    }
}

/// Describes the members of an entity type.
#[derive(Clone, Copy, Debug)]
pub struct EntityShape {
    name: &'static str,
    plural: Option<&'static str>,
    members: &'static [Member],
}

impl EntityShape {
    /// Creates a shape with the given type name and members.
    ///
    /// Members are kept in declaration order, which is the canonical order
    /// of the wire field list.
    #[must_use]
    pub const fn new(name: &'static str, members: &'static [Member]) -> Self {
        Self {
            name,
            plural: None,
            members,
        }
    }

    /// Overrides the pluralized resource name.
    #[must_use]
    pub const fn with_plural(self, plural: &'static str) -> Self {
        Self {
            name: self.name,
            plural: Some(plural),
            members: self.members,
        }
    }

    /// Returns the type name of the shape.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if both shapes describe the same entity.
    ///
    /// Shapes sharing a type name but declaring different members are
    /// distinct.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.name == other.name
                && self.plural == other.plural
                && self.members.len() == other.members.len()
                && self
                    .members
                    .iter()
                    .zip(other.members)
                    .all(|(a, b)| a.same_as(b)))
    }

    /// Returns all members in declaration order.
    #[must_use]
    pub const fn members(&self) -> &'static [Member] {
        self.members
    }

    /// Returns the lower-cased, pluralized resource name used in URIs.
    #[must_use]
    pub fn resource_name(&self) -> String {
        self.plural
            .map_or_else(|| pluralize(self.name), str::to_lowercase)
    }

    /// Looks up a member by its Rust-side name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&'static Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Returns the first member declared as identifier.
    #[must_use]
    pub fn identifier(&self) -> Option<&'static Member> {
        self.members.iter().find(|m| m.is_identifier())
    }

    /// Returns the queryable members.
    pub fn queryable_members(&self) -> impl Iterator<Item = &'static Member> {
        self.members.iter().filter(|m| m.is_queryable())
    }

    /// Returns the members requested when no projection is applied.
    pub fn wire_fields(&self) -> impl Iterator<Item = &'static Member> {
        self.members.iter().filter(|m| m.is_wire_field())
    }
}

/// Converts a `snake_case` member name into its `camelCase` wire form.
///
/// # Example
///
/// ```rust
/// use rest_query::entity::camel_case;
///
/// assert_eq!(camel_case("unique_identifier"), "uniqueIdentifier");
/// assert_eq!(camel_case("Name"), "name");
/// ```
#[must_use]
pub fn camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper_next = false;

    for c in name.chars() {
        if c == '_' {
            upper_next = !result.is_empty();
        } else if result.is_empty() {
            result.extend(c.to_lowercase());
        } else if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Normalizes a member name for collision checks.
///
/// Names that differ only in case or underscores normalize to the same
/// value and would map to the same wire field.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lower-cases and pluralizes a type name for use as a resource path.
///
/// # Example
///
/// ```rust
/// use rest_query::entity::pluralize;
///
/// assert_eq!(pluralize("EntityWithQueryableMember"), "entitywithqueryablemembers");
/// assert_eq!(pluralize("Address"), "addresses");
/// assert_eq!(pluralize("Category"), "categories");
/// assert_eq!(pluralize("Day"), "days");
/// ```
#[must_use]
pub fn pluralize(name: &str) -> String {
    let lower = name.to_lowercase();

    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{lower}es");
    }

    if let Some(stem) = lower.strip_suffix('y') {
        let before_y = stem.chars().last();
        if before_y.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{stem}ies");
        }
    }

    format!("{lower}s")
}
