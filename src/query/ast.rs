//! Abstract syntax of queries.
//!
//! A query is a chain of operations rooted at exactly one
//! [`QueryExpr::Source`]. Chaining wraps the existing node in a new one;
//! nodes are never mutated once built.

use serde_json::Value;

use crate::entity::EntityShape;

/// A node of the query syntax tree.
#[derive(Clone, Debug)]
pub enum QueryExpr {
    /// The full collection of an entity shape.
    Source(&'static EntityShape),
    /// A field projection over the source.
    Select {
        /// The projected query.
        source: Box<QueryExpr>,
        /// The member accesses to keep.
        projection: Projection,
    },
    /// A filter over the source.
    Where {
        /// The filtered query.
        source: Box<QueryExpr>,
        /// The filter predicate.
        filter: Filter,
    },
}

impl QueryExpr {
    /// Wraps this node in a projection.
    #[must_use]
    pub fn select(self, projection: Projection) -> Self {
        Self::Select {
            source: Box::new(self),
            projection,
        }
    }

    /// Wraps this node in a filter.
    #[must_use]
    pub fn filter(self, filter: Filter) -> Self {
        Self::Where {
            source: Box::new(self),
            filter,
        }
    }

    /// Returns the entity shape at the root of the chain.
    #[must_use]
    pub fn root_shape(&self) -> &'static EntityShape {
        let mut node = self;
        loop {
            match node {
                Self::Source(shape) => return *shape,
                Self::Select { source, .. } | Self::Where { source, .. } => node = &**source,
            }
        }
    }

    /// Returns `true` if any node of the chain is a projection.
    #[must_use]
    pub fn is_projected(&self) -> bool {
        match self {
            Self::Source(_) => false,
            Self::Select { .. } => true,
            Self::Where { source, .. } => source.is_projected(),
        }
    }
}

/// A single member access inside a projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberAccess {
    member: String,
    target: String,
}

impl MemberAccess {
    /// Accesses `member` and keeps its name in the result.
    #[must_use]
    pub fn new(member: impl Into<String>) -> Self {
        let member = member.into();
        Self {
            target: member.clone(),
            member,
        }
    }

    /// Accesses `member` and stores it under `target` in the result.
    #[must_use]
    pub fn aliased(member: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            target: target.into(),
        }
    }

    /// Returns the accessed member name.
    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }

    /// Returns the member name in the result shape.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// An ordered list of member accesses.
///
/// The order is significant: it becomes the order of the `fields=`
/// parameter of the rendered URI.
///
/// # Example
///
/// ```rust
/// use rest_query::query::Projection;
///
/// let projection = Projection::new()
///     .member("unique_identifier")
///     .member_as("name", "title");
///
/// assert_eq!(projection.members().len(), 2);
/// assert_eq!(projection.members()[1].target(), "title");
/// assert_eq!(Projection::of(["name"]), Projection::new().member("name"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Projection {
    members: Vec<MemberAccess>,
}

impl Projection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a projection keeping the given members, in order.
    #[must_use]
    pub fn of<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(MemberAccess::new).collect(),
        }
    }

    /// Appends a member access.
    #[must_use]
    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.members.push(MemberAccess::new(member));
        self
    }

    /// Appends a member access stored under a different name.
    #[must_use]
    pub fn member_as(mut self, member: impl Into<String>, target: impl Into<String>) -> Self {
        self.members.push(MemberAccess::aliased(member, target));
        self
    }

    /// Returns the member accesses in order.
    #[must_use]
    pub fn members(&self) -> &[MemberAccess] {
        &self.members
    }

    /// Returns `true` if the projection selects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Comparison operator of a [`Filter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// Member equals the value.
    Eq,
    /// Member differs from the value.
    Ne,
    /// Member is less than the value.
    Lt,
    /// Member is less than or equal to the value.
    Le,
    /// Member is greater than the value.
    Gt,
    /// Member is greater than or equal to the value.
    Ge,
    /// Member contains the value.
    Contains,
}

impl FilterOp {
    /// Returns the operator name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Contains => "contains",
        }
    }
}

/// A filter predicate on a single member.
///
/// Filters carry no wire format of their own; a
/// [`FilterEncoder`](crate::query::FilterEncoder) turns them into query
/// parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    member: String,
    op: FilterOp,
    value: Value,
}

impl Filter {
    /// Creates a filter.
    #[must_use]
    pub fn new(member: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            member: member.into(),
            op,
            value: value.into(),
        }
    }

    /// `member == value`
    #[must_use]
    pub fn eq(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(member, FilterOp::Eq, value)
    }

    /// `member != value`
    #[must_use]
    pub fn ne(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(member, FilterOp::Ne, value)
    }

    /// `member < value`
    #[must_use]
    pub fn lt(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(member, FilterOp::Lt, value)
    }

    /// `member <= value`
    #[must_use]
    pub fn le(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(member, FilterOp::Le, value)
    }

    /// `member > value`
    #[must_use]
    pub fn gt(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(member, FilterOp::Gt, value)
    }

    /// `member >= value`
    #[must_use]
    pub fn ge(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(member, FilterOp::Ge, value)
    }

    /// `member` contains `value`
    #[must_use]
    pub fn contains(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(member, FilterOp::Contains, value)
    }

    /// Returns the filtered member name.
    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }

    /// Returns the comparison operator.
    #[must_use]
    pub const fn op(&self) -> FilterOp {
        self.op
    }

    /// Returns the compared value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the same predicate on a different member name.
    pub(crate) fn rename(&self, member: String) -> Self {
        Self {
            member,
            op: self.op,
            value: self.value.clone(),
        }
    }
}
