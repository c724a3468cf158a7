//! Binding of query syntax trees to field lists and projectors.
//!
//! The binder walks a [`QueryExpr`] from its source outwards and produces a
//! [`ProjectedFields`]: the ordered field declarations that end up in the
//! `fields=` parameter, the filters to encode, and the [`Projector`] that
//! rebuilds result records from raw wire records.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::entity::{
    camel_case, EntityShape, EntityValidator, Member, MemberKind, Record, ShapeFn,
};
use crate::error::QueryError;
use crate::query::{BindError, Filter, QueryExpr};
use crate::resolve::SubQuery;

/// One selected field and the result member it populates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDeclaration {
    source: String,
    target: String,
}

impl FieldDeclaration {
    /// Creates a declaration reading `source` into `target`.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Returns the member name on the root entity.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the member name in the result shape.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the camelCase field name requested on the wire.
    #[must_use]
    pub fn wire_name(&self) -> String {
        camel_case(&self.source)
    }
}

#[derive(Clone, Debug)]
enum Binding {
    Value {
        wire: String,
        fallback: Option<String>,
        target: String,
    },
    SubResource {
        target: String,
        shape: ShapeFn,
    },
}

/// Rebuilds result records from raw, wire-keyed records.
///
/// Plain members are copied from their wire names to their target names.
/// Queryable members are placeholders filled with a deferred sub-query
/// obtained from the resolver passed to [`Projector::project`].
#[derive(Clone, Debug)]
pub struct Projector {
    bindings: Vec<Binding>,
}

impl Projector {
    /// Returns `true` if any result member is a deferred sub-query.
    #[must_use]
    pub fn has_sub_resources(&self) -> bool {
        self.bindings
            .iter()
            .any(|b| matches!(b, Binding::SubResource { .. }))
    }

    /// Returns the target member names in projection order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| match b {
            Binding::Value { target, .. } | Binding::SubResource { target, .. } => target.as_str(),
        })
    }

    /// Projects one raw record.
    ///
    /// `resolve` is called once per queryable member with the member's
    /// element shape and returns the sub-query to store in its place.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by `resolve`.
    pub fn project<F>(&self, raw: &Map<String, Value>, mut resolve: F) -> Result<Record, QueryError>
    where
        F: FnMut(&'static EntityShape) -> Result<SubQuery, QueryError>,
    {
        let mut record = Record::new();

        for binding in &self.bindings {
            match binding {
                Binding::Value {
                    wire,
                    fallback,
                    target,
                } => {
                    let value = match fallback {
                        Some(fallback) => raw
                            .get(wire)
                            .filter(|value| !value.is_null())
                            .or_else(|| raw.get(fallback)),
                        None => raw.get(wire),
                    };
                    if let Some(value) = value {
                        record.insert_value(target.clone(), value.clone());
                    }
                }
                Binding::SubResource { target, shape } => {
                    record.insert_query(target.clone(), resolve(shape())?);
                }
            }
        }

        Ok(record)
    }
}

/// The outcome of binding a query.
#[derive(Clone, Debug)]
pub struct ProjectedFields {
    shape: &'static EntityShape,
    fields: Vec<FieldDeclaration>,
    projector: Projector,
    filters: Vec<Filter>,
}

impl ProjectedFields {
    /// Returns the root entity shape of the query.
    #[must_use]
    pub const fn shape(&self) -> &'static EntityShape {
        self.shape
    }

    /// Returns the field declarations in canonical order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDeclaration] {
        &self.fields
    }

    /// Returns the projector for raw records.
    #[must_use]
    pub const fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Returns the filters, with members resolved to wire names.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns the wire field names to request, in order and without
    /// repeats.
    ///
    /// When a queryable member is projected, the identifier's wire field is
    /// requested first: sub-resource URIs are derived from it.
    #[must_use]
    pub fn wire_fields(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.fields.len() + 1);

        if self.projector.has_sub_resources() {
            if let Some(identifier) = self.shape.identifier() {
                let source = match identifier.kind() {
                    MemberKind::Identifier {
                        derived_from: Some(from),
                    } => from,
                    _ => identifier.name(),
                };
                names.push(camel_case(source));
            }
        }

        for field in &self.fields {
            let wire = field.wire_name();
            if !names.contains(&wire) {
                names.push(wire);
            }
        }

        names
    }

    /// Returns `true` if the requested fields are the full wire field set
    /// of the shape, in which case no `fields=` parameter is needed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let requested: HashSet<String> = self.wire_fields().into_iter().collect();
        let full: HashSet<String> = self.shape.wire_fields().map(Member::wire_name).collect();
        requested == full
    }
}

#[derive(Clone, Debug)]
enum Origin {
    Field {
        source: &'static str,
        fallback: Option<&'static str>,
    },
    Queryable(ShapeFn),
}

#[derive(Clone, Debug)]
struct ScopeMember {
    name: String,
    origin: Origin,
}

/// Members visible at one point of the chain.
struct Bound {
    shape: &'static EntityShape,
    scope: Vec<ScopeMember>,
    filters: Vec<Filter>,
    projected: bool,
}

impl Bound {
    fn lookup(&self, member: &str) -> Result<&ScopeMember, BindError> {
        self.scope
            .iter()
            .find(|m| m.name == member)
            .ok_or_else(|| BindError::UnknownMember {
                shape: self.shape.name().to_string(),
                member: member.to_string(),
            })
    }
}

/// Binds query syntax trees to [`ProjectedFields`].
///
/// Binding is pure and deterministic: the same tree always yields the same
/// fields in the same order.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryBinder {
    validator: EntityValidator,
}

impl QueryBinder {
    /// Creates a binder that validates entity shapes with `validator`.
    #[must_use]
    pub const fn new(validator: EntityValidator) -> Self {
        Self { validator }
    }

    /// Binds a query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MalformedEntity`] if the root shape violates
    /// the entity contract, or [`QueryError::MalformedQuery`] if a
    /// projection or filter cannot be resolved.
    pub fn bind(&self, expr: &QueryExpr) -> Result<ProjectedFields, QueryError> {
        let bound = self.bind_node(expr)?;

        let fields: Vec<FieldDeclaration> = if bound.projected {
            bound
                .scope
                .iter()
                .filter_map(|m| match m.origin {
                    Origin::Field { source, .. } => Some(FieldDeclaration::new(source, m.name.clone())),
                    Origin::Queryable(_) => None,
                })
                .collect()
        } else {
            bound
                .shape
                .wire_fields()
                .map(|m| FieldDeclaration::new(m.name(), m.name()))
                .collect()
        };

        let bindings = bound
            .scope
            .iter()
            .map(|m| match m.origin {
                Origin::Field { source, fallback } => Binding::Value {
                    wire: camel_case(source),
                    fallback: fallback.map(camel_case),
                    target: m.name.clone(),
                },
                Origin::Queryable(shape) => Binding::SubResource {
                    target: m.name.clone(),
                    shape,
                },
            })
            .collect();

        tracing::debug!(
            "Bound query over {} to {} field(s) and {} filter(s)",
            bound.shape.name(),
            fields.len(),
            bound.filters.len()
        );

        Ok(ProjectedFields {
            shape: bound.shape,
            fields,
            projector: Projector { bindings },
            filters: bound.filters,
        })
    }

    fn bind_node(&self, expr: &QueryExpr) -> Result<Bound, QueryError> {
        match expr {
            QueryExpr::Source(shape) => {
                let shape: &'static EntityShape = *shape;
                self.validator.validate(shape)?;

                let scope = shape
                    .members()
                    .iter()
                    .map(|member| ScopeMember {
                        name: member.name().to_string(),
                        origin: match member.kind() {
                            MemberKind::Field => Origin::Field {
                                source: member.name(),
                                fallback: None,
                            },
                            MemberKind::Identifier { derived_from } => Origin::Field {
                                source: member.name(),
                                fallback: derived_from,
                            },
                            MemberKind::Queryable(element) => Origin::Queryable(element),
                        },
                    })
                    .collect();

                Ok(Bound {
                    shape,
                    scope,
                    filters: Vec::new(),
                    projected: false,
                })
            }
            QueryExpr::Select { source, projection } => {
                let inner = self.bind_node(source)?;
                if projection.is_empty() {
                    return Err(BindError::EmptyProjection.into());
                }

                let mut targets = HashSet::new();
                let mut scope = Vec::with_capacity(projection.members().len());
                for access in projection.members() {
                    let origin = inner.lookup(access.member())?.origin.clone();
                    if !targets.insert(access.target()) {
                        return Err(BindError::DuplicateTarget {
                            target: access.target().to_string(),
                        }
                        .into());
                    }
                    scope.push(ScopeMember {
                        name: access.target().to_string(),
                        origin,
                    });
                }

                Ok(Bound {
                    scope,
                    projected: true,
                    ..inner
                })
            }
            QueryExpr::Where { source, filter } => {
                let mut inner = self.bind_node(source)?;
                let member = inner.lookup(filter.member())?;
                let Origin::Field { source, .. } = member.origin else {
                    return Err(BindError::NotFilterable {
                        member: filter.member().to_string(),
                    }
                    .into());
                };
                inner.filters.push(filter.rename(camel_case(source)));
                Ok(inner)
            }
        }
    }
}
