//! The recursive record-to-graph mapping algorithm.
//!
//! [`GraphMapper::process`] walks one root record depth-first: it resolves
//! the record's identity (stable URI or anonymous), asserts every node class
//! on its declaration chain, then maps each bound field: literals typed per
//! shape, references linked without recursing into the target, nested and
//! embedded records recursed into. Cross-references that point backward are
//! identifier strings by construction of the metadata, which keeps the
//! recursion finite; a mapping that erroneously nests an instance inside
//! itself is caught by instance identity and rejected instead of recursing
//! unboundedly.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::binding::{
    BindingKind, BindingRegistry, Multiplicity, PropertyBinding, TypeBinding, TypeDeclaration,
};
use crate::errors::{MappingError, Result};
use crate::graph::{NodeId, PackageGraph};
use crate::literal::{Literal, ScalarValue};

/// Implemented by domain records that can be mapped into the package graph.
///
/// `declaration` exposes the type's static mapping metadata (own markers
/// plus the parent chain); `read` hands the mapper the value behind a
/// declared field name. Upstream deserialization and any lookups needed to
/// turn reference identifiers into full records happen before a record
/// reaches the mapper.
pub trait GraphRecord {
    /// Static mapping declaration for this record's type.
    fn declaration(&self) -> TypeDeclaration;

    /// Reads the value behind a declared field name.
    fn read(&self, field: &str) -> FieldValue<'_>;
}

/// Value read out of a mapped field.
pub enum FieldValue<'a> {
    /// The field holds no value; nothing is asserted.
    Absent,
    /// One scalar value.
    Scalar(ScalarValue),
    /// A collection of scalar values.
    Scalars(Vec<ScalarValue>),
    /// The identifier of another entity.
    Reference(String),
    /// A collection of entity identifiers.
    References(Vec<String>),
    /// One nested record.
    Record(&'a dyn GraphRecord),
    /// A collection of nested records.
    Records(Vec<&'a dyn GraphRecord>),
}

impl<'a> FieldValue<'a> {
    /// Wraps free-form text, including the empty string.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Scalar(ScalarValue::Text(value.into()))
    }

    /// Wraps optional text; `None` maps to [`FieldValue::Absent`].
    pub fn opt_text(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, Self::text)
    }

    /// Wraps a boolean flag.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::Scalar(ScalarValue::Bool(value))
    }

    /// Wraps an ISO-8601 lexical form.
    pub fn date_time(lexical: impl Into<String>) -> Self {
        Self::Scalar(ScalarValue::date_time(lexical))
    }

    /// Wraps a collection of text values.
    pub fn texts<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Scalars(
            values
                .into_iter()
                .map(|value| ScalarValue::Text(value.into()))
                .collect(),
        )
    }

    /// Wraps the identifier of another entity.
    pub fn reference(value: impl Into<String>) -> Self {
        Self::Reference(value.into())
    }

    /// Wraps one nested record.
    #[must_use]
    pub fn record(record: &'a dyn GraphRecord) -> Self {
        Self::Record(record)
    }

    /// Wraps a collection of nested records.
    #[must_use]
    pub fn records(records: Vec<&'a dyn GraphRecord>) -> Self {
        Self::Records(records)
    }
}

/// Maps record trees into a shared [`PackageGraph`].
///
/// The traversal is synchronous and depth-first with no I/O; every mutation
/// goes through the exclusively borrowed graph, so concurrent hosts
/// serialize whole `process` calls.
pub struct GraphMapper<'g> {
    registry: Arc<BindingRegistry>,
    graph: &'g mut PackageGraph,
}

impl<'g> GraphMapper<'g> {
    /// Creates a mapper writing into `graph` and consulting `registry`.
    pub fn new(registry: Arc<BindingRegistry>, graph: &'g mut PackageGraph) -> Self {
        Self { registry, graph }
    }

    /// Returns the graph being accumulated.
    #[must_use]
    pub fn graph(&self) -> &PackageGraph {
        self.graph
    }

    /// Maps one root record and everything nested beneath it.
    ///
    /// Re-processing a record whose identifier already has a node merges
    /// additional assertions into the existing node. Failures abort this
    /// call only; nodes committed for earlier roots remain valid.
    pub fn process(&mut self, record: &dyn GraphRecord) -> Result<NodeId> {
        let mut trail = Vec::new();
        self.visit(record, &mut trail)
    }

    fn visit(&mut self, record: &dyn GraphRecord, trail: &mut Vec<*const ()>) -> Result<NodeId> {
        let declaration = record.declaration();
        let binding = self.registry.binding_for(&declaration);
        if !binding.is_mapped() {
            return Err(MappingError::UnmappedType {
                type_name: binding.type_name(),
            });
        }

        // Instance identity, not value equality: two structurally identical
        // records at different addresses are not a cycle.
        let instance = record as *const dyn GraphRecord as *const ();
        if trail.contains(&instance) {
            return Err(MappingError::CycleDetected {
                type_name: binding.type_name(),
            });
        }

        trail.push(instance);
        let outcome = self.map_record(record, &binding, trail);
        trail.pop();
        outcome
    }

    fn map_record(
        &mut self,
        record: &dyn GraphRecord,
        binding: &TypeBinding,
        trail: &mut Vec<*const ()>,
    ) -> Result<NodeId> {
        let node = self.resolve_identity(record, binding)?;

        // Classes are committed before any field: a failure further down
        // leaves only harmless type assertions behind.
        for class in binding.classes() {
            self.graph.assert_class(node, class.clone());
        }

        for property in binding.properties() {
            self.map_property(node, record, binding.type_name(), property, trail)?;
        }

        Ok(node)
    }

    fn resolve_identity(
        &mut self,
        record: &dyn GraphRecord,
        binding: &TypeBinding,
    ) -> Result<NodeId> {
        let Some(identifier) = binding.identifier() else {
            return Ok(self.graph.create_anonymous());
        };

        let raw = match record.read(identifier.field()) {
            FieldValue::Scalar(ScalarValue::Text(value)) if !value.is_empty() => value,
            FieldValue::Absent | FieldValue::Scalar(ScalarValue::Text(_)) => {
                return Err(MappingError::MissingIdentifier {
                    type_name: binding.type_name(),
                    field: identifier.field(),
                })
            }
            _ => {
                return Err(MappingError::UnexpectedShape {
                    type_name: binding.type_name(),
                    field: identifier.field(),
                })
            }
        };

        let iri = self.graph.resolve(&identifier.apply(&raw))?;
        Ok(self.graph.get_or_create(iri))
    }

    fn map_property(
        &mut self,
        node: NodeId,
        record: &dyn GraphRecord,
        type_name: &'static str,
        property: &PropertyBinding,
        trail: &mut Vec<*const ()>,
    ) -> Result<()> {
        let value = record.read(property.field());
        trace!(
            type_name,
            field = property.field(),
            predicate = %property.predicate(),
            "mapping field"
        );

        match (property.kind(), property.multiplicity(), value) {
            (_, _, FieldValue::Absent) => {}
            (BindingKind::Literal, Multiplicity::Single, FieldValue::Scalar(scalar)) => {
                self.assert_scalar(node, property, scalar, true);
            }
            (BindingKind::Literal, Multiplicity::Multi, FieldValue::Scalars(scalars)) => {
                for scalar in scalars {
                    self.assert_scalar(node, property, scalar, false);
                }
            }
            (BindingKind::Reference, Multiplicity::Single, FieldValue::Reference(raw)) => {
                self.link_reference(node, property, &raw)?;
            }
            (BindingKind::Reference, Multiplicity::Multi, FieldValue::References(raws)) => {
                for raw in raws {
                    self.link_reference(node, property, &raw)?;
                }
            }
            (
                BindingKind::Nested | BindingKind::Embedded,
                Multiplicity::Single,
                FieldValue::Record(child),
            ) => {
                let target = self.visit(child, trail)?;
                self.graph
                    .assert_edge(node, property.predicate().clone(), target);
            }
            (
                BindingKind::Nested | BindingKind::Embedded,
                Multiplicity::Multi,
                FieldValue::Records(children),
            ) => {
                for child in children {
                    let target = self.visit(child, trail)?;
                    self.graph
                        .assert_edge(node, property.predicate().clone(), target);
                }
            }
            (_, _, _) => {
                return Err(MappingError::UnexpectedShape {
                    type_name,
                    field: property.field(),
                })
            }
        }

        Ok(())
    }

    fn assert_scalar(
        &mut self,
        node: NodeId,
        property: &PropertyBinding,
        scalar: ScalarValue,
        flag_divergence: bool,
    ) {
        let literal = Literal::of(scalar);
        if flag_divergence {
            if let Some(existing) = self.graph.node(node).literals_for(property.predicate()) {
                if !existing.is_empty() && !existing.contains(&literal) {
                    warn!(
                        predicate = %property.predicate(),
                        lexical = literal.lexical(),
                        "diverging value merged into single-valued property"
                    );
                }
            }
        }
        self.graph
            .assert_literal(node, property.predicate().clone(), literal);
    }

    fn link_reference(
        &mut self,
        node: NodeId,
        property: &PropertyBinding,
        raw: &str,
    ) -> Result<()> {
        let iri = self.graph.resolve(&property.apply(raw))?;
        let target = self.graph.get_or_create(iri);
        self.graph
            .assert_edge(node, property.predicate().clone(), target);
        Ok(())
    }
}
