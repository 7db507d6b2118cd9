use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::iri::Iri;
use crate::literal::Literal;

/// Handle to a node inside one [`super::PackageGraph`].
///
/// Handles are only meaningful for the graph that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the position of the node in the graph's creation order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identity of a graph vertex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum NodeIdentity {
    /// Stable URI, deduplicated across the session.
    Iri(Iri),
    /// No stable identity; must be serialized as a locally scoped node.
    Anonymous,
}

/// A graph vertex: asserted classes, literal properties, and outgoing edges.
///
/// All assertion targets are sets, so duplicate assertions collapse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    identity: NodeIdentity,
    classes: BTreeSet<Iri>,
    literals: BTreeMap<Iri, BTreeSet<Literal>>,
    edges: BTreeMap<Iri, BTreeSet<NodeId>>,
}

impl Node {
    pub(crate) fn identified(iri: Iri) -> Self {
        Self::with_identity(NodeIdentity::Iri(iri))
    }

    pub(crate) fn anonymous() -> Self {
        Self::with_identity(NodeIdentity::Anonymous)
    }

    fn with_identity(identity: NodeIdentity) -> Self {
        Self {
            identity,
            classes: BTreeSet::new(),
            literals: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    /// Returns the node's identity.
    #[must_use]
    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    /// Returns the stable URI for identified nodes.
    #[must_use]
    pub fn iri(&self) -> Option<&Iri> {
        match &self.identity {
            NodeIdentity::Iri(iri) => Some(iri),
            NodeIdentity::Anonymous => None,
        }
    }

    /// Whether the node lacks a stable identity.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self.identity, NodeIdentity::Anonymous)
    }

    /// Returns the accumulated class set.
    #[must_use]
    pub fn classes(&self) -> &BTreeSet<Iri> {
        &self.classes
    }

    /// Membership query over the accumulated class set.
    #[must_use]
    pub fn has_class(&self, class: &Iri) -> bool {
        self.classes.contains(class)
    }

    /// Returns the literal-property map.
    #[must_use]
    pub fn literals(&self) -> &BTreeMap<Iri, BTreeSet<Literal>> {
        &self.literals
    }

    /// Returns the asserted values for one literal property.
    #[must_use]
    pub fn literals_for(&self, predicate: &Iri) -> Option<&BTreeSet<Literal>> {
        self.literals.get(predicate)
    }

    /// Returns the edge map.
    #[must_use]
    pub fn edges(&self) -> &BTreeMap<Iri, BTreeSet<NodeId>> {
        &self.edges
    }

    /// Returns the target nodes for one edge property.
    #[must_use]
    pub fn edges_for(&self, predicate: &Iri) -> Option<&BTreeSet<NodeId>> {
        self.edges.get(predicate)
    }

    pub(crate) fn assert_class(&mut self, class: Iri) -> bool {
        self.classes.insert(class)
    }

    pub(crate) fn assert_literal(&mut self, predicate: Iri, literal: Literal) -> bool {
        self.literals.entry(predicate).or_default().insert(literal)
    }

    pub(crate) fn assert_edge(&mut self, predicate: Iri, target: NodeId) -> bool {
        self.edges.entry(predicate).or_default().insert(target)
    }
}
