use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::iri::Iri;
use super::node::{Node, NodeId, NodeIdentity};
use super::sink::{GraphSink, SinkTerm};
use crate::errors::Result;
use crate::literal::Literal;

/// The mutable graph accumulator for one packaging session.
///
/// Identified nodes are deduplicated by URI for the lifetime of the graph:
/// re-processing an entity merges into its existing node. Anonymous nodes
/// are never deduplicated. Every mutator takes `&mut self`, so the
/// single-writer discipline is compiler-enforced; a host driving several
/// roots concurrently wraps the graph in a `std::sync::Mutex`.
#[derive(Debug, Serialize)]
pub struct PackageGraph {
    base: Iri,
    nodes: Vec<Node>,
    #[serde(skip)]
    identified: BTreeMap<Iri, NodeId>,
}

impl PackageGraph {
    /// Creates an empty graph whose bare identifiers resolve against `base`.
    #[must_use]
    pub fn new(base: Iri) -> Self {
        Self {
            base,
            nodes: Vec::new(),
            identified: BTreeMap::new(),
        }
    }

    /// Returns the base scope.
    #[must_use]
    pub fn base(&self) -> &Iri {
        &self.base
    }

    /// Resolves a raw identifier into an absolute IRI.
    ///
    /// Absolute IRIs pass through untouched; bare local identifiers are
    /// appended to the base scope, so the same logical entity referenced
    /// once as a bare id and once fully qualified lands on one node.
    pub fn resolve(&self, raw: &str) -> Result<Iri> {
        match Iri::new(raw) {
            Ok(iri) => Ok(iri),
            Err(_) => Ok(Iri::new(format!("{}{raw}", self.base))?),
        }
    }

    /// Returns the node registered under `iri`, creating it when absent.
    ///
    /// Idempotent: two calls with the same URI return the same handle.
    pub fn get_or_create(&mut self, iri: Iri) -> NodeId {
        if let Some(&id) = self.identified.get(&iri) {
            return id;
        }
        debug!(iri = %iri, "registering node");
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::identified(iri.clone()));
        self.identified.insert(iri, id);
        id
    }

    /// Creates a fresh anonymous node, never looked up or reused.
    pub fn create_anonymous(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::anonymous());
        id
    }

    /// Adds `class` to the node's type set.
    pub fn assert_class(&mut self, node: NodeId, class: Iri) -> bool {
        self.nodes[node.0].assert_class(class)
    }

    /// Adds a literal value to the property's value set. Duplicate
    /// `(predicate, value)` pairs collapse.
    pub fn assert_literal(&mut self, node: NodeId, predicate: Iri, literal: Literal) -> bool {
        self.nodes[node.0].assert_literal(predicate, literal)
    }

    /// Adds a directed edge. Duplicate edges collapse.
    pub fn assert_edge(&mut self, node: NodeId, predicate: Iri, target: NodeId) -> bool {
        self.nodes[node.0].assert_edge(predicate, target)
    }

    /// Returns the node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Looks up the handle registered for an already-resolved URI.
    #[must_use]
    pub fn find(&self, iri: &Iri) -> Option<NodeId> {
        self.identified.get(iri).copied()
    }

    /// Iterates all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Total number of nodes, identified and anonymous.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of identified nodes.
    #[must_use]
    pub fn identified_count(&self) -> usize {
        self.identified.len()
    }

    /// Number of anonymous nodes.
    #[must_use]
    pub fn anonymous_count(&self) -> usize {
        self.nodes.len() - self.identified.len()
    }

    /// Replays the accumulated graph into a serializer sink.
    ///
    /// Anonymous nodes receive `c0`, `c1`, ... labels in creation order,
    /// stable within this emission only.
    pub fn emit(&self, sink: &mut dyn GraphSink) {
        sink.on_base(&self.base);

        let mut labels = Vec::with_capacity(self.nodes.len());
        let mut counter = 0usize;
        for node in &self.nodes {
            if node.is_anonymous() {
                labels.push(format!("c{counter}"));
                counter += 1;
            } else {
                labels.push(String::new());
            }
        }
        let term = |id: NodeId| match self.nodes[id.0].identity() {
            NodeIdentity::Iri(iri) => SinkTerm::Iri(iri),
            NodeIdentity::Anonymous => SinkTerm::Blank(labels[id.0].as_str()),
        };

        for (index, node) in self.nodes.iter().enumerate() {
            let subject = term(NodeId(index));
            for class in node.classes() {
                sink.on_class(&subject, class);
            }
            for (predicate, values) in node.literals() {
                for literal in values {
                    sink.on_literal(&subject, predicate, literal);
                }
            }
            for (predicate, targets) in node.edges() {
                for target in targets {
                    sink.on_edge(&subject, predicate, &term(*target));
                }
            }
        }
    }
}
