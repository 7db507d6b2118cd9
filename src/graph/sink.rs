//! Event boundary towards the downstream serialization engine.
//!
//! A serializer consumes the finished accumulator through
//! [`super::PackageGraph::emit`], which replays every node as a stream of
//! class, literal, and edge events without exposing internal node handles.
//! Anonymous nodes are presented with a label scoped to the emission, so a
//! consumer can render them as locally scoped (blank) nodes.

use super::iri::Iri;
use crate::literal::Literal;

/// A node as seen by a serializer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkTerm<'a> {
    /// Identified node, globally addressable by its URI.
    Iri(&'a Iri),
    /// Anonymous node; the label is stable within one emission only.
    Blank(&'a str),
}

/// Consumer of graph events.
pub trait GraphSink {
    /// Called once, before any node events, with the graph's base scope.
    fn on_base(&mut self, base: &Iri);

    /// One asserted class on a node.
    fn on_class(&mut self, subject: &SinkTerm<'_>, class: &Iri);

    /// One asserted literal value on a node.
    fn on_literal(&mut self, subject: &SinkTerm<'_>, predicate: &Iri, literal: &Literal);

    /// One asserted edge between two nodes.
    fn on_edge(&mut self, subject: &SinkTerm<'_>, predicate: &Iri, object: &SinkTerm<'_>);
}
