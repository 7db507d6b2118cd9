//! Annotation-style mapping of domain records into OWL package graphs.
//!
//! The crate turns in-memory domain records, including nested records,
//! collections, and cross-references, into a deduplicated graph of typed
//! nodes and properties, ready for serialization as OWL/RDF-style
//! individuals and triples. Three pieces cooperate:
//!
//! - [`binding`]: per-type mapping declarations and the memoizing registry
//!   that merges them across an ancestor chain;
//! - [`graph`]: the [`graph::PackageGraph`] accumulator holding identified
//!   and anonymous nodes with set-semantics assertions;
//! - [`mapper`]: the recursive [`mapper::GraphMapper`] driving a record tree
//!   into the graph.
//!
//! Fetching records and serializing the finished graph are the caller's
//! collaborators; the core performs no I/O.
//!
//! ```
//! use std::sync::Arc;
//!
//! use ontopack::binding::{BindingKind, BindingRegistry, IdentifierBinding, PropertyBinding,
//!     TypeDeclaration};
//! use ontopack::graph::{Iri, PackageGraph};
//! use ontopack::mapper::{FieldValue, GraphMapper, GraphRecord};
//!
//! struct Person {
//!     id: String,
//!     name: String,
//! }
//!
//! impl GraphRecord for Person {
//!     fn declaration(&self) -> TypeDeclaration {
//!         let ns = "https://example.org/ns#";
//!         TypeDeclaration::new::<Self>("Person")
//!             .with_class(Iri::from_parts(ns, "Person").expect("valid IRI"))
//!             .with_identifier(IdentifierBinding::new("id"))
//!             .with_property(PropertyBinding::single(
//!                 "name",
//!                 Iri::from_parts(ns, "hasName").expect("valid IRI"),
//!                 BindingKind::Literal,
//!             ))
//!     }
//!
//!     fn read(&self, field: &str) -> FieldValue<'_> {
//!         match field {
//!             "id" => FieldValue::text(self.id.as_str()),
//!             "name" => FieldValue::text(self.name.as_str()),
//!             _ => FieldValue::Absent,
//!         }
//!     }
//! }
//!
//! let mut graph = PackageGraph::new(Iri::new("https://example.org/people/").unwrap());
//! let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);
//! let ann = Person { id: "u1".into(), name: "Ann".into() };
//! let node = mapper.process(&ann).expect("mapped");
//! assert!(graph.node(node).iri().is_some());
//! ```

pub mod binding;
pub mod errors;
pub mod graph;
pub mod literal;
pub mod mapper;
pub mod vocab;

pub use binding::{
    BindingKey, BindingKind, BindingRegistry, IdentifierBinding, MarkerKind, Multiplicity,
    PropertyBinding, TypeBinding, TypeDeclaration, ValueTransform,
};
pub use errors::{MappingError, Result};
pub use graph::{GraphSink, Iri, IriError, Node, NodeId, NodeIdentity, PackageGraph, SinkTerm};
pub use literal::{Literal, ScalarKind, ScalarValue};
pub use mapper::{FieldValue, GraphMapper, GraphRecord};
