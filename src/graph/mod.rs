//! Node identity and the package graph accumulator.
//!
//! A [`PackageGraph`] holds every node produced during one packaging
//! session: identified nodes deduplicated by URI, anonymous nodes fresh per
//! occurrence, and the assertions made against both. The accumulator is
//! handed to an external serializer at the end of the session through the
//! [`GraphSink`] boundary; nothing here performs I/O.

pub mod iri;
pub mod node;
pub mod sink;
pub mod store;

pub use iri::{Iri, IriError};
pub use node::{Node, NodeId, NodeIdentity};
pub use sink::{GraphSink, SinkTerm};
pub use store::PackageGraph;
