use thiserror::Error;

use crate::graph::IriError;

/// Errors raised while mapping a record tree into the package graph.
///
/// All variants abort the current `process` call only; nodes committed for
/// earlier roots in the same session remain valid and no rollback occurs.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The record's declaration chain carries no node class anywhere, so it
    /// cannot produce a graph node.
    #[error("type `{type_name}` carries no node class on its declaration chain")]
    UnmappedType { type_name: &'static str },
    /// The same record instance was reached again through nested bindings
    /// within a single root traversal.
    #[error("cycle detected while mapping `{type_name}` through nested bindings")]
    CycleDetected { type_name: &'static str },
    /// The declaration names an identifier field, but the instance holds no
    /// usable value for it.
    #[error("record of type `{type_name}` has an absent or empty identifier in field `{field}`")]
    MissingIdentifier {
        type_name: &'static str,
        field: &'static str,
    },
    /// The value read from a field does not match the shape its binding
    /// declares.
    #[error("field `{field}` of `{type_name}` does not match its declared binding")]
    UnexpectedShape {
        type_name: &'static str,
        field: &'static str,
    },
    /// An identifier or reference could not be turned into a valid IRI, even
    /// after resolution against the graph's base scope.
    #[error(transparent)]
    InvalidIri(#[from] IriError),
}

/// Convenience alias used across the crate.
pub type Result<T, E = MappingError> = std::result::Result<T, E>;
