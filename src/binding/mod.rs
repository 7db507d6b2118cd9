//! Mapping metadata: per-type declarations and the memoizing registry.
//!
//! Domain types describe themselves through a [`TypeDeclaration`] holding
//! their node class, identifier field, and property bindings, chained to a parent
//! declaration for inherited markers. The [`BindingRegistry`] merges a chain
//! once into a [`TypeBinding`] and caches every marker category under a
//! composite [`BindingKey`], so repeated lookups never re-walk the chain.

pub mod descriptor;
pub mod registry;

pub use descriptor::{
    BindingKey, BindingKind, IdentifierBinding, MarkerKind, Multiplicity, PropertyBinding,
    TypeDeclaration, ValueTransform,
};
pub use registry::{BindingRegistry, TypeBinding};
