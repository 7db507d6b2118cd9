use std::any::TypeId;

use crate::graph::Iri;

/// Function applied to a raw identifier or reference string before it is
/// resolved, e.g. extracting a bare id from a full API URL.
pub type ValueTransform = fn(&str) -> String;

/// Classifies how one source field maps into the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    /// The field holds scalar values asserted as typed literals.
    Literal,
    /// The field holds only the identifier of another entity. The target
    /// node is created (or found) but never recursed into; its own
    /// properties are populated only if the entity is processed separately.
    Reference,
    /// The field holds a mapped record processed recursively, linked by an
    /// edge to the resulting node.
    Nested,
    /// Like [`BindingKind::Nested`], but the value is an embedded structure
    /// whose type declares no identifier, so every occurrence produces a
    /// fresh anonymous node.
    Embedded,
}

/// Whether a field holds one value or a collection of values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Multiplicity {
    Single,
    Multi,
}

/// Describes how one source field becomes a graph property or edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyBinding {
    field: &'static str,
    predicate: Iri,
    kind: BindingKind,
    multiplicity: Multiplicity,
    transform: Option<ValueTransform>,
}

impl PropertyBinding {
    /// Binds a scalar-shaped field.
    #[must_use]
    pub fn single(field: &'static str, predicate: Iri, kind: BindingKind) -> Self {
        Self {
            field,
            predicate,
            kind,
            multiplicity: Multiplicity::Single,
            transform: None,
        }
    }

    /// Binds a collection-shaped field.
    #[must_use]
    pub fn multi(field: &'static str, predicate: Iri, kind: BindingKind) -> Self {
        Self {
            multiplicity: Multiplicity::Multi,
            ..Self::single(field, predicate, kind)
        }
    }

    /// Attaches a transform applied to raw reference values before
    /// resolution. Ignored for literal and nested bindings.
    #[must_use]
    pub fn with_transform(mut self, transform: ValueTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Returns the source field name.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the target property or edge IRI.
    #[must_use]
    pub fn predicate(&self) -> &Iri {
        &self.predicate
    }

    /// Returns the binding kind.
    #[must_use]
    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    /// Returns the declared multiplicity.
    #[must_use]
    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    /// Applies the configured transform, if any, to a raw value.
    #[must_use]
    pub fn apply(&self, raw: &str) -> String {
        match self.transform {
            Some(transform) => transform(raw),
            None => raw.to_owned(),
        }
    }
}

/// Marks the field whose value is the stable identifier of a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentifierBinding {
    field: &'static str,
    transform: Option<ValueTransform>,
}

impl IdentifierBinding {
    #[must_use]
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            transform: None,
        }
    }

    /// Attaches a transform applied to the raw identifier before resolution.
    #[must_use]
    pub fn with_transform(mut self, transform: ValueTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Returns the identifier field name.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Applies the configured transform, if any, to a raw identifier.
    #[must_use]
    pub fn apply(&self, raw: &str) -> String {
        match self.transform {
            Some(transform) => transform(raw),
            None => raw.to_owned(),
        }
    }
}

/// Static mapping declaration one domain type exposes.
///
/// A declaration carries the type's own markers plus an optional parent
/// declaration, forming the ancestor chain the registry merges: node classes
/// accumulate over the whole chain, the nearest identifier wins, and
/// property bindings concatenate subtype-first.
#[derive(Clone, Debug)]
pub struct TypeDeclaration {
    type_id: TypeId,
    name: &'static str,
    class: Option<Iri>,
    identifier: Option<IdentifierBinding>,
    properties: Vec<PropertyBinding>,
    parent: Option<Box<TypeDeclaration>>,
}

impl TypeDeclaration {
    /// Starts a declaration for the concrete Rust type `T`.
    #[must_use]
    pub fn new<T: 'static>(name: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name,
            class: None,
            identifier: None,
            properties: Vec::new(),
            parent: None,
        }
    }

    /// Declares the node class instances of this type are asserted with.
    #[must_use]
    pub fn with_class(mut self, class: Iri) -> Self {
        self.class = Some(class);
        self
    }

    /// Declares the identifier field.
    #[must_use]
    pub fn with_identifier(mut self, identifier: IdentifierBinding) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Appends a property binding. Order is preserved.
    #[must_use]
    pub fn with_property(mut self, property: PropertyBinding) -> Self {
        self.properties.push(property);
        self
    }

    /// Chains a parent declaration whose markers this type inherits.
    #[must_use]
    pub fn extends(mut self, parent: TypeDeclaration) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Returns the identity of the declared Rust type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the human-readable type name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns this declaration's own node class, if any.
    #[must_use]
    pub fn class(&self) -> Option<&Iri> {
        self.class.as_ref()
    }

    /// Returns this declaration's own identifier marker, if any.
    #[must_use]
    pub fn identifier(&self) -> Option<&IdentifierBinding> {
        self.identifier.as_ref()
    }

    /// Returns this declaration's own property bindings.
    #[must_use]
    pub fn properties(&self) -> &[PropertyBinding] {
        &self.properties
    }

    /// Returns the parent declaration, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&TypeDeclaration> {
        self.parent.as_deref()
    }
}

/// Marker categories a registry cache entry can describe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Node-class markers merged over the chain.
    Class,
    /// The identifier marker.
    Identifier,
    /// Property bindings merged over the chain.
    Property,
}

/// Composite cache key for one `(type, marker category)` pair.
///
/// Keys built from the same pair compare equal and hash identically,
/// independent of construction order; the registry relies on this to reuse
/// entries across lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingKey {
    type_id: TypeId,
    marker: MarkerKind,
}

impl BindingKey {
    #[must_use]
    pub fn new(type_id: TypeId, marker: MarkerKind) -> Self {
        Self { type_id, marker }
    }

    /// Returns the marker category this key addresses.
    #[must_use]
    pub fn marker(&self) -> MarkerKind {
        self.marker
    }
}

#[cfg(test)]
mod tests {
    use std::any::TypeId;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::{BindingKey, BindingKind, MarkerKind, PropertyBinding, TypeDeclaration};
    use crate::graph::Iri;

    struct Sample;
    struct Other;

    fn hash_of(key: &BindingKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn keys_from_the_same_pair_are_interchangeable() {
        let first = BindingKey::new(TypeId::of::<Sample>(), MarkerKind::Class);
        let second = BindingKey::new(TypeId::of::<Sample>(), MarkerKind::Class);
        assert_eq!(first, second);
        assert_eq!(hash_of(&first), hash_of(&second));
    }

    #[test]
    fn keys_differ_by_type_and_by_marker() {
        let class = BindingKey::new(TypeId::of::<Sample>(), MarkerKind::Class);
        let identifier = BindingKey::new(TypeId::of::<Sample>(), MarkerKind::Identifier);
        let other = BindingKey::new(TypeId::of::<Other>(), MarkerKind::Class);
        assert_ne!(class, identifier);
        assert_ne!(class, other);
    }

    #[test]
    fn declarations_preserve_property_order() {
        let ns = "https://example.org/ns#";
        let declaration = TypeDeclaration::new::<Sample>("Sample")
            .with_property(PropertyBinding::single(
                "first",
                Iri::from_parts(ns, "first").expect("valid IRI"),
                BindingKind::Literal,
            ))
            .with_property(PropertyBinding::single(
                "second",
                Iri::from_parts(ns, "second").expect("valid IRI"),
                BindingKind::Literal,
            ));
        let fields: Vec<_> = declaration
            .properties()
            .iter()
            .map(PropertyBinding::field)
            .collect();
        assert_eq!(fields, vec!["first", "second"]);
    }
}
