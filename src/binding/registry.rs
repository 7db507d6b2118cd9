use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::descriptor::{
    BindingKey, IdentifierBinding, MarkerKind, PropertyBinding, TypeDeclaration,
};
use crate::graph::Iri;

/// Merged mapping metadata for one domain type.
///
/// The classes collect every node-class marker on the declaration chain,
/// subtype first; the identifier is the nearest declaration's marker; the
/// property bindings concatenate the type's own bindings with its ancestors'.
/// Cheap to clone: the payload is shared.
#[derive(Clone, Debug)]
pub struct TypeBinding {
    type_name: &'static str,
    classes: Arc<Vec<Iri>>,
    identifier: Arc<Option<IdentifierBinding>>,
    properties: Arc<Vec<PropertyBinding>>,
}

impl TypeBinding {
    /// Returns the diagnostic name of the bound type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// A type is mapped when at least one node class appears on its chain.
    /// Unmapped types may still serve as plain value containers, but must
    /// not reach the mapper as node-producing objects.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Returns the node classes asserted on every instance, subtype first.
    #[must_use]
    pub fn classes(&self) -> &[Iri] {
        &self.classes
    }

    /// Returns the identifier marker, if the chain declares one.
    #[must_use]
    pub fn identifier(&self) -> Option<&IdentifierBinding> {
        self.identifier.as_ref().as_ref()
    }

    /// Returns the merged property bindings.
    #[must_use]
    pub fn properties(&self) -> &[PropertyBinding] {
        &self.properties
    }
}

/// One cached marker category for one type.
#[derive(Clone, Debug)]
enum MarkerBinding {
    Classes(Arc<Vec<Iri>>),
    Identifier(Arc<Option<IdentifierBinding>>),
    Properties(Arc<Vec<PropertyBinding>>),
}

/// Memoizing registry of per-type mapping metadata.
///
/// The first request for a type walks its declaration chain once and caches
/// each marker category independently under a [`BindingKey`]. Lookups are
/// read-mostly and safe to share across threads; racing first computations
/// resolve last-writer-wins, which is sound because a binding is a pure
/// function of the declaration.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    cache: DashMap<BindingKey, MarkerBinding>,
}

impl BindingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the merged binding for the declared type, computing and
    /// caching it on first request.
    pub fn binding_for(&self, declaration: &TypeDeclaration) -> TypeBinding {
        let type_id = declaration.type_id();
        if let (Some(classes), Some(identifier), Some(properties)) = (
            self.cached_classes(type_id),
            self.cached_identifier(type_id),
            self.cached_properties(type_id),
        ) {
            return TypeBinding {
                type_name: declaration.name(),
                classes,
                identifier,
                properties,
            };
        }

        debug!(type_name = declaration.name(), "computing mapping binding");
        let (classes, identifier, properties) = Self::collect(declaration);
        let classes = Arc::new(classes);
        let identifier = Arc::new(identifier);
        let properties = Arc::new(properties);
        self.cache.insert(
            BindingKey::new(type_id, MarkerKind::Class),
            MarkerBinding::Classes(Arc::clone(&classes)),
        );
        self.cache.insert(
            BindingKey::new(type_id, MarkerKind::Identifier),
            MarkerBinding::Identifier(Arc::clone(&identifier)),
        );
        self.cache.insert(
            BindingKey::new(type_id, MarkerKind::Property),
            MarkerBinding::Properties(Arc::clone(&properties)),
        );

        TypeBinding {
            type_name: declaration.name(),
            classes,
            identifier,
            properties,
        }
    }

    /// Reports whether a marker category is already cached for a type.
    #[must_use]
    pub fn is_cached(&self, key: &BindingKey) -> bool {
        self.cache.contains_key(key)
    }

    fn cached_classes(&self, type_id: TypeId) -> Option<Arc<Vec<Iri>>> {
        match self.cache.get(&BindingKey::new(type_id, MarkerKind::Class)) {
            Some(entry) => match &*entry {
                MarkerBinding::Classes(classes) => Some(Arc::clone(classes)),
                _ => None,
            },
            None => None,
        }
    }

    fn cached_identifier(&self, type_id: TypeId) -> Option<Arc<Option<IdentifierBinding>>> {
        match self
            .cache
            .get(&BindingKey::new(type_id, MarkerKind::Identifier))
        {
            Some(entry) => match &*entry {
                MarkerBinding::Identifier(identifier) => Some(Arc::clone(identifier)),
                _ => None,
            },
            None => None,
        }
    }

    fn cached_properties(&self, type_id: TypeId) -> Option<Arc<Vec<PropertyBinding>>> {
        match self
            .cache
            .get(&BindingKey::new(type_id, MarkerKind::Property))
        {
            Some(entry) => match &*entry {
                MarkerBinding::Properties(properties) => Some(Arc::clone(properties)),
                _ => None,
            },
            None => None,
        }
    }

    /// Walks the declaration chain once, merging all marker categories.
    fn collect(
        declaration: &TypeDeclaration,
    ) -> (Vec<Iri>, Option<IdentifierBinding>, Vec<PropertyBinding>) {
        let mut classes = Vec::new();
        let mut identifier = None;
        let mut properties = Vec::new();

        let mut current = Some(declaration);
        while let Some(decl) = current {
            if let Some(class) = decl.class() {
                if !classes.contains(class) {
                    classes.push(class.clone());
                }
            }
            if identifier.is_none() {
                identifier = decl.identifier().cloned();
            }
            properties.extend(decl.properties().iter().cloned());
            current = decl.parent();
        }

        (classes, identifier, properties)
    }
}
