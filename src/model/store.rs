//! The model store the importer writes into.
//!
//! [`ModelStore`] is the host-facing interface: identity lookup, creation
//! under a given or a synthesized identifier, and ownership updates. [`Model`]
//! is the in-memory implementation, an insertion-ordered map of elements.

use indexmap::IndexMap;
use thiserror::Error;

use super::{Element, ElementId, ElementKind};

/// Errors raised by a [`ModelStore`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An element already exists under this identifier.
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(ElementId),
}

/// Identity-keyed element storage.
///
/// Element fields are mutated through [`lookup_mut`](Self::lookup_mut);
/// containment changes go through [`set_owner`](Self::set_owner) so the
/// owner's `owned_elements` stays in sync with the child's `owner`.
pub trait ModelStore {
    /// Get an element by ID.
    fn lookup(&self, id: &ElementId) -> Option<&Element>;

    /// Get a mutable element by ID.
    fn lookup_mut(&mut self, id: &ElementId) -> Option<&mut Element>;

    /// Create an element under a freshly synthesized identifier.
    fn create(&mut self, kind: ElementKind) -> ElementId;

    /// Create an element under `id`.
    ///
    /// Fails with [`StoreError::DuplicateIdentifier`] when `id` is taken.
    fn create_as(&mut self, kind: ElementKind, id: ElementId) -> Result<ElementId, StoreError>;

    /// Move `child` under `owner` (or make it a root when `owner` is None).
    fn set_owner(&mut self, child: &ElementId, owner: Option<&ElementId>);

    /// Iterate over every element in the store.
    fn elements(&self) -> Box<dyn Iterator<Item = &Element> + '_>;
}

// ============================================================================
// MODEL
// ============================================================================

/// An in-memory UML model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    /// All elements by ID (IndexMap preserves insertion order).
    pub elements: IndexMap<ElementId, Element>,
    /// Root element IDs (elements without an owner).
    pub roots: Vec<ElementId>,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an element by ID.
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Iterate over root elements.
    pub fn iter_roots(&self) -> impl Iterator<Item = &Element> {
        self.roots.iter().filter_map(|id| self.elements.get(id))
    }

    /// Number of elements in the model.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Find elements by declared name.
    pub fn find_by_name(&self, name: &str) -> Vec<&Element> {
        self.elements
            .values()
            .filter(|e| e.name() == Some(name))
            .collect()
    }

    /// Find all elements of a kind.
    pub fn find_by_kind(&self, kind: ElementKind) -> Vec<&Element> {
        self.elements
            .values()
            .filter(|e| e.kind() == kind)
            .collect()
    }

    /// The single element of `kind` named `name`, if exactly one exists.
    pub fn find_unique(&self, kind: ElementKind, name: &str) -> Option<&Element> {
        let mut found = self
            .elements
            .values()
            .filter(|e| e.kind() == kind && e.name() == Some(name));
        let first = found.next()?;
        found.next().is_none().then_some(first)
    }

    /// Directly owned elements of `owner` with the given kind.
    pub fn owned_of_kind(&self, owner: &ElementId, kind: ElementKind) -> Vec<&Element> {
        self.elements
            .get(owner)
            .map(|o| {
                o.owned_elements
                    .iter()
                    .filter_map(|id| self.elements.get(id))
                    .filter(|e| e.kind() == kind)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn insert_new(&mut self, element: Element) -> ElementId {
        let id = element.id.clone();
        self.roots.push(id.clone());
        self.elements.insert(id.clone(), element);
        id
    }
}

impl ModelStore for Model {
    fn lookup(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    fn lookup_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    fn create(&mut self, kind: ElementKind) -> ElementId {
        let mut id = ElementId::generate();
        while self.elements.contains_key(&id) {
            id = ElementId::generate();
        }
        self.insert_new(Element::new(id, kind))
    }

    fn create_as(&mut self, kind: ElementKind, id: ElementId) -> Result<ElementId, StoreError> {
        if self.elements.contains_key(&id) {
            return Err(StoreError::DuplicateIdentifier(id));
        }
        Ok(self.insert_new(Element::new(id, kind)))
    }

    fn set_owner(&mut self, child: &ElementId, owner: Option<&ElementId>) {
        let Some(old_owner) = self.elements.get(child).map(|e| e.owner.clone()) else {
            return;
        };
        if old_owner.as_ref() == owner {
            return;
        }

        match &old_owner {
            Some(old) => {
                if let Some(parent) = self.elements.get_mut(old) {
                    parent.owned_elements.retain(|c| c != child);
                }
            }
            None => self.roots.retain(|r| r != child),
        }

        match owner {
            Some(new) if self.elements.contains_key(new) => {
                if let Some(parent) = self.elements.get_mut(new) {
                    super::push_unique(&mut parent.owned_elements, child.clone());
                }
                if let Some(el) = self.elements.get_mut(child) {
                    el.owner = Some(new.clone());
                }
            }
            _ => {
                if let Some(el) = self.elements.get_mut(child) {
                    el.owner = None;
                }
                super::push_unique(&mut self.roots, child.clone());
            }
        }
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &Element> + '_> {
        Box::new(self.elements.values())
    }
}
