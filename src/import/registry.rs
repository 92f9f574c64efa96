//! Element registry: identity-keyed get-or-create over the host store.
//!
//! Every factory goes through [`Registry::get_or_create`], which looks the
//! identifier up first and only creates on a miss. Visiting the same document
//! node twice (once as a declaration, once from a deferred reference) is
//! therefore a no-op.
//!
//! The registry also remembers which document node *claimed* each identifier
//! during this session. A second, different node claiming the same
//! identifier is a malformed document and aborts the import.

use rustc_hash::FxHashMap;

use super::document::NodeId;
use super::error::{ImportError, ImportResult};
use crate::model::{Element, ElementId, ElementKind, ModelStore};

/// Session view of the host model store.
pub struct Registry<'s> {
    store: &'s mut dyn ModelStore,
    /// Identifier -> document node that declared it in this session.
    claims: FxHashMap<ElementId, NodeId>,
    /// Elements created by this session.
    created: usize,
}

impl<'s> Registry<'s> {
    pub fn new(store: &'s mut dyn ModelStore) -> Self {
        Self {
            store,
            claims: FxHashMap::default(),
            created: 0,
        }
    }

    // ── Lookup ───────────────────────────────────────────────────────

    pub fn lookup(&self, id: &ElementId) -> Option<&Element> {
        self.store.lookup(id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.store.lookup(id).is_some()
    }

    /// Kind of the element registered under `id`.
    pub fn kind_of(&self, id: &ElementId) -> Option<ElementKind> {
        self.store.lookup(id).map(Element::kind)
    }

    /// The underlying store.
    pub fn store(&self) -> &dyn ModelStore {
        &*self.store
    }

    /// Number of elements this session created.
    pub fn created(&self) -> usize {
        self.created
    }

    // ── Creation ─────────────────────────────────────────────────────

    /// Create an element under `id`; fails if `id` is taken.
    pub fn create_as(&mut self, kind: ElementKind, id: ElementId) -> ImportResult<ElementId> {
        let id = self.store.create_as(kind, id)?;
        self.created += 1;
        Ok(id)
    }

    /// Create an element under a synthesized identifier.
    pub fn create(&mut self, kind: ElementKind) -> ElementId {
        self.created += 1;
        self.store.create(kind)
    }

    /// Get-or-create an element declared by document node `node`.
    ///
    /// Returns the identifier and whether the element was created.
    pub fn get_or_create(
        &mut self,
        kind: ElementKind,
        id: &str,
        node: NodeId,
    ) -> ImportResult<(ElementId, bool)> {
        let id = ElementId::new(id);
        match self.claims.get(&id) {
            Some(owner) if *owner != node => {
                return Err(ImportError::DuplicateIdentifier(id));
            }
            Some(_) => {}
            None => {
                self.claims.insert(id.clone(), node);
            }
        }
        self.ensure_inner(kind, id)
    }

    /// Get-or-create an element under `id` without claiming it for a node.
    ///
    /// Used when an identifier is known from a reference (an extension named
    /// by a stereotype's base attribute) before its declaring node is seen.
    pub fn ensure(&mut self, kind: ElementKind, id: &str) -> ImportResult<ElementId> {
        self.ensure_inner(kind, ElementId::new(id)).map(|(id, _)| id)
    }

    fn ensure_inner(&mut self, kind: ElementKind, id: ElementId) -> ImportResult<(ElementId, bool)> {
        match self.kind_of(&id) {
            Some(existing) if existing == kind => Ok((id, false)),
            Some(existing) => {
                tracing::warn!(%id, %existing, requested = %kind, "identifier reused for another kind");
                Err(ImportError::DuplicateIdentifier(id))
            }
            None => self.create_as(kind, id).map(|id| (id, true)),
        }
    }

    // ── Mutation ─────────────────────────────────────────────────────

    pub fn set_owner(&mut self, child: &ElementId, owner: Option<&ElementId>) {
        self.store.set_owner(child, owner);
    }

    /// Apply `f` to the element under `id`, if registered.
    pub fn update<T>(&mut self, id: &ElementId, f: impl FnOnce(&mut Element) -> T) -> Option<T> {
        self.store.lookup_mut(id).map(f)
    }
}
