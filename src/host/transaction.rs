//! Exclusive mutation window over a shared model.
//!
//! The importer never talks to a lock directly. It asks a [`MutationWindow`]
//! to run a closure with exclusive access to the store; the window commits if
//! the closure returns `Ok` and discards every change otherwise.
//!
//! [`SharedModel`] is the in-memory implementation: an `Arc<RwLock<Model>>`
//! whose write guard is wrapped in a [`ModelTransaction`] that restores a
//! snapshot on drop unless committed.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{Model, ModelStore};

/// Host-provided scope for all-or-nothing mutation.
pub trait MutationWindow {
    /// Run `f` with exclusive access to the store.
    ///
    /// Changes made by `f` are kept only if it returns `Ok`.
    fn with_mutation<T, E>(
        &self,
        f: impl FnOnce(&mut dyn ModelStore) -> Result<T, E>,
    ) -> Result<T, E>;
}

// ============================================================================
// SHARED MODEL
// ============================================================================

/// A model behind a read-write lock, shareable across threads.
#[derive(Clone, Debug, Default)]
pub struct SharedModel {
    inner: Arc<RwLock<Model>>,
}

impl SharedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_model(model: Model) -> Self {
        Self {
            inner: Arc::new(RwLock::new(model)),
        }
    }

    /// Shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, Model> {
        self.inner.read()
    }

    /// Open a transaction. Blocks until no reader or writer holds the lock.
    pub fn begin(&self) -> ModelTransaction<'_> {
        let guard = self.inner.write();
        let snapshot = guard.clone();
        tracing::trace!(elements = snapshot.element_count(), "transaction opened");
        ModelTransaction {
            guard,
            snapshot: Some(snapshot),
        }
    }

    /// Clone the current model out of the lock.
    pub fn snapshot(&self) -> Model {
        self.inner.read().clone()
    }
}

impl MutationWindow for SharedModel {
    fn with_mutation<T, E>(
        &self,
        f: impl FnOnce(&mut dyn ModelStore) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut tx = self.begin();
        let result = f(&mut *tx);
        if result.is_ok() {
            tx.commit();
        }
        result
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// Write access to a [`SharedModel`] that rolls back unless committed.
pub struct ModelTransaction<'a> {
    guard: RwLockWriteGuard<'a, Model>,
    snapshot: Option<Model>,
}

impl ModelTransaction<'_> {
    /// Keep the changes.
    pub fn commit(mut self) {
        self.snapshot = None;
        tracing::trace!(elements = self.guard.element_count(), "transaction committed");
    }

    /// Discard the changes.
    pub fn rollback(self) {}
}

impl Deref for ModelTransaction<'_> {
    type Target = Model;

    fn deref(&self) -> &Model {
        &self.guard
    }
}

impl DerefMut for ModelTransaction<'_> {
    fn deref_mut(&mut self) -> &mut Model {
        &mut self.guard
    }
}

impl Drop for ModelTransaction<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = snapshot;
            tracing::debug!("transaction rolled back");
        }
    }
}
