//! Thread-safe wrapper around [`HierarchicalList`].

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::child_map::{BTreeFamily, MapFamily};
use crate::error::Result;
use crate::tree::{HierarchicalList, ListPage, ListSummary, TreeStats};

/// A [`HierarchicalList`] behind a reader-writer lock.
///
/// Inserts and deletes take the write lock. Listings and diagnostics take the
/// read lock, so any number of listings can run together but never alongside
/// a mutation. The listing callback runs with the read lock held and must
/// not call back into the same list.
pub struct SharedHierarchicalList<C: ?Sized = (), F: MapFamily = BTreeFamily> {
    inner: RwLock<HierarchicalList<C, F>>,
}

impl<C: ?Sized, F: MapFamily> SharedHierarchicalList<C, F> {
    pub fn new(list: HierarchicalList<C, F>) -> Self {
        Self {
            inner: RwLock::new(list),
        }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub fn insert(&self, key: &str) -> Result<()> {
        self.inner.write().insert(key)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub fn delete(&self, key: &str) -> Result<bool> {
        self.inner.write().delete(key)
    }

    #[tracing::instrument(skip(self, ctx), level = "debug")]
    pub fn list(&self, prefix: &str, start_after: Option<&str>, ctx: &mut C) -> Result<ListSummary> {
        self.inner.read().list(prefix, start_after, ctx)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub fn list_page(&self, prefix: &str, start_after: Option<&str>, max_entries: usize) -> Result<ListPage> {
        self.inner.read().list_page(prefix, start_after, max_entries)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().contains(key)
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().node_count()
    }

    pub fn stats(&self) -> TreeStats {
        self.inner.read().stats()
    }

    /// Hold the read lock across several calls.
    pub fn read(&self) -> RwLockReadGuard<'_, HierarchicalList<C, F>> {
        self.inner.read()
    }

    /// Hold the write lock across several calls.
    pub fn write(&self) -> RwLockWriteGuard<'_, HierarchicalList<C, F>> {
        self.inner.write()
    }

    pub fn into_inner(self) -> HierarchicalList<C, F> {
        self.inner.into_inner()
    }
}

impl<C: ?Sized, F: MapFamily> From<HierarchicalList<C, F>> for SharedHierarchicalList<C, F> {
    fn from(list: HierarchicalList<C, F>) -> Self {
        Self::new(list)
    }
}
