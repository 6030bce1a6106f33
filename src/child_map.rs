//! Ordered child containers for trie nodes.
//!
//! Every node keeps its children in a string-keyed map ordered by byte-wise
//! key comparison. The trie only ever talks to that map through
//! [`ChildMap`], so any ordered structure with logarithmic point and
//! successor lookups can stand in. [`MapFamily`] picks the implementation
//! for a whole trie at once.

use std::collections::BTreeMap;
use std::ops::Bound;

/// Ordered `segment -> V` map used for a node's children.
pub trait ChildMap<V> {
    /// Point lookup.
    fn get(&self, key: &str) -> Option<&V>;

    fn get_mut(&mut self, key: &str) -> Option<&mut V>;

    /// Insert or replace, returning the previous value.
    fn insert(&mut self, key: String, value: V) -> Option<V>;

    /// Smallest entry.
    fn first(&self) -> Option<(&str, &V)>;

    /// Smallest entry strictly greater than `key`. `key` need not be present.
    fn next_after(&self, key: &str) -> Option<(&str, &V)>;

    fn remove(&mut self, key: &str) -> Option<V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

/// Chooses the [`ChildMap`] used at every level of a trie.
pub trait MapFamily {
    type Map<V>: ChildMap<V> + Default;
}

// =============================================================================
// BTreeMap
// =============================================================================

/// Children held in a [`BTreeMap`]. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct BTreeFamily;

impl MapFamily for BTreeFamily {
    type Map<V> = BTreeMap<String, V>;
}

impl<V> ChildMap<V> for BTreeMap<String, V> {
    #[inline]
    fn get(&self, key: &str) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        BTreeMap::get_mut(self, key)
    }

    #[inline]
    fn insert(&mut self, key: String, value: V) -> Option<V> {
        BTreeMap::insert(self, key, value)
    }

    #[inline]
    fn first(&self) -> Option<(&str, &V)> {
        self.first_key_value().map(|(k, v)| (k.as_str(), v))
    }

    fn next_after(&self, key: &str) -> Option<(&str, &V)> {
        self.range::<str, _>((Bound::Excluded(key), Bound::Unbounded))
            .next()
            .map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    fn remove(&mut self, key: &str) -> Option<V> {
        BTreeMap::remove(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    #[inline]
    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

// =============================================================================
// Sorted Vec
// =============================================================================

/// Children held in one sorted `Vec`, searched with binary search.
///
/// Cheaper than a B-tree for nodes with a handful of children; inserts and
/// removals shift the tail, so very wide directories favor [`BTreeFamily`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SortedVecFamily;

impl MapFamily for SortedVecFamily {
    type Map<V> = SortedVecMap<V>;
}

#[derive(Debug, Clone)]
pub struct SortedVecMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for SortedVecMap<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> SortedVecMap<V> {
    #[inline]
    fn search(&self, key: &str) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.as_str().cmp(key))
    }

    #[inline]
    fn entry_at(&self, idx: usize) -> Option<(&str, &V)> {
        self.entries.get(idx).map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> ChildMap<V> for SortedVecMap<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.search(key).ok().map(|idx| &self.entries[idx].1)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.search(key) {
            Ok(idx) => Some(&mut self.entries[idx].1),
            Err(_) => None,
        }
    }

    fn insert(&mut self, key: String, value: V) -> Option<V> {
        match self.search(&key) {
            Ok(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            Err(idx) => {
                self.entries.insert(idx, (key, value));
                None
            }
        }
    }

    fn first(&self) -> Option<(&str, &V)> {
        self.entry_at(0)
    }

    fn next_after(&self, key: &str) -> Option<(&str, &V)> {
        let idx = match self.search(key) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        };
        self.entry_at(idx)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.search(key).ok()?;
        Some(self.entries.remove(idx).1)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
