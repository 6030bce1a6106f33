//! The hierarchical listing trie.

use std::fmt;
use std::ops::ControlFlow;

use tracing::{debug, error, info, trace};

use crate::child_map::{BTreeFamily, ChildMap, MapFamily};
use crate::config::ListConfig;
use crate::error::{ListError, Result};
use crate::key::{self, Segments};
use crate::node::TrieNode;

/// Listing sink registered at construction.
///
/// Called once per enumerated child with the caller's context, the child's
/// segment and whether a stored key ends there. Returning
/// [`ControlFlow::Break`] ends the listing.
pub type ListCallback<C> = Box<dyn Fn(&mut C, &str, bool) -> ControlFlow<()> + Send + Sync>;

/// Outcome of one listing call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListSummary {
    /// Children handed to the sink, including the one that stopped it.
    pub delivered: usize,
    /// The sink asked to stop.
    pub stopped: bool,
}

/// One direct child of a listed prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub segment: String,
    /// A stored key ends at this segment. It may still have children.
    pub is_leaf: bool,
}

/// A bounded slice of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub entries: Vec<ListEntry>,
    /// Resume key for the next page; `None` once the listing is exhausted.
    pub next_start: Option<String>,
}

/// Snapshot of the diagnostic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Live nodes, root excluded
    pub node_count: usize,
    /// Deepest segment count seen by insert (high-water mark)
    pub max_depth: usize,
    /// Stored keys
    pub leaf_count: usize,
    /// Direct children of the root
    pub top_level: usize,
}

/// Prefix trie answering "what are the direct children of this prefix?".
///
/// Keys look like `root/2021/01/file1`: the first segment must equal the
/// configured root prefix and is not stored, every later segment is one trie
/// level. Listing a prefix enumerates the segments one level below it in
/// byte order, flagging which of them are stored keys.
///
/// The trie does no locking of its own. Wrap it in a
/// [`SharedHierarchicalList`](crate::SharedHierarchicalList) to share it
/// between threads.
pub struct HierarchicalList<C: ?Sized = (), F: MapFamily = BTreeFamily> {
    config: ListConfig,
    callback: ListCallback<C>,
    root: TrieNode<F>,
    node_count: usize,
    max_depth: usize,
}

impl<C: ?Sized> HierarchicalList<C, BTreeFamily> {
    /// Create an empty trie with the default key budget.
    pub fn new<Cb>(root_prefix: impl Into<String>, delimiter: impl Into<String>, callback: Cb) -> Self
    where
        Cb: Fn(&mut C, &str, bool) -> ControlFlow<()> + Send + Sync + 'static,
    {
        Self::from_parts(ListConfig::new(root_prefix, delimiter), Box::new(callback))
    }

    /// Create an empty trie from a validated configuration.
    pub fn with_config<Cb>(config: ListConfig, callback: Cb) -> Result<Self>
    where
        Cb: Fn(&mut C, &str, bool) -> ControlFlow<()> + Send + Sync + 'static,
    {
        Self::with_map_family(config, callback)
    }
}

impl<C: ?Sized, F: MapFamily> HierarchicalList<C, F> {
    /// Like [`HierarchicalList::with_config`], with children stored in `F`'s map.
    pub fn with_map_family<Cb>(config: ListConfig, callback: Cb) -> Result<Self>
    where
        Cb: Fn(&mut C, &str, bool) -> ControlFlow<()> + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Self::from_parts(config, Box::new(callback)))
    }

    fn from_parts(config: ListConfig, callback: ListCallback<C>) -> Self {
        Self {
            config,
            callback,
            root: TrieNode::default(),
            node_count: 0,
            max_depth: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    #[inline]
    pub fn root(&self) -> &TrieNode<F> {
        &self.root
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Store `key`.
    ///
    /// Missing segments are created as directories and the last one is
    /// marked as a leaf. Existing nodes keep their leaf flag, so a key can be
    /// a stored entry and a prefix of other keys at once. Inserting a key
    /// twice changes nothing.
    ///
    /// Fails with [`ListError::PrefixMismatch`] when the first segment is not
    /// the root prefix or nothing follows it, and with
    /// [`ListError::KeyTooLong`] over the byte budget. Neither touches the
    /// trie.
    pub fn insert(&mut self, key: &str) -> Result<()> {
        let segments = key::below_root(key, &self.config)?;
        if segments.is_empty() {
            return Err(ListError::PrefixMismatch);
        }

        // Own every segment that needs a new node before the first mutation.
        let existing = self.existing_depth(&segments);
        let mut fresh = reserve_segments(&segments[existing..])?.into_iter();
        let created = segments.len() - existing;

        let mut node = &mut self.root;
        for segment in segments.iter() {
            if node.children.get(segment).is_none() {
                let owned = fresh
                    .next()
                    .ok_or_else(|| invariant("new segment was not reserved"))?;
                node.children.insert(owned, TrieNode::default());
            }
            node = node
                .children
                .get_mut(segment)
                .ok_or_else(|| invariant("child missing right after insert"))?;
        }
        node.is_leaf = true;

        self.node_count += created;
        if segments.len() > self.max_depth {
            self.max_depth = segments.len();
        }
        trace!(key, created, "inserted key");
        Ok(())
    }

    /// How many leading segments already exist as nodes.
    fn existing_depth(&self, segments: &[&str]) -> usize {
        let mut node = &self.root;
        for (depth, segment) in segments.iter().enumerate() {
            match node.child(segment) {
                Some(child) => node = child,
                None => return depth,
            }
        }
        segments.len()
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Remove `key`, pruning every ancestor left with no purpose.
    ///
    /// Returns `Ok(true)` only when a stored key was found and cleared.
    /// A wrong root prefix, a missing segment, or a path that exists only as
    /// a directory give `Ok(false)` and leave the trie untouched. Pruning stops
    /// at the first ancestor that is itself a key or still has children; the
    /// root is never removed.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        let segments = match key::below_root(key, &self.config) {
            Ok(segments) => segments,
            Err(ListError::PrefixMismatch) => return Ok(false),
            Err(e) => return Err(e),
        };

        let mut pruned = 0usize;
        let removal = Self::delete_below(&mut self.root, &segments, &mut pruned)?;
        self.node_count -= pruned;

        match removal {
            Removal::NotFound => {
                trace!(key, "delete: key not present");
                Ok(false)
            }
            Removal::Cleared | Removal::Pruned => {
                debug!(key, pruned, "deleted key");
                Ok(true)
            }
        }
    }

    fn delete_below(node: &mut TrieNode<F>, segments: &[&str], pruned: &mut usize) -> Result<Removal> {
        let Some((&segment, rest)) = segments.split_first() else {
            return Ok(Removal::NotFound);
        };
        let Some(child) = node.children.get_mut(segment) else {
            return Ok(Removal::NotFound);
        };

        if rest.is_empty() {
            if !child.is_leaf {
                return Ok(Removal::NotFound);
            }
            child.is_leaf = false;
        } else {
            match Self::delete_below(child, rest, pruned)? {
                Removal::Pruned => {}
                // The level below kept its node, so `child` still has a child.
                other => return Ok(other),
            }
        }

        if !child.is_prunable() {
            return Ok(Removal::Cleared);
        }
        if node.children.remove(segment).is_none() {
            return Err(invariant("prunable child vanished before removal"));
        }
        *pruned += 1;
        Ok(Removal::Pruned)
    }

    // =========================================================================
    // List
    // =========================================================================

    /// Stream the direct children of `prefix` to the registered callback.
    ///
    /// `prefix` is tokenized like a key; an empty prefix or the bare root
    /// prefix lists the top level. With `start_after`, listing resumes at the
    /// first child strictly greater than it, whether or not that key exists.
    /// A prefix that ends at a stored key lists that key's children, which
    /// may be none.
    ///
    /// Fails with [`ListError::NotFound`] if a prefix segment is missing,
    /// before any callback.
    pub fn list(&self, prefix: &str, start_after: Option<&str>, ctx: &mut C) -> Result<ListSummary> {
        let node = self.locate(prefix)?;
        let callback = &self.callback;
        let summary = node.walk_children(start_after, |segment, is_leaf| callback(ctx, segment, is_leaf));
        trace!(prefix, ?start_after, delivered = summary.delivered, stopped = summary.stopped, "listed prefix");
        Ok(summary)
    }

    /// [`list`](Self::list) with an ad-hoc sink instead of the registered
    /// callback.
    pub fn list_with(
        &self,
        prefix: &str,
        start_after: Option<&str>,
        sink: impl FnMut(&str, bool) -> ControlFlow<()>,
    ) -> Result<ListSummary> {
        let node = self.locate(prefix)?;
        Ok(node.walk_children(start_after, sink))
    }

    /// Collect at most `max_entries` children of `prefix`.
    ///
    /// `next_start` is set to the last returned segment when more children
    /// follow it; pass it back as `start_after` to fetch the next page.
    ///
    /// An empty page (`max_entries == 0`) resumes where it started: it
    /// returns `start_after`, or `""` for a listing from the top, when any
    /// child remains. Segments are never empty, so `""` precedes all of them.
    pub fn list_page(&self, prefix: &str, start_after: Option<&str>, max_entries: usize) -> Result<ListPage> {
        let node = self.locate(prefix)?;
        if max_entries == 0 {
            let remaining = match start_after {
                Some(key) => node.children.next_after(key).is_some(),
                None => !node.children.is_empty(),
            };
            return Ok(ListPage {
                entries: Vec::new(),
                next_start: remaining.then(|| start_after.unwrap_or("").to_owned()),
            });
        }

        let mut entries = Vec::new();
        node.walk_children(start_after, |segment, is_leaf| {
            entries.push(ListEntry {
                segment: segment.to_owned(),
                is_leaf,
            });
            if entries.len() >= max_entries {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        let next_start = match entries.last() {
            Some(last) if node.children.next_after(&last.segment).is_some() => Some(last.segment.clone()),
            _ => None,
        };
        Ok(ListPage { entries, next_start })
    }

    fn locate(&self, prefix: &str) -> Result<&TrieNode<F>> {
        key::check_len(prefix, self.config.max_key_len)?;
        let segments: Segments<'_> = key::split(prefix, &self.config.delimiter);
        let below: &[&str] = match segments.split_first() {
            None => &[],
            Some((&first, rest)) if first == self.config.root_prefix => rest,
            Some(_) => return Err(ListError::PrefixMismatch),
        };

        let mut node = &self.root;
        for &segment in below {
            match node.child(segment) {
                Some(child) => node = child,
                None => {
                    debug!(prefix, segment, "listing prefix not found");
                    return Err(ListError::NotFound);
                }
            }
        }
        Ok(node)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Whether `key` is stored (not merely a prefix of stored keys).
    pub fn contains(&self, key: &str) -> bool {
        let Ok(segments) = key::below_root(key, &self.config) else {
            return false;
        };
        if segments.is_empty() {
            return false;
        }
        let mut node = &self.root;
        for segment in segments.iter() {
            match node.child(segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.is_leaf
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Live nodes below the root.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Walks the whole trie.
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            node_count: self.node_count,
            max_depth: self.max_depth,
            leaf_count: self.leaf_count(),
            top_level: self.root.children.len(),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.stats();
        info!(
            root_prefix = %self.config.root_prefix,
            node_count = stats.node_count,
            max_depth = stats.max_depth,
            leaf_count = stats.leaf_count,
            top_level = stats.top_level,
            "listing trie stats"
        );
    }
}

impl<C: ?Sized, F: MapFamily> fmt::Debug for HierarchicalList<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchicalList")
            .field("config", &self.config)
            .field("node_count", &self.node_count)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    NotFound,
    /// Leaf cleared; the node at this level stays.
    Cleared,
    /// The node at this level was removed from its parent.
    Pruned,
}

fn reserve_segments(segments: &[&str]) -> Result<Vec<String>> {
    let mut owned = Vec::new();
    owned
        .try_reserve_exact(segments.len())
        .map_err(|_| ListError::AllocationFailure)?;
    for segment in segments {
        let mut s = String::new();
        s.try_reserve_exact(segment.len())
            .map_err(|_| ListError::AllocationFailure)?;
        s.push_str(segment);
        owned.push(s);
    }
    Ok(owned)
}

#[cold]
fn invariant(what: &'static str) -> ListError {
    error!(what, "listing trie invariant violated");
    debug_assert!(false, "listing trie invariant violated: {what}");
    ListError::InternalInvariantViolation(what)
}
