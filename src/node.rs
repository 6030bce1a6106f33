//! Trie nodes.

use std::ops::ControlFlow;

use crate::child_map::{BTreeFamily, ChildMap, MapFamily};
use crate::tree::ListSummary;

/// One path segment's state.
///
/// A node can be a leaf (a stored key ends here) and a directory (longer keys
/// continue below it) at the same time. A non-leaf node with no children is
/// never left in a trie; deletion prunes it straight away.
pub struct TrieNode<F: MapFamily = BTreeFamily> {
    pub(crate) is_leaf: bool,
    pub(crate) children: F::Map<TrieNode<F>>,
}

impl<F: MapFamily> Default for TrieNode<F> {
    fn default() -> Self {
        Self {
            is_leaf: false,
            children: Default::default(),
        }
    }
}

impl<F: MapFamily> TrieNode<F> {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    #[inline]
    pub fn children(&self) -> &F::Map<TrieNode<F>> {
        &self.children
    }

    #[inline]
    pub fn child(&self, segment: &str) -> Option<&TrieNode<F>> {
        self.children.get(segment)
    }

    /// Neither a key nor a prefix of one.
    #[inline]
    pub(crate) fn is_prunable(&self) -> bool {
        !self.is_leaf && self.children.is_empty()
    }

    /// Number of stored keys ending at or below this node.
    pub fn leaf_count(&self) -> usize {
        let mut count = usize::from(self.is_leaf);
        let mut cursor = self.children.first();
        while let Some((segment, child)) = cursor {
            count += child.leaf_count();
            cursor = self.children.next_after(segment);
        }
        count
    }

    /// Feed direct children to `sink` in key order, starting strictly after
    /// `start_after` when given.
    ///
    /// The successor is only looked up once `sink` has returned
    /// [`ControlFlow::Continue`].
    pub(crate) fn walk_children(
        &self,
        start_after: Option<&str>,
        mut sink: impl FnMut(&str, bool) -> ControlFlow<()>,
    ) -> ListSummary {
        let mut summary = ListSummary::default();
        let mut cursor = match start_after {
            Some(key) => self.children.next_after(key),
            None => self.children.first(),
        };

        while let Some((segment, child)) = cursor {
            summary.delivered += 1;
            if sink(segment, child.is_leaf).is_break() {
                summary.stopped = true;
                break;
            }
            cursor = self.children.next_after(segment);
        }
        summary
    }
}
