//! # hier-list
//!
//! A prefix trie over delimiter-separated keys that answers hierarchical
//! listings: given `root/2021/01/file1`, `root/2021/01/file2` and
//! `root/2021/02/file3`, listing `root/2021` yields the directories `01` and
//! `02`, and listing `root/2021/01` yields the keys `file1` and `file2`.
//!
//! This is the index behind S3-style `ListObjectsV2` with a delimiter:
//! common-prefix grouping plus paginated, resumable enumeration, without
//! scanning the whole keyspace.
//!
//! ## Features
//!
//! - **One-level listing**: only direct children of a prefix, in byte order
//! - **Resumable**: continue strictly after any key (pagination)
//! - **Early stop**: the listing sink decides when it has seen enough
//! - **Exact pruning**: deleting a key removes every ancestor no other key
//!   needs, and nothing more
//! - **Pluggable child maps**: `BTreeMap` by default, sorted `Vec` optional
//!
//! ## Example
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use hier_list::HierarchicalList;
//!
//! let mut tree = HierarchicalList::new("root", "/", |out: &mut Vec<(String, bool)>, seg: &str, leaf: bool| {
//!     out.push((seg.to_string(), leaf));
//!     ControlFlow::Continue(())
//! });
//!
//! tree.insert("root/2021/01/file1").unwrap();
//! tree.insert("root/2021/01/file2").unwrap();
//! tree.insert("root/2021/02/file3").unwrap();
//!
//! let mut out = Vec::new();
//! tree.list("root/2021", None, &mut out).unwrap();
//! assert_eq!(out, vec![("01".to_string(), false), ("02".to_string(), false)]);
//!
//! // Resume after "file1".
//! let mut out = Vec::new();
//! tree.list("root/2021/01", Some("file1"), &mut out).unwrap();
//! assert_eq!(out, vec![("file2".to_string(), true)]);
//! ```

#![warn(clippy::all)]

pub mod child_map;
pub mod config;
pub mod error;
mod key;
pub mod node;
pub mod shared;
pub mod tree;

pub use child_map::{BTreeFamily, ChildMap, MapFamily, SortedVecFamily, SortedVecMap};
pub use config::{ListConfig, DEFAULT_MAX_KEY_LEN};
pub use error::{ListError, Result};
pub use node::TrieNode;
pub use shared::SharedHierarchicalList;
pub use tree::{HierarchicalList, ListCallback, ListEntry, ListPage, ListSummary, TreeStats};


#[cfg(test)]
mod proptests;
