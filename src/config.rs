//! Configuration for a listing trie.
//!
//! # Example
//!
//! ```
//! use hier_list::ListConfig;
//!
//! let config = ListConfig::new("bucket", "/");
//! assert_eq!(config.max_key_len, 1024);
//!
//! let config = ListConfig::new("bucket", "/").with_max_key_len(256);
//! assert_eq!(config.max_key_len, 256);
//! ```

use crate::error::{ListError, Result};

/// Longest key, in bytes and including delimiters, accepted by default.
pub const DEFAULT_MAX_KEY_LEN: usize = 1024;

/// Namespace and tokenization settings for one trie.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListConfig {
    /// First segment every key must carry. It is not stored in the trie.
    pub root_prefix: String,

    /// Set of delimiter characters; any one of them splits segments.
    pub delimiter: String,

    /// Byte budget for keys and listing prefixes (default: 1024)
    #[cfg_attr(feature = "serde", serde(default = "default_max_key_len"))]
    pub max_key_len: usize,
}

#[cfg(feature = "serde")]
fn default_max_key_len() -> usize {
    DEFAULT_MAX_KEY_LEN
}

impl ListConfig {
    pub fn new(root_prefix: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            root_prefix: root_prefix.into(),
            delimiter: delimiter.into(),
            max_key_len: DEFAULT_MAX_KEY_LEN,
        }
    }

    pub fn with_max_key_len(mut self, max_key_len: usize) -> Self {
        self.max_key_len = max_key_len;
        self
    }

    /// Reject settings under which no key could ever be accepted.
    pub fn validate(&self) -> Result<()> {
        if self.root_prefix.is_empty() {
            return Err(ListError::InvalidConfig("root prefix is empty".into()));
        }
        if self.root_prefix.chars().any(|c| self.delimiter.contains(c)) {
            return Err(ListError::InvalidConfig(format!(
                "root prefix {:?} contains a delimiter character",
                self.root_prefix
            )));
        }
        if self.max_key_len == 0 {
            return Err(ListError::InvalidConfig("max_key_len must be non-zero".into()));
        }
        Ok(())
    }
}
