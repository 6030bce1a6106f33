//! Key tokenization.
//!
//! `root/2021/01/file1` with delimiter `/` becomes `["2021", "01", "file1"]`
//! once the root prefix is checked and dropped. The delimiter string is a set
//! of characters, and empty segments are skipped, so `root//2021/` and
//! `root/2021` name the same path.

use smallvec::SmallVec;

use crate::config::ListConfig;
use crate::error::{ListError, Result};

/// Tokenized path. Most object keys are shallow enough to stay inline.
pub(crate) type Segments<'a> = SmallVec<[&'a str; 8]>;

#[inline]
pub(crate) fn check_len(key: &str, max: usize) -> Result<()> {
    if key.len() > max {
        return Err(ListError::KeyTooLong { len: key.len(), max });
    }
    Ok(())
}

/// Split on any delimiter character, dropping empty segments.
pub(crate) fn split<'a>(key: &'a str, delimiter: &str) -> Segments<'a> {
    key.split(|c: char| delimiter.contains(c))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Length-check and tokenize `key`, then strip the root prefix.
///
/// The returned segments may be empty when `key` is just the root prefix.
/// A key with no segments at all, or one whose first segment differs from
/// the root prefix, is a [`ListError::PrefixMismatch`].
pub(crate) fn below_root<'a>(key: &'a str, config: &ListConfig) -> Result<Segments<'a>> {
    check_len(key, config.max_key_len)?;
    let mut segments = split(key, &config.delimiter);
    match segments.first() {
        Some(&first) if first == config.root_prefix => {
            segments.remove(0);
            Ok(segments)
        }
        _ => Err(ListError::PrefixMismatch),
    }
}
