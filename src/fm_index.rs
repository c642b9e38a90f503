//! FM-index: substring queries over a compressed text.
//!
//! The top of the stack. Construction runs the text through the BWT
//! controller once; afterwards the index answers occurrence-range queries
//! by backward search -- one rank per pattern character, right to left --
//! without ever touching the original text. Matched ranges can then be
//! expanded into context snippets or, when enabled, original-text
//! positions.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::blocks::PopCountMapGenerator;
use crate::bwt::BwtController;
use crate::error::{Error, Result};

/// Construction options for [`FmIndex`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FmIndexOptions {
    /// Retain a copy of the original text on the index.
    pub keep_data: bool,
    /// Record each BWT row's original-text offset, enabling
    /// [`FmIndex::query_string_indices`].
    pub store_indices: bool,
}

/// Inclusive range of BWT rows whose suffixes begin with the queried
/// pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    /// First matching row.
    pub start: usize,
    /// Last matching row.
    pub end: usize,
}

impl MatchRange {
    /// Number of occurrences in the range (never zero; an empty result is
    /// `None` at the query level).
    pub fn count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// A compressed full-text index over a single string.
#[derive(Debug)]
pub struct FmIndex {
    options: FmIndexOptions,
    controller: BwtController,
    data: Option<String>,
}

impl FmIndex {
    /// Build an index over `text` with default options.
    pub fn new(text: &str) -> Result<Self> {
        Self::with_options(text, FmIndexOptions::default())
    }

    /// Build an index over `text`.
    ///
    /// Fails fast on construction-invariant violations (for instance a
    /// text containing the end-of-string sentinel); no partially-built
    /// index is ever returned.
    pub fn with_options(text: &str, options: FmIndexOptions) -> Result<Self> {
        let mut generator = PopCountMapGenerator::new();
        let controller = BwtController::new(text, options.store_indices, &mut generator)?;
        log::debug!("FM-index built over {} symbols", controller.len());
        Ok(Self {
            options,
            controller,
            data: options.keep_data.then(|| text.to_owned()),
        })
    }

    /// Length of the indexed text, sentinel included.
    pub fn len(&self) -> usize {
        self.controller.len()
    }

    /// Return true if the index holds nothing but the sentinel.
    pub fn is_empty(&self) -> bool {
        self.controller.is_empty()
    }

    /// The original text, when built with `keep_data`.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// The alphabet of the indexed text.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.controller.alphabet()
    }

    /// Find the BWT-row range of suffixes beginning with `pattern`.
    ///
    /// Backward search: for each pattern character right to left,
    /// `s = C[ch] + rank(ch, s - 1)` and `e = C[ch] + rank(ch, e) - 1`.
    /// `None` as soon as the range empties, or when a pattern character
    /// does not occur in the text at all. The empty pattern matches
    /// nothing.
    pub fn query(&self, pattern: &str) -> Option<MatchRange> {
        if pattern.is_empty() {
            return None;
        }
        let counts = self.controller.sorted_char_counts();
        let mut s = 0isize;
        let mut e = self.controller.len() as isize - 1;
        for ch in pattern.chars().rev() {
            let c = *counts.get(&ch)? as isize;
            s = c + self.controller.rank(ch, s - 1) as isize;
            e = c + self.controller.rank(ch, e) as isize - 1;
            if e < s {
                return None;
            }
        }
        Some(MatchRange {
            start: s as usize,
            end: e as usize,
        })
    }

    /// Number of occurrences of `pattern`, without materializing them.
    pub fn count(&self, pattern: &str) -> usize {
        self.query(pattern).map_or(0, |r| r.count())
    }

    /// Context snippets for up to `limit` occurrences of `pattern`: each
    /// snippet is `pre_len` characters of preceding context followed by
    /// `post_len` characters starting at the match.
    ///
    /// An unmatched pattern yields an empty vector, not an error.
    pub fn query_snippets(
        &self,
        pattern: &str,
        pre_len: usize,
        post_len: usize,
        limit: usize,
    ) -> Result<Vec<String>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let Some(range) = self.query(pattern) else {
            return Ok(Vec::new());
        };
        let n = range.count().min(limit);
        let mut snippets = Vec::with_capacity(n);
        for i in 0..n {
            let row = range.start + i;
            let mut snippet = self.controller.read(row, -(pre_len as isize))?;
            snippet.push_str(&self.controller.read(row, post_len as isize)?);
            snippets.push(snippet);
        }
        Ok(snippets)
    }

    /// Original-text offsets of up to `limit` occurrences of `pattern`,
    /// in BWT-row order.
    ///
    /// Errors unless the index was built with
    /// [`store_indices`](FmIndexOptions::store_indices).
    pub fn query_string_indices(&self, pattern: &str, limit: usize) -> Result<Vec<usize>> {
        if !self.options.store_indices {
            return Err(Error::Unsupported(
                "position queries require store_indices at construction",
            ));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }
        let Some(range) = self.query(pattern) else {
            return Ok(Vec::new());
        };
        let n = range.count().min(limit);
        (0..n)
            .map(|i| self.controller.original_index_of(range.start + i))
            .collect()
    }
}
