//! Burrows-Wheeler transform machinery.
//!
//! [`BwtGenerator`] computes the transform the textbook way: append a
//! sentinel that sorts below every other symbol, sort all cyclic rotations,
//! and read off the last column. [`BwtController`] then indexes the
//! transform with two wavelet trees -- one over the BWT string (the last
//! column) and one over its sorted permutation (the first column) -- which
//! together support walking the text forward or backward from any row
//! without ever materializing it.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::blocks::PopCountMapGenerator;
use crate::error::{Error, Result};
use crate::wavelet::WaveletTree;

/// Cyclic view of a text, starting at `start`.
struct Rotation<'a> {
    data: &'a [char],
    start: usize,
}

impl Rotation<'_> {
    fn char_at(&self, idx: usize) -> char {
        self.data[(self.start + idx) % self.data.len()]
    }

    /// Lexicographic comparison, character by character; equal prefixes
    /// tie-break on rotation length to keep the order total.
    fn compare(&self, other: &Self) -> Ordering {
        let lim = self.data.len().min(other.data.len());
        for i in 0..lim {
            match self.char_at(i).cmp(&other.char_at(i)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        self.data.len().cmp(&other.data.len())
    }
}

/// A computed transform: the BWT string, plus (optionally) each row's
/// rotation start position in the original text.
pub struct BwtString {
    /// Last column of the sorted rotation matrix.
    pub bwt: String,
    /// `indices[row]` = start position of row's rotation, when requested.
    pub indices: Option<Vec<usize>>,
}

/// Computes the BWT of sentinel-terminated strings.
#[derive(Debug)]
pub struct BwtGenerator {
    sentinel: char,
}

impl Default for BwtGenerator {
    fn default() -> Self {
        Self { sentinel: '\0' }
    }
}

impl BwtGenerator {
    /// Create a generator using `'\0'` as the end-of-string sentinel.
    pub fn new() -> Self {
        Self::default()
    }

    /// The end-of-string sentinel, lexicographically below every other
    /// symbol.
    pub fn sentinel(&self) -> char {
        self.sentinel
    }

    /// Compute the BWT of `text`, appending the sentinel when not already
    /// present.
    pub fn generate(&self, text: &str, include_indices: bool) -> BwtString {
        let mut chars: Vec<char> = text.chars().collect();
        if chars.last() != Some(&self.sentinel) {
            chars.push(self.sentinel);
        }
        let len = chars.len();
        let mut rotations: Vec<Rotation> = (0..len)
            .map(|start| Rotation {
                data: &chars,
                start,
            })
            .collect();
        rotations.sort_by(|a, b| a.compare(b));

        let bwt = rotations.iter().map(|r| r.char_at(len - 1)).collect();
        let indices = include_indices.then(|| rotations.iter().map(|r| r.start).collect());
        BwtString { bwt, indices }
    }
}

/// Indexes a text's BWT for rank/select queries and substring
/// reconstruction.
#[derive(Debug)]
pub struct BwtController {
    length: usize,
    alphabet: Arc<Alphabet>,
    bwt_tree: WaveletTree,
    sorted_tree: WaveletTree,
    sorted_char_counts: HashMap<char, usize>,
    indices: Option<Vec<usize>>,
}

impl BwtController {
    /// Build the controller for `text`. With `store_indices`, each BWT
    /// row's original-text offset is retained for position queries.
    ///
    /// Fails when `text` contains the sentinel anywhere but a trailing
    /// position, or when a structural invariant breaks mid-build.
    pub fn new(
        text: &str,
        store_indices: bool,
        generator: &mut PopCountMapGenerator,
    ) -> Result<Self> {
        let bwt_generator = BwtGenerator::new();
        let sentinel = bwt_generator.sentinel();
        let core = text.strip_suffix(sentinel).unwrap_or(text);
        if core.contains(sentinel) {
            return Err(Error::Construction(
                "text contains the end-of-string sentinel".into(),
            ));
        }

        let mut data = core.to_owned();
        data.push(sentinel);
        let length = data.chars().count();
        let alphabet = Arc::new(Alphabet::from_text(&data));

        let generated = bwt_generator.generate(core, store_indices);
        let sorted: String = {
            let mut cs: Vec<char> = generated.bwt.chars().collect();
            cs.sort_unstable();
            cs.into_iter().collect()
        };
        if generated.bwt.chars().count() != length {
            return Err(Error::Construction(
                "BWT and source text sizes diverge".into(),
            ));
        }
        if sorted.chars().count() != generated.bwt.chars().count() {
            return Err(Error::Construction(
                "BWT and sorted BWT sizes diverge".into(),
            ));
        }

        let bwt_tree = WaveletTree::with_alphabet(&generated.bwt, Arc::clone(&alphabet), generator)?;
        let sorted_tree = WaveletTree::with_alphabet(&sorted, Arc::clone(&alphabet), generator)?;

        // First occurrence of each symbol in the sorted column doubles as
        // the count of lexicographically smaller symbols (the C array).
        let mut sorted_char_counts = HashMap::new();
        for ch in alphabet.symbols() {
            let first = sorted_tree.select(ch, 1).ok_or_else(|| {
                Error::Construction(format!("symbol {ch:?} missing from sorted transform"))
            })?;
            sorted_char_counts.insert(ch, first);
        }

        log::debug!(
            "BWT controller built: {length} symbols, alphabet size {}",
            alphabet.len()
        );
        Ok(Self {
            length,
            alphabet,
            bwt_tree,
            sorted_tree,
            sorted_char_counts,
            indices: generated.indices,
        })
    }

    /// Length of the sentinel-terminated text.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Return true if the controller indexes nothing but the sentinel.
    pub fn is_empty(&self) -> bool {
        self.length <= 1
    }

    /// The alphabet shared by both wavelet trees.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Count of symbols lexicographically smaller than `ch` (the C array).
    pub fn sorted_char_counts(&self) -> &HashMap<char, usize> {
        &self.sorted_char_counts
    }

    /// Occurrences of `ch` in BWT rows `[0, idx]`.
    pub fn rank(&self, ch: char, idx: isize) -> usize {
        self.bwt_tree.rank(ch, idx)
    }

    /// Row of the `k`-th (1-based) occurrence of `ch` in the BWT.
    pub fn select(&self, ch: char, k: usize) -> Option<usize> {
        self.bwt_tree.select(ch, k)
    }

    /// Reconstruct a substring of the original text, anchored at the
    /// suffix start of BWT row `start_idx`.
    ///
    /// Positive `length` reads that many characters forward from the
    /// anchor; negative `length` reads the `|length|` characters
    /// immediately preceding it. Reads wrap cyclically through the
    /// sentinel.
    pub fn read(&self, start_idx: usize, length: isize) -> Result<String> {
        if start_idx >= self.length {
            return Err(Error::IndexOutOfBounds(start_idx));
        }
        if length >= 0 {
            self.read_fwd(start_idx, length as usize)
        } else {
            self.read_bwd(start_idx, length.unsigned_abs())
        }
    }

    fn read_fwd(&self, start: usize, len: usize) -> Result<String> {
        let mut out = String::with_capacity(len);
        let mut idx = start;
        for i in 0..len {
            let ch = self
                .sorted_tree
                .lookup(idx as isize)
                .ok_or(Error::IndexOutOfBounds(idx))?;
            out.push(ch);
            // FL step: this occurrence of ch in the first column reappears
            // in the last column at the row whose suffix starts one later.
            if i + 1 != len {
                let k = self.sorted_tree.rank(ch, idx as isize);
                idx = self
                    .bwt_tree
                    .select(ch, k)
                    .ok_or(Error::IndexOutOfBounds(idx))?;
            }
        }
        Ok(out)
    }

    fn read_bwd(&self, start: usize, len: usize) -> Result<String> {
        let mut buf = vec!['\0'; len];
        let mut idx = start;
        for i in (0..len).rev() {
            let ch = self
                .bwt_tree
                .lookup(idx as isize)
                .ok_or(Error::IndexOutOfBounds(idx))?;
            buf[i] = ch;
            if i != 0 {
                let k = self.bwt_tree.rank(ch, idx as isize);
                idx = self
                    .sorted_tree
                    .select(ch, k)
                    .ok_or(Error::IndexOutOfBounds(idx))?;
            }
        }
        Ok(buf.into_iter().collect())
    }

    /// Original-text offset of the suffix at BWT row `row`.
    ///
    /// Requires the controller to have been built with `store_indices`.
    pub fn original_index_of(&self, row: usize) -> Result<usize> {
        let indices = self.indices.as_ref().ok_or(Error::Unsupported(
            "original indices were not stored at construction",
        ))?;
        indices.get(row).copied().ok_or(Error::IndexOutOfBounds(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(text: &str, store_indices: bool) -> BwtController {
        let mut generator = PopCountMapGenerator::new();
        BwtController::new(text, store_indices, &mut generator).unwrap()
    }

    #[test]
    fn test_generate_abracadabra() {
        let bwt = BwtGenerator::new().generate("abracadabra", false);
        assert_eq!(bwt.bwt, "ard\0rcaaaabb");
        assert!(bwt.indices.is_none());
    }

    #[test]
    fn test_generate_indices() {
        let bwt = BwtGenerator::new().generate("abracadabra", true);
        // Row order = sorted suffixes of "abracadabra\0".
        assert_eq!(
            bwt.indices.unwrap(),
            vec![11, 10, 7, 0, 3, 5, 8, 1, 4, 6, 9, 2]
        );
    }

    #[test]
    fn test_generate_keeps_existing_sentinel() {
        let bwt = BwtGenerator::new().generate("abc\0", false);
        assert_eq!(bwt.bwt.chars().count(), 4);
    }

    #[test]
    fn test_sorted_char_counts() {
        let bwtc = controller("abracadabra", false);
        let c = bwtc.sorted_char_counts();
        assert_eq!(c[&'\0'], 0);
        assert_eq!(c[&'a'], 1);
        assert_eq!(c[&'b'], 6);
        assert_eq!(c[&'c'], 8);
        assert_eq!(c[&'d'], 9);
        assert_eq!(c[&'r'], 10);
    }

    #[test]
    fn test_single_char_reads() {
        let bwtc = controller("abracadabra", false);
        // Forward reads of length 1 walk the first (sorted) column.
        let expected = "\0aaaaabbcdrr";
        for (i, ch) in expected.chars().enumerate() {
            assert_eq!(bwtc.read(i, 1).unwrap(), ch.to_string(), "read({i}, 1)");
        }
    }

    #[test]
    fn test_forward_reads() {
        let bwtc = controller("abracadabra", false);
        assert_eq!(bwtc.read(2, 4).unwrap(), "abra");
        assert_eq!(bwtc.read(3, 12).unwrap(), "abracadabra\0");
        assert_eq!(bwtc.read(9, 4).unwrap(), "dabr");
        assert_eq!(bwtc.read(0, 4).unwrap(), "\0abr");
        // Wrapping through the sentinel back into the text head.
        assert_eq!(bwtc.read(2, 6).unwrap(), "abra\0a");
        assert_eq!(bwtc.read(5, 0).unwrap(), "");
    }

    #[test]
    fn test_backward_reads() {
        let bwtc = controller("abracadabra", false);
        assert_eq!(bwtc.read(7, -1).unwrap(), "a");
        assert_eq!(bwtc.read(0, -3).unwrap(), "bra");
        assert_eq!(bwtc.read(3, -2).unwrap(), "a\0");
    }

    #[test]
    fn test_full_read_in_two_parts() {
        let bwtc = controller("abracadabra", false);
        let full = "abracadabra\0";
        let starts = [11usize, 10, 7, 0, 3, 5, 8, 1, 4, 6, 9, 2];
        for (row, &p) in starts.iter().enumerate() {
            let rotation: String = full.chars().cycle().skip(p).take(12).collect();
            let fwd = bwtc.read(row, 6).unwrap();
            let bwd = bwtc.read(row, -6).unwrap();
            // Six forward plus the six preceding = the whole rotation,
            // because the text is cyclic.
            assert_eq!(format!("{fwd}{bwd}"), rotation, "row {row}");
        }
    }

    #[test]
    fn test_invertibility() {
        for text in ["abracadabra", "mississippi", "banana", "a", ""] {
            let bwtc = controller(text, false);
            let n = bwtc.len();
            // The row whose BWT character is the sentinel holds the suffix
            // starting at text position 0.
            let row = bwtc.select('\0', 1).unwrap();
            assert_eq!(bwtc.read(row, n as isize - 1).unwrap(), text, "{text:?}");
        }
    }

    #[test]
    fn test_rank_select_delegate() {
        let bwtc = controller("abracadabra", false);
        // BWT = "ard\0rcaaaabb"
        assert_eq!(bwtc.rank('a', 11), 5);
        assert_eq!(bwtc.rank('r', 4), 2);
        assert_eq!(bwtc.select('d', 1), Some(2));
        assert_eq!(bwtc.select('\0', 1), Some(3));
    }

    #[test]
    fn test_original_indices() {
        let bwtc = controller("abracadabra", true);
        assert_eq!(bwtc.original_index_of(3).unwrap(), 0);
        assert_eq!(bwtc.original_index_of(2).unwrap(), 7);
        assert!(matches!(
            bwtc.original_index_of(100),
            Err(Error::IndexOutOfBounds(_))
        ));

        let plain = controller("abracadabra", false);
        assert!(matches!(
            plain.original_index_of(0),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_interior_sentinel_rejected() {
        let mut generator = PopCountMapGenerator::new();
        assert!(matches!(
            BwtController::new("ab\0cd", false, &mut generator),
            Err(Error::Construction(_))
        ));
    }

    #[test]
    fn test_read_out_of_range() {
        let bwtc = controller("abc", false);
        assert!(bwtc.read(4, 1).is_err());
    }
}
