//! # Succinct Full-Text Indexing
//!
//! *Search a text that is no longer there.*
//!
//! ## Intuition First
//!
//! Imagine shredding a book, sorting the shreds, and keeping only a
//! carefully chosen last-letter-of-each-shred column plus a few counters.
//! It looks like destruction; it is actually an index. The
//! Burrows-Wheeler transform arranges the text so that counting and
//! locating any substring needs only rank queries over that single
//! column -- the book itself can be thrown away and still be quoted.
//!
//! ## The Problem
//!
//! Classic full-text indexes (suffix trees, suffix arrays) answer
//! substring queries fast but cost many times the text in pointers.
//! Compression shrinks the text but forfeits random access. A compressed
//! *self-index* wants both: near-entropy space and queries that never
//! decompress more than a few machine words.
//!
//! ## Historical Context
//!
//! ```text
//! 1994  Burrows-Wheeler  Block-sorting transform, built for compression
//! 2000  Ferragina-Manzini FM-index: backward search over the BWT
//! 2002  Raman-Raman-Rao  Succinct bit vectors via popcount classes
//! 2003  Grossi et al.    Wavelet trees: rank/select beyond binary
//! ```
//!
//! ## Structure
//!
//! The layers compose strictly upward:
//!
//! - [`BitVector`]: fixed-capacity bit-addressable buffer.
//! - [`Alphabet`]: dense sorted symbol ranks.
//! - [`BlockGenerator`] / [`PopCountMapGenerator`]: combinatorial block
//!   enumeration and (class, offset) lookup tables.
//! - [`Rrr`]: compressed bit vector with O(1)-ish rank/select.
//! - [`WaveletTree`]: rank/select/lookup over the full alphabet.
//! - [`BwtController`]: the transform plus its sorted column, walkable in
//!   both directions.
//! - [`FmIndex`]: backward-search substring queries, snippets, positions.
//!
//! ## Complexity Analysis
//!
//! - **Query**: O(m log σ) for a pattern of length m over alphabet σ.
//! - **Space**: text entropy plus o(n) index overhead per layer.
//! - **Construction**: sort-bound, O(n² log n) worst case for the
//!   rotation sort; a one-shot batch cost paid before any query.
//!
//! ## What Could Go Wrong
//!
//! 1. **Static only**: editing the text means rebuilding the index;
//!    nothing here supports incremental updates.
//! 2. **Sentinel discipline**: the index appends `'\0'` as its
//!    end-of-string marker, so input text must not contain it.
//!
//! ## References
//!
//! - Burrows, M., & Wheeler, D. (1994). "A block-sorting lossless data
//!   compression algorithm."
//! - Ferragina, P., & Manzini, G. (2000). "Opportunistic data structures
//!   with applications."
//! - Raman, R., Raman, V., & Rao, S. S. (2002). "Succinct indexable
//!   dictionaries with applications."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alphabet;
pub mod bitvec;
pub mod blocks;
pub mod bwt;
pub mod error;
pub mod fm_index;
pub mod rrr;
pub mod wavelet;

pub use alphabet::Alphabet;
pub use bitvec::BitVector;
pub use blocks::{BlockGenerator, PopCountMapGenerator};
pub use bwt::{BwtController, BwtGenerator};
pub use error::Error;
pub use fm_index::{FmIndex, FmIndexOptions, MatchRange};
pub use rrr::{Rrr, RrrConfig};
pub use wavelet::WaveletTree;
