//! Wavelet tree over RRR-compressed bit vectors.
//!
//! Generalizes rank/select from bits to an arbitrary alphabet: each node
//! bisects the alphabet's rank range at `mid` and stores one bit per
//! character of its (sub)string -- 0 for the lower half, 1 for the upper --
//! compressed as an [`Rrr`]. Recursion stops once a node's subrange spans
//! at most two symbols, which a single bit per position resolves.
//!
//! `rank`, `select`, and `lookup` each walk one root-to-leaf path, so all
//! three cost O(log |alphabet|) RRR operations.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::bitvec::BitVector;
use crate::blocks::PopCountMapGenerator;
use crate::error::{Error, Result};
use crate::rrr::{Rrr, RrrConfig};

/// Wavelet tree node.
#[derive(Debug)]
enum WaveletNode {
    /// Covers at most two alphabet ranks; `mid` resolves them directly.
    Leaf { rrr: Rrr, mid: u32 },
    /// Bisects `[start, end]` at `mid`; children cover the halves.
    Internal {
        rrr: Rrr,
        mid: u32,
        left: Box<WaveletNode>,
        right: Box<WaveletNode>,
    },
}

/// Rank/select/lookup over a string drawn from an arbitrary alphabet.
#[derive(Debug)]
pub struct WaveletTree {
    root: WaveletNode,
    alphabet: Arc<Alphabet>,
    len: usize,
}

impl WaveletTree {
    /// Build a tree over `data`, deriving the alphabet from the string
    /// itself.
    pub fn new(data: &str, generator: &mut PopCountMapGenerator) -> Result<Self> {
        let alphabet = Arc::new(Alphabet::from_text(data));
        Self::with_alphabet(data, alphabet, generator)
    }

    /// Build a tree over `data` with a caller-supplied alphabet, which must
    /// cover every character of `data`.
    pub fn with_alphabet(
        data: &str,
        alphabet: Arc<Alphabet>,
        generator: &mut PopCountMapGenerator,
    ) -> Result<Self> {
        Self::with_config(data, alphabet, RrrConfig::default(), generator)
    }

    /// Build with explicit RRR geometry.
    pub fn with_config(
        data: &str,
        alphabet: Arc<Alphabet>,
        config: RrrConfig,
        generator: &mut PopCountMapGenerator,
    ) -> Result<Self> {
        let ranks = data
            .chars()
            .map(|ch| {
                alphabet
                    .index_of(ch)
                    .ok_or_else(|| Error::Construction(format!("symbol {ch:?} not in alphabet")))
            })
            .collect::<Result<Vec<u32>>>()?;
        let end = (alphabet.len().saturating_sub(1)) as u32;
        let root = Self::build(&ranks, 0, end, config, generator);
        Ok(Self {
            root,
            alphabet,
            len: ranks.len(),
        })
    }

    /// Length of the underlying string.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if the underlying string is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The alphabet this tree was built over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    fn build(
        ranks: &[u32],
        start: u32,
        end: u32,
        config: RrrConfig,
        generator: &mut PopCountMapGenerator,
    ) -> WaveletNode {
        let is_leaf = end - start < 2;
        let mid = start + (end - start) / 2;
        let mut words = vec![0u32; ranks.len().div_ceil(32)];
        let mut left = Vec::new();
        let mut right = Vec::new();
        for (i, &r) in ranks.iter().enumerate() {
            if r <= mid {
                if !is_leaf {
                    left.push(r);
                }
            } else {
                words[i / 32] |= 1 << (31 - i % 32);
                if !is_leaf {
                    right.push(r);
                }
            }
        }
        let mut bv = BitVector::new(ranks.len());
        bv.write_numbers(0, ranks.len(), &words);
        let rrr = Rrr::from_bit_vector(&bv, config, generator);

        if is_leaf {
            WaveletNode::Leaf { rrr, mid }
        } else {
            WaveletNode::Internal {
                rrr,
                mid,
                left: Box::new(Self::build(&left, start, mid, config, generator)),
                right: Box::new(Self::build(&right, mid + 1, end, config, generator)),
            }
        }
    }

    /// Number of occurrences of `ch` in positions `[0, idx]`.
    ///
    /// 0 when `ch` is not in the alphabet or `idx` is negative; saturates
    /// past the end of the string.
    pub fn rank(&self, ch: char, idx: isize) -> usize {
        let Some(ch_rank) = self.alphabet.index_of(ch) else {
            return 0;
        };
        if idx < 0 {
            return 0;
        }
        Self::rank_node(&self.root, ch_rank, idx)
    }

    fn rank_node(node: &WaveletNode, ch_rank: u32, idx: isize) -> usize {
        match node {
            WaveletNode::Leaf { rrr, mid } => {
                if ch_rank > *mid {
                    rrr.rank1(idx)
                } else {
                    rrr.rank0(idx)
                }
            }
            WaveletNode::Internal {
                rrr,
                mid,
                left,
                right,
            } => {
                if ch_rank > *mid {
                    let r = rrr.rank1(idx);
                    Self::rank_node(right, ch_rank, r as isize - 1)
                } else {
                    let r = rrr.rank0(idx);
                    Self::rank_node(left, ch_rank, r as isize - 1)
                }
            }
        }
    }

    /// Position of the `k`-th (1-based) occurrence of `ch`, or `None` when
    /// there is no such occurrence.
    pub fn select(&self, ch: char, k: usize) -> Option<usize> {
        let ch_rank = self.alphabet.index_of(ch)?;
        Self::select_node(&self.root, ch_rank, k)
    }

    fn select_node(node: &WaveletNode, ch_rank: u32, k: usize) -> Option<usize> {
        match node {
            WaveletNode::Leaf { rrr, mid } => {
                if ch_rank > *mid {
                    rrr.select1(k)
                } else {
                    rrr.select0(k)
                }
            }
            WaveletNode::Internal {
                rrr,
                mid,
                left,
                right,
            } => {
                // The child's position is the (pos + 1)-th bit of this
                // node's matching side.
                if ch_rank > *mid {
                    let pos = Self::select_node(right, ch_rank, k)?;
                    rrr.select1(pos + 1)
                } else {
                    let pos = Self::select_node(left, ch_rank, k)?;
                    rrr.select0(pos + 1)
                }
            }
        }
    }

    /// The character at position `idx`, or `None` out of range.
    pub fn lookup(&self, idx: isize) -> Option<char> {
        let rank = Self::lookup_node(&self.root, idx)?;
        self.alphabet.lookup(rank)
    }

    fn lookup_node(node: &WaveletNode, idx: isize) -> Option<u32> {
        match node {
            WaveletNode::Leaf { rrr, mid } => {
                rrr.bit(idx).map(|b| if b { mid + 1 } else { *mid })
            }
            WaveletNode::Internal {
                rrr,
                mid: _,
                left,
                right,
            } => {
                let b = rrr.bit(idx)?;
                if b {
                    Self::lookup_node(right, rrr.rank1(idx) as isize - 1)
                } else {
                    Self::lookup_node(left, rrr.rank0(idx) as isize - 1)
                }
            }
        }
    }
}
