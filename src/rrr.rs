//! RRR: a compressed bit vector with rank and select.
//!
//! Raman-Raman-Rao encoding: the source vector is cut into `block_size`-bit
//! blocks, and each block is stored as a (class, offset) pair -- its
//! popcount plus its combinatorial rank among all blocks of that popcount.
//! Dense blocks and sparse blocks alike collapse to a few bits, bringing
//! the total close to the information-theoretic minimum.
//!
//! # Query structure
//!
//! Every `super_block_size` blocks, two caches are snapshotted: the
//! absolute rank so far (`super_block_ranks`) and the bit offset of the
//! super-block's first code in the compressed stream
//! (`super_block_offsets`). A query jumps to the containing super-block in
//! O(1) (rank) or O(log n) (select), then decodes at most
//! `super_block_size` blocks -- sub-linear in the vector length.
//!
//! # Edge semantics
//!
//! Negative indices rank to 0 and indices past the end saturate at the
//! total popcount; `bit` and `select` answer `None` out of range. The
//! recursive wavelet-tree algorithms lean on these exact conventions.

use std::sync::Arc;

use crate::bitvec::BitVector;
use crate::blocks::{PopCountMap, PopCountMapGenerator};

/// Block/super-block geometry for the RRR encoding.
#[derive(Debug, Clone, Copy)]
pub struct RrrConfig {
    /// Bits per block (at most 30).
    pub block_size: u32,
    /// Blocks per super-block.
    pub super_block_size: u32,
}

impl Default for RrrConfig {
    fn default() -> Self {
        Self {
            block_size: 7,
            super_block_size: 8,
        }
    }
}

/// A succinct bit vector supporting rank, select, and bit lookup.
pub struct Rrr {
    num_bits: usize,
    total_ones: usize,
    block_size: usize,
    super_block_size: usize,
    map: Arc<PopCountMap>,
    codes: BitVector,
    super_block_ranks: Vec<usize>,
    super_block_offsets: Vec<usize>,
}

impl std::fmt::Debug for Rrr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rrr")
            .field("num_bits", &self.num_bits)
            .field("total_ones", &self.total_ones)
            .finish()
    }
}

impl Rrr {
    /// Compress `bv` into the (class, offset) encoding.
    pub fn from_bit_vector(
        bv: &BitVector,
        config: RrrConfig,
        generator: &mut PopCountMapGenerator,
    ) -> Self {
        let map = generator.generate(config.block_size);
        let block_size = config.block_size as usize;
        let super_block_size = config.super_block_size as usize;
        let class_size = map.class_size() as usize;
        let num_bits = bv.len();
        let num_blocks = num_bits.div_ceil(block_size);

        // Pass 1: classify every block and size the code stream.
        let mut encoded = Vec::with_capacity(num_blocks);
        let mut total_code_bits = 0;
        for j in 0..num_blocks {
            let start = j * block_size;
            let len = block_size.min(num_bits - start);
            // MSB-aligned read; missing tail bits of the last block pad
            // with zeros, which never contribute to a rank.
            let word = bv.read_numbers(start, len)[0];
            let value = word >> (32 - config.block_size);
            let info = map.info(value).expect("popcount map covers all blocks");
            let width = map.offset_width(info.class) as usize;
            encoded.push((info.class, info.offset, width));
            total_code_bits += class_size + width;
        }

        // Pass 2: lay the codes out and snapshot the super-block caches.
        let mut codes = BitVector::new(total_code_bits);
        let mut super_block_ranks = Vec::with_capacity(num_blocks / super_block_size + 2);
        let mut super_block_offsets = Vec::with_capacity(num_blocks / super_block_size + 1);
        let mut rank = 0usize;
        let mut pos = 0usize;
        for (j, &(class, offset, width)) in encoded.iter().enumerate() {
            if j % super_block_size == 0 {
                super_block_ranks.push(rank);
                super_block_offsets.push(pos);
            }
            codes.write_numbers(pos, class_size, &[class << (32 - class_size)]);
            pos += class_size;
            if width > 0 {
                codes.write_numbers(pos, width, &[offset << (32 - width as u32)]);
                pos += width;
            }
            rank += class as usize;
        }
        super_block_ranks.push(rank);

        Self {
            num_bits,
            total_ones: rank,
            block_size,
            super_block_size,
            map,
            codes,
            super_block_ranks,
            super_block_offsets,
        }
    }

    /// Length of the uncompressed vector in bits.
    pub fn len(&self) -> usize {
        self.num_bits
    }

    /// Return true if the vector holds no bits.
    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    /// Total number of set bits.
    pub fn count_ones(&self) -> usize {
        self.total_ones
    }

    /// Number of set bits in positions `[0, idx]`.
    ///
    /// `0` for negative `idx`; saturates at the total popcount past the
    /// end.
    pub fn rank1(&self, idx: isize) -> usize {
        if idx < 0 {
            return 0;
        }
        let idx = idx as usize;
        if idx >= self.num_bits {
            return self.total_ones;
        }
        let (rank, value) = self.seek_block(idx / self.block_size);
        let info = self.map.info(value).expect("decoded block is mapped");
        let within = idx % self.block_size;
        rank + info.prefix_ones[within] as usize
    }

    /// Number of unset bits in positions `[0, idx]`, with the same edge
    /// semantics as [`rank1`](Self::rank1).
    pub fn rank0(&self, idx: isize) -> usize {
        if idx < 0 {
            return 0;
        }
        if idx as usize >= self.num_bits {
            return self.num_bits - self.total_ones;
        }
        idx as usize + 1 - self.rank1(idx)
    }

    /// The bit at `idx`, or `None` out of range.
    pub fn bit(&self, idx: isize) -> Option<bool> {
        if idx < 0 || idx as usize >= self.num_bits {
            return None;
        }
        let idx = idx as usize;
        let (_, value) = self.seek_block(idx / self.block_size);
        let within = idx % self.block_size;
        Some((value >> (self.block_size - 1 - within)) & 1 == 1)
    }

    /// Position of the `k`-th (1-based) set bit, or `None` when `k` is 0
    /// or exceeds the total popcount.
    pub fn select1(&self, k: usize) -> Option<usize> {
        if k == 0 || k > self.total_ones {
            return None;
        }
        // Several super-blocks may share a cumulative rank; take the last
        // one that starts strictly below k.
        let sb = self.super_block_ranks.partition_point(|&r| r < k) - 1;
        let mut rank = self.super_block_ranks[sb];
        let mut pos = self.super_block_offsets[sb];
        let mut block = sb * self.super_block_size;
        loop {
            let (class, width) = self.read_class(pos);
            if rank + class as usize >= k {
                let offset = self.read_code(pos + self.map.class_size() as usize, width);
                let value = self.map.decode(class, offset).expect("valid offset code");
                let info = self.map.info(value).expect("decoded block is mapped");
                let need = (k - rank) as u32;
                let p = info.prefix_ones.partition_point(|&c| c < need);
                let bit_pos = block * self.block_size + p;
                return (bit_pos < self.num_bits).then_some(bit_pos);
            }
            rank += class as usize;
            pos += self.map.class_size() as usize + width as usize;
            block += 1;
        }
    }

    /// Position of the `k`-th (1-based) unset bit, or `None` when `k` is 0
    /// or exceeds the total number of zeros.
    pub fn select0(&self, k: usize) -> Option<usize> {
        let total_zeros = self.num_bits - self.total_ones;
        if k == 0 || k > total_zeros {
            return None;
        }
        let bits_per_sb = self.block_size * self.super_block_size;
        // Zeros before super-block s; the final entry covers the partial
        // tail of the vector.
        let zeros_before = |s: usize| -> usize {
            (s * bits_per_sb).min(self.num_bits) - self.super_block_ranks[s]
        };
        let mut lo = 0usize;
        let mut hi = self.super_block_ranks.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if zeros_before(mid) < k {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        let sb = lo - 1;
        let mut zeros = zeros_before(sb);
        let mut pos = self.super_block_offsets[sb];
        let mut block = sb * self.super_block_size;
        loop {
            let (class, width) = self.read_class(pos);
            let block_start = block * self.block_size;
            let block_len = self.block_size.min(self.num_bits - block_start);
            let block_zeros = block_len - class as usize;
            if zeros + block_zeros >= k {
                let offset = self.read_code(pos + self.map.class_size() as usize, width);
                let value = self.map.decode(class, offset).expect("valid offset code");
                let info = self.map.info(value).expect("decoded block is mapped");
                let need = k - zeros;
                let mut lo = 0usize;
                let mut hi = block_len;
                while lo < hi {
                    let mid = lo + (hi - lo) / 2;
                    if mid + 1 - (info.prefix_ones[mid] as usize) < need {
                        lo = mid + 1;
                    } else {
                        hi = mid;
                    }
                }
                let bit_pos = block_start + lo;
                return (bit_pos < self.num_bits).then_some(bit_pos);
            }
            zeros += block_zeros;
            pos += self.map.class_size() as usize + width as usize;
            block += 1;
        }
    }

    /// Decode blocks from the containing super-block up to `block_idx`,
    /// returning the rank at the block's start and the block's value.
    fn seek_block(&self, block_idx: usize) -> (usize, u32) {
        let sb = block_idx / self.super_block_size;
        let mut rank = self.super_block_ranks[sb];
        let mut pos = self.super_block_offsets[sb];
        for _ in (sb * self.super_block_size)..block_idx {
            let (class, width) = self.read_class(pos);
            rank += class as usize;
            pos += self.map.class_size() as usize + width as usize;
        }
        let (class, width) = self.read_class(pos);
        let offset = self.read_code(pos + self.map.class_size() as usize, width);
        let value = self.map.decode(class, offset).expect("valid offset code");
        (rank, value)
    }

    /// Read a block's class field and the width of its offset field.
    fn read_class(&self, pos: usize) -> (u32, u32) {
        let class = self.read_code(pos, self.map.class_size());
        (class, self.map.offset_width(class))
    }

    fn read_code(&self, pos: usize, width: u32) -> u32 {
        if width == 0 {
            return 0;
        }
        self.codes.read_numbers(pos, width as usize)[0] >> (32 - width)
    }
}
