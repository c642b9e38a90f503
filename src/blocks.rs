//! Popcount-class block enumeration and lookup tables.
//!
//! The RRR encoding stores each fixed-width block of a bit vector as a
//! (class, offset) pair: the class is the block's popcount, the offset its
//! rank among all `C(width, class)` blocks of that popcount in the
//! canonical "banker's sequence" order. [`BlockGenerator`] enumerates those
//! blocks; [`PopCountMapGenerator`] bakes the enumeration into per-value
//! lookup tables shared by every RRR built at the same block size.

use std::collections::HashMap;
use std::sync::Arc;

/// Enumerates fixed-width blocks by popcount class, with memoized
/// binomial/factorial helpers to size the offset codes.
#[derive(Debug, Default)]
pub struct BlockGenerator {
    factorials: HashMap<u32, u128>,
    binomials: HashMap<(u32, u32), u64>,
}

impl BlockGenerator {
    /// Create a generator with empty memo tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// `n!`, memoized for the life of the generator.
    pub fn factorial(&mut self, n: u32) -> u128 {
        if let Some(&f) = self.factorials.get(&n) {
            return f;
        }
        let f = if n < 1 {
            1
        } else {
            u128::from(n) * self.factorial(n - 1)
        };
        self.factorials.insert(n, f);
        f
    }

    /// `C(n, k)`, memoized for the life of the generator.
    pub fn binomial(&mut self, n: u32, k: u32) -> u64 {
        if k > n {
            return 0;
        }
        if let Some(&b) = self.binomials.get(&(n, k)) {
            return b;
        }
        let b = (self.factorial(n) / (self.factorial(k) * self.factorial(n - k))) as u64;
        self.binomials.insert((n, k), b);
        b
    }

    /// Enumerate every `width`-bit value with exactly `pop_count` set bits,
    /// in increasing order. The position of a value in this list is its
    /// combinatorial offset.
    pub fn generate_blocks(&mut self, pop_count: u32, width: u32) -> Vec<u32> {
        assert!(width < 31, "maximum supported block width is 30 bits");
        assert!(
            pop_count <= width,
            "cannot fit {pop_count} set bits in a {width}-bit block"
        );
        if pop_count == 0 {
            return vec![0];
        }
        let count = self.binomial(width, pop_count) as usize;
        let mut blocks = Vec::with_capacity(count);
        let mut block: u32 = (1 << pop_count) - 1;
        for _ in 0..count {
            blocks.push(block);
            block = Self::next_block(block);
        }
        blocks
    }

    /// Next higher value with the same popcount (Gosper's hack).
    fn next_block(v: u32) -> u32 {
        let t = v | (v - 1);
        (t + 1) | (((!t & (t + 1)) - 1) >> (v.trailing_zeros() + 1))
    }
}

/// Per-block-value decoding data for one block size.
#[derive(Debug)]
pub struct BlockInfo {
    /// Popcount class of the block.
    pub class: u32,
    /// Combinatorial offset within the class.
    pub offset: u32,
    /// `prefix_ones[i]` = set bits among the first `i + 1` bits, MSB-first.
    pub prefix_ones: Vec<u32>,
}

/// Lookup tables for one block size: value -> (class, offset, prefix
/// popcounts) and class -> canonical block list.
#[derive(Debug)]
pub struct PopCountMap {
    block_size: u32,
    class_size: u32,
    offset_widths: Vec<u32>,
    blocks_by_class: Vec<Vec<u32>>,
    info: HashMap<u32, BlockInfo>,
}

impl PopCountMap {
    /// Block width in bits.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Bits needed to store any class `0..=block_size`.
    pub fn class_size(&self) -> u32 {
        self.class_size
    }

    /// Bits in the offset code of a block of class `class`
    /// (`ceil(log2(C(block_size, class)))`).
    pub fn offset_width(&self, class: u32) -> u32 {
        self.offset_widths[class as usize]
    }

    /// Recover a block value from its (class, offset) code.
    pub fn decode(&self, class: u32, offset: u32) -> Option<u32> {
        self.blocks_by_class
            .get(class as usize)?
            .get(offset as usize)
            .copied()
    }

    /// Decoding data for a block value.
    pub fn info(&self, value: u32) -> Option<&BlockInfo> {
        self.info.get(&value)
    }
}

/// Builds and memoizes [`PopCountMap`]s keyed by block size.
///
/// Repeated calls with the same block size return the identical shared
/// map, so the many RRR nodes of one index decode through one table.
#[derive(Debug, Default)]
pub struct PopCountMapGenerator {
    block_generator: BlockGenerator,
    cache: HashMap<u32, Arc<PopCountMap>>,
}

impl PopCountMapGenerator {
    /// Create a generator with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the (shared) popcount map for `block_size`, building it on
    /// first use.
    pub fn generate(&mut self, block_size: u32) -> Arc<PopCountMap> {
        if let Some(map) = self.cache.get(&block_size) {
            return Arc::clone(map);
        }
        assert!(
            (1..31).contains(&block_size),
            "maximum supported block size for pop counts is 30 bits"
        );

        let class_size = 32 - block_size.leading_zeros();
        let mut offset_widths = Vec::with_capacity(block_size as usize + 1);
        let mut blocks_by_class = Vec::with_capacity(block_size as usize + 1);
        let mut info = HashMap::new();
        for class in 0..=block_size {
            let blocks = self.block_generator.generate_blocks(class, block_size);
            offset_widths.push(ceil_log2(blocks.len()));
            for (offset, &value) in blocks.iter().enumerate() {
                info.insert(
                    value,
                    BlockInfo {
                        class,
                        offset: offset as u32,
                        prefix_ones: prefix_ones(value, block_size),
                    },
                );
            }
            blocks_by_class.push(blocks);
        }

        let map = Arc::new(PopCountMap {
            block_size,
            class_size,
            offset_widths,
            blocks_by_class,
            info,
        });
        log::debug!("built popcount map for block size {block_size}");
        self.cache.insert(block_size, Arc::clone(&map));
        map
    }
}

fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

fn prefix_ones(value: u32, width: u32) -> Vec<u32> {
    let mut counts = Vec::with_capacity(width as usize);
    let mut count = 0;
    for i in 0..width {
        count += (value >> (width - 1 - i)) & 1;
        counts.push(count);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial_and_binomial() {
        let mut g = BlockGenerator::new();
        assert_eq!(g.factorial(0), 1);
        assert_eq!(g.factorial(5), 120);
        assert_eq!(g.binomial(4, 2), 6);
        assert_eq!(g.binomial(30, 15), 155_117_520);
        assert_eq!(g.binomial(3, 7), 0);
    }

    #[test]
    fn test_generate_blocks_order() {
        let mut g = BlockGenerator::new();
        assert_eq!(
            g.generate_blocks(2, 4),
            vec![0b0011, 0b0101, 0b0110, 0b1001, 0b1010, 0b1100]
        );
        assert_eq!(g.generate_blocks(0, 5), vec![0]);
        assert_eq!(g.generate_blocks(5, 5), vec![0b11111]);
    }

    #[test]
    fn test_generate_blocks_counts() {
        let mut g = BlockGenerator::new();
        for width in 1..10 {
            for pop in 0..=width {
                let blocks = g.generate_blocks(pop, width);
                assert_eq!(blocks.len() as u64, g.binomial(width, pop));
                for &b in &blocks {
                    assert_eq!(b.count_ones(), pop);
                    assert!(b < (1 << width));
                }
                assert!(blocks.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_popcount_map_contents() {
        let mut g = PopCountMapGenerator::new();
        let map = g.generate(4);
        assert_eq!(map.class_size(), 3);
        let info = map.info(0b0110).unwrap();
        assert_eq!(info.class, 2);
        assert_eq!(info.offset, 2);
        assert_eq!(info.prefix_ones, vec![0, 1, 2, 2]);
        assert_eq!(map.decode(2, 2), Some(0b0110));
        assert_eq!(map.offset_width(2), 3); // C(4, 2) = 6 -> 3 bits
        assert_eq!(map.offset_width(0), 0); // C(4, 0) = 1 -> empty code
    }

    #[test]
    fn test_decode_roundtrip() {
        let mut g = PopCountMapGenerator::new();
        let map = g.generate(5);
        for value in 0u32..32 {
            let info = map.info(value).unwrap();
            assert_eq!(map.decode(info.class, info.offset), Some(value));
        }
    }

    #[test]
    fn test_memoized_map_identity() {
        let mut g = PopCountMapGenerator::new();
        let a = g.generate(7);
        let b = g.generate(7);
        assert!(Arc::ptr_eq(&a, &b));
        let c = g.generate(8);
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
