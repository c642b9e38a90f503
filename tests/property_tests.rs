use proptest::prelude::*;

use fmtext::bitvec::BitVector;
use fmtext::blocks::PopCountMapGenerator;
use fmtext::bwt::BwtController;
use fmtext::fm_index::FmIndex;
use fmtext::rrr::{Rrr, RrrConfig};
use fmtext::wavelet::WaveletTree;

fn bit_vector_of(bits: &[bool]) -> BitVector {
    let mut bv = BitVector::new(bits.len());
    let mut words = vec![0u32; bits.len().div_ceil(32)];
    for (i, &b) in bits.iter().enumerate() {
        if b {
            words[i / 32] |= 1 << (31 - i % 32);
        }
    }
    bv.write_numbers(0, bits.len(), &words);
    bv
}

proptest! {
    #[test]
    fn test_bitvector_roundtrip_property(
        words in prop::collection::vec(any::<u32>(), 1..8),
        start in 0usize..40,
        extra in 0usize..40,
    ) {
        let bit_length = words.len() * 32;
        let mut bv = BitVector::new(start + bit_length + extra);
        bv.write_numbers(start, bit_length, &words);
        prop_assert_eq!(bv.read_numbers(start, bit_length), words);
    }

    #[test]
    fn test_bitvector_partial_word_roundtrip(
        words in prop::collection::vec(any::<u32>(), 1..8),
        start in 0usize..40,
        trunc in 0usize..32,
    ) {
        let bit_length = words.len() * 32 - trunc;
        let mut bv = BitVector::new(start + words.len() * 32);
        bv.write_numbers(start, bit_length, &words);
        let out = bv.read_numbers(start, bit_length);
        prop_assert_eq!(out.len(), words.len());
        for (i, (&w, &o)) in words.iter().zip(out.iter()).enumerate() {
            let expected = if i + 1 == words.len() && trunc > 0 {
                w >> trunc << trunc
            } else {
                w
            };
            prop_assert_eq!(o, expected, "word {}", i);
        }
    }

    #[test]
    fn test_bitvector_untouched_neighbors(
        words in prop::collection::vec(any::<u32>(), 1..4),
        start in 8usize..48,
        trunc in 0usize..32,
    ) {
        // Bits on either side of a write must survive it.
        let bit_length = words.len() * 32 - trunc;
        let capacity = start + words.len() * 32 + 16;
        let mut bv = BitVector::new(capacity);
        bv.write_numbers(0, capacity, &vec![0xFFFFFFFFu32; capacity.div_ceil(32)]);
        bv.write_numbers(start, bit_length, &words);
        prop_assert_eq!(
            bv.read_numbers(0, start)[0] >> (32 - start.min(32)),
            u32::MAX >> (32 - start.min(32))
        );
        let after = start + bit_length;
        let tail = capacity - after;
        let word = bv.read_numbers(after, tail.min(16))[0];
        prop_assert_eq!(word >> (32 - tail.min(16)), u32::MAX >> (32 - tail.min(16)));
    }
}

proptest! {
    #[test]
    fn test_rrr_rank_select_property(
        bits in prop::collection::vec(any::<bool>(), 1..300),
    ) {
        let mut generator = PopCountMapGenerator::new();
        let rrr = Rrr::from_bit_vector(
            &bit_vector_of(&bits),
            RrrConfig::default(),
            &mut generator,
        );

        let mut ones = 0;
        let mut zeros = 0;
        for (i, &b) in bits.iter().enumerate() {
            prop_assert_eq!(rrr.bit(i as isize), Some(b));
            if b {
                ones += 1;
                prop_assert_eq!(rrr.select1(ones), Some(i));
            } else {
                zeros += 1;
                prop_assert_eq!(rrr.select0(zeros), Some(i));
            }
            prop_assert_eq!(rrr.rank1(i as isize), ones);
            prop_assert_eq!(rrr.rank0(i as isize) + rrr.rank1(i as isize), i + 1);
        }
        prop_assert_eq!(rrr.rank1(-1), 0);
        prop_assert_eq!(rrr.rank1(bits.len() as isize + 100), ones);
        prop_assert_eq!(rrr.select1(ones + 1), None);
        prop_assert_eq!(rrr.select0(zeros + 1), None);
    }
}

proptest! {
    #[test]
    fn test_wavelet_identity_property(s in "[a-h]{1,60}") {
        let mut generator = PopCountMapGenerator::new();
        let wt = WaveletTree::new(&s, &mut generator).unwrap();
        let chars: Vec<char> = s.chars().collect();

        prop_assert_eq!(wt.len(), chars.len());
        for (i, &ch) in chars.iter().enumerate() {
            prop_assert_eq!(wt.lookup(i as isize), Some(ch));
        }

        for ch in "abcdefgh".chars() {
            let total = chars.iter().filter(|&&c| c == ch).count();
            prop_assert_eq!(wt.rank(ch, chars.len() as isize - 1), total);
            prop_assert_eq!(wt.rank(ch, -1), 0);
            for k in 1..=total {
                let i = wt.select(ch, k).unwrap();
                prop_assert_eq!(wt.rank(ch, i as isize), k);
                prop_assert_eq!(wt.lookup(i as isize), Some(ch));
            }
            prop_assert_eq!(wt.select(ch, total + 1), None);
        }
    }
}

proptest! {
    #[test]
    fn test_bwt_invertibility_property(text in "[a-e]{0,40}") {
        let mut generator = PopCountMapGenerator::new();
        let bwtc = BwtController::new(&text, false, &mut generator).unwrap();
        let row = bwtc.select('\0', 1).unwrap();
        prop_assert_eq!(bwtc.read(row, bwtc.len() as isize - 1).unwrap(), text);
    }

    #[test]
    fn test_fm_count_matches_naive(
        text in "[a-d]{1,40}",
        pattern in "[a-d]{1,4}",
    ) {
        let fmi = FmIndex::new(&text).unwrap();
        let tc: Vec<char> = text.chars().collect();
        let pc: Vec<char> = pattern.chars().collect();
        let naive = if pc.len() > tc.len() {
            0
        } else {
            tc.windows(pc.len()).filter(|w| *w == pc.as_slice()).count()
        };
        prop_assert_eq!(fmi.count(&pattern), naive);
    }

    #[test]
    fn test_fm_snippets_anchor_on_match(
        text in "[a-c]{4,30}",
        pattern in "[a-c]{1,3}",
        post_extra in 0usize..4,
    ) {
        let fmi = FmIndex::new(&text).unwrap();
        let post_len = pattern.chars().count() + post_extra;
        for snippet in fmi.query_snippets(&pattern, 0, post_len, 50).unwrap() {
            prop_assert!(snippet.starts_with(&pattern));
        }
    }
}
