#![no_main]
use fmtext::bitvec::BitVector;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u32>, u8, u8)| {
    let (words, start_raw, trunc_raw) = data;
    if words.is_empty() || words.len() > 64 {
        return;
    }

    let start = (start_raw % 64) as usize;
    let trunc = (trunc_raw % 32) as usize;
    let bit_length = words.len() * 32 - trunc;

    let mut bv = BitVector::new(start + words.len() * 32);
    bv.write_numbers(start, bit_length, &words);
    let out = bv.read_numbers(start, bit_length);

    assert_eq!(out.len(), words.len());
    for (i, (&w, &o)) in words.iter().zip(out.iter()).enumerate() {
        let expected = if i + 1 == words.len() && trunc > 0 {
            w >> trunc << trunc
        } else {
            w
        };
        assert_eq!(o, expected, "word {i} mismatch");
    }
});
