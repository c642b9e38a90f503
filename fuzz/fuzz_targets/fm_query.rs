#![no_main]
use fmtext::FmIndex;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (String, String)| {
    let (text, pattern) = data;
    if text.contains('\0') || text.chars().count() > 200 || pattern.is_empty() {
        return;
    }

    let fmi = match FmIndex::new(&text) {
        Ok(fmi) => fmi,
        Err(_) => return,
    };

    let tc: Vec<char> = text.chars().collect();
    let pc: Vec<char> = pattern.chars().collect();
    let naive = if pc.len() > tc.len() {
        0
    } else {
        tc.windows(pc.len()).filter(|w| *w == pc.as_slice()).count()
    };
    assert_eq!(fmi.count(&pattern), naive);

    if let Some(range) = fmi.query(&pattern) {
        assert!(range.start <= range.end);
        assert!(range.end < fmi.len());
        for snippet in fmi.query_snippets(&pattern, 0, pc.len(), 10).unwrap() {
            assert!(snippet.starts_with(&pattern));
        }
    }
});
