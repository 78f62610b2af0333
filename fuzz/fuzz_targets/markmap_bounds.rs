#![no_main]
use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use markmap::MarkMap;

#[derive(Clone, Debug, Arbitrary)]
struct Mark {
    begin: u8,
    end: u8,
    value: u8,
}

fuzz_target!(|marks: Vec<Mark>| {
    let mut map = MarkMap::new();

    for m in marks {
        if m.begin < m.end {
            map.mark(m.begin, m.end, m.value);
        }
    }

    // Entries must be well formed and strictly ordered without overlap.
    let mut prev_end = None;
    for entry in map.iter() {
        assert!(entry.begin() < entry.end());
        if let Some(prev_end) = prev_end {
            assert!(prev_end <= entry.begin());
        }
        prev_end = Some(entry.end());
    }

    // Bounds must agree exactly with the stored extremes.
    match map.bounds() {
        None => assert!(map.is_empty()),
        Some((lo, hi)) => {
            assert_eq!(Some(lo), map.iter().next().map(|e| e.begin()));
            assert_eq!(Some(hi), map.iter().last().map(|e| e.end()));
        }
    }
});
