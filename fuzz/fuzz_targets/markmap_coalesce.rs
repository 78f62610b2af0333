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

    let mut peek = map.iter().peekable();
    while let Some(entry) = peek.next() {
        if let Some(next) = peek.peek() {
            if entry.end() == next.begin() && entry.value() == next.value() {
                panic!()
            }
        }
    }
});
