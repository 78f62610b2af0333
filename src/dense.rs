use std::collections::BTreeMap;

use super::MarkMap;

// A simple but infeasibly slow and memory-hungry
// version of `MarkMap` for testing.
//
// Only understands `u32` keys, so that every covered key
// can be stored individually. This is just for
// testing, so it's fine.
#[derive(Eq, PartialEq, Debug)]
pub struct DenseU32MarkMap<V> {
    // Inner B-Tree map. Stores values and their keys
    // directly rather than as ranges.
    btm: BTreeMap<u32, V>,
}

impl<V> DenseU32MarkMap<V>
where
    V: Eq + Clone,
{
    pub fn new() -> DenseU32MarkMap<V> {
        DenseU32MarkMap {
            btm: BTreeMap::new(),
        }
    }

    pub fn mark(&mut self, begin: u32, end: u32, value: V) {
        for k in begin..end {
            self.btm.insert(k, value.clone());
        }
    }

    pub fn get(&self, key: &u32) -> Option<&V> {
        self.btm.get(key)
    }
}

impl<V> From<MarkMap<u32, V>> for DenseU32MarkMap<V>
where
    V: Eq + Clone,
{
    fn from(map: MarkMap<u32, V>) -> Self {
        let mut dense = Self::new();
        for (range, value) in map {
            dense.mark(range.start, range.end, value);
        }
        dense
    }
}
