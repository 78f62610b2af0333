use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use std::ops::Range;

use crate::entry::Entry;
use crate::store::{OrderedStore, Slot};

#[derive(Clone, PartialEq, Eq)]
/// A map from half-open key ranges to values, written by marking.
///
/// [`mark`](MarkMap::mark) overwrites whatever part of the key space it
/// covers: existing ranges are truncated, split, or replaced outright, so
/// the most recent mark always wins. Contiguous and overlapping ranges
/// that map to equal values are coalesced into a single range.
///
/// The map also tracks its aggregate [`bounds`](MarkMap::bounds): the
/// smallest `begin` and largest `end` over everything stored.
pub struct MarkMap<K, V> {
    store: OrderedStore<K, V>,
    // Smallest `begin` and largest `end` over all stored entries,
    // maintained incrementally so that `mark` can take fast paths for
    // candidates landing entirely outside the occupied key space.
    bounds: Option<(K, K)>,
}

// What `resolve` decided about a cursor/candidate pair.
struct Outcome {
    // The candidate no longer needs a slot of its own: its key space is
    // now represented by the cursor's slot, or (in the reversed phase)
    // the cursor has been folded away into key space the candidate
    // already claimed.
    absorbed: bool,
    // No remaining stored entry can conflict with the candidate, so the
    // forward scan can end.
    stop: bool,
}

impl<K, V> MarkMap<K, V> {
    /// Makes a new empty `MarkMap`.
    pub fn new() -> Self {
        MarkMap {
            store: OrderedStore::new(),
            bounds: None,
        }
    }

    /// Makes a new empty `MarkMap` with room for `capacity` entries
    /// before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        MarkMap {
            store: OrderedStore::with_capacity(capacity),
            bounds: None,
        }
    }

    /// Returns the number of stored ranges.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the map contains no ranges.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the number of entries the map can hold without
    /// reallocating.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Removes all ranges and resets the bounds.
    pub fn clear(&mut self) {
        self.store.clear();
        self.bounds = None;
    }

    /// The smallest `begin` and largest `end` over all stored ranges, or
    /// `None` if the map is empty.
    pub fn bounds(&self) -> Option<(&K, &K)> {
        self.bounds.as_ref().map(|(lo, hi)| (lo, hi))
    }

    /// Gets an iterator over all stored ranges, ordered by `begin`.
    ///
    /// The iterator element type is [`&Entry<K, V>`](Entry).
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter(self.store.iter())
    }
}

impl<K, V> MarkMap<K, V>
where
    K: Ord + Clone,
    V: Eq + Clone,
{
    /// Marks the range `[begin, end)` with a value.
    ///
    /// The mark overwrites whatever was there before: existing ranges it
    /// covers are dropped, and existing ranges it cuts into are truncated
    /// or split around it. If the marked range overlaps or is immediately
    /// adjacent to an existing range _mapping to an equal value_, the two
    /// are coalesced into a single contiguous range.
    ///
    /// Marking the same range with the same value again is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `begin >= end`.
    pub fn mark(&mut self, begin: K, end: K, value: V) {
        // We don't want to have to make empty ranges make sense;
        // they don't represent anything meaningful in this structure.
        assert!(begin < end, "range begin must be less than range end");

        let mut candidate = Entry::new(begin, end, value);

        match self.store.len() {
            0 => {
                self.bounds = Some((candidate.begin.clone(), candidate.end.clone()));
                self.store.insert(candidate);
            }
            1 => {
                // A single stored entry: reconcile directly against it,
                // then take the surviving extent as the new bounds.
                let only = self.store.solo();
                let outcome = self.resolve(only, &mut candidate, false);
                if !outcome.absorbed {
                    self.store.insert(candidate);
                }
                self.recompute_bounds();
            }
            _ => self.mark_general(candidate),
        }

        #[cfg(debug_assertions)]
        self.check_invariants();
    }

    fn mark_general(&mut self, mut candidate: Entry<K, V>) {
        let (lo, hi) = self
            .bounds
            .clone()
            .expect("bounds are set while the store is non-empty");

        // Fast paths against the aggregate bounds: a candidate strictly
        // outside the occupied key space cannot conflict with anything,
        // and a candidate covering the whole key space replaces
        // everything in one sweep.
        if candidate.begin > hi {
            self.bounds = Some((lo, candidate.end.clone()));
            self.store.insert(candidate);
            return;
        }
        if candidate.end < lo {
            self.bounds = Some((candidate.begin.clone(), hi));
            self.store.insert(candidate);
            return;
        }
        if candidate.begin <= lo && candidate.end >= hi {
            self.store.clear();
            self.bounds = Some((candidate.begin.clone(), candidate.end.clone()));
            self.store.insert(candidate);
            return;
        }

        // The slot that has come to represent the candidate's key space,
        // once some resolution has absorbed the candidate into the store.
        let mut rep: Option<Slot> = None;
        let mut halted = false;

        // Left merge: the last stored entry beginning at or before the
        // candidate is the only one that can reach the candidate from
        // the left.
        match self.store.find_previous(&candidate.begin, true) {
            Some(prev) => {
                let outcome = self.resolve(prev, &mut candidate, false);
                if outcome.absorbed {
                    rep = Some(prev);
                    halted = outcome.stop;
                }
                // When the candidate was not absorbed, `stop` only
                // describes the left neighbor; entries to the right still
                // have to be scanned.
            }
            None => {
                // Nothing begins at or before the candidate, so it
                // becomes the new leftmost extent.
                self.bounds = Some((candidate.begin.clone(), hi.clone()));
            }
        }

        // Forward propagation: walk the entries past the candidate's
        // begin until one of them is out of reach.
        while !halted {
            let Some(next) = self.store.find_next(&candidate.begin, false) else {
                break;
            };
            match rep {
                Some(twin) => {
                    // The candidate already owns a slot; following
                    // entries it reaches are shadowed by it. Lift the
                    // next entry out, and either drop it or put its
                    // trimmed remainder back.
                    let mut shadowed = self.store.remove_at(next);
                    let outcome = self.resolve(twin, &mut shadowed, true);
                    if !outcome.absorbed {
                        self.store.insert(shadowed);
                        break;
                    }
                    if outcome.stop {
                        break;
                    }
                }
                None => {
                    // The candidate has no slot yet; in case of conflict
                    // it takes over the next entry's slot.
                    let outcome = self.resolve(next, &mut candidate, true);
                    if !outcome.absorbed {
                        break;
                    }
                    rep = Some(next);
                    if outcome.stop {
                        break;
                    }
                }
            }
        }

        // The candidate (or the slot standing in for it) defines the new
        // rightmost extent if it pushed past the previous one.
        let reach = match rep {
            Some(slot) => self.store.get(slot).end.clone(),
            None => {
                let end = candidate.end.clone();
                self.store.insert(candidate);
                end
            }
        };
        let (_, hi) = self.bounds.as_mut().expect("bounds survived marking");
        if reach > *hi {
            *hi = reach;
        }
    }

    /// Reconciles `candidate` against the stored entry at `cursor`,
    /// mutating one or both so that their key spaces no longer conflict.
    ///
    /// `reversed` is false while the candidate is approaching the store
    /// from the left-neighbor check (the cursor begins at or before the
    /// candidate), and true during forward propagation, where pre-existing
    /// entries may be shadowed by key space the candidate has already
    /// claimed.
    fn resolve(&mut self, cursor: Slot, candidate: &mut Entry<K, V>, reversed: bool) -> Outcome {
        if self.store.get(cursor).value == candidate.value {
            // Equal values: the only question is whether the two ranges
            // can be unified into the cursor's slot.
            if !self.store.get(cursor).touches(candidate) {
                // A gap separates them; they stay independent.
                return Outcome {
                    absorbed: false,
                    stop: false,
                };
            }
            let cur = self.store.get_mut(cursor);
            if candidate.begin < cur.begin {
                cur.begin = candidate.begin.clone();
            }
            if cur.end < candidate.end {
                cur.end = candidate.end.clone();
            }
            return Outcome {
                absorbed: true,
                stop: false,
            };
        }

        // Differing values: a disjoint or merely touching pair has no
        // conflict to resolve, and nothing further right can reach back
        // over this cursor either.
        if !self.store.get(cursor).overlaps(candidate) {
            return Outcome {
                absorbed: false,
                stop: true,
            };
        }

        match self.store.get(cursor).begin.cmp(&candidate.begin) {
            Ordering::Equal => {
                let cur = self.store.get_mut(cursor);
                if cur.end <= candidate.end {
                    // The candidate covers the cursor from the same
                    // begin: the slot is rewritten wholesale.
                    let covered_exactly = cur.end == candidate.end;
                    cur.end = candidate.end.clone();
                    cur.value = candidate.value.clone();
                    Outcome {
                        absorbed: true,
                        stop: covered_exactly,
                    }
                } else {
                    // The candidate is the shorter of the two: it claims
                    // the head of the cursor's range, and the cursor
                    // keeps the tail.
                    cur.begin = candidate.end.clone();
                    Outcome {
                        absorbed: false,
                        stop: true,
                    }
                }
            }
            Ordering::Less => {
                if candidate.end < self.store.get(cursor).end {
                    // The candidate sits strictly inside the cursor.
                    if reversed {
                        // The candidate's slot already covers this whole
                        // entry; it gets dropped by the caller.
                        return Outcome {
                            absorbed: true,
                            stop: false,
                        };
                    }
                    // Split: the cursor keeps the head, the candidate
                    // takes the middle, and the tail gets a fresh slot.
                    let tail = {
                        let cur = self.store.get_mut(cursor);
                        let tail =
                            Entry::new(candidate.end.clone(), cur.end.clone(), cur.value.clone());
                        cur.end = candidate.begin.clone();
                        tail
                    };
                    self.store.insert(candidate.clone());
                    self.store.insert(tail);
                    return Outcome {
                        absorbed: true,
                        stop: true,
                    };
                }
                // The cursor's tail overlaps the candidate's head.
                if reversed {
                    if self.store.get(cursor).end == candidate.end {
                        // Nothing of the candidate sticks out: it is
                        // fully covered and gets dropped by the caller.
                        return Outcome {
                            absorbed: true,
                            stop: false,
                        };
                    }
                    // The candidate survives with its head trimmed off.
                    candidate.begin = self.store.get(cursor).end.clone();
                    Outcome {
                        absorbed: false,
                        stop: false,
                    }
                } else {
                    // The candidate wins the overlap; the cursor is
                    // truncated down to the part it keeps.
                    let cur = self.store.get_mut(cursor);
                    cur.end = candidate.begin.clone();
                    Outcome {
                        absorbed: false,
                        stop: false,
                    }
                }
            }
            Ordering::Greater => {
                let cur = self.store.get_mut(cursor);
                if cur.end <= candidate.end {
                    // The candidate covers the whole cursor: the slot is
                    // rewritten to carry the candidate instead.
                    cur.begin = candidate.begin.clone();
                    cur.end = candidate.end.clone();
                    cur.value = candidate.value.clone();
                    Outcome {
                        absorbed: true,
                        stop: false,
                    }
                } else {
                    // The cursor overhangs the candidate's end: the
                    // candidate claims the head, the cursor keeps the
                    // tail, and nothing further right can conflict.
                    cur.begin = candidate.end.clone();
                    Outcome {
                        absorbed: false,
                        stop: true,
                    }
                }
            }
        }
    }

    fn recompute_bounds(&mut self) {
        // Non-overlap means ends ascend with begins, so the extremes live
        // in the first and last slots.
        self.bounds = match (self.store.first(), self.store.last()) {
            (Some(first), Some(last)) => Some((first.begin.clone(), last.end.clone())),
            _ => None,
        };
    }

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        let mut prev: Option<&Entry<K, V>> = None;
        for entry in self.store.iter() {
            assert!(entry.begin < entry.end, "entry with an empty range");
            if let Some(prev) = prev {
                assert!(!prev.overlaps(entry), "overlapping entries");
                assert!(prev.end <= entry.begin, "entries out of order");
                assert!(
                    prev.end != entry.begin || prev.value != entry.value,
                    "touching entries with equal values left uncoalesced"
                );
            }
            prev = Some(entry);
        }
        match (&self.bounds, self.store.first(), self.store.last()) {
            (None, None, None) => {}
            (Some((lo, hi)), Some(first), Some(last)) => {
                assert!(
                    *lo == first.begin && *hi == last.end,
                    "bounds out of date"
                );
            }
            _ => panic!("bounds out of sync with the store"),
        }
    }
}

impl<K, V> Default for MarkMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for MarkMap<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.store.iter().map(|e| (&e.begin..&e.end, &e.value)))
            .finish()
    }
}

/// Renders the map as one line of intervals, with touching neighbors
/// joined by `|` and separated neighbors by `) [`, each interval printed
/// as `begin..(value)..end`. Handy for golden-string assertions.
impl<K, V> fmt::Display for MarkMap<K, V>
where
    K: fmt::Display + PartialEq,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.store.is_empty() {
            return f.write_str("{}");
        }
        let mut prev_end: Option<&K> = None;
        for entry in self.store.iter() {
            match prev_end {
                None => f.write_str("[")?,
                Some(end) if *end == entry.begin => f.write_str("|")?,
                Some(_) => f.write_str(") [")?,
            }
            write!(f, "{}..({})..{}", entry.begin, entry.value, entry.end)?;
            prev_end = Some(&entry.end);
        }
        f.write_str(")")
    }
}

impl<K, V> Extend<(Range<K>, V)> for MarkMap<K, V>
where
    K: Ord + Clone,
    V: Eq + Clone,
{
    fn extend<T: IntoIterator<Item = (Range<K>, V)>>(&mut self, iter: T) {
        for (range, value) in iter {
            self.mark(range.start, range.end, value);
        }
    }
}

impl<K, V> FromIterator<(Range<K>, V)> for MarkMap<K, V>
where
    K: Ord + Clone,
    V: Eq + Clone,
{
    fn from_iter<T: IntoIterator<Item = (Range<K>, V)>>(iter: T) -> Self {
        let mut map = MarkMap::new();
        map.extend(iter);
        map
    }
}

/// An iterator over the entries of a `MarkMap`, ascending by `begin`.
pub struct Iter<'a, K, V>(core::slice::Iter<'a, Entry<K, V>>);

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

impl<'a, K, V> IntoIterator for &'a MarkMap<K, V> {
    type Item = &'a Entry<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator over the entries of a `MarkMap`, ascending by
/// `begin`, yielding each range and its value.
pub struct IntoIter<K, V>(std::vec::IntoIter<Entry<K, V>>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (Range<K>, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|entry| {
            let Entry { begin, end, value } = entry;
            (begin..end, value)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for MarkMap<K, V> {
    type Item = (Range<K>, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.store.into_entries().into_iter())
    }
}

#[cfg(feature = "serde1")]
mod serde1 {
    use core::fmt;
    use core::marker::PhantomData;

    use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
    use serde::ser::{Serialize, Serializer};

    use super::MarkMap;

    impl<K, V> Serialize for MarkMap<K, V>
    where
        K: Serialize,
        V: Serialize,
    {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_seq(
                self.iter()
                    .map(|entry| ((entry.begin(), entry.end()), entry.value())),
            )
        }
    }

    impl<'de, K, V> Deserialize<'de> for MarkMap<K, V>
    where
        K: Ord + Clone + Deserialize<'de>,
        V: Eq + Clone + Deserialize<'de>,
    {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_seq(MarkMapVisitor {
                marker: PhantomData,
            })
        }
    }

    struct MarkMapVisitor<K, V> {
        marker: PhantomData<fn() -> MarkMap<K, V>>,
    }

    impl<'de, K, V> Visitor<'de> for MarkMapVisitor<K, V>
    where
        K: Ord + Clone + Deserialize<'de>,
        V: Eq + Clone + Deserialize<'de>,
    {
        type Value = MarkMap<K, V>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a sequence of ((begin, end), value) records")
        }

        fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut map = MarkMap::new();
            while let Some(((begin, end), value)) = access.next_element::<((K, K), V)>()? {
                map.mark(begin, end, value);
            }
            Ok(map)
        }
    }
}
