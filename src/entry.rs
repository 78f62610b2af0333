use core::cmp::{max, min};

/// A stored interval: the half-open key range `[begin, end)` and the value
/// it maps to.
///
/// Entries are created and reshaped by [`MarkMap::mark`](crate::MarkMap::mark);
/// callers only ever see them as borrowed, read-only views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<K, V> {
    pub(crate) begin: K,
    pub(crate) end: K,
    pub(crate) value: V,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(begin: K, end: K, value: V) -> Entry<K, V> {
        Entry { begin, end, value }
    }

    /// The inclusive lower end of the entry's range.
    pub fn begin(&self) -> &K {
        &self.begin
    }

    /// The exclusive upper end of the entry's range.
    pub fn end(&self) -> &K {
        &self.end
    }

    /// The value the range maps to.
    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<K, V> Entry<K, V>
where
    K: Ord,
{
    // Strictly less than, because ends are excluded.
    pub(crate) fn overlaps(&self, other: &Self) -> bool {
        max(&self.begin, &other.begin) < min(&self.end, &other.end)
    }

    // Less-than-or-equal-to because if one end is excluded, the other is
    // included. I.e. the two could be joined into a single range, because
    // they're overlapping or immediately adjacent.
    pub(crate) fn touches(&self, other: &Self) -> bool {
        max(&self.begin, &other.begin) <= min(&self.end, &other.end)
    }
}
