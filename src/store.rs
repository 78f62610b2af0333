use crate::entry::Entry;

/// Opaque address of an entry inside the store.
///
/// Returned by the neighbor queries so that the caller can come back and
/// mutate or remove the exact slot it was shown, without searching again.
/// A `Slot` is only good until the next structural mutation of the store.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Slot(usize);

/// Entries kept sorted by `begin`, with binary-searched neighbor lookup.
///
/// The dictionary layer guarantees that no two live entries share a
/// `begin` key, so ordering by `begin` alone is total. It also takes
/// responsibility for keeping the order intact when it rewrites an
/// entry's keys in place.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct OrderedStore<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> OrderedStore<K, V> {
    pub(crate) fn new() -> OrderedStore<K, V> {
        OrderedStore {
            entries: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> OrderedStore<K, V> {
        OrderedStore {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn get(&self, slot: Slot) -> &Entry<K, V> {
        &self.entries[slot.0]
    }

    pub(crate) fn get_mut(&mut self, slot: Slot) -> &mut Entry<K, V> {
        &mut self.entries[slot.0]
    }

    pub(crate) fn first(&self) -> Option<&Entry<K, V>> {
        self.entries.first()
    }

    pub(crate) fn last(&self) -> Option<&Entry<K, V>> {
        self.entries.last()
    }

    /// Slot of the sole stored entry. Only meaningful when `len() == 1`.
    pub(crate) fn solo(&self) -> Slot {
        debug_assert_eq!(self.entries.len(), 1);
        Slot(0)
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    pub(crate) fn into_entries(self) -> Vec<Entry<K, V>> {
        self.entries
    }

    pub(crate) fn remove_at(&mut self, slot: Slot) -> Entry<K, V> {
        self.entries.remove(slot.0)
    }
}

impl<K, V> OrderedStore<K, V>
where
    K: Ord,
{
    /// Places `entry` at its position in `begin` order.
    pub(crate) fn insert(&mut self, entry: Entry<K, V>) {
        let at = self.entries.partition_point(|e| e.begin < entry.begin);
        debug_assert!(
            self.entries.get(at).map_or(true, |e| e.begin != entry.begin),
            "duplicate begin key"
        );
        self.entries.insert(at, entry);
    }

    /// The greatest stored entry whose `begin` is `<=` (when `inclusive`)
    /// or `<` (otherwise) the given key.
    pub(crate) fn find_previous(&self, key: &K, inclusive: bool) -> Option<Slot> {
        let cut = if inclusive {
            self.entries.partition_point(|e| e.begin <= *key)
        } else {
            self.entries.partition_point(|e| e.begin < *key)
        };
        cut.checked_sub(1).map(Slot)
    }

    /// The least stored entry whose `begin` is `>=` (when `inclusive`)
    /// or `>` (otherwise) the given key.
    pub(crate) fn find_next(&self, key: &K, inclusive: bool) -> Option<Slot> {
        let cut = if inclusive {
            self.entries.partition_point(|e| e.begin < *key)
        } else {
            self.entries.partition_point(|e| e.begin <= *key)
        };
        (cut < self.entries.len()).then_some(Slot(cut))
    }
}
