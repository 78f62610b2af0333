//! Map half-open key ranges to values, with last-write-wins overwrites.
//!
//! [`MarkMap`] keeps a set of non-overlapping ranges `[begin, end)`, each
//! carrying a value. Its one mutating primitive, [`mark`](MarkMap::mark),
//! lays a new range over whatever is already stored: older ranges are
//! truncated, split, or replaced where the new one covers them, and
//! ranges that touch or overlap while mapping to equal values are
//! coalesced into one.
//!
//! ```rust
//! use markmap::MarkMap;
//!
//! let mut map = MarkMap::new();
//! map.mark(0, 10, "low");
//! map.mark(4, 6, "mid");
//!
//! // The newer mark split the older range around itself.
//! let ranges: Vec<(u32, u32, &str)> = map
//!     .iter()
//!     .map(|e| (*e.begin(), *e.end(), *e.value()))
//!     .collect();
//! assert_eq!(ranges, vec![(0, 4, "low"), (4, 6, "mid"), (6, 10, "low")]);
//! assert_eq!(map.bounds(), Some((&0, &10)));
//! ```
//!
//! Keys only need `Ord + Clone` and values only need `Eq + Clone`; there
//! is no arithmetic on keys anywhere, so any totally ordered type works.

mod dict;
mod entry;
mod store;

#[cfg(test)]
mod dense;

pub use crate::dict::{IntoIter, Iter, MarkMap};
pub use crate::entry::Entry;
