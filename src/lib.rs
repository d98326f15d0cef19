//! chained-hashtable: a single-owner hash table over byte-string keys,
//! resolving collisions by separate chaining, with an external iterator that
//! walks entries in bucket order.
//!
//! Internal Design:
//!
//! Summary
//! - Layers, leaves first:
//!   - `chain`: singly linked list per bucket. Nodes live in one
//!     generational arena (`SlotMap`) owned by the table; a chain is just
//!     head/tail/len over arena keys, with a cursor that can unlink the
//!     entry it points at.
//!   - `hash`: Jenkins one-at-a-time reduced modulo the bucket count,
//!     behind a small `BucketHasher` seam.
//!   - `table`: `HashTable<V, H>`, the bucket array plus insert, remove,
//!     get, contains and resize.
//!   - `iter`: `Iter` and `CursorMut`, two-level cursors (bucket index +
//!     chain cursor) expressed as a two-state machine.
//!
//! Resizing
//! - An insert of a new key doubles the bucket count when
//!   `len > 2 * capacity`; a remove halves it when `len * 2 < capacity`,
//!   never going below the initial capacity (at least 8). Both comparisons
//!   are cross-multiplied integers.
//! - Lookups never resize.
//! - The new bucket array is allocated before any entry moves, so a failed
//!   allocation leaves the table untouched. Entries are relinked, not
//!   copied; each keeps its arena slot across any number of resizes.
//!
//! Keys and values
//! - Keys are any `AsRef<[u8]>`, copied into the table and compared by
//!   content.
//! - Overwriting a key hands the old value back to the caller. `remove`
//!   transfers ownership of the value to the caller. Values still stored
//!   when the table drops go to the optional destructor, or are dropped.
//!
//! Iteration
//! - Order is bucket index, then chain order (oldest first). There is no
//!   key or global insertion order.
//! - Iterators borrow the table, so resizing or dropping it while one is
//!   alive does not compile. `CursorMut::remove_current` is the supported
//!   way to delete while walking; it never resizes.
//!
//! Errors
//! - Allocation failure surfaces as `TableError`. Absent keys are `None`.
//!   Zero capacities and null keys are unrepresentable.
//!
//! Notes and non-goals
//! - Single-threaded; no internal synchronization.
//! - No persistence, no non-byte key types, no ordering guarantees.

mod chain;
pub mod error;
pub mod hash;
pub mod iter;
pub mod table;
mod table_proptest;

// Public surface
pub use error::TableError;
pub use hash::{bucket_index, one_at_a_time, BucketHasher, OneAtATime};
pub use iter::{CursorMut, Iter};
pub use table::{HashTable, HashTableBuilder, MAX_LOAD, MIN_CAPACITY, MIN_LOAD_DIVISOR};
