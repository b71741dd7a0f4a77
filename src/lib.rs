//! chainmap: a single-threaded, separate-chaining hash map and hash set
//! with an entry view whose handles write through to the map.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one storage engine shared by both containers, with every
//!   user-visible operation reduced to find/insert/remove on it.
//! - Layers:
//!   - HashTable<K, P, S>: chained buckets over a generational slot
//!     store. Owns the bucket array, the load-factor growth policy and a
//!     structural version counter.
//!   - ChainSet<T, S>: `HashTable<T, ()>`; the unit payload marks
//!     membership.
//!   - ChainMap<K, V, S>: `HashTable<K, V>` plus the put/replace/compute
//!     family.
//!   - Entry view: `EntryHandle` values that alias map slots, and
//!     `EntryCursor` for enumeration that does not borrow the map.
//!   - ImmutableMap<K, V, S>: read-only wrapper whose mutators fail.
//!
//! Constraints
//! - Single-threaded: the containers are `!Send`/`!Sync`.
//! - `K: Eq + Hash` is a static bound; `V: PartialEq` is required only by
//!   the compare-then-write operations.
//! - Absent values are `None`; values are never "null".
//! - Enumeration order is unspecified. Sort a collected copy when order
//!   matters; doing so never touches the map.
//!
//! Handles and structural changes
//! - A structural change is an insert of a new key, a removal, or a clear
//!   of a non-empty table. Each bumps the table's version.
//! - `EntryHandle` carries the version it was minted at. Using it after
//!   a structural change yields `CollectionError::StaleHandle` rather
//!   than reading a reused or relocated slot.
//! - Borrowing iterators (`iter`, `entries`) make structural changes
//!   during a walk a compile error. Detached cursors (`cursor`,
//!   `entry_cursor`) check the version on each step and report
//!   `CollectionError::ConcurrentModification`.
//! - Value writes (overwriting put, replace, compute on a present key,
//!   `EntryHandle::set_value`) are not structural.
//!
//! Hasher and growth invariants
//! - Each slot stores the hash computed at insertion. Growth doubles the
//!   bucket array and relinks by stored hash, so `K: Hash` is never
//!   called after insertion.
//! - `len <= buckets * max_load_factor` (default 0.75) after each insert.
//!   Removal never shrinks the bucket array.
//! - Lookups need only `&self`, so a key's `Hash`/`Eq` may read the same
//!   table again. Writers hold `&mut self` for their whole duration, which
//!   keeps user closures (`compute`, `replace_all`, ...) from observing a
//!   half-linked table.

mod assoc_map;
pub mod config;
mod entry;
pub mod error;
mod hash_map;
mod hash_set;
pub mod hash_table;
mod immutable;
mod table_proptest;

pub use assoc_map::AssocMap;
pub use config::TableConfig;
pub use entry::{Entries, EntryCursor, EntryHandle};
pub use error::{CollectionError, Result};
pub use hash_map::{ChainMap, Iter, IterMut};
pub use hash_set::{ChainSet, Iter as SetIter, SetCursor};
pub use hash_table::DefaultHashBuilder;
pub use immutable::ImmutableMap;
