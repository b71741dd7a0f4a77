//! Entry view: handles that alias a map's slots and write through to them.
//!
//! An [`EntryHandle`] is a plain `Copy` value: the owning table's identity,
//! a slot id, and the table's structural version at the time the handle
//! was minted. It borrows nothing, so handles can be collected, sorted and
//! kept around while the map is mutated; every access takes the map
//! explicitly and is validated first.
//!
//! - Wrong map: `CollectionError::ForeignHandle`.
//! - Map structurally modified since minting (an insert of a new key, a
//!   removal, a non-empty clear): `CollectionError::StaleHandle`.
//! - Value writes, through a handle or through `put`/`replace` on a present
//!   key, are not structural and keep every outstanding handle valid.

use crate::error::{CollectionError, Result};
use crate::hash_map::ChainMap;
use crate::hash_table::{self, Cursor, SlotId, TableId};
use core::iter::FusedIterator;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EntryHandle {
    owner: TableId,
    slot: SlotId,
    version: u64,
}

impl EntryHandle {
    #[inline]
    fn check<K, V, S>(&self, map: &ChainMap<K, V, S>) -> Result<()> {
        if map.table.id() != self.owner {
            return Err(CollectionError::ForeignHandle);
        }
        if map.table.version() != self.version {
            return Err(CollectionError::StaleHandle);
        }
        Ok(())
    }

    /// Whether the handle may still be used with `map`.
    pub fn is_valid<K, V, S>(&self, map: &ChainMap<K, V, S>) -> bool {
        self.check(map).is_ok()
    }

    pub fn key<'m, K, V, S>(&self, map: &'m ChainMap<K, V, S>) -> Result<&'m K> {
        self.get(map).map(|(k, _)| k)
    }

    pub fn value<'m, K, V, S>(&self, map: &'m ChainMap<K, V, S>) -> Result<&'m V> {
        self.get(map).map(|(_, v)| v)
    }

    pub fn get<'m, K, V, S>(&self, map: &'m ChainMap<K, V, S>) -> Result<(&'m K, &'m V)> {
        self.check(map)?;
        map.slot(self.slot).ok_or(CollectionError::StaleHandle)
    }

    /// Mutable access to the aliased value. Writes land in the map's slot.
    pub fn value_mut<'m, K, V, S>(&self, map: &'m mut ChainMap<K, V, S>) -> Result<&'m mut V> {
        self.check(map)?;
        map.table
            .payload_mut(self.slot)
            .ok_or(CollectionError::StaleHandle)
    }

    /// Overwrite the aliased value and return the one it replaced.
    pub fn set_value<K, V, S>(&self, map: &mut ChainMap<K, V, S>, value: V) -> Result<V> {
        let slot = self.value_mut(map)?;
        Ok(core::mem::replace(slot, value))
    }
}

/// Lazy sequence of [`EntryHandle`]s over every live entry of a map.
pub struct Entries<'a, K, V> {
    owner: TableId,
    version: u64,
    it: hash_table::Iter<'a, K, V>,
}

impl<'a, K, V> Entries<'a, K, V> {
    pub(crate) fn new(owner: TableId, version: u64, it: hash_table::Iter<'a, K, V>) -> Self {
        Self { owner, version, it }
    }
}

impl<K, V> Iterator for Entries<'_, K, V> {
    type Item = EntryHandle;

    fn next(&mut self) -> Option<EntryHandle> {
        let (slot, _, _) = self.it.next()?;
        Some(EntryHandle {
            owner: self.owner,
            slot,
            version: self.version,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Entries<'_, K, V> {}
impl<K, V> FusedIterator for Entries<'_, K, V> {}

/// Entry-view enumeration that does not borrow the map.
///
/// Each step takes the map explicitly. After a structural change, the next
/// step yields `CollectionError::ConcurrentModification` and the cursor is
/// exhausted. Value writes through handles do not disturb it.
#[derive(Clone, Debug)]
pub struct EntryCursor {
    inner: Cursor,
}

impl EntryCursor {
    pub(crate) fn new(inner: Cursor) -> Self {
        Self { inner }
    }

    pub fn next<K, V, S>(&mut self, map: &ChainMap<K, V, S>) -> Option<Result<EntryHandle>> {
        let version = self.inner.version();
        let step = self.inner.next(&map.table)?;
        Some(step.map(|slot| EntryHandle {
            owner: map.table.id(),
            slot,
            version,
        }))
    }
}
