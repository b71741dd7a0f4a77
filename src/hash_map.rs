//! ChainMap: key/value store over `HashTable<K, V>`.
//!
//! Every point operation delegates storage to the table. The conditional
//! and compute-style updates below each perform at most one lookup, then
//! act on the returned slot id. A user closure runs between the lookup
//! and the write, never while a chain is being relinked.

use crate::config::TableConfig;
use crate::entry::{Entries, EntryCursor};
use crate::hash_table::{self, DefaultHashBuilder, HashTable, SlotId};
use crate::immutable::ImmutableMap;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::ops::Index;

pub struct ChainMap<K, V, S = DefaultHashBuilder> {
    pub(crate) table: HashTable<K, V, S>,
}

impl<K, V> ChainMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, Default::default())
    }

    /// An immutable map holding exactly `key -> value`. Every mutating call
    /// on it fails with `CollectionError::UnsupportedMutation`.
    pub fn singleton_immutable(key: K, value: V) -> ImmutableMap<K, V> {
        let mut map = Self::with_config(TableConfig::default().with_initial_capacity(1));
        map.put(key, value);
        map.into_immutable()
    }
}

impl<K, V> Default for ChainMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: HashTable::with_hasher(hasher),
        }
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Self {
        Self {
            table: HashTable::with_config_and_hasher(config, hasher),
        }
    }

    /// Insert or overwrite. Returns the value `key` mapped to before.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value).1
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.table.find(key)?;
        self.table.payload(id)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.table.find(key)?;
        self.table.payload_mut(id)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.table.find(key)?;
        self.table.get(id)
    }

    /// The stored value, or `fallback` when `key` is absent. The fallback
    /// is never stored.
    pub fn get_or_default<'a, Q>(&'a self, key: &Q, fallback: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).unwrap_or(fallback)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains(key)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(key)
    }

    /// Remove `key` only if it currently maps to a value equal to
    /// `expected`. Returns whether the entry was removed.
    pub fn remove_if_eq<Q>(&mut self, key: &Q, expected: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        match self.table.find(key) {
            Some(id) if self.table.payload(id) == Some(expected) => {
                self.table.remove_slot(id).is_some()
            }
            _ => false,
        }
    }

    /// Insert `value` only if `key` is absent. Returns the existing value
    /// when present (nothing is written), or `None` when `value` was
    /// inserted.
    pub fn put_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        let (id, inserted) = self.table.find_or_insert_with(key, |_| value);
        if inserted {
            None
        } else {
            self.table.payload(id)
        }
    }

    /// Copy every entry of `other` into `self`, overwriting on collision:
    /// values from `other` win.
    pub fn put_all<S2>(&mut self, other: &ChainMap<K, V, S2>)
    where
        K: Clone,
        V: Clone,
    {
        for (k, v) in other.iter() {
            self.put(k.clone(), v.clone());
        }
    }

    /// Overwrite the value of a present key. An absent key is not inserted.
    pub fn replace<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let v = self.get_mut(key)?;
        Some(core::mem::replace(v, value))
    }

    /// Overwrite with `new` only if `key` is present and its value equals
    /// `expected`. Returns whether the write happened.
    pub fn replace_if_eq<Q>(&mut self, key: &Q, expected: &V, new: V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        match self.get_mut(key) {
            Some(v) if *v == *expected => {
                *v = new;
                true
            }
            _ => false,
        }
    }

    /// Replace every value with `f(key, value)`, visiting each entry once.
    pub fn replace_all<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> V,
    {
        for (_, k, v) in self.table.iter_mut() {
            let new = f(k, &*v);
            *v = new;
        }
    }

    /// Remap `key`. `f` sees the current value (or `None`); returning
    /// `Some` stores the result, returning `None` removes the entry.
    /// Returns the stored value, or `None` if the key ends up absent.
    pub fn compute<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        F: FnOnce(&K, Option<&V>) -> Option<V>,
    {
        match self.table.find(&key) {
            Some(id) => {
                let (k, v) = self.table.get(id)?;
                match f(k, Some(v)) {
                    Some(new) => {
                        let slot = self.table.payload_mut(id)?;
                        *slot = new;
                        Some(&*slot)
                    }
                    None => {
                        self.table.remove_slot(id);
                        None
                    }
                }
            }
            None => {
                let new = f(&key, None)?;
                let (id, _) = self.table.insert(key, new);
                self.table.payload(id)
            }
        }
    }

    /// Insert `f(&key)` only when `key` is absent; `f` never runs for a
    /// present key. Returns the value now stored.
    pub fn compute_if_absent<F>(&mut self, key: K, f: F) -> &V
    where
        F: FnOnce(&K) -> V,
    {
        let (id, _) = self.table.find_or_insert_with(key, f);
        self.table
            .payload(id)
            .expect("slot returned by find_or_insert_with is live")
    }

    /// Remap a present key. `f` never runs for an absent key; returning
    /// `None` removes the entry.
    pub fn compute_if_present<Q, F>(&mut self, key: &Q, f: F) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&K, &V) -> Option<V>,
    {
        let id = self.table.find(key)?;
        let (k, v) = self.table.get(id)?;
        match f(k, v) {
            Some(new) => {
                let slot = self.table.payload_mut(id)?;
                *slot = new;
                Some(&*slot)
            }
            None => {
                self.table.remove_slot(id);
                None
            }
        }
    }

    /// Store `value` for an absent key, otherwise store
    /// `f(current, value)`; `None` from `f` removes the entry.
    pub fn merge<F>(&mut self, key: K, value: V, f: F) -> Option<&V>
    where
        F: FnOnce(&V, V) -> Option<V>,
    {
        self.compute(key, |_, current| match current {
            Some(cur) => f(cur, value),
            None => Some(value),
        })
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Freeze this map into a read-only view.
    pub fn into_immutable(self) -> ImmutableMap<K, V, S> {
        ImmutableMap::from_map(self)
    }
}

impl<K, V, S> ChainMap<K, V, S> {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries the map can hold before the table grows.
    pub fn capacity(&self) -> usize {
        self.table.config().threshold(self.table.bucket_count())
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.table.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.table.iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// The entry view: one [`EntryHandle`](crate::EntryHandle) per live
    /// entry, in unspecified order.
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries::new(self.table.id(), self.table.version(), self.table.iter())
    }

    /// A detached, version-checked walk over the entry view.
    pub fn entry_cursor(&self) -> EntryCursor {
        EntryCursor::new(self.table.cursor())
    }

    pub(crate) fn slot(&self, id: SlotId) -> Option<(&K, &V)> {
        self.table.get(id)
    }
}

pub struct Iter<'a, K, V> {
    it: hash_table::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

pub struct IterMut<'a, K, V> {
    it: hash_table::IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, Q, V, S> Index<&Q> for ChainMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if `key` is absent.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, S> Clone for ChainMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<K, V, S> PartialEq for ChainMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for ChainMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
