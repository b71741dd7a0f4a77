//! ImmutableMap: a read-only map view.
//!
//! Reads delegate to the wrapped [`ChainMap`]. Each `ChainMap` mutator
//! (including `get_mut`, which hands out write access) has a counterpart
//! here with the same arguments that returns
//! `CollectionError::UnsupportedMutation` and leaves the contents
//! untouched. `iter_mut` and handle writes have no counterpart: they need a
//! `&mut ChainMap`, which this view never lends out.

use crate::entry::{Entries, EntryCursor};
use crate::error::{CollectionError, Result};
use crate::hash_map::{ChainMap, Iter};
use crate::hash_table::DefaultHashBuilder;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

pub struct ImmutableMap<K, V, S = DefaultHashBuilder> {
    map: ChainMap<K, V, S>,
}

#[inline]
fn unsupported<T>(op: &'static str) -> Result<T> {
    Err(CollectionError::UnsupportedMutation { op })
}

impl<K, V, S> ImmutableMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn from_map(map: ChainMap<K, V, S>) -> Self {
        Self { map }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key)
    }

    pub fn get_or_default<'a, Q>(&'a self, key: &Q, fallback: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_or_default(key, fallback)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_key_value(key)
    }

    pub fn get_mut<Q>(&mut self, _key: &Q) -> Result<Option<&mut V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        unsupported("get_mut")
    }

    pub fn put(&mut self, _key: K, _value: V) -> Result<Option<V>> {
        unsupported("put")
    }

    pub fn put_if_absent(&mut self, _key: K, _value: V) -> Result<Option<&V>> {
        unsupported("put_if_absent")
    }

    pub fn put_all<S2>(&mut self, _other: &ChainMap<K, V, S2>) -> Result<()> {
        unsupported("put_all")
    }

    pub fn remove<Q>(&mut self, _key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        unsupported("remove")
    }

    pub fn remove_entry<Q>(&mut self, _key: &Q) -> Result<Option<(K, V)>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        unsupported("remove_entry")
    }

    pub fn remove_if_eq<Q>(&mut self, _key: &Q, _expected: &V) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        unsupported("remove_if_eq")
    }

    pub fn replace<Q>(&mut self, _key: &Q, _value: V) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        unsupported("replace")
    }

    pub fn replace_if_eq<Q>(&mut self, _key: &Q, _expected: &V, _new: V) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        unsupported("replace_if_eq")
    }

    pub fn replace_all<F>(&mut self, _f: F) -> Result<()>
    where
        F: FnMut(&K, &V) -> V,
    {
        unsupported("replace_all")
    }

    pub fn compute<F>(&mut self, _key: K, _f: F) -> Result<Option<&V>>
    where
        F: FnOnce(&K, Option<&V>) -> Option<V>,
    {
        unsupported("compute")
    }

    pub fn compute_if_absent<F>(&mut self, _key: K, _f: F) -> Result<&V>
    where
        F: FnOnce(&K) -> V,
    {
        unsupported("compute_if_absent")
    }

    pub fn compute_if_present<Q, F>(&mut self, _key: &Q, _f: F) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&K, &V) -> Option<V>,
    {
        unsupported("compute_if_present")
    }

    pub fn merge<F>(&mut self, _key: K, _value: V, _f: F) -> Result<Option<&V>>
    where
        F: FnOnce(&V, V) -> Option<V>,
    {
        unsupported("merge")
    }

    pub fn clear(&mut self) -> Result<()> {
        unsupported("clear")
    }
}

impl<K, V, S> ImmutableMap<K, V, S> {
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.map.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.map.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values()
    }

    /// Read-only entry view. Resolve the handles against [`as_map`];
    /// writing through them needs a `&mut ChainMap`, which this view
    /// never lends out.
    ///
    /// [`as_map`]: ImmutableMap::as_map
    pub fn entries(&self) -> Entries<'_, K, V> {
        self.map.entries()
    }

    pub fn entry_cursor(&self) -> EntryCursor {
        self.map.entry_cursor()
    }

    /// Borrow the underlying map read-only.
    pub fn as_map(&self) -> &ChainMap<K, V, S> {
        &self.map
    }
}

impl<'a, K, V, S> IntoIterator for &'a ImmutableMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> Clone for ImmutableMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ImmutableMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.map, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutators_fail_and_leave_contents() {
        let mut m = ChainMap::singleton_immutable(1, "one");
        assert_eq!(
            m.put(2, "two"),
            Err(CollectionError::UnsupportedMutation { op: "put" })
        );
        assert!(matches!(
            m.compute_if_absent(3, |_| "three"),
            Err(CollectionError::UnsupportedMutation {
                op: "compute_if_absent"
            })
        ));
        assert!(m.clear().is_err());
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&1), Some(&"one"));
    }

    /// Invariant: the conditional and remapping mutators are rejected too,
    /// and their closures never run.
    #[test]
    fn conditional_mutators_fail_without_running_closures() {
        let mut m = ChainMap::singleton_immutable("k", 1);
        assert_eq!(
            m.get_mut("k"),
            Err(CollectionError::UnsupportedMutation { op: "get_mut" })
        );
        assert_eq!(
            m.remove_if_eq("k", &1),
            Err(CollectionError::UnsupportedMutation { op: "remove_if_eq" })
        );
        assert_eq!(
            m.remove_entry("k"),
            Err(CollectionError::UnsupportedMutation { op: "remove_entry" })
        );
        let r = m.compute_if_present("k", |_, _| -> Option<i32> {
            panic!("closure must not run")
        });
        assert_eq!(r, Err(CollectionError::UnsupportedMutation { op: "compute_if_present" }));
        let r = m.merge("k", 2, |_, _| -> Option<i32> { panic!("closure must not run") });
        assert_eq!(r, Err(CollectionError::UnsupportedMutation { op: "merge" }));

        assert_eq!(m.get_key_value("k"), Some((&"k", &1)));
        let h = m.entries().next().expect("one entry");
        assert_eq!(h.value(m.as_map()), Ok(&1));
    }

    #[test]
    fn debug_matches_wrapped_map() {
        let m = ChainMap::singleton_immutable("k", 1);
        assert_eq!(format!("{m:?}"), r#"{"k": 1}"#);
    }
}
