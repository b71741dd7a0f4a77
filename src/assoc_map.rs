//! `AssocMap`: the map contract shared by mutable and immutable maps.
//!
//! Generic code written against this trait works with both a
//! [`ChainMap`] (mutators always succeed) and an [`ImmutableMap`]
//! (mutators always fail with `UnsupportedMutation`).

use crate::error::Result;
use crate::hash_map::ChainMap;
use crate::immutable::ImmutableMap;
use core::hash::{BuildHasher, Hash};

pub trait AssocMap<K, V> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &K) -> Option<&V>;

    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert or overwrite; yields the previous value.
    fn try_put(&mut self, key: K, value: V) -> Result<Option<V>>;

    fn try_remove(&mut self, key: &K) -> Result<Option<V>>;

    /// Overwrite a present key only; yields the previous value.
    fn try_replace(&mut self, key: &K, value: V) -> Result<Option<V>>;

    fn try_clear(&mut self) -> Result<()>;
}

impl<K, V, S> AssocMap<K, V> for ChainMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        ChainMap::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        ChainMap::get(self, key)
    }

    fn try_put(&mut self, key: K, value: V) -> Result<Option<V>> {
        Ok(self.put(key, value))
    }

    fn try_remove(&mut self, key: &K) -> Result<Option<V>> {
        Ok(self.remove(key))
    }

    fn try_replace(&mut self, key: &K, value: V) -> Result<Option<V>> {
        Ok(self.replace(key, value))
    }

    fn try_clear(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }
}

impl<K, V, S> AssocMap<K, V> for ImmutableMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        ImmutableMap::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        ImmutableMap::get(self, key)
    }

    fn try_put(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.put(key, value)
    }

    fn try_remove(&mut self, key: &K) -> Result<Option<V>> {
        self.remove(key)
    }

    fn try_replace(&mut self, key: &K, value: V) -> Result<Option<V>> {
        self.replace(key, value)
    }

    fn try_clear(&mut self) -> Result<()> {
        self.clear()
    }
}
