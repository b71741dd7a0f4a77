//! ChainSet: membership-only container over `HashTable<T, ()>`.

use crate::config::TableConfig;
use crate::error::Result;
use crate::hash_table::{self, Cursor, DefaultHashBuilder, HashTable};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;

pub struct ChainSet<T, S = DefaultHashBuilder> {
    table: HashTable<T, (), S>,
}

impl<T> ChainSet<T>
where
    T: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, Default::default())
    }
}

impl<T> Default for ChainSet<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> ChainSet<T, S>
where
    T: Eq + Hash,
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

    /// Add `value`. Returns true iff it was not already a member; a
    /// duplicate leaves the set, including the stored element, unchanged.
    pub fn add(&mut self, value: T) -> bool {
        let (_, inserted) = self.table.find_or_insert_with(value, |_| ());
        inserted
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains(value)
    }

    /// Returns true iff `value` was a member.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(value).is_some()
    }

    /// Remove and return the stored element equal to `value`.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(value).map(|(t, ())| t)
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl<T, S> ChainSet<T, S> {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.config().threshold(self.table.bucket_count())
    }

    /// Members in unspecified order. Borrowing the set rules out
    /// modification while the iterator lives.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            it: self.table.iter(),
        }
    }

    /// A detached enumeration; see [`SetCursor`].
    pub fn cursor(&self) -> SetCursor {
        SetCursor {
            inner: self.table.cursor(),
        }
    }
}

/// Enumeration of a [`ChainSet`] that does not borrow it.
///
/// Yields `Err(ConcurrentModification)` once, then ends, if the set gained
/// or lost members after the cursor was created.
#[derive(Clone, Debug)]
pub struct SetCursor {
    inner: Cursor,
}

impl SetCursor {
    pub fn next<'s, T, S>(&mut self, set: &'s ChainSet<T, S>) -> Option<Result<&'s T>> {
        let step = self.inner.next(&set.table)?;
        Some(step.map(|id| {
            set.table
                .key(id)
                .expect("cursor yields live slots of an unmodified table")
        }))
    }
}

pub struct Iter<'a, T> {
    it: hash_table::Iter<'a, T, ()>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, t, _)| t)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T, S> IntoIterator for &'a ChainSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> Extend<T> for ChainSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for t in iter {
            self.add(t);
        }
    }
}

impl<T, S> FromIterator<T> for ChainSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<T, S> Clone for ChainSet<T, S>
where
    T: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<T, S> PartialEq for ChainSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl<T, S> Eq for ChainSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

impl<T: fmt::Debug, S> fmt::Debug for ChainSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectionError;
    use std::collections::BTreeSet;

    /// Invariant: a duplicate add keeps the first stored element.
    #[test]
    fn duplicate_add_keeps_original_element() {
        #[derive(Debug)]
        struct Tagged(u32, &'static str);
        impl PartialEq for Tagged {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }
        impl Eq for Tagged {}
        impl Hash for Tagged {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        let mut s = ChainSet::new();
        assert!(s.add(Tagged(1, "first")));
        assert!(!s.add(Tagged(1, "second")));
        assert_eq!(s.iter().next().map(|t| t.1), Some("first"));
    }

    /// Invariant: `remove`/`take` report membership and shrink `len`.
    #[test]
    fn remove_and_take() {
        let mut s: ChainSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(s.len(), 3);
        assert!(s.remove("a"));
        assert!(!s.remove("a"));
        assert_eq!(s.take("b"), Some("b".to_string()));
        assert_eq!(s.take("b"), None);
        assert_eq!(s.len(), 1);
        assert!(s.add("a".to_string()), "re-adding after removal succeeds");
    }

    /// Invariant: set cursors fail after membership changes only.
    #[test]
    fn cursor_detects_membership_change() {
        let mut s: ChainSet<u32> = (0..4).collect();
        let mut c = s.cursor();
        assert!(matches!(c.next(&s), Some(Ok(_))));
        assert!(!s.add(0), "duplicate add is not a structural change");
        assert!(matches!(c.next(&s), Some(Ok(_))));
        s.remove(&3);
        assert!(matches!(
            c.next(&s),
            Some(Err(CollectionError::ConcurrentModification { .. }))
        ));
        assert!(c.next(&s).is_none());
    }

    #[test]
    fn equality_ignores_order() {
        let a: ChainSet<u32> = (0..100).collect();
        let b: ChainSet<u32> = (0..100).rev().collect();
        assert_eq!(a, b);
        let c: ChainSet<u32> = (1..101).collect();
        assert_ne!(a, c);
        let seen: BTreeSet<u32> = a.iter().copied().collect();
        assert_eq!(seen.len(), 100);
    }
}
