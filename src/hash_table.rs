//! HashTable: separate-chaining storage shared by the map and the set.
//!
//! Entries live in a generational [`SlotMap`]; the bucket array only holds
//! the head of each collision chain and every slot links to the next one.
//! This keeps slot ids stable across growth, so growing relinks chains
//! without moving a single key or payload.
//!
//! Invariants
//! - The bucket count is zero (nothing allocated yet) or a power of two.
//! - After every insert, `len <= bucket_count * max_load_factor`.
//! - A slot's stored hash is `hasher.hash_one(key)` from insertion time;
//!   growth relinks by stored hash and never calls `K: Hash`.
//! - Lookups recompute the query hash and resolve collisions with `Eq`.
//! - `version` increases on every structural change: insertion of a new
//!   key, any removal, and `clear` of a non-empty table. Payload
//!   overwrites leave it untouched.

use crate::config::TableConfig;
use crate::error::{CollectionError, Result};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::sync::atomic::{AtomicU64, Ordering};
use slotmap::{DefaultKey, SlotMap};

/// Hasher used when none is supplied. Deterministic across instances, so
/// equal keys hash identically in every table built with the default.
pub type DefaultHashBuilder = hashbrown::hash_map::DefaultHashBuilder;

/// Stable identifier of one slot. Survives growth; dies with removal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SlotId(DefaultKey);

/// Process-unique identity of a table instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TableId(u64);

impl TableId {
    fn mint() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        TableId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

struct Slot<K, P> {
    hash: u64,
    key: K,
    payload: P,
    next: Option<DefaultKey>,
}

pub struct HashTable<K, P, S = DefaultHashBuilder> {
    hasher: S,
    config: TableConfig,
    buckets: Vec<Option<DefaultKey>>,
    slots: SlotMap<DefaultKey, Slot<K, P>>,
    version: u64,
    id: TableId,
    // Single-threaded: keeps the table !Send + !Sync.
    _local: PhantomData<*mut ()>,
}

impl<K, P> HashTable<K, P>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, P> Default for HashTable<K, P>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P, S> HashTable<K, P, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_config_and_hasher(TableConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Self {
        Self {
            hasher,
            config,
            buckets: Vec::new(),
            slots: SlotMap::with_key(),
            version: 0,
            id: TableId::mint(),
            _local: PhantomData,
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Hash `q` and walk its chain. The only phase that runs user code, and
    /// it only needs `&self`, so a key's `Eq` may read the table again.
    fn locate<Q>(&self, q: &Q) -> (u64, Option<DefaultKey>)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        (hash, self.find_in_chain(hash, q))
    }

    fn find_in_chain<Q>(&self, hash: u64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        if self.buckets.is_empty() {
            return None;
        }
        let mut cur = self.buckets[self.bucket_index(hash)];
        while let Some(k) = cur {
            let slot = &self.slots[k];
            if slot.hash == hash && slot.key.borrow() == q {
                return Some(k);
            }
            cur = slot.next;
        }
        None
    }

    #[inline]
    fn bucket_index(&self, hash: u64) -> usize {
        debug_assert!(self.buckets.len().is_power_of_two());
        (hash as usize) & (self.buckets.len() - 1)
    }

    pub fn find<Q>(&self, q: &Q) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate(q).1.map(SlotId)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate(q).1.is_some()
    }

    /// Insert `key`, or overwrite the payload of an equal key already
    /// present. Returns the slot and the overwritten payload, if any. An
    /// overwrite keeps the originally stored key.
    pub fn insert(&mut self, key: K, payload: P) -> (SlotId, Option<P>) {
        let (hash, found) = self.locate(&key);
        if let Some(k) = found {
            let old = core::mem::replace(&mut self.slots[k].payload, payload);
            return (SlotId(k), Some(old));
        }
        (self.link_new(hash, key, payload), None)
    }

    /// Look `key` up and insert `make(&key)` only when it is absent.
    /// Returns the slot and whether an insertion happened.
    pub fn find_or_insert_with<F>(&mut self, key: K, make: F) -> (SlotId, bool)
    where
        F: FnOnce(&K) -> P,
    {
        let (hash, found) = self.locate(&key);
        match found {
            Some(k) => (SlotId(k), false),
            None => {
                let payload = make(&key);
                (self.link_new(hash, key, payload), true)
            }
        }
    }

    fn link_new(&mut self, hash: u64, key: K, payload: P) -> SlotId {
        self.reserve_one();
        let idx = self.bucket_index(hash);
        let next = self.buckets[idx];
        let k = self.slots.insert(Slot {
            hash,
            key,
            payload,
            next,
        });
        self.buckets[idx] = Some(k);
        self.version += 1;
        SlotId(k)
    }

    /// Make room for one more entry without crossing the load factor.
    fn reserve_one(&mut self) {
        let needed = self.slots.len() + 1;
        if self.buckets.is_empty() {
            let n = self.config.initial_buckets().max(self.config.buckets_for(needed));
            self.buckets = vec![None; n];
            return;
        }
        if needed <= self.config.threshold(self.buckets.len()) {
            return;
        }
        let n = self.config.grow_from(self.buckets.len(), needed);
        self.relink(n);
    }

    fn relink(&mut self, new_len: usize) {
        log::trace!(
            "growing table from {} to {} buckets ({} live entries)",
            self.buckets.len(),
            new_len,
            self.slots.len()
        );
        let mask = new_len - 1;
        let mut buckets = vec![None; new_len];
        for (k, slot) in self.slots.iter_mut() {
            let idx = (slot.hash as usize) & mask;
            slot.next = buckets[idx];
            buckets[idx] = Some(k);
        }
        self.buckets = buckets;
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<(K, P)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (hash, found) = self.locate(q);
        self.evict(hash, found?)
    }

    pub fn remove_slot(&mut self, id: SlotId) -> Option<(K, P)> {
        let hash = self.slots.get(id.0)?.hash;
        self.evict(hash, id.0)
    }

    // Unlink before taking the slot out, so the table is consistent by the
    // time the caller drops the returned key and payload.
    fn evict(&mut self, hash: u64, target: DefaultKey) -> Option<(K, P)> {
        self.unlink(hash, target);
        let slot = self.slots.remove(target)?;
        self.version += 1;
        Some((slot.key, slot.payload))
    }

    fn unlink(&mut self, hash: u64, target: DefaultKey) {
        let idx = self.bucket_index(hash);
        let after = self.slots[target].next;
        if self.buckets[idx] == Some(target) {
            self.buckets[idx] = after;
            return;
        }
        let mut cur = self.buckets[idx];
        while let Some(k) = cur {
            let slot = &mut self.slots[k];
            if slot.next == Some(target) {
                slot.next = after;
                return;
            }
            cur = slot.next;
        }
        debug_assert!(false, "slot missing from its chain");
    }

    /// Drop every entry. The bucket array keeps its size.
    pub fn clear(&mut self) {
        if self.slots.is_empty() {
            return;
        }
        log::trace!("clearing {} entries", self.slots.len());
        self.buckets.fill(None);
        self.version += 1;
        self.slots.clear();
    }
}

// Accessors that never hash or compare keys.
impl<K, P, S> HashTable<K, P, S> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Live entries per bucket; zero before the first insert.
    pub fn load_factor(&self) -> f32 {
        if self.buckets.is_empty() {
            0.0
        } else {
            self.slots.len() as f32 / self.buckets.len() as f32
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Structural version; see the module invariants.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn get(&self, id: SlotId) -> Option<(&K, &P)> {
        self.slots.get(id.0).map(|s| (&s.key, &s.payload))
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<(&K, &mut P)> {
        self.slots.get_mut(id.0).map(|s| (&s.key, &mut s.payload))
    }

    pub fn key(&self, id: SlotId) -> Option<&K> {
        self.slots.get(id.0).map(|s| &s.key)
    }

    pub fn payload(&self, id: SlotId) -> Option<&P> {
        self.slots.get(id.0).map(|s| &s.payload)
    }

    pub fn payload_mut(&mut self, id: SlotId) -> Option<&mut P> {
        self.slots.get_mut(id.0).map(|s| &mut s.payload)
    }

    /// Walk every chain in bucket order.
    pub fn iter(&self) -> Iter<'_, K, P> {
        Iter {
            buckets: &self.buckets,
            slots: &self.slots,
            bucket: 0,
            chain: None,
            remaining: self.slots.len(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, P> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    /// A detached enumeration that checks the structural version on
    /// every step.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            table: self.id,
            version: self.version,
            bucket: 0,
            chain: None,
            done: false,
        }
    }
}

impl<K, P, S> Clone for HashTable<K, P, S>
where
    K: Clone,
    P: Clone,
    S: Clone,
{
    /// The clone is a distinct table: handles and cursors taken from the
    /// original are foreign to it.
    fn clone(&self) -> Self {
        let mut slots = SlotMap::with_capacity_and_key(self.slots.len());
        let mut buckets = vec![None; self.buckets.len()];
        for (_, s) in self.slots.iter() {
            let idx = (s.hash as usize) & (buckets.len() - 1);
            let k = slots.insert(Slot {
                hash: s.hash,
                key: s.key.clone(),
                payload: s.payload.clone(),
                next: buckets[idx],
            });
            buckets[idx] = Some(k);
        }
        Self {
            hasher: self.hasher.clone(),
            config: self.config,
            buckets,
            slots,
            version: 0,
            id: TableId::mint(),
            _local: PhantomData,
        }
    }
}

impl<K, P, S> fmt::Debug for HashTable<K, P, S>
where
    K: fmt::Debug,
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.len())
            .field("buckets", &self.bucket_count())
            .field("version", &self.version)
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, K, P, S>(&'a HashTable<K, P, S>);

impl<K: fmt::Debug, P: fmt::Debug, S> fmt::Debug for DebugEntries<'_, K, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(_, k, p)| (k, p)))
            .finish()
    }
}

/// Iterator over live slots in chain order.
pub struct Iter<'a, K, P> {
    buckets: &'a [Option<DefaultKey>],
    slots: &'a SlotMap<DefaultKey, Slot<K, P>>,
    bucket: usize,
    chain: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, P> Iterator for Iter<'a, K, P> {
    type Item = (SlotId, &'a K, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        loop {
            if let Some(k) = self.chain {
                let slot = &slots[k];
                self.chain = slot.next;
                self.remaining -= 1;
                return Some((SlotId(k), &slot.key, &slot.payload));
            }
            let head = *self.buckets.get(self.bucket)?;
            self.bucket += 1;
            self.chain = head;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, P> ExactSizeIterator for Iter<'_, K, P> {}
impl<K, P> FusedIterator for Iter<'_, K, P> {}

impl<K, P> Clone for Iter<'_, K, P> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets,
            slots: self.slots,
            bucket: self.bucket,
            chain: self.chain,
            remaining: self.remaining,
        }
    }
}

/// Iterator over live slots with mutable payloads, in storage order.
pub struct IterMut<'a, K, P> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Slot<K, P>>,
}

impl<'a, K, P> Iterator for IterMut<'a, K, P> {
    type Item = (SlotId, &'a K, &'a mut P);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(k, s)| (SlotId(k), &s.key, &mut s.payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Enumeration position that does not borrow its table.
///
/// Each call to [`Cursor::next`] takes the table explicitly. Once the table
/// has been structurally modified since the cursor was created, `next`
/// yields one `ConcurrentModification` error and then ends.
#[derive(Clone, Debug)]
pub struct Cursor {
    table: TableId,
    version: u64,
    bucket: usize,
    chain: Option<DefaultKey>,
    done: bool,
}

impl Cursor {
    pub fn next<K, P, S>(&mut self, table: &HashTable<K, P, S>) -> Option<Result<SlotId>> {
        if self.done {
            return None;
        }
        if let Err(e) = self.check(table) {
            self.done = true;
            return Some(Err(e));
        }
        loop {
            if let Some(k) = self.chain {
                self.chain = table.slots[k].next;
                return Some(Ok(SlotId(k)));
            }
            match table.buckets.get(self.bucket) {
                Some(&head) => {
                    self.bucket += 1;
                    self.chain = head;
                }
                None => {
                    self.done = true;
                    return None;
                }
            }
        }
    }

    fn check<K, P, S>(&self, table: &HashTable<K, P, S>) -> Result<()> {
        if table.id != self.table {
            return Err(CollectionError::ForeignHandle);
        }
        if table.version != self.version {
            return Err(CollectionError::ConcurrentModification {
                expected: self.version,
                found: table.version,
            });
        }
        Ok(())
    }

    /// Version of the table when the cursor was created.
    pub fn version(&self) -> u64 {
        self.version
    }
}
