//! Table sizing policy.

use crate::error::{CollectionError, Result};

/// Bucket count used when no initial capacity is requested.
pub const DEFAULT_INITIAL_BUCKETS: usize = 16;

/// Live-entry to bucket ratio above which the table grows.
pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 0.75;

/// Smallest accepted maximum load factor. At this ratio the default
/// 16 buckets still grow to hold one entry within 128 buckets.
pub const MIN_MAX_LOAD_FACTOR: f32 = 0.01;

/// Sizing configuration for a [`HashTable`](crate::hash_table::HashTable).
///
/// The bucket array is allocated lazily on the first insert. Its size is
/// the smallest power of two that holds `initial_capacity` entries without
/// crossing `max_load_factor`, and never less than
/// [`DEFAULT_INITIAL_BUCKETS`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    initial_capacity: usize,
    max_load_factor: f32,
}

impl TableConfig {
    pub fn new(initial_capacity: usize, max_load_factor: f32) -> Result<Self> {
        Self::default()
            .with_initial_capacity(initial_capacity)
            .with_max_load_factor(max_load_factor)
    }

    pub fn with_initial_capacity(self, initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..self
        }
    }

    pub fn with_max_load_factor(self, max_load_factor: f32) -> Result<Self> {
        if !(MIN_MAX_LOAD_FACTOR..=1.0).contains(&max_load_factor) {
            log::debug!("rejecting table config with load factor {max_load_factor}");
            return Err(CollectionError::InvalidLoadFactor(max_load_factor));
        }
        Ok(Self {
            max_load_factor,
            ..self
        })
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Number of live entries `buckets` can hold before growth.
    pub(crate) fn threshold(&self, buckets: usize) -> usize {
        (buckets as f64 * self.max_load_factor as f64) as usize
    }

    /// Bucket count for the first allocation.
    pub(crate) fn initial_buckets(&self) -> usize {
        self.buckets_for(self.initial_capacity.max(1))
    }

    /// Smallest power-of-two bucket count whose threshold admits `len`.
    pub(crate) fn buckets_for(&self, len: usize) -> usize {
        self.grow_from(DEFAULT_INITIAL_BUCKETS, len)
    }

    /// Double `buckets` until its threshold admits `len`.
    ///
    /// Panics if the bucket count would overflow `usize`, as the table
    /// could never hold `len` entries anyway.
    pub(crate) fn grow_from(&self, mut buckets: usize, len: usize) -> usize {
        while self.threshold(buckets) < len {
            buckets = match buckets.checked_mul(2) {
                Some(n) => n,
                None => panic!("hash table capacity overflow"),
            };
        }
        buckets
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}
