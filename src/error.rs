//! Error taxonomy shared by every container in the crate.
//!
//! Absent values are never errors; lookups return `Option`. The variants
//! below cover the conditions a caller can recover from: mutation of an
//! immutable view, enumeration that outlived a structural change, handles
//! that outlived their slot, and rejected configuration.

use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum CollectionError {
    /// A mutating operation was invoked on an immutable map view.
    #[error("unsupported mutation `{op}` on an immutable map")]
    UnsupportedMutation { op: &'static str },

    /// A cursor observed a structural change made after it was created.
    #[error("concurrent modification: expected version {expected}, found {found}")]
    ConcurrentModification { expected: u64, found: u64 },

    /// An entry handle was used after a structural change of its map.
    #[error("stale entry handle: the map was structurally modified")]
    StaleHandle,

    /// An entry handle was used with a map other than the one that minted it.
    #[error("entry handle belongs to a different map")]
    ForeignHandle,

    /// The maximum load factor must lie within
    /// `[MIN_MAX_LOAD_FACTOR, 1]`; see [`crate::config`].
    #[error("invalid maximum load factor {0}")]
    InvalidLoadFactor(f32),
}

pub type Result<T> = core::result::Result<T, CollectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_operation() {
        let e = CollectionError::UnsupportedMutation { op: "put" };
        assert_eq!(e.to_string(), "unsupported mutation `put` on an immutable map");

        let e = CollectionError::ConcurrentModification {
            expected: 3,
            found: 4,
        };
        assert!(e.to_string().contains("expected version 3"));
    }
}
