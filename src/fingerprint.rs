//! Canonical hashing of built paths.
//!
//! Hop records and display rows contain no hash maps, so their JSON form is
//! stable: fields in declaration order, sequences in index order. Hashing
//! that form with xxh64 gives a fingerprint that is identical across repeated
//! builds of the same inputs.

use std::fmt;

use serde::{Serialize, Serializer};
use xxhash_rust::xxh64::xxh64;

/// Seed of [`PathFingerprint`] hashes.
pub const FINGERPRINT_SEED: u64 = 0;

/// Serialize a value to canonical JSON bytes.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// xxh64 of a value's canonical bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathFingerprint(u64);

impl PathFingerprint {
    /// Fingerprint a serializable value.
    pub fn of<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self(xxh64(&to_canonical_bytes(value)?, FINGERPRINT_SEED)))
    }

    /// Raw hash.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PathFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl Serialize for PathFingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
