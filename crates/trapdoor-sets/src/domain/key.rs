//! Key fingerprints
//!
//! A fingerprint identifies the secret a value was built under. Two values
//! may only be combined when their fingerprints agree.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TrapdoorError};

/// Compact identifier of a secret key
///
/// The zero value is reserved for "unset" (default-constructed sets) and is
/// never produced by a `KeyedHasher`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct KeyFingerprint(u64);

impl KeyFingerprint {
    /// Fingerprint of a value that has not been bound to any key yet
    pub const UNSET: Self = Self(0);

    /// Width on the wire (one 64-bit word)
    pub const ENCODED_LEN: usize = 8;

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Build a fingerprint from digest bytes, remapping the reserved zero value
    pub fn from_digest(bytes: [u8; 8]) -> Self {
        match u64::from_le_bytes(bytes) {
            0 => Self(1),
            v => Self(v),
        }
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    pub const fn is_set(self) -> bool {
        self.0 != 0
    }

    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }

    /// True if operands carrying these fingerprints may be combined
    ///
    /// An unset fingerprint is compatible with anything.
    pub fn is_compatible(self, other: Self) -> bool {
        !self.is_set() || !other.is_set() || self == other
    }

    /// Strict check: both fingerprints must be identical
    pub fn ensure_matches(self, other: Self) -> Result<()> {
        if self != other {
            return Err(self.mismatch(other));
        }
        Ok(())
    }

    /// Merge two fingerprints for a binary operation
    ///
    /// Returns the fingerprint the result should carry: the set one if only
    /// one is set, the common one if both agree.
    pub fn combine(self, other: Self) -> Result<Self> {
        match (self.is_set(), other.is_set()) {
            (false, _) => Ok(other),
            (_, false) => Ok(self),
            _ if self == other => Ok(self),
            _ => Err(self.mismatch(other)),
        }
    }

    fn mismatch(self, other: Self) -> TrapdoorError {
        warn!(
            left = %self,
            right = %other,
            "Rejected operands built under different keys"
        );
        TrapdoorError::KeyMismatch {
            left: self,
            right: other,
        }
    }
}

impl fmt::Display for KeyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
