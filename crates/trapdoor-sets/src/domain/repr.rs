//! Read-only view over hash-carrying values
//!
//! Trapdoors and both set kinds share the same storage. Estimators and
//! similarity metrics work on that storage through `HashRepr`, whatever the
//! algebraic interpretation of the wrapper.

use crate::domain::fixed_hash::FixedHash;
use crate::domain::key::KeyFingerprint;

pub trait HashRepr<const N: usize> {
    fn hash(&self) -> &FixedHash<N>;

    fn key_fingerprint(&self) -> KeyFingerprint;

    /// Bits an element contributes to the representation
    fn bits_per_element(&self) -> usize {
        1
    }
}
