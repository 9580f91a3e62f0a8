//! Outbound Ports (Driven Ports)
//!
//! `KeyedHasher` is the contract the trapdoor algebra relies on: given a secret
//! (held by the implementor) and an input, produce a fixed-width pseudorandom
//! hash, plus a fingerprint identifying the secret.
//!
//! Implementations MUST be deterministic. Preimage resistance and uniformity
//! are assumed from the implementor, not verified here.

use std::sync::Arc;

use crate::domain::{FixedHash, KeyFingerprint};

/// Keyed hash primitive (Driven Port)
pub trait KeyedHasher: Send + Sync {
    /// Fingerprint of the secret; never `KeyFingerprint::UNSET`
    fn fingerprint(&self) -> KeyFingerprint;

    /// Fill `out` with keyed pseudorandom output for `input`
    ///
    /// The same input must always produce the same bytes for every output
    /// length, and a shorter output need not be a prefix of a longer one.
    fn fill(&self, input: &[u8], out: &mut [u8]);

    /// Derive an N-byte hash of `input`
    fn derive<const N: usize>(&self, input: &[u8]) -> FixedHash<N>
    where
        Self: Sized,
    {
        let mut bytes = [0u8; N];
        self.fill(input, &mut bytes);
        FixedHash::new(bytes)
    }
}

impl<H: KeyedHasher + ?Sized> KeyedHasher for Arc<H> {
    fn fingerprint(&self) -> KeyFingerprint {
        (**self).fingerprint()
    }

    fn fill(&self, input: &[u8], out: &mut [u8]) {
        (**self).fill(input, out)
    }
}
