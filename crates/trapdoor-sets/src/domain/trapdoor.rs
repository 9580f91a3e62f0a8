//! Trapdoors and the factory that produces them
//!
//! A `Trapdoor<T, N>` is the keyed N-byte hash of a value of type `T` plus
//! the fingerprint of the secret it was derived under. Different values may
//! collide to the same hash; that collision rate is the false positive rate
//! of every equality test.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::Serialize;
use tracing::debug;

use crate::adapters::Blake3KeyedHasher;
use crate::domain::approx::ApproxBool;
use crate::domain::fixed_hash::FixedHash;
use crate::domain::hash_functions::{domain_input, encode_value, Domain};
use crate::domain::key::KeyFingerprint;
use crate::domain::repr::HashRepr;
use crate::error::Result;
use crate::ports::KeyedHasher;

/// Keyed one-way representation of a value
pub struct Trapdoor<T: ?Sized, const N: usize = 32> {
    hash: FixedHash<N>,
    key_fingerprint: KeyFingerprint,
    _value: PhantomData<fn(&T)>,
}

impl<T: ?Sized, const N: usize> Trapdoor<T, N> {
    /// Reassemble a trapdoor from its stored parts
    pub fn from_parts(hash: FixedHash<N>, key_fingerprint: KeyFingerprint) -> Self {
        Self {
            hash,
            key_fingerprint,
            _value: PhantomData,
        }
    }

    pub fn hash(&self) -> &FixedHash<N> {
        &self.hash
    }

    pub fn key_fingerprint(&self) -> KeyFingerprint {
        self.key_fingerprint
    }

    /// True iff both trapdoors were built under the same secret
    pub fn compatible_with(&self, other: &Self) -> bool {
        self.key_fingerprint == other.key_fingerprint
    }

    /// Approximate equality of the underlying values
    ///
    /// False negatives are impossible; false positives happen only on a hash
    /// collision, with probability 2^-(8N).
    pub fn equals(&self, other: &Self) -> Result<ApproxBool> {
        self.key_fingerprint.ensure_matches(other.key_fingerprint)?;
        Ok(ApproxBool::new(
            self.hash == other.hash,
            FixedHash::<N>::collision_probability(),
            0.0,
        ))
    }

    /// Negation of `equals`
    pub fn not_equals(&self, other: &Self) -> Result<ApproxBool> {
        Ok(!self.equals(other)?)
    }
}

impl<T: ?Sized, const N: usize> Clone for Trapdoor<T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized, const N: usize> Copy for Trapdoor<T, N> {}

// Structural equality, used by collections and round-trip checks. Semantic
// comparison goes through `equals`.
impl<T: ?Sized, const N: usize> PartialEq for Trapdoor<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.key_fingerprint == other.key_fingerprint
    }
}

impl<T: ?Sized, const N: usize> Eq for Trapdoor<T, N> {}

impl<T: ?Sized, const N: usize> Hash for Trapdoor<T, N> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.hash.hash(state);
        self.key_fingerprint.hash(state);
    }
}

impl<T: ?Sized, const N: usize> fmt::Debug for Trapdoor<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trapdoor")
            .field("hash", &self.hash)
            .field("key_fingerprint", &self.key_fingerprint)
            .finish()
    }
}

impl<T: ?Sized, const N: usize> HashRepr<N> for Trapdoor<T, N> {
    fn hash(&self) -> &FixedHash<N> {
        &self.hash
    }

    fn key_fingerprint(&self) -> KeyFingerprint {
        self.key_fingerprint
    }
}

/// Produces trapdoors under a single secret
///
/// Stateless beyond the hasher, so a factory can be shared read-only across
/// threads and reused for any number of values.
#[derive(Clone, Debug)]
pub struct TrapdoorFactory<const N: usize = 32, H = Blake3KeyedHasher> {
    hasher: H,
}

impl<const N: usize> TrapdoorFactory<N, Blake3KeyedHasher> {
    /// Create a factory backed by keyed BLAKE3
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_hasher(Blake3KeyedHasher::new(secret))
    }
}

impl<const N: usize, H: KeyedHasher> TrapdoorFactory<N, H> {
    /// Create a factory around any keyed hasher
    pub fn with_hasher(hasher: H) -> Self {
        debug!(
            hash_bytes = N,
            fingerprint = %hasher.fingerprint(),
            "Created trapdoor factory"
        );
        Self { hasher }
    }

    /// Build the trapdoor of `value`
    ///
    /// Deterministic in (secret, value).
    pub fn create<T: Serialize + ?Sized>(&self, value: &T) -> Result<Trapdoor<T, N>> {
        let encoded = encode_value(value)?;
        Ok(self.create_encoded(&encoded))
    }

    /// Build a trapdoor from an already encoded value
    pub(crate) fn create_encoded<T: ?Sized>(&self, encoded: &[u8]) -> Trapdoor<T, N> {
        let hash = self.hasher.derive::<N>(&domain_input(Domain::Value, 0, encoded));
        Trapdoor::from_parts(hash, self.hasher.fingerprint())
    }

    /// Derive an M-byte salted hash in `domain`
    pub(crate) fn derive_salted<const M: usize>(
        &self,
        domain: Domain,
        salt: u32,
        payload: &[u8],
    ) -> FixedHash<M> {
        self.hasher.derive::<M>(&domain_input(domain, salt, payload))
    }

    pub fn key_fingerprint(&self) -> KeyFingerprint {
        self.hasher.fingerprint()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

/// One-off trapdoor under a fresh BLAKE3 key
pub fn make_trapdoor<const N: usize, T: Serialize + ?Sized>(
    value: &T,
    secret: impl AsRef<[u8]>,
) -> Result<Trapdoor<T, N>> {
    TrapdoorFactory::<N>::new(secret).create(value)
}
