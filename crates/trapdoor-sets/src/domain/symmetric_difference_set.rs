//! Symmetric difference sets
//!
//! A group under XOR over the shared hash storage. Combining two sets XORs
//! their hashes, which is a true union only when the sets are disjoint:
//! members present in both cancel out.
//!
//! ## Exact laws
//!
//! XOR is exact arithmetic, so `a ^ a` is bit-exact zero, `a ^ empty == a`,
//! and combination is commutative and associative. Only the reading
//! "zero hash means truly empty" is approximate.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use tracing::debug;

use crate::adapters::Blake3KeyedHasher;
use crate::domain::approx::ApproxBool;
use crate::domain::fixed_hash::FixedHash;
use crate::domain::key::KeyFingerprint;
use crate::domain::repr::HashRepr;
use crate::domain::trapdoor::{Trapdoor, TrapdoorFactory};
use crate::error::Result;
use crate::ports::KeyedHasher;

/// Set representation closed under XOR
pub struct SymmetricDifferenceSet<T: ?Sized, const N: usize = 32> {
    hash: FixedHash<N>,
    key_fingerprint: KeyFingerprint,
    _value: PhantomData<fn(&T)>,
}

impl<T: ?Sized, const N: usize> SymmetricDifferenceSet<T, N> {
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

    /// True if the two sets may be combined
    pub fn compatible_with(&self, other: &Self) -> bool {
        self.key_fingerprint.is_compatible(other.key_fingerprint)
    }

    /// Emptiness test
    ///
    /// A truly empty set is always bit-exact zero, so there are no false
    /// negatives. A non-empty XOR-sum cancelling to zero is a false positive.
    pub fn is_empty(&self) -> ApproxBool {
        ApproxBool::new(
            self.hash.is_zero(),
            FixedHash::<N>::collision_probability(),
            0.0,
        )
    }

    /// XOR-combine with another set
    pub fn symmetric_difference(&self, other: &Self) -> Result<Self> {
        let key_fingerprint = self.key_fingerprint.combine(other.key_fingerprint)?;
        Ok(Self::from_parts(self.hash ^ other.hash, key_fingerprint))
    }

    /// Toggle one element in place
    pub fn insert(&mut self, element: &Trapdoor<T, N>) -> Result<()> {
        self.key_fingerprint = self.key_fingerprint.combine(element.key_fingerprint())?;
        self.hash = self.hash ^ *element.hash();
        Ok(())
    }

    /// Approximate equality, with the trapdoor equality error model
    pub fn equals(&self, other: &Self) -> Result<ApproxBool> {
        self.key_fingerprint.combine(other.key_fingerprint)?;
        Ok(ApproxBool::new(
            self.hash == other.hash,
            FixedHash::<N>::collision_probability(),
            0.0,
        ))
    }
}

impl<T: ?Sized, const N: usize> Default for SymmetricDifferenceSet<T, N> {
    /// Empty set not yet bound to any key
    fn default() -> Self {
        Self::from_parts(FixedHash::zero(), KeyFingerprint::UNSET)
    }
}

impl<T: ?Sized, const N: usize> Clone for SymmetricDifferenceSet<T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized, const N: usize> Copy for SymmetricDifferenceSet<T, N> {}

impl<T: ?Sized, const N: usize> PartialEq for SymmetricDifferenceSet<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.key_fingerprint == other.key_fingerprint
    }
}

impl<T: ?Sized, const N: usize> Eq for SymmetricDifferenceSet<T, N> {}

impl<T: ?Sized, const N: usize> fmt::Debug for SymmetricDifferenceSet<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricDifferenceSet")
            .field("hash", &self.hash)
            .field("key_fingerprint", &self.key_fingerprint)
            .finish()
    }
}

impl<T: ?Sized, const N: usize> HashRepr<N> for SymmetricDifferenceSet<T, N> {
    fn hash(&self) -> &FixedHash<N> {
        &self.hash
    }

    fn key_fingerprint(&self) -> KeyFingerprint {
        self.key_fingerprint
    }
}

/// Builds symmetric difference sets under one secret
#[derive(Clone, Debug)]
pub struct SymmetricDifferenceSetFactory<const N: usize = 32, H = Blake3KeyedHasher> {
    trapdoors: TrapdoorFactory<N, H>,
}

impl<const N: usize> SymmetricDifferenceSetFactory<N, Blake3KeyedHasher> {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            trapdoors: TrapdoorFactory::new(secret),
        }
    }
}

impl<const N: usize, H: KeyedHasher> SymmetricDifferenceSetFactory<N, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            trapdoors: TrapdoorFactory::with_hasher(hasher),
        }
    }

    /// Empty set stamped with this factory's fingerprint
    pub fn empty<T: ?Sized>(&self) -> SymmetricDifferenceSet<T, N> {
        SymmetricDifferenceSet::from_parts(FixedHash::zero(), self.key_fingerprint())
    }

    /// Set holding exactly `value`
    pub fn singleton<T: Serialize + ?Sized>(&self, value: &T) -> Result<SymmetricDifferenceSet<T, N>> {
        let td = self.trapdoors.create(value)?;
        Ok(SymmetricDifferenceSet::from_parts(*td.hash(), td.key_fingerprint()))
    }

    /// XOR-fold the trapdoors of distinct values
    ///
    /// Callers must pass each value once: a repeated value cancels itself.
    pub fn from_unique<'a, T, I>(&self, values: I) -> Result<SymmetricDifferenceSet<T, N>>
    where
        T: Serialize + ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut set = self.empty();
        let mut count = 0usize;
        for value in values {
            set.insert(&self.trapdoors.create(value)?)?;
            count += 1;
        }
        debug!(elements = count, "Built symmetric difference set");
        Ok(set)
    }

    /// Trapdoor of `value` as used by this factory's sets
    pub fn trapdoor<T: Serialize + ?Sized>(&self, value: &T) -> Result<Trapdoor<T, N>> {
        self.trapdoors.create(value)
    }

    pub fn key_fingerprint(&self) -> KeyFingerprint {
        self.trapdoors.key_fingerprint()
    }
}
