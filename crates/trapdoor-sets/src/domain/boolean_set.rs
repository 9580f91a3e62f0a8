//! Boolean sets
//!
//! Full Boolean algebra over the shared hash storage, read Bloom-filter
//! style: each member sets `k` bit positions drawn from salted keyed
//! sub-hashes, and a set is the OR of its members' patterns.
//!
//! ## Complement
//!
//! `complement` is bitwise NOT of the representation. It is only meaningful
//! relative to `universal()`, never as the complement over all possible
//! values. Use `difference` (`a & !b`) in application logic.
//!
//! ## False positives
//!
//! Sets built by a factory carry a `BloomProfile` (elements, k) and report
//! membership false positives as `(1 - e^(-kn/m))^k` with m = 8N. Sets without
//! a profile (after complement or XOR, or decoded from bytes) fall back to the
//! live density estimate `(ones/m)^b` for a probe setting b bits.
//!
//! ## False negatives
//!
//! Union and insertion only ever set bits, so members are never missed.
//! `difference`, `complement` and `symmetric_difference` clear bits. Each set
//! tracks `cleared`, the chance that a given member bit was removed, and a
//! probe of b bits is missed with probability `1 - (1 - cleared)^b`.
//!
//! ## Probes
//!
//! Membership is tested with a `MembershipProbe`, the k-bit pattern issued by
//! `BooleanSetFactory::trapdoor`. A plain `Trapdoor` is not accepted.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Not;

use serde::Serialize;
use tracing::debug;

use crate::adapters::Blake3KeyedHasher;
use crate::domain::approx::{compose_error_rates, ApproxBool};
use crate::domain::config::TrapdoorConfig;
use crate::domain::fixed_hash::FixedHash;
use crate::domain::hash_functions::{compute_bit_positions, encode_value};
use crate::domain::key::KeyFingerprint;
use crate::domain::parameters::{
    calculate_fpr, density_fpr, max_elements_for_fpr, optimal_hash_count, MAX_HASH_COUNT,
};
use crate::domain::repr::HashRepr;
use crate::domain::trapdoor::TrapdoorFactory;
use crate::error::{Result, TrapdoorError};
use crate::ports::KeyedHasher;

/// Construction history used by the membership error model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BloomProfile {
    /// Elements inserted (with multiplicity)
    pub elements: usize,
    /// Bits set per element
    pub hash_count: usize,
}

impl BloomProfile {
    pub fn new(elements: usize, hash_count: usize) -> Self {
        Self {
            elements,
            hash_count,
        }
    }

    /// Bloom false positive rate for an m-bit representation
    pub fn false_positive_rate(&self, m: usize) -> f64 {
        calculate_fpr(m, self.elements, self.hash_count)
    }
}

/// The k-bit pattern of one value, usable only against Boolean sets
///
/// A plain trapdoor sets about half its bits and would read as a confident
/// miss, so it does not type-check as a probe:
///
/// ```compile_fail
/// use trapdoor_sets::{BooleanSetFactory, TrapdoorFactory};
///
/// let set = BooleanSetFactory::<32>::new("k").from_collection(["alice", "bob"]).unwrap();
/// let plain = TrapdoorFactory::<32>::new("k").create("alice").unwrap();
/// set.contains(&plain).unwrap();
/// ```
pub struct MembershipProbe<T: ?Sized, const N: usize = 32> {
    hash: FixedHash<N>,
    key_fingerprint: KeyFingerprint,
    _value: PhantomData<fn(&T)>,
}

impl<T: ?Sized, const N: usize> MembershipProbe<T, N> {
    pub fn hash(&self) -> &FixedHash<N> {
        &self.hash
    }

    pub fn key_fingerprint(&self) -> KeyFingerprint {
        self.key_fingerprint
    }

    /// Bits this probe requires to be set
    pub fn bit_count(&self) -> usize {
        self.hash.count_ones()
    }
}

impl<T: ?Sized, const N: usize> Clone for MembershipProbe<T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized, const N: usize> Copy for MembershipProbe<T, N> {}

impl<T: ?Sized, const N: usize> PartialEq for MembershipProbe<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.key_fingerprint == other.key_fingerprint
    }
}

impl<T: ?Sized, const N: usize> Eq for MembershipProbe<T, N> {}

impl<T: ?Sized, const N: usize> fmt::Debug for MembershipProbe<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MembershipProbe")
            .field("hash", &self.hash)
            .field("key_fingerprint", &self.key_fingerprint)
            .finish()
    }
}

/// Set representation with union, intersection and complement
pub struct BooleanSet<T: ?Sized, const N: usize = 32> {
    hash: FixedHash<N>,
    key_fingerprint: KeyFingerprint,
    profile: Option<BloomProfile>,
    /// Chance that any one member bit has been cleared
    cleared: f64,
    _value: PhantomData<fn(&T)>,
}

impl<T: ?Sized, const N: usize> BooleanSet<T, N> {
    /// Reassemble a set from stored parts; no profile is attached
    pub fn from_parts(hash: FixedHash<N>, key_fingerprint: KeyFingerprint) -> Self {
        Self {
            hash,
            key_fingerprint,
            profile: None,
            cleared: 0.0,
            _value: PhantomData,
        }
    }

    /// Attach (or clear) the construction profile
    pub fn with_profile(mut self, profile: Option<BloomProfile>) -> Self {
        self.profile = profile;
        self
    }

    pub fn hash(&self) -> &FixedHash<N> {
        &self.hash
    }

    pub fn key_fingerprint(&self) -> KeyFingerprint {
        self.key_fingerprint
    }

    pub fn profile(&self) -> Option<BloomProfile> {
        self.profile
    }

    /// Chance that a member bit was removed by an earlier operation
    pub fn cleared_rate(&self) -> f64 {
        self.cleared
    }

    pub fn compatible_with(&self, other: &Self) -> bool {
        self.key_fingerprint.is_compatible(other.key_fingerprint)
    }

    /// `self | other`
    pub fn union(&self, other: &Self) -> Result<Self> {
        let key_fingerprint = self.key_fingerprint.combine(other.key_fingerprint)?;
        let profile = match (self.profile, other.profile) {
            (Some(a), Some(b)) if a.hash_count == b.hash_count => Some(BloomProfile::new(
                a.elements.saturating_add(b.elements),
                a.hash_count,
            )),
            _ => None,
        };
        let cleared = self.cleared.max(other.cleared);
        Ok(self.derived(self.hash | other.hash, key_fingerprint, profile, cleared))
    }

    /// `self & other`
    pub fn intersection(&self, other: &Self) -> Result<Self> {
        let key_fingerprint = self.key_fingerprint.combine(other.key_fingerprint)?;
        let m = FixedHash::<N>::BIT_SIZE;
        let profile = match (self.profile, other.profile) {
            (Some(a), Some(b)) => {
                if b.false_positive_rate(m) < a.false_positive_rate(m) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (a, b) => a.or(b),
        };
        let cleared = compose_error_rates(self.cleared, other.cleared);
        Ok(self.derived(self.hash & other.hash, key_fingerprint, profile, cleared))
    }

    /// `self ^ other`
    pub fn symmetric_difference(&self, other: &Self) -> Result<Self> {
        let key_fingerprint = self.key_fingerprint.combine(other.key_fingerprint)?;
        // A member of one side loses the bits it shares with the other
        let cleared = compose_error_rates(
            self.cleared.max(other.cleared),
            self.hash.density().max(other.hash.density()),
        );
        Ok(self.derived(self.hash ^ other.hash, key_fingerprint, None, cleared))
    }

    /// Bitwise NOT of the representation
    ///
    /// A value outside `self` is missed when any of its bits collided with a
    /// member of `self`.
    pub fn complement(&self) -> Self {
        self.derived(!self.hash, self.key_fingerprint, None, self.hash.density())
    }

    /// `self & !other`
    pub fn difference(&self, other: &Self) -> Result<Self> {
        let key_fingerprint = self.key_fingerprint.combine(other.key_fingerprint)?;
        let cleared = compose_error_rates(self.cleared, other.hash.density());
        Ok(self.derived(
            self.hash & !other.hash,
            key_fingerprint,
            self.profile,
            cleared,
        ))
    }

    /// Add one member pattern in place
    pub fn insert(&mut self, element: &MembershipProbe<T, N>) -> Result<()> {
        self.key_fingerprint = self.key_fingerprint.combine(element.key_fingerprint())?;
        self.hash = self.hash | *element.hash();
        if let Some(profile) = self.profile.as_mut() {
            profile.elements = profile.elements.saturating_add(1);
        }
        Ok(())
    }

    /// Approximate membership
    ///
    /// Every bit the probe sets must be set here. Members inserted under the
    /// same factory are never missed unless bits were cleared since.
    pub fn contains(&self, element: &MembershipProbe<T, N>) -> Result<ApproxBool> {
        self.key_fingerprint.combine(element.key_fingerprint())?;
        let bits = element.bit_count();
        Ok(ApproxBool::new(
            self.hash.covers(element.hash()),
            self.membership_fpr(bits),
            self.membership_fnr(bits),
        ))
    }

    /// Approximate inclusion `self ⊆ other`
    pub fn subset_of(&self, other: &Self) -> Result<ApproxBool> {
        self.key_fingerprint.combine(other.key_fingerprint)?;
        let bits = self.hash.count_ones();
        Ok(ApproxBool::new(
            other.hash.covers(&self.hash),
            other.membership_fpr(bits),
            other.membership_fnr(bits),
        ))
    }

    pub fn is_empty(&self) -> ApproxBool {
        ApproxBool::new(
            self.hash.is_zero(),
            FixedHash::<N>::collision_probability(),
            0.0,
        )
    }

    pub fn is_universal(&self) -> ApproxBool {
        ApproxBool::new(
            self.hash.is_ones(),
            FixedHash::<N>::collision_probability(),
            0.0,
        )
    }

    pub fn equals(&self, other: &Self) -> Result<ApproxBool> {
        self.key_fingerprint.combine(other.key_fingerprint)?;
        Ok(ApproxBool::new(
            self.hash == other.hash,
            FixedHash::<N>::collision_probability(),
            0.0,
        ))
    }

    /// False positive rate for a probe setting `probe_bits` bits
    pub fn membership_fpr(&self, probe_bits: usize) -> f64 {
        match self.profile {
            Some(profile) => profile.false_positive_rate(FixedHash::<N>::BIT_SIZE),
            None => density_fpr(self.hash.density(), probe_bits),
        }
    }

    /// False negative rate for a probe setting `probe_bits` bits
    pub fn membership_fnr(&self, probe_bits: usize) -> f64 {
        if self.cleared == 0.0 {
            return 0.0;
        }
        1.0 - (1.0 - self.cleared).powi(probe_bits.max(1) as i32)
    }

    fn derived(
        &self,
        hash: FixedHash<N>,
        key_fingerprint: KeyFingerprint,
        profile: Option<BloomProfile>,
        cleared: f64,
    ) -> Self {
        let mut set = Self::from_parts(hash, key_fingerprint).with_profile(profile);
        set.cleared = cleared.clamp(0.0, 1.0);
        set
    }
}

impl<T: ?Sized, const N: usize> Default for BooleanSet<T, N> {
    fn default() -> Self {
        Self::from_parts(FixedHash::zero(), KeyFingerprint::UNSET)
    }
}

impl<T: ?Sized, const N: usize> Clone for BooleanSet<T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized, const N: usize> Copy for BooleanSet<T, N> {}

// Profile and cleared rate are local bookkeeping and take no part in equality.
impl<T: ?Sized, const N: usize> PartialEq for BooleanSet<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.key_fingerprint == other.key_fingerprint
    }
}

impl<T: ?Sized, const N: usize> Eq for BooleanSet<T, N> {}

impl<T: ?Sized, const N: usize> Not for BooleanSet<T, N> {
    type Output = Self;

    fn not(self) -> Self {
        self.complement()
    }
}

impl<T: ?Sized, const N: usize> fmt::Debug for BooleanSet<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BooleanSet")
            .field("hash", &self.hash)
            .field("key_fingerprint", &self.key_fingerprint)
            .field("profile", &self.profile)
            .field("cleared", &self.cleared)
            .finish()
    }
}

impl<T: ?Sized, const N: usize> HashRepr<N> for BooleanSet<T, N> {
    fn hash(&self) -> &FixedHash<N> {
        &self.hash
    }

    fn key_fingerprint(&self) -> KeyFingerprint {
        self.key_fingerprint
    }

    fn bits_per_element(&self) -> usize {
        self.profile.map_or(1, |p| p.hash_count.max(1))
    }
}

/// Builds Boolean sets and their membership probes under one secret
#[derive(Clone, Debug)]
pub struct BooleanSetFactory<const N: usize = 32, H = Blake3KeyedHasher> {
    trapdoors: TrapdoorFactory<N, H>,
    hash_count: usize,
}

impl<const N: usize> BooleanSetFactory<N, Blake3KeyedHasher> {
    /// Factory with the default hash count
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_hasher(Blake3KeyedHasher::new(secret))
    }

    /// Factory using `config.boolean_hash_count`
    pub fn from_config(secret: impl AsRef<[u8]>, config: &TrapdoorConfig) -> Result<Self> {
        config.validate()?;
        Self::new(secret).with_hash_count(config.boolean_hash_count)
    }
}

impl<const N: usize, H: KeyedHasher> BooleanSetFactory<N, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            trapdoors: TrapdoorFactory::with_hasher(hasher),
            hash_count: TrapdoorConfig::default().boolean_hash_count,
        }
    }

    /// Set the number of bits per element (1 to 64)
    pub fn with_hash_count(mut self, hash_count: usize) -> Result<Self> {
        if hash_count == 0 || hash_count > MAX_HASH_COUNT {
            return Err(TrapdoorError::InvalidParameters(format!(
                "hash count must be between 1 and {}, got {}",
                MAX_HASH_COUNT, hash_count
            )));
        }
        self.hash_count = hash_count;
        Ok(self)
    }

    /// Pick the optimal hash count for an expected number of members
    pub fn for_expected_elements(mut self, expected: usize) -> Self {
        self.hash_count = optimal_hash_count(FixedHash::<N>::BIT_SIZE, expected);
        debug!(
            expected,
            hash_count = self.hash_count,
            bits = FixedHash::<N>::BIT_SIZE,
            "Sized Boolean set factory"
        );
        self
    }

    pub fn hash_count(&self) -> usize {
        self.hash_count
    }

    pub fn key_fingerprint(&self) -> KeyFingerprint {
        self.trapdoors.key_fingerprint()
    }

    pub fn empty<T: ?Sized>(&self) -> BooleanSet<T, N> {
        BooleanSet::from_parts(FixedHash::zero(), self.key_fingerprint())
            .with_profile(Some(BloomProfile::new(0, self.hash_count)))
    }

    pub fn universal<T: ?Sized>(&self) -> BooleanSet<T, N> {
        BooleanSet::from_parts(FixedHash::ones(), self.key_fingerprint())
    }

    /// Set holding exactly `value`
    pub fn singleton<T: Serialize + ?Sized>(&self, value: &T) -> Result<BooleanSet<T, N>> {
        let pattern = self.pattern(&encode_value(value)?);
        Ok(BooleanSet::from_parts(pattern, self.key_fingerprint())
            .with_profile(Some(BloomProfile::new(1, self.hash_count))))
    }

    /// OR-fold the singleton of every value
    pub fn from_collection<'a, T, I>(&self, values: I) -> Result<BooleanSet<T, N>>
    where
        T: Serialize + ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut hash = FixedHash::zero();
        let mut count = 0usize;
        for value in values {
            hash = hash | self.pattern(&encode_value(value)?);
            count += 1;
        }
        debug!(
            elements = count,
            hash_count = self.hash_count,
            density = hash.density(),
            "Built Boolean set"
        );
        Ok(BooleanSet::from_parts(hash, self.key_fingerprint())
            .with_profile(Some(BloomProfile::new(count, self.hash_count))))
    }

    /// Membership probe for `value`: its k-bit pattern
    pub fn trapdoor<T: Serialize + ?Sized>(&self, value: &T) -> Result<MembershipProbe<T, N>> {
        Ok(MembershipProbe {
            hash: self.pattern(&encode_value(value)?),
            key_fingerprint: self.key_fingerprint(),
            _value: PhantomData,
        })
    }

    /// Most members a set from this factory holds while its false positive
    /// rate stays at or below `target_fpr`
    pub fn capacity_for_fpr(&self, target_fpr: f64) -> usize {
        max_elements_for_fpr(FixedHash::<N>::BIT_SIZE, self.hash_count, target_fpr)
    }

    fn pattern(&self, encoded: &[u8]) -> FixedHash<N> {
        compute_bit_positions(
            self.trapdoors.hasher(),
            encoded,
            self.hash_count,
            FixedHash::<N>::BIT_SIZE,
        )
        .into_iter()
        .fold(FixedHash::zero(), FixedHash::with_bit_set)
    }
}
