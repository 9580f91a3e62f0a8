//! Homomorphic-style aggregation
//!
//! Additive trapdoors pair a trapdoor hash with a numeric value. Adding two
//! of them XORs the hashes and adds the values. This is a demonstration
//! structure, NOT homomorphic encryption: the value is carried in the clear.

use std::ops::{Add, Mul};

use serde::Serialize;
use tracing::debug;

use crate::adapters::Blake3KeyedHasher;
use crate::domain::{
    Approx, ApproxBool, FixedHash, KeyFingerprint, Trapdoor, TrapdoorConfig, TrapdoorFactory,
};
use crate::error::{Result, TrapdoorError};
use crate::ports::KeyedHasher;

/// Trapdoor hash with an attached additive value
#[derive(Clone, Debug, PartialEq)]
pub struct AdditiveTrapdoor<T, const N: usize = 32> {
    hash: FixedHash<N>,
    key_fingerprint: KeyFingerprint,
    value: T,
}

impl<T, const N: usize> AdditiveTrapdoor<T, N> {
    pub fn new(td: &Trapdoor<T, N>, value: T) -> Self {
        Self {
            hash: *td.hash(),
            key_fingerprint: td.key_fingerprint(),
            value,
        }
    }

    pub fn hash(&self) -> &FixedHash<N> {
        &self.hash
    }

    pub fn key_fingerprint(&self) -> KeyFingerprint {
        self.key_fingerprint
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// The combined hash as a plain trapdoor
    pub fn trapdoor(&self) -> Trapdoor<T, N> {
        Trapdoor::from_parts(self.hash, self.key_fingerprint)
    }
}

impl<T, const N: usize> AdditiveTrapdoor<T, N>
where
    T: Clone + Add<Output = T>,
{
    /// Combine two additive trapdoors built under the same secret
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        self.key_fingerprint.ensure_matches(other.key_fingerprint)?;
        Ok(Self {
            hash: self.hash ^ other.hash,
            key_fingerprint: self.key_fingerprint,
            value: self.value.clone() + other.value.clone(),
        })
    }
}

impl<T, const N: usize> AdditiveTrapdoor<T, N>
where
    T: Clone + Mul<Output = T> + From<i32>,
{
    /// Scalar multiplication
    ///
    /// The hash is XORed with itself |scalar| times, so it cancels to zero
    /// for even |scalar| >= 2 and is unchanged otherwise.
    pub fn scale(&self, scalar: i32) -> Self {
        let magnitude = scalar.unsigned_abs();
        let hash = if magnitude >= 2 && magnitude % 2 == 0 {
            FixedHash::zero()
        } else {
            self.hash
        };
        Self {
            hash,
            key_fingerprint: self.key_fingerprint,
            value: self.value.clone() * T::from(scalar),
        }
    }
}

/// Sums and averages values through additive trapdoors
#[derive(Clone, Debug)]
pub struct SecureAggregator<const N: usize = 32, H = Blake3KeyedHasher> {
    trapdoors: TrapdoorFactory<N, H>,
    error_rate: f64,
}

impl<const N: usize> SecureAggregator<N, Blake3KeyedHasher> {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_hasher(Blake3KeyedHasher::new(secret))
    }

    pub fn from_config(secret: impl AsRef<[u8]>, config: &TrapdoorConfig) -> Result<Self> {
        config.validate()?;
        Self::new(secret).with_error_rate(config.aggregation_error_rate)
    }
}

impl<const N: usize, H: KeyedHasher> SecureAggregator<N, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            trapdoors: TrapdoorFactory::with_hasher(hasher),
            error_rate: TrapdoorConfig::default().aggregation_error_rate,
        }
    }

    /// Nominal error attached to every non-empty result (0 to 1)
    pub fn with_error_rate(mut self, error_rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&error_rate) {
            return Err(TrapdoorError::InvalidParameters(
                "error_rate must be between 0 and 1".to_string(),
            ));
        }
        self.error_rate = error_rate;
        Ok(self)
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Fold every value into one additive trapdoor; `None` for no values
    pub fn aggregate<T>(&self, values: &[T]) -> Result<Option<AdditiveTrapdoor<T, N>>>
    where
        T: Serialize + Clone + Add<Output = T>,
    {
        let mut acc: Option<AdditiveTrapdoor<T, N>> = None;
        for value in values {
            let next = AdditiveTrapdoor::new(&self.trapdoors.create(value)?, value.clone());
            acc = Some(match acc {
                Some(sum) => sum.try_add(&next)?,
                None => next,
            });
        }
        debug!(values = values.len(), "Aggregated additive trapdoors");
        Ok(acc)
    }

    /// Sum of the values; exact zero for no values
    pub fn sum<T>(&self, values: &[T]) -> Result<Approx<T>>
    where
        T: Serialize + Clone + Default + Add<Output = T>,
    {
        match self.aggregate(values)? {
            Some(total) => Ok(Approx::with_error(total.value, self.error_rate)),
            None => Ok(Approx::exact(T::default())),
        }
    }

    /// Mean of the values; exact zero for no values
    pub fn average<T>(&self, values: &[T]) -> Result<Approx<f64>>
    where
        T: Serialize + Clone + Default + Add<Output = T> + Into<f64>,
    {
        if values.is_empty() {
            return Ok(Approx::exact(0.0));
        }
        let len = values.len() as f64;
        Ok(self.sum(values)?.map(|total| {
            let total: f64 = total.into();
            total / len
        }))
    }
}

/// Conjunction of trapdoors under one secret
#[derive(Clone, Debug, PartialEq)]
pub struct CompoundTrapdoor<T: ?Sized, const N: usize = 32> {
    components: Vec<Trapdoor<T, N>>,
    key_fingerprint: KeyFingerprint,
}

impl<T: ?Sized, const N: usize> CompoundTrapdoor<T, N> {
    pub fn new(key_fingerprint: KeyFingerprint) -> Self {
        Self {
            components: Vec::new(),
            key_fingerprint,
        }
    }

    pub fn key_fingerprint(&self) -> KeyFingerprint {
        self.key_fingerprint
    }

    pub fn components(&self) -> &[Trapdoor<T, N>] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn add_component(&mut self, td: Trapdoor<T, N>) -> Result<()> {
        self.key_fingerprint.ensure_matches(td.key_fingerprint())?;
        self.components.push(td);
        Ok(())
    }

    /// AND-fold of every component hash
    pub fn multiply(&self) -> Result<Trapdoor<T, N>> {
        let (first, rest) = self
            .components
            .split_first()
            .ok_or(TrapdoorError::EmptyCompound)?;
        let hash = rest.iter().fold(*first.hash(), |acc, td| acc & *td.hash());
        Ok(Trapdoor::from_parts(hash, self.key_fingerprint))
    }

    /// True if every component satisfies `predicate`
    ///
    /// Each component is charged a 1% error: fpr = 1 - 0.99^len.
    pub fn all_satisfy(&self, predicate: impl Fn(&Trapdoor<T, N>) -> bool) -> ApproxBool {
        let all = self.components.iter().all(predicate);
        let confidence = 0.99f64.powi(self.components.len() as i32);
        ApproxBool::new(all, 1.0 - confidence, 0.0)
    }
}
