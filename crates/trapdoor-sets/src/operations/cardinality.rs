//! Cardinality estimation
//!
//! Estimates how many distinct elements a hash-based set represents without
//! enumerating them.
//!
//! - `HyperLogLog`: buckets the hash bytes, harmonic mean of the per-bucket
//!   trailing-zero runs, small-range correction, standard error 1.04/√m.
//! - `LinearCounter`: `-(m/k) * ln(V/m)` over the zero bits V of an m-bit
//!   representation where each element sets k bits. Preferred for small sets.
//! - `AdaptiveCardinality`: linear counting below a threshold, HyperLogLog
//!   above it. When HyperLogLog lands in its small-range regime it has nothing
//!   better than linear counting to offer, so the linear estimate stands. This
//!   is always the case for Bloom-style representations of up to 64 bytes.

use std::cmp::Ordering;

use tracing::debug;

use crate::domain::{
    compose_error_rates, Approx, BooleanSet, FixedHash, HashRepr, TrapdoorConfig,
};
use crate::error::{Result, TrapdoorError};

/// A strategy for estimating set cardinality from hash storage
pub trait CardinalityEstimator {
    /// Estimate from raw storage where each element sets `bits_per_element` bits
    fn estimate_hash<const N: usize>(
        &self,
        hash: &FixedHash<N>,
        bits_per_element: usize,
    ) -> Approx<usize>;

    /// Estimate the cardinality of any hash-carrying value
    fn estimate<const N: usize, S: HashRepr<N>>(&self, set: &S) -> Approx<usize> {
        self.estimate_hash(set.hash(), set.bits_per_element())
    }
}

/// HyperLogLog-style estimator over the hash bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HyperLogLog {
    precision_bits: u8,
}

impl HyperLogLog {
    /// Create an estimator with 2^precision_bits buckets (4 to 16)
    pub fn new(precision_bits: u8) -> Result<Self> {
        if !(4..=16).contains(&precision_bits) {
            return Err(TrapdoorError::InvalidParameters(format!(
                "precision_bits must be between 4 and 16, got {}",
                precision_bits
            )));
        }
        Ok(Self { precision_bits })
    }

    pub fn precision_bits(&self) -> u8 {
        self.precision_bits
    }

    pub fn bucket_count(&self) -> usize {
        1 << self.precision_bits
    }

    /// Bias correction constant for m buckets
    fn alpha(m: usize) -> f64 {
        0.7213 / (1.0 + 1.079 / m as f64)
    }

    /// Standard error 1.04/√m
    pub fn standard_error(&self) -> f64 {
        1.04 / (self.bucket_count() as f64).sqrt()
    }

    /// Raw estimate, and whether the small-range correction replaced it
    fn register_estimate<const N: usize>(&self, hash: &FixedHash<N>) -> (f64, bool) {
        let m = self.bucket_count();
        let mut registers = vec![0u32; m];

        // A zero byte counts as a full run of 8
        for (i, byte) in hash.as_bytes().iter().enumerate() {
            let rho = byte.trailing_zeros();
            let register = &mut registers[i % m];
            *register = (*register).max(rho);
        }

        let harmonic: f64 = registers.iter().map(|&r| 2f64.powi(-(r as i32))).sum();
        let raw = Self::alpha(m) * (m * m) as f64 / harmonic;

        if raw <= 2.5 * m as f64 {
            let zeros = registers.iter().filter(|&&r| r == 0).count();
            if zeros != 0 {
                return (m as f64 * (m as f64 / zeros as f64).ln(), true);
            }
        }
        (raw, false)
    }
}

impl Default for HyperLogLog {
    fn default() -> Self {
        Self {
            precision_bits: TrapdoorConfig::default().hll_precision_bits,
        }
    }
}

impl CardinalityEstimator for HyperLogLog {
    fn estimate_hash<const N: usize>(
        &self,
        hash: &FixedHash<N>,
        _bits_per_element: usize,
    ) -> Approx<usize> {
        let (estimate, _) = self.register_estimate(hash);
        Approx::with_error(estimate.round() as usize, self.standard_error())
    }
}

/// Linear counting over the zero bits of the representation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinearCounter;

impl LinearCounter {
    pub fn new() -> Self {
        Self
    }
}

impl CardinalityEstimator for LinearCounter {
    fn estimate_hash<const N: usize>(
        &self,
        hash: &FixedHash<N>,
        bits_per_element: usize,
    ) -> Approx<usize> {
        let m = FixedHash::<N>::BIT_SIZE as f64;
        let k = bits_per_element.max(1) as f64;
        let ones = hash.count_ones();
        let zeros = hash.count_zeros();

        // Saturated: report the largest count a single zero bit could give
        if zeros == 0 {
            debug!(bits = FixedHash::<N>::BIT_SIZE, "Linear counter saturated");
            return Approx::with_error(((m / k) * m.ln()).round() as usize, 0.5);
        }

        let estimate = -(m / k) * (zeros as f64 / m).ln();

        let load = ones as f64 / m;
        let error = (load.exp() - load - 1.0).max(0.0).sqrt() / m.sqrt();

        Approx::with_error(estimate.round() as usize, error)
    }
}

/// Picks linear counting for small sets and HyperLogLog for large ones
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdaptiveCardinality {
    threshold: usize,
    hll: HyperLogLog,
}

impl AdaptiveCardinality {
    pub fn new(threshold: usize, hll: HyperLogLog) -> Self {
        Self { threshold, hll }
    }

    pub fn from_config(config: &TrapdoorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.adaptive_threshold,
            HyperLogLog::new(config.hll_precision_bits)?,
        ))
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for AdaptiveCardinality {
    fn default() -> Self {
        Self::new(
            TrapdoorConfig::default().adaptive_threshold,
            HyperLogLog::default(),
        )
    }
}

impl CardinalityEstimator for AdaptiveCardinality {
    fn estimate_hash<const N: usize>(
        &self,
        hash: &FixedHash<N>,
        bits_per_element: usize,
    ) -> Approx<usize> {
        let linear = LinearCounter.estimate_hash(hash, bits_per_element);
        if *linear.value() < self.threshold {
            return linear;
        }

        let (estimate, small_range) = self.hll.register_estimate(hash);
        if small_range {
            debug!(
                linear = *linear.value(),
                hll = estimate,
                "HyperLogLog in small-range regime, keeping linear estimate"
            );
            return linear;
        }
        Approx::with_error(estimate.round() as usize, self.hll.standard_error())
    }
}

/// Compare two cardinalities without revealing either
///
/// Reports `Equal` when the relative difference is below `tolerance`.
pub fn compare_cardinality<E, S, const N: usize>(
    estimator: &E,
    a: &S,
    b: &S,
    tolerance: f64,
) -> Result<Approx<Ordering>>
where
    E: CardinalityEstimator,
    S: HashRepr<N>,
{
    a.key_fingerprint().combine(b.key_fingerprint())?;

    let card_a = estimator.estimate(a);
    let card_b = estimator.estimate(b);
    let (va, vb) = (*card_a.value(), *card_b.value());

    let larger = va.max(vb);
    let ordering = if larger == 0 || (va.abs_diff(vb) as f64 / larger as f64) < tolerance {
        Ordering::Equal
    } else {
        va.cmp(&vb)
    };

    Ok(Approx::with_error(
        ordering,
        compose_error_rates(card_a.error_rate(), card_b.error_rate()),
    ))
}

/// |A ∪ B| = |A| + |B| - |A ∩ B|
pub fn estimate_union<E, T, const N: usize>(
    estimator: &E,
    a: &BooleanSet<T, N>,
    b: &BooleanSet<T, N>,
) -> Result<Approx<usize>>
where
    E: CardinalityEstimator,
    T: ?Sized,
{
    let intersection = a.intersection(b)?;

    let card_a = estimator.estimate(a);
    let card_b = estimator.estimate(b);
    let card_i = estimator.estimate(&intersection);

    let union = (card_a.value() + card_b.value()).saturating_sub(*card_i.value());
    let error = compose_error_rates(
        compose_error_rates(card_a.error_rate(), card_b.error_rate()),
        card_i.error_rate(),
    );

    Ok(Approx::with_error(union, error))
}
