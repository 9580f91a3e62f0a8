//! Engine configuration and validation
//!
//! # Example
//!
//! ```
//! use trapdoor_sets::domain::TrapdoorConfigBuilder;
//!
//! let config = TrapdoorConfigBuilder::new()
//!     .boolean_hash_count(5)
//!     .minhash_permutations(64)
//!     .build()
//!     .expect("Valid config");
//! assert_eq!(config.boolean_hash_count, 5);
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::parameters::MAX_HASH_COUNT;
use crate::error::{Result, TrapdoorError};

/// Tunables shared by the factories and estimators
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrapdoorConfig {
    /// Bits set per element in a Boolean set (1 to 64)
    pub boolean_hash_count: usize,
    /// HyperLogLog precision, buckets = 2^p (4 to 16)
    pub hll_precision_bits: u8,
    /// Cardinality below which linear counting is preferred
    pub adaptive_threshold: usize,
    /// MinHash signature length
    pub minhash_permutations: usize,
    /// Number of LSH bands
    pub lsh_bands: usize,
    /// Bits per LSH band (1 to 64)
    pub lsh_band_size: usize,
    /// Relative difference under which two cardinalities compare equal
    pub cardinality_tolerance: f64,
    /// Nominal error attached to aggregate sums
    pub aggregation_error_rate: f64,
}

impl Default for TrapdoorConfig {
    fn default() -> Self {
        Self {
            boolean_hash_count: 3,
            hll_precision_bits: 6, // 64 buckets
            adaptive_threshold: 100,
            minhash_permutations: 128,
            lsh_bands: 20,
            lsh_band_size: 5,
            cardinality_tolerance: 0.1,
            aggregation_error_rate: 0.001,
        }
    }
}

impl TrapdoorConfig {
    /// Validate every field against its range
    pub fn validate(&self) -> Result<()> {
        if self.boolean_hash_count == 0 || self.boolean_hash_count > MAX_HASH_COUNT {
            return Err(TrapdoorError::InvalidParameters(format!(
                "boolean_hash_count must be between 1 and {}, got {}",
                MAX_HASH_COUNT, self.boolean_hash_count
            )));
        }

        if !(4..=16).contains(&self.hll_precision_bits) {
            return Err(TrapdoorError::InvalidParameters(format!(
                "hll_precision_bits must be between 4 and 16, got {}",
                self.hll_precision_bits
            )));
        }

        if self.adaptive_threshold == 0 {
            return Err(TrapdoorError::InvalidParameters(
                "adaptive_threshold cannot be 0".to_string(),
            ));
        }

        if self.minhash_permutations == 0 {
            return Err(TrapdoorError::InvalidParameters(
                "minhash_permutations cannot be 0".to_string(),
            ));
        }

        if self.lsh_bands == 0 {
            return Err(TrapdoorError::InvalidParameters(
                "lsh_bands cannot be 0".to_string(),
            ));
        }

        if self.lsh_band_size == 0 || self.lsh_band_size > 64 {
            return Err(TrapdoorError::InvalidParameters(format!(
                "lsh_band_size must be between 1 and 64, got {}",
                self.lsh_band_size
            )));
        }

        if !(0.0..=1.0).contains(&self.cardinality_tolerance) {
            return Err(TrapdoorError::InvalidParameters(
                "cardinality_tolerance must be between 0 and 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.aggregation_error_rate) {
            return Err(TrapdoorError::InvalidParameters(
                "aggregation_error_rate must be between 0 and 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style method to set the Boolean-set hash count
    pub fn with_boolean_hash_count(mut self, k: usize) -> Self {
        self.boolean_hash_count = k;
        self
    }

    /// Builder-style method to set the HyperLogLog precision
    pub fn with_hll_precision_bits(mut self, bits: u8) -> Self {
        self.hll_precision_bits = bits;
        self
    }

    /// Builder-style method to set the MinHash signature length
    pub fn with_minhash_permutations(mut self, permutations: usize) -> Self {
        self.minhash_permutations = permutations;
        self
    }
}

/// Fluent builder for `TrapdoorConfig`
#[derive(Default)]
pub struct TrapdoorConfigBuilder {
    boolean_hash_count: Option<usize>,
    hll_precision_bits: Option<u8>,
    adaptive_threshold: Option<usize>,
    minhash_permutations: Option<usize>,
    lsh_bands: Option<usize>,
    lsh_band_size: Option<usize>,
    cardinality_tolerance: Option<f64>,
    aggregation_error_rate: Option<f64>,
}

impl TrapdoorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boolean_hash_count(mut self, k: usize) -> Self {
        self.boolean_hash_count = Some(k);
        self
    }

    pub fn hll_precision_bits(mut self, bits: u8) -> Self {
        self.hll_precision_bits = Some(bits);
        self
    }

    pub fn adaptive_threshold(mut self, threshold: usize) -> Self {
        self.adaptive_threshold = Some(threshold);
        self
    }

    pub fn minhash_permutations(mut self, permutations: usize) -> Self {
        self.minhash_permutations = Some(permutations);
        self
    }

    pub fn lsh_bands(mut self, bands: usize) -> Self {
        self.lsh_bands = Some(bands);
        self
    }

    pub fn lsh_band_size(mut self, size: usize) -> Self {
        self.lsh_band_size = Some(size);
        self
    }

    pub fn cardinality_tolerance(mut self, tolerance: f64) -> Self {
        self.cardinality_tolerance = Some(tolerance);
        self
    }

    pub fn aggregation_error_rate(mut self, rate: f64) -> Self {
        self.aggregation_error_rate = Some(rate);
        self
    }

    /// Build the config, validating all parameters
    pub fn build(self) -> Result<TrapdoorConfig> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation (for internal use only)
    pub fn build_unchecked(self) -> TrapdoorConfig {
        let defaults = TrapdoorConfig::default();

        TrapdoorConfig {
            boolean_hash_count: self.boolean_hash_count.unwrap_or(defaults.boolean_hash_count),
            hll_precision_bits: self.hll_precision_bits.unwrap_or(defaults.hll_precision_bits),
            adaptive_threshold: self.adaptive_threshold.unwrap_or(defaults.adaptive_threshold),
            minhash_permutations: self
                .minhash_permutations
                .unwrap_or(defaults.minhash_permutations),
            lsh_bands: self.lsh_bands.unwrap_or(defaults.lsh_bands),
            lsh_band_size: self.lsh_band_size.unwrap_or(defaults.lsh_band_size),
            cardinality_tolerance: self
                .cardinality_tolerance
                .unwrap_or(defaults.cardinality_tolerance),
            aggregation_error_rate: self
                .aggregation_error_rate
                .unwrap_or(defaults.aggregation_error_rate),
        }
    }
}
