//! Bloom parameter math for Boolean sets
//!
//! A `BooleanSet<T, N>` is a Bloom filter with m = 8N bits.
//!
//! Formulas:
//! - FPR = (1 - e^(-kn/m))^k
//! - k   = (m/n) * ln(2)         -- optimal hash functions
//! - n   = -(m/k) * ln(1 - p)     -- elements for a target fill ratio

use std::f64::consts::LN_2;

/// Upper bound on sub-hashes per element
pub const MAX_HASH_COUNT: usize = 64;

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

/// Calculate optimal k for given m and n, clamped to [1, MAX_HASH_COUNT]
pub fn optimal_hash_count(m: usize, n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    let k = ((m as f64 / n as f64) * LN_2).round() as usize;
    k.clamp(1, MAX_HASH_COUNT)
}

/// Rate at which a probe setting `probe_bits` bits is wholly covered by a
/// representation with the given density, assuming uniformly placed bits
pub fn density_fpr(density: f64, probe_bits: usize) -> f64 {
    density.clamp(0.0, 1.0).powi(probe_bits.max(1) as i32)
}

/// Largest element count that keeps FPR at or below `target_fpr`
pub fn max_elements_for_fpr(m: usize, k: usize, target_fpr: f64) -> usize {
    if m == 0 || k == 0 || target_fpr <= 0.0 {
        return 0;
    }
    if target_fpr >= 1.0 {
        return usize::MAX;
    }
    // Solve (1 - e^(-kn/m))^k = p for n
    let fill = target_fpr.powf(1.0 / k as f64);
    let n = -(m as f64 / k as f64) * (1.0 - fill).ln();
    let mut n = n.floor().max(0.0) as usize;
    while n > 0 && calculate_fpr(m, n, k) > target_fpr {
        n -= 1;
    }
    n
}
