//! Approximate values
//!
//! Every query in this crate answers with an `Approx<T>`: the value plus the
//! false positive and false negative rates that qualify it. Callers decide
//! which confidence is acceptable.
//!
//! ## Composition
//!
//! Independent error events compose by inclusion-exclusion:
//! `compose(e1, e2) = e1 + e2 - e1*e2`, which stays in [0, 1].
//!
//! `a & b` and `a | b` both compose the respective rates this way. For OR this
//! is a simplification rather than a derivation; it is kept so results stay
//! comparable with existing data. `!a` swaps the two rates.

use std::ops::{BitAnd, BitOr, Not};

use serde::{Deserialize, Serialize};

/// A value qualified by its error rates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Approx<T> {
    value: T,
    false_positive_rate: f64,
    false_negative_rate: f64,
}

/// Approximate Boolean answer
pub type ApproxBool = Approx<bool>;

/// Compose two independent error rates
///
/// 0 is the identity and 1 absorbs, exactly.
pub fn compose_error_rates(e1: f64, e2: f64) -> f64 {
    let (e1, e2) = (clamp_rate(e1), clamp_rate(e2));
    if e1 == 1.0 || e2 == 1.0 {
        return 1.0;
    }
    if e1 == 0.0 {
        return e2;
    }
    if e2 == 0.0 {
        return e1;
    }
    clamp_rate(e1 + e2 - e1 * e2)
}

/// Lift an exact value
pub fn make_exact<T>(value: T) -> Approx<T> {
    Approx::exact(value)
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        return 1.0;
    }
    rate.clamp(0.0, 1.0)
}

impl<T> Approx<T> {
    /// Create a value with explicit rates (clamped to [0, 1], NaN treated as 1)
    pub fn new(value: T, false_positive_rate: f64, false_negative_rate: f64) -> Self {
        Self {
            value,
            false_positive_rate: clamp_rate(false_positive_rate),
            false_negative_rate: clamp_rate(false_negative_rate),
        }
    }

    /// Estimate with a single (relative) error figure
    pub fn with_error(value: T, error_rate: f64) -> Self {
        Self::new(value, error_rate, 0.0)
    }

    pub fn exact(value: T) -> Self {
        Self {
            value,
            false_positive_rate: 0.0,
            false_negative_rate: 0.0,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    pub fn false_negative_rate(&self) -> f64 {
        self.false_negative_rate
    }

    /// max(fpr, fnr)
    pub fn error_rate(&self) -> f64 {
        self.false_positive_rate.max(self.false_negative_rate)
    }

    pub fn is_exact(&self) -> bool {
        self.false_positive_rate == 0.0 && self.false_negative_rate == 0.0
    }

    /// Transform the value, keeping the rates
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Approx<U> {
        Approx {
            value: f(self.value),
            false_positive_rate: self.false_positive_rate,
            false_negative_rate: self.false_negative_rate,
        }
    }
}

impl Approx<bool> {
    /// Shorthand for the reported Boolean
    pub fn is_true(&self) -> bool {
        self.value
    }

    /// Logical AND with composed rates
    pub fn and(&self, other: &Self) -> Self {
        Self::new(
            self.value && other.value,
            compose_error_rates(self.false_positive_rate, other.false_positive_rate),
            compose_error_rates(self.false_negative_rate, other.false_negative_rate),
        )
    }

    /// Logical OR with composed rates
    pub fn or(&self, other: &Self) -> Self {
        Self::new(
            self.value || other.value,
            compose_error_rates(self.false_positive_rate, other.false_positive_rate),
            compose_error_rates(self.false_negative_rate, other.false_negative_rate),
        )
    }
}

impl BitAnd for Approx<bool> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.and(&rhs)
    }
}

impl BitOr for Approx<bool> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.or(&rhs)
    }
}

impl Not for Approx<bool> {
    type Output = Self;

    /// Negating a test exchanges false positives and false negatives
    fn not(self) -> Self {
        Self {
            value: !self.value,
            false_positive_rate: self.false_negative_rate,
            false_negative_rate: self.false_positive_rate,
        }
    }
}
