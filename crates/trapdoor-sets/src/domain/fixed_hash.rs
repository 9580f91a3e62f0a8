//! Fixed-width hash value with bitwise algebra
//!
//! `FixedHash<N>` is the shared storage for every trapdoor-family type. All
//! operations are total, O(N) and return new values.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use bitvec::prelude::*;

use crate::error::{Result, TrapdoorError};

/// An N-byte hash value
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixedHash<const N: usize>([u8; N]);

/// 128-bit hash
pub type Hash128 = FixedHash<16>;
/// 256-bit hash
pub type Hash256 = FixedHash<32>;
/// 512-bit hash
pub type Hash512 = FixedHash<64>;

impl<const N: usize> FixedHash<N> {
    /// Size in bytes
    pub const BYTE_SIZE: usize = N;
    /// Size in bits
    pub const BIT_SIZE: usize = N * 8;

    /// Wrap raw bytes
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// The all-zero value
    pub const fn zero() -> Self {
        Self([0x00; N])
    }

    /// The all-one value
    pub const fn ones() -> Self {
        Self([0xFF; N])
    }

    /// Read the first N bytes of a slice
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < N {
            return Err(TrapdoorError::InsufficientBytes {
                expected: N,
                actual: bytes.len(),
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&bytes[..N]);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; N] {
        self.0
    }

    /// True if every bit is zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0x00)
    }

    /// True if every bit is one
    pub fn is_ones(&self) -> bool {
        self.0.iter().all(|&b| b == 0xFF)
    }

    /// Number of bits set
    pub fn count_ones(&self) -> usize {
        self.0[..].view_bits::<Lsb0>().count_ones()
    }

    /// Number of bits clear
    pub fn count_zeros(&self) -> usize {
        Self::BIT_SIZE - self.count_ones()
    }

    /// Fraction of bits set, in [0, 1]
    pub fn density(&self) -> f64 {
        if N == 0 {
            return 0.0;
        }
        self.count_ones() as f64 / Self::BIT_SIZE as f64
    }

    /// Read a single bit (LSB-first within each byte)
    ///
    /// # Panics
    /// Panics if `index >= BIT_SIZE`.
    pub fn bit(&self, index: usize) -> bool {
        self.0[..].view_bits::<Lsb0>()[index]
    }

    /// Return a copy with one bit set
    ///
    /// # Panics
    /// Panics if `index >= BIT_SIZE`.
    pub fn with_bit_set(mut self, index: usize) -> Self {
        self.0[..].view_bits_mut::<Lsb0>().set(index, true);
        self
    }

    /// True if every bit set in `other` is also set in `self`
    pub fn covers(&self, other: &Self) -> bool {
        (*self & *other) == *other
    }

    /// Probability that two independent uniform values collide: 2^-(8N)
    pub fn collision_probability() -> f64 {
        2f64.powi(-(Self::BIT_SIZE as i32))
    }

    fn zip_with(self, other: Self, op: impl Fn(u8, u8) -> u8) -> Self {
        let mut out = [0u8; N];
        for (dst, (a, b)) in out.iter_mut().zip(self.0.iter().zip(other.0.iter())) {
            *dst = op(*a, *b);
        }
        Self(out)
    }
}

impl<const N: usize> Default for FixedHash<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> From<[u8; N]> for FixedHash<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> AsRef<[u8]> for FixedHash<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> BitXor for FixedHash<N> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a ^ b)
    }
}

impl<const N: usize> BitAnd for FixedHash<N> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a & b)
    }
}

impl<const N: usize> BitOr for FixedHash<N> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a | b)
    }
}

impl<const N: usize> Not for FixedHash<N> {
    type Output = Self;

    fn not(self) -> Self {
        let mut out = self.0;
        for byte in out.iter_mut() {
            *byte = !*byte;
        }
        Self(out)
    }
}

impl<const N: usize> fmt::Debug for FixedHash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedHash<{}>({})", N, hex::encode(self.0))
    }
}

impl<const N: usize> fmt::Display for FixedHash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
