//! k-of-n sharing of trapdoor hashes
//!
//! Two schemes:
//!
//! - `ThresholdScheme`: XOR sharing. The leading k shares XOR back to the
//!   hash; any other k-subset does not. Kept for compatibility with data
//!   shared this way. It offers no real threshold security.
//! - `ShamirScheme`: Shamir sharing over GF(2^8), applied byte-wise. Any k
//!   distinct shares reconstruct the hash, fewer reveal nothing about it.
//!
//! Randomness is always supplied by the caller.

use rand::RngCore;
use tracing::debug;

use crate::domain::{ApproxBool, FixedHash, KeyFingerprint, Trapdoor};
use crate::error::{Result, TrapdoorError};

fn random_hash<const N: usize, R: RngCore + ?Sized>(rng: &mut R) -> FixedHash<N> {
    let mut bytes = [0u8; N];
    rng.fill_bytes(&mut bytes);
    FixedHash::new(bytes)
}

/// XOR k-of-n sharing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdScheme<const N: usize = 32> {
    threshold: usize,
    total: usize,
}

impl<const N: usize> ThresholdScheme<N> {
    /// Requires 1 <= threshold <= total
    pub fn new(threshold: usize, total: usize) -> Result<Self> {
        if threshold == 0 || threshold > total {
            return Err(TrapdoorError::InvalidThreshold { threshold, total });
        }
        Ok(Self { threshold, total })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Split the hash into `total` shares
    ///
    /// Share `threshold - 1` completes the XOR of the shares before it, so
    /// shares `[0, threshold)` reconstruct the hash.
    pub fn create_shares<T, R>(&self, td: &Trapdoor<T, N>, rng: &mut R) -> Vec<FixedHash<N>>
    where
        T: ?Sized,
        R: RngCore + ?Sized,
    {
        let mut shares: Vec<FixedHash<N>> = (0..self.total).map(|_| random_hash(rng)).collect();

        let completing = self.threshold - 1;
        shares[completing] = shares[..completing]
            .iter()
            .fold(*td.hash(), |acc, share| acc ^ *share);

        debug!(
            threshold = self.threshold,
            total = self.total,
            "Created XOR shares"
        );
        shares
    }

    /// XOR the first `threshold` shares
    pub fn reconstruct<T: ?Sized>(
        &self,
        shares: &[FixedHash<N>],
        key_fingerprint: KeyFingerprint,
    ) -> Result<Trapdoor<T, N>> {
        if shares.len() < self.threshold {
            return Err(TrapdoorError::InsufficientShares {
                provided: shares.len(),
                required: self.threshold,
            });
        }
        let hash = shares[..self.threshold]
            .iter()
            .fold(FixedHash::zero(), |acc, share| acc ^ *share);
        Ok(Trapdoor::from_parts(hash, key_fingerprint))
    }

    /// At least `threshold` participants must satisfy `operation`
    ///
    /// Too few participants is a definite no. Otherwise the false positive
    /// rate is the fraction of participants that disagreed.
    pub fn threshold_operation<T: ?Sized>(
        &self,
        participants: &[Trapdoor<T, N>],
        operation: impl Fn(&Trapdoor<T, N>) -> bool,
    ) -> ApproxBool {
        if participants.len() < self.threshold {
            return ApproxBool::new(false, 0.0, 1.0);
        }
        let agreements = participants.iter().filter(|p| operation(*p)).count();
        let confidence = agreements as f64 / participants.len() as f64;
        ApproxBool::new(agreements >= self.threshold, 1.0 - confidence, 0.0)
    }
}

/// One Shamir share: the polynomial evaluated at `index`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShamirShare<const N: usize = 32> {
    /// Share index in [1..=total]
    pub index: u8,
    pub value: FixedHash<N>,
}

/// Shamir k-of-n sharing over GF(256)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShamirScheme<const N: usize = 32> {
    threshold: usize,
    total: usize,
}

impl<const N: usize> ShamirScheme<N> {
    /// Requires 1 <= threshold <= total <= 255
    pub fn new(threshold: usize, total: usize) -> Result<Self> {
        if threshold == 0 || threshold > total {
            return Err(TrapdoorError::InvalidThreshold { threshold, total });
        }
        // GF(256) has 255 non-zero evaluation points
        if total > 255 {
            return Err(TrapdoorError::InvalidParameters(format!(
                "at most 255 shares are supported, got {}",
                total
            )));
        }
        Ok(Self { threshold, total })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Split the hash into `total` shares
    pub fn split<T, R>(&self, td: &Trapdoor<T, N>, rng: &mut R) -> Vec<ShamirShare<N>>
    where
        T: ?Sized,
        R: RngCore + ?Sized,
    {
        // For each byte, a random degree-(k-1) polynomial with constant term = secret byte
        let mut coeffs: Vec<FixedHash<N>> = Vec::with_capacity(self.threshold);
        coeffs.push(*td.hash());
        for _ in 1..self.threshold {
            coeffs.push(random_hash(rng));
        }

        let shares = (1..=self.total)
            .map(|i| {
                let x = i as u8;
                let mut y = [0u8; N];
                for (b, out) in y.iter_mut().enumerate() {
                    // Horner: ((a_{k-1} x + a_{k-2}) x + ...) x + a_0
                    *out = coeffs
                        .iter()
                        .rev()
                        .fold(0u8, |acc, c| gf256_add(gf256_mul(acc, x), c.as_bytes()[b]));
                }
                ShamirShare {
                    index: x,
                    value: FixedHash::new(y),
                }
            })
            .collect();

        debug!(
            threshold = self.threshold,
            total = self.total,
            "Created Shamir shares"
        );
        shares
    }

    /// Lagrange interpolation at x = 0 over the first `threshold` shares
    pub fn reconstruct<T: ?Sized>(
        &self,
        shares: &[ShamirShare<N>],
        key_fingerprint: KeyFingerprint,
    ) -> Result<Trapdoor<T, N>> {
        if shares.len() < self.threshold {
            return Err(TrapdoorError::InsufficientShares {
                provided: shares.len(),
                required: self.threshold,
            });
        }
        let shares = &shares[..self.threshold];

        for (i, share) in shares.iter().enumerate() {
            if share.index == 0 || share.index as usize > self.total {
                return Err(TrapdoorError::InvalidShareIndex(share.index));
            }
            if shares[..i].iter().any(|s| s.index == share.index) {
                return Err(TrapdoorError::DuplicateShareIndex(share.index));
            }
        }

        // λ_i(0) = Π_{j≠i} x_j / (x_j - x_i); subtraction is XOR in GF(2^8)
        let basis: Vec<u8> = shares
            .iter()
            .enumerate()
            .map(|(i, si)| {
                let (num, den) = shares
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .fold((1u8, 1u8), |(num, den), (_, sj)| {
                        (
                            gf256_mul(num, sj.index),
                            gf256_mul(den, gf256_add(sj.index, si.index)),
                        )
                    });
                gf256_mul(num, gf256_inv(den))
            })
            .collect();

        let mut secret = [0u8; N];
        for (b, out) in secret.iter_mut().enumerate() {
            *out = shares
                .iter()
                .zip(&basis)
                .fold(0u8, |acc, (share, &l)| {
                    gf256_add(acc, gf256_mul(l, share.value.as_bytes()[b]))
                });
        }

        Ok(Trapdoor::from_parts(FixedHash::new(secret), key_fingerprint))
    }
}

// ------------------------- GF(256) arithmetic -------------------------
// Field: GF(2^8) with irreducible polynomial x^8 + x^4 + x^3 + x + 1 (0x11b).

#[inline]
fn gf256_add(a: u8, b: u8) -> u8 {
    a ^ b
}

#[inline]
fn gf256_mul(mut a: u8, mut b: u8) -> u8 {
    let mut p: u8 = 0;
    for _ in 0..8 {
        if (b & 1) != 0 {
            p ^= a;
        }
        let hi = a & 0x80;
        a <<= 1;
        if hi != 0 {
            a ^= 0x1b;
        }
        b >>= 1;
    }
    p
}

#[inline]
fn gf256_pow(mut a: u8, mut e: u16) -> u8 {
    let mut r: u8 = 1;
    while e > 0 {
        if (e & 1) == 1 {
            r = gf256_mul(r, a);
        }
        a = gf256_mul(a, a);
        e >>= 1;
    }
    r
}

/// a^254 = a^-1 for non-zero a; indices are validated before inversion
#[inline]
fn gf256_inv(a: u8) -> u8 {
    gf256_pow(a, 254)
}
