//! Value encoding and salted sub-hash derivation
//!
//! Every derivation fed to a `KeyedHasher` is prefixed with a one-byte domain
//! tag and a 32-bit salt, so the plain trapdoor of a value, its Bloom bit
//! positions, its MinHash slots and LSH projections never share an input.

use serde::Serialize;

use crate::error::{Result, TrapdoorError};
use crate::ports::KeyedHasher;

/// Derivation domains
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Domain {
    /// Plain trapdoor of a value
    Value = 0x00,
    /// Bloom-style bit positions for Boolean sets
    BloomPosition = 0x01,
    /// MinHash signature slots
    MinHashSlot = 0x02,
    /// LSH bit projections
    LshProjection = 0x03,
}

/// Encode a value with bincode so it can be hashed
pub fn encode_value<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| TrapdoorError::Encoding(e.to_string()))
}

/// Build the hasher input for `(domain, salt, payload)`
pub fn domain_input(domain: Domain, salt: u32, payload: &[u8]) -> Vec<u8> {
    let mut input = Vec::with_capacity(5 + payload.len());
    input.push(domain as u8);
    input.extend_from_slice(&salt.to_le_bytes());
    input.extend_from_slice(payload);
    input
}

/// Derive a 64-bit word for `(domain, salt, payload)`
pub fn derive_word<H: KeyedHasher>(hasher: &H, domain: Domain, salt: u32, payload: &[u8]) -> u64 {
    let word = hasher.derive::<8>(&domain_input(domain, salt, payload));
    u64::from_le_bytes(word.into_bytes())
}

/// Compute k bit positions in [0, m) for an encoded element
///
/// Each position comes from its own salted keyed sub-hash, so positions are
/// independent under the ideal-hash assumption.
pub fn compute_bit_positions<H: KeyedHasher>(
    hasher: &H,
    encoded: &[u8],
    k: usize,
    m: usize,
) -> Vec<usize> {
    if m == 0 {
        return Vec::new();
    }
    (0..k)
        .map(|i| {
            let word = derive_word(hasher, Domain::BloomPosition, i as u32, encoded);
            (word % m as u64) as usize
        })
        .collect()
}
