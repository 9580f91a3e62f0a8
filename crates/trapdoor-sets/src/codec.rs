//! Binary wire format
//!
//! Every hash-carrying value is written as its N raw hash bytes followed by
//! the key fingerprint as a little-endian 64-bit word. No header, no length
//! prefix, no checksum. The layout is fixed for interoperability with data
//! already at rest.
//!
//! `BloomProfile` is not on the wire: a decoded `BooleanSet` falls back to
//! the density-based false-positive estimate.

use crate::domain::{BooleanSet, FixedHash, KeyFingerprint, SymmetricDifferenceSet, Trapdoor};
use crate::error::{Result, TrapdoorError};

/// Fixed-size binary encoding
pub trait BinaryFormat: Sized {
    /// Exact encoded size in bytes
    const ENCODED_LEN: usize;

    fn to_bytes(&self) -> Vec<u8>;

    /// Decode from the front of `bytes`; trailing bytes are ignored
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

fn encode_parts<const N: usize>(hash: &FixedHash<N>, fingerprint: KeyFingerprint) -> Vec<u8> {
    let mut out = Vec::with_capacity(N + KeyFingerprint::ENCODED_LEN);
    out.extend_from_slice(hash.as_bytes());
    out.extend_from_slice(&fingerprint.to_bytes());
    out
}

fn decode_parts<const N: usize>(bytes: &[u8]) -> Result<(FixedHash<N>, KeyFingerprint)> {
    let expected = N + KeyFingerprint::ENCODED_LEN;
    if bytes.len() < expected {
        return Err(TrapdoorError::InsufficientBytes {
            expected,
            actual: bytes.len(),
        });
    }
    let hash = FixedHash::from_slice(&bytes[..N])?;
    let mut word = [0u8; KeyFingerprint::ENCODED_LEN];
    word.copy_from_slice(&bytes[N..expected]);
    Ok((hash, KeyFingerprint::from_bytes(word)))
}

impl<T: ?Sized, const N: usize> BinaryFormat for Trapdoor<T, N> {
    const ENCODED_LEN: usize = N + KeyFingerprint::ENCODED_LEN;

    fn to_bytes(&self) -> Vec<u8> {
        encode_parts(self.hash(), self.key_fingerprint())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (hash, fingerprint) = decode_parts(bytes)?;
        Ok(Self::from_parts(hash, fingerprint))
    }
}

impl<T: ?Sized, const N: usize> BinaryFormat for SymmetricDifferenceSet<T, N> {
    const ENCODED_LEN: usize = N + KeyFingerprint::ENCODED_LEN;

    fn to_bytes(&self) -> Vec<u8> {
        encode_parts(self.hash(), self.key_fingerprint())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (hash, fingerprint) = decode_parts(bytes)?;
        Ok(Self::from_parts(hash, fingerprint))
    }
}

impl<T: ?Sized, const N: usize> BinaryFormat for BooleanSet<T, N> {
    const ENCODED_LEN: usize = N + KeyFingerprint::ENCODED_LEN;

    fn to_bytes(&self) -> Vec<u8> {
        encode_parts(self.hash(), self.key_fingerprint())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (hash, fingerprint) = decode_parts(bytes)?;
        Ok(Self::from_parts(hash, fingerprint))
    }
}
