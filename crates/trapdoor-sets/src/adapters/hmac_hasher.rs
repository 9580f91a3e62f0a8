//! # HMAC-SHA256 Keyed Hasher
//!
//! Alternative `KeyedHasher` for deployments that standardize on HMAC.
//! Output is produced in 32-byte blocks: block i = HMAC(key, be32(i) || input).

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::domain::KeyFingerprint;
use crate::error::{Result, TrapdoorError};
use crate::ports::KeyedHasher;

type HmacSha256 = Hmac<Sha256>;

const FINGERPRINT_DOMAIN: &[u8] = b"trapdoor-sets/hmac-sha256/fingerprint";

/// HMAC-SHA256 hasher in counter mode
#[derive(Clone)]
pub struct HmacSha256KeyedHasher {
    mac: HmacSha256,
    fingerprint: KeyFingerprint,
}

impl HmacSha256KeyedHasher {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self> {
        let secret = secret.as_ref();
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| TrapdoorError::InvalidParameters(e.to_string()))?;

        let digest = Sha256::new()
            .chain_update(FINGERPRINT_DOMAIN)
            .chain_update(secret)
            .finalize();
        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);

        Ok(Self {
            mac,
            fingerprint: KeyFingerprint::from_digest(word),
        })
    }
}

impl KeyedHasher for HmacSha256KeyedHasher {
    fn fingerprint(&self) -> KeyFingerprint {
        self.fingerprint
    }

    fn fill(&self, input: &[u8], out: &mut [u8]) {
        for (counter, chunk) in out.chunks_mut(32).enumerate() {
            let mut mac = self.mac.clone();
            mac.update(&(counter as u32).to_be_bytes());
            mac.update(input);
            let block = mac.finalize().into_bytes();
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
    }
}

impl fmt::Debug for HmacSha256KeyedHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSha256KeyedHasher")
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}
