//! # BLAKE3 Keyed Hasher
//!
//! Default `KeyedHasher`. The secret is stretched into a 256-bit key with
//! BLAKE3 key derivation; outputs come from the keyed XOF so any hash width
//! is supported.

use std::fmt;

use tracing::debug;
use zeroize::Zeroize;

use crate::domain::KeyFingerprint;
use crate::ports::KeyedHasher;

const KEY_CONTEXT: &str = "trapdoor-sets 2024-06-01 keyed hash";
const FINGERPRINT_CONTEXT: &str = "trapdoor-sets 2024-06-01 key fingerprint";

/// Derived hashing key (256-bit), wiped on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
struct HashKey([u8; 32]);

/// Keyed BLAKE3 hasher.
#[derive(Clone)]
pub struct Blake3KeyedHasher {
    key: HashKey,
    fingerprint: KeyFingerprint,
}

impl Blake3KeyedHasher {
    /// Derive the hashing key and fingerprint from a secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        let key = HashKey(blake3::derive_key(KEY_CONTEXT, secret));

        let digest = blake3::derive_key(FINGERPRINT_CONTEXT, secret);
        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);
        let fingerprint = KeyFingerprint::from_digest(word);

        debug!(fingerprint = %fingerprint, "Derived BLAKE3 trapdoor key");
        Self { key, fingerprint }
    }
}

impl KeyedHasher for Blake3KeyedHasher {
    fn fingerprint(&self) -> KeyFingerprint {
        self.fingerprint
    }

    fn fill(&self, input: &[u8], out: &mut [u8]) {
        let mut hasher = blake3::Hasher::new_keyed(&self.key.0);
        hasher.update(input);
        hasher.finalize_xof().fill(out);
    }
}

impl fmt::Debug for Blake3KeyedHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blake3KeyedHasher")
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}
