//! Adapters Layer (Driven Adapters)
//!
//! Concrete implementations of the `KeyedHasher` port.
//!
//! ## Adapters
//!
//! - `Blake3KeyedHasher` - keyed BLAKE3 with XOF output (default)
//! - `HmacSha256KeyedHasher` - HMAC-SHA256 in counter mode

pub mod blake3_hasher;
pub mod hmac_hasher;

pub use blake3_hasher::Blake3KeyedHasher;
pub use hmac_hasher::HmacSha256KeyedHasher;
