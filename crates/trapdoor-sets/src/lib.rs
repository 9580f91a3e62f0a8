//! # Trapdoor Sets
//!
//! Approximate Boolean algebra over keyed hash trapdoors.
//!
//! A trapdoor is a fixed-width keyed hash of a value. Sets of values are
//! folded into the same fixed-width representation, and every query on them
//! (equality, emptiness, membership, subset, cardinality, similarity) returns
//! an `Approx` carrying its false-positive and false-negative rates.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure value types, no I/O
//!   - `FixedHash<N>`: N-byte value with bitwise algebra
//!   - `Approx<T>` / `ApproxBool`: values with error rates
//!   - `Trapdoor` / `TrapdoorFactory`: keyed hash of one value
//!   - `SymmetricDifferenceSet`: group under XOR
//!   - `BooleanSet`: Bloom-style Boolean algebra
//!   - `TrapdoorConfig` / `TrapdoorConfigBuilder`: tunables with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `KeyedHasher`: Driven port (secret-keyed deterministic hash)
//!
//! - **Adapters Layer** (`adapters/`): Port implementations
//!   - `Blake3KeyedHasher`: keyed BLAKE3 (default)
//!   - `HmacSha256KeyedHasher`: HMAC-SHA256 in counter mode
//!
//! - **Operations** (`operations/`): cardinality, similarity, homomorphic
//!   aggregation, threshold sharing, batch helpers
//!
//! - **Codec** (`codec`): fixed binary layout of hash + fingerprint
//!
//! ## Invariants
//!
//! - Values built under different secrets never combine: `KeyMismatch`
//! - XOR identities (`a ^ a == 0`, `a ^ 0 == a`) hold exactly
//! - Members inserted into a `BooleanSet` are always found (fnr = 0)
//!
//! ## Usage Example
//!
//! ```
//! use trapdoor_sets::{BooleanSetFactory, TrapdoorFactory};
//!
//! let trapdoors = TrapdoorFactory::<32>::new("secret");
//! let alice = trapdoors.create("alice").unwrap();
//! let bob = trapdoors.create("bob").unwrap();
//! assert!(!alice.equals(&bob).unwrap().is_true());
//!
//! let sets = BooleanSetFactory::<32>::new("secret");
//! let left = sets.from_collection(["a", "b", "c", "d"]).unwrap();
//! let right = sets.from_collection(["c", "d", "e", "f"]).unwrap();
//! let both = left.intersection(&right).unwrap();
//! assert!(both.contains(&sets.trapdoor("c").unwrap()).unwrap().is_true());
//! ```
//!
//! ## Features
//!
//! - `parallel`: rayon-backed batch variants

pub mod adapters;
pub mod codec;
pub mod domain;
pub mod error;
pub mod operations;
pub mod ports;

// Re-export main types
pub use adapters::{Blake3KeyedHasher, HmacSha256KeyedHasher};
pub use codec::BinaryFormat;
pub use domain::{
    compose_error_rates, make_exact, make_trapdoor, Approx, ApproxBool, BloomProfile, BooleanSet,
    BooleanSetFactory, FixedHash, Hash128, Hash256, Hash512, HashRepr, KeyFingerprint,
    MembershipProbe, SymmetricDifferenceSet, SymmetricDifferenceSetFactory, Trapdoor,
    TrapdoorConfig, TrapdoorConfigBuilder, TrapdoorFactory,
};
pub use error::{Result, TrapdoorError};
pub use operations::{
    AdaptiveCardinality, AdditiveTrapdoor, CardinalityEstimator, CompoundTrapdoor, HyperLogLog,
    LinearCounter, LshIndex, MinHasher, Pipeline, SecureAggregator, ShamirScheme, ThresholdScheme,
};
pub use ports::KeyedHasher;
