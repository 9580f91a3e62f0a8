//! Domain Layer - Pure value types and their algebra
//!
//! This layer contains:
//! - Fixed-width hash storage with bitwise algebra
//! - Approximate values and error-rate composition
//! - Key fingerprints
//! - Trapdoors and their factory
//! - Symmetric difference sets (XOR group)
//! - Boolean sets (Bloom-style Boolean algebra)
//! - Parameter calculations and salted sub-hashes
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod approx;
pub mod boolean_set;
pub mod config;
pub mod fixed_hash;
pub mod hash_functions;
pub mod key;
pub mod parameters;
pub mod repr;
pub mod symmetric_difference_set;
pub mod trapdoor;

pub use approx::{compose_error_rates, make_exact, Approx, ApproxBool};
pub use boolean_set::{BloomProfile, BooleanSet, BooleanSetFactory, MembershipProbe};
pub use config::{TrapdoorConfig, TrapdoorConfigBuilder};
pub use fixed_hash::{FixedHash, Hash128, Hash256, Hash512};
pub use key::KeyFingerprint;
pub use parameters::{calculate_fpr, optimal_hash_count};
pub use repr::HashRepr;
pub use symmetric_difference_set::{SymmetricDifferenceSet, SymmetricDifferenceSetFactory};
pub use trapdoor::{make_trapdoor, Trapdoor, TrapdoorFactory};
