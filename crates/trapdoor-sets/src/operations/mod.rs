//! Derived Operations
//!
//! Algorithms layered on top of trapdoors and sets. They follow the same
//! discipline as the domain types: key compatibility is checked before any
//! work, and every estimate reports its own error through `Approx`.
//!
//! - `cardinality` - HyperLogLog, linear counting and the adaptive wrapper
//! - `similarity` - Jaccard, MinHash, LSH banding, cosine
//! - `homomorphic` - additive trapdoors, aggregation, compound trapdoors
//! - `threshold` - XOR k-of-n shares and Shamir sharing over GF(2^8)
//! - `batch` - vectorised create/compare/fold helpers and `Pipeline`

pub mod batch;
pub mod cardinality;
pub mod homomorphic;
pub mod similarity;
pub mod threshold;

#[cfg(feature = "parallel")]
pub use batch::{par_batch_contains, par_batch_create};
pub use batch::{
    batch_contains, batch_create, batch_equals, batch_intersection, batch_union, Pipeline,
};
pub use cardinality::{
    compare_cardinality, estimate_union, AdaptiveCardinality, CardinalityEstimator, HyperLogLog,
    LinearCounter,
};
pub use homomorphic::{AdditiveTrapdoor, CompoundTrapdoor, SecureAggregator};
pub use similarity::{
    boolean_jaccard, cosine_similarity, symmetric_jaccard, trapdoor_cosine_similarity, LshIndex,
    LshSignature, MinHashSignature, MinHasher,
};
pub use threshold::{ShamirScheme, ShamirShare, ThresholdScheme};
