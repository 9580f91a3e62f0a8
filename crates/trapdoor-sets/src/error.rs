//! Error types for trapdoor set operations
//!
//! A query that returns a wrong answer because of a hash collision is NOT an
//! error: that uncertainty is reported through `Approx`. The variants below
//! are precondition violations, surfaced before any bitwise work is done.

use thiserror::Error;

use crate::domain::KeyFingerprint;

/// Errors that can occur while building or combining trapdoor values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrapdoorError {
    #[error("Key mismatch: operands built under different secrets ({left} != {right})")]
    KeyMismatch {
        left: KeyFingerprint,
        right: KeyFingerprint,
    },

    #[error("Insufficient shares: {provided} < {required}")]
    InsufficientShares { provided: usize, required: usize },

    #[error("Invalid threshold: {threshold} of {total}")]
    InvalidThreshold { threshold: usize, total: usize },

    #[error("Insufficient bytes: expected {expected}, got {actual}")]
    InsufficientBytes { expected: usize, actual: usize },

    #[error("Cannot combine a compound with zero components")]
    EmptyCompound,

    #[error("Length mismatch: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Duplicate share index: {0}")]
    DuplicateShareIndex(u8),

    #[error("Invalid share index: {0}")]
    InvalidShareIndex(u8),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, TrapdoorError>;
