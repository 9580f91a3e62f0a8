//! # Integration Tests
//!
//! Flows that cross module boundaries: factories feeding sets, sets feeding
//! estimators, shares feeding reconstruction, values through the codec.

pub mod algebra_laws;
pub mod scenarios;
