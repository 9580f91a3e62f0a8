//! # Trapdoor Sets Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks
//! │   └── trapdoor_benchmarks.rs
//! │
//! └── src/integration/  # Cross-module behaviour
//!     ├── scenarios.rs     # End-to-end flows through the public API
//!     └── algebra_laws.rs  # Property-based algebra laws
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p trapdoor-tests
//!
//! # By category
//! cargo test -p trapdoor-tests integration::scenarios
//! cargo test -p trapdoor-tests integration::algebra_laws
//!
//! # Benchmarks
//! cargo bench -p trapdoor-tests
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
