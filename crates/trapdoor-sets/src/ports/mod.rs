//! Ports Layer
//!
//! The algebra in `domain/` only needs one thing from the outside world: a
//! keyed, deterministic hash. That dependency is the `KeyedHasher` driven port.

pub mod outbound;

pub use outbound::KeyedHasher;
