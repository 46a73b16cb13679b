//! Core deterministic primitives.
//!
//! Everything the game logic needs that must behave identically on every
//! platform. Shuffles and deals all flow through the seeded PRNG here.

pub mod rng;

// Re-export core types
pub use rng::{derive_table_seed, DeterministicRng};
