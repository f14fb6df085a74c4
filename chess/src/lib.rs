//! Bitboard chess rules library: board representation, incremental Zobrist
//! hashing, reversible move application and legal move generation.
//!
//! The search layer lives in the sibling `engine` crate.
pub mod board;
pub mod core;
pub mod utils;

pub use board::Board;
pub use self::core::*;
