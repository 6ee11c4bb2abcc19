//! Lightweight simulation board for search strategies.
//!
//! Trades the strict board's checks for speed. See `board` for the
//! unchecked-play contract.

pub mod board;
pub mod playout;

pub use board::{bits, SimBoard};
pub use playout::random_playout;
