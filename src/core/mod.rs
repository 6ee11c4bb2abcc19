//! Core value types: coordinates, colors, boards, moves, RNG.
//!
//! Everything here is plain data with no rule knowledge. Legality lives in
//! `rules`, fast unchecked play in `sim`.

pub mod board;
pub mod color;
pub mod color_map;
pub mod coord;
pub mod moves;
pub mod rng;

pub use board::Board;
pub use color::Color;
pub use color_map::ColorMap;
pub use coord::{Coord, Direction, CELLS, COLS, ROWS};
pub use moves::Move;
pub use rng::GameRng;
