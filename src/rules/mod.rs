//! Rules engine: the single source of truth for legality and termination.
//!
//! - `engine`: pure functions over a `Board` (legality, flips, winner)
//! - `game_board`: the strict board that enforces turn order and records
//!   history
//!
//! Search strategies use the faster `sim::SimBoard`, but every move that
//! reaches a real game goes through `GameBoard::apply`.

pub mod engine;
pub mod game_board;

pub use engine::{
    apply_placement, can_move, can_place, flipped_cells, flipping_directions, is_ongoing,
    legal_placements, next_mover, outcome, run_length, winner, FlipSet, Outcome,
};
pub use game_board::{GameBoard, Status};
