//! Pure rule functions over a [`Board`].
//!
//! ## Placement rule
//!
//! From a candidate empty cell, walk each of the 8 directions while cells
//! hold the opponent's color. A direction *counts* only when that run is
//! non-empty and ends on a cell of the mover's color before reaching an
//! empty cell or the edge. A placement is legal when at least one direction
//! counts, and applying it flips every cell of every counting run.
//!
//! These functions never mutate the caller's board except
//! [`apply_placement`], which the strict [`GameBoard`](super::GameBoard)
//! guards with a legality check.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Board, Color, Coord, Direction, Move};

/// Cells flipped by one placement. At most 18 on an 8x8 board.
pub type FlipSet = SmallVec<[Coord; 20]>;

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Majority of cells.
    Win(Color),
    /// Equal cell counts.
    Draw,
}

impl Outcome {
    /// The winning color, `None` for a draw.
    #[must_use]
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Win(color) => Some(color),
            Outcome::Draw => None,
        }
    }
}

/// Length of the opposing run `color` would flip from `at` along `dir`.
///
/// Zero when the direction does not count.
#[must_use]
pub fn run_length(board: &Board, color: Color, at: Coord, dir: Direction) -> usize {
    let opponent = color.opposite();
    let mut run = 0;
    for cell in at.ray(dir) {
        match board.color_at(cell) {
            Some(c) if c == opponent => run += 1,
            Some(_) => return run,
            None => return 0,
        }
    }
    0
}

/// Directions that count for a placement of `color` at `at`.
#[must_use]
pub fn flipping_directions(board: &Board, color: Color, at: Coord) -> SmallVec<[Direction; 8]> {
    if board.color_at(at).is_some() {
        return SmallVec::new();
    }
    Direction::ALL
        .into_iter()
        .filter(|&dir| run_length(board, color, at, dir) > 0)
        .collect()
}

/// Check if `color` may place at `at`.
#[must_use]
pub fn can_place(board: &Board, color: Color, at: Coord) -> bool {
    board.color_at(at).is_none()
        && Direction::ALL
            .into_iter()
            .any(|dir| run_length(board, color, at, dir) > 0)
}

/// Every legal placement for `color`, row-major.
#[must_use]
pub fn legal_placements(board: &Board, color: Color) -> Vec<Coord> {
    Coord::all()
        .iter()
        .copied()
        .filter(|&at| can_place(board, color, at))
        .collect()
}

/// Check if `color` has any legal placement.
#[must_use]
pub fn can_move(board: &Board, color: Color) -> bool {
    Coord::all().iter().any(|&at| can_place(board, color, at))
}

/// Check if either color can still place.
#[must_use]
pub fn is_ongoing(board: &Board) -> bool {
    can_move(board, Color::Black) || can_move(board, Color::White)
}

/// Cells a move would flip. Empty for passes and illegal placements.
#[must_use]
pub fn flipped_cells(board: &Board, mv: Move) -> FlipSet {
    let Some(at) = mv.at else {
        return FlipSet::new();
    };
    if board.color_at(at).is_some() {
        return FlipSet::new();
    }
    let mut flips = FlipSet::new();
    for dir in Direction::ALL {
        let run = run_length(board, mv.color, at, dir);
        flips.extend(at.ray(dir).take(run));
    }
    flips
}

/// Flip every counting run and place the piece. Returns the flipped cells.
///
/// Callers must have checked legality; an illegal placement still sets the
/// target cell but flips nothing.
pub fn apply_placement(board: &mut Board, color: Color, at: Coord) -> FlipSet {
    let flips = flipped_cells(board, Move::place(color, at));
    for &cell in &flips {
        board.set(cell, Some(color));
    }
    board.set(at, Some(color));
    flips
}

/// Who moves after `just_moved`, or `None` when the game is over.
///
/// The opponent moves next even when it can only pass.
#[must_use]
pub fn next_mover(board: &Board, just_moved: Color) -> Option<Color> {
    is_ongoing(board).then(|| just_moved.opposite())
}

/// Majority color on a finished board, `None` on a tie.
///
/// Only meaningful once [`is_ongoing`] is false.
#[must_use]
pub fn winner(board: &Board) -> Option<Color> {
    let black = board.count(Color::Black);
    let white = board.count(Color::White);
    match black.cmp(&white) {
        std::cmp::Ordering::Greater => Some(Color::Black),
        std::cmp::Ordering::Less => Some(Color::White),
        std::cmp::Ordering::Equal => None,
    }
}

/// The outcome of a finished game, `None` while either color can move.
#[must_use]
pub fn outcome(board: &Board) -> Option<Outcome> {
    if is_ongoing(board) {
        return None;
    }
    Some(winner(board).map_or(Outcome::Draw, Outcome::Win))
}
