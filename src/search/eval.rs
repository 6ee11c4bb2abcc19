//! Static position evaluators for the tree search.
//!
//! Scores are always from a fixed `perspective` color, never from the
//! mover's, so minimax over them only needs to know who moves at a node.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::Color;
use crate::sim::SimBoard;

/// Score of a decided game, before adding the disc margin.
pub const WIN_SCORE: i32 = 10_000;

/// Empty-cell count at or below which mobility stops mattering.
pub const ENDGAME_EMPTIES: u32 = 10;

/// Scores a position for one color.
pub trait Evaluator: Send {
    /// Higher is better for `perspective`.
    fn evaluate(&self, board: &SimBoard, perspective: Color) -> i32;
}

/// Disc difference from `perspective`.
#[inline]
fn disc_margin(board: &SimBoard, perspective: Color) -> i32 {
    board.count(perspective) as i32 - board.count(perspective.opposite()) as i32
}

/// Score of a finished game: a large constant plus the disc margin.
fn terminal_score(board: &SimBoard, perspective: Color) -> i32 {
    let margin = disc_margin(board, perspective);
    match board.winner() {
        Some(c) if c == perspective => WIN_SCORE + margin,
        Some(_) => -WIN_SCORE + margin,
        None => 0,
    }
}

/// Mobility difference in the midgame, disc difference near the end.
#[derive(Clone, Copy, Debug, Default)]
pub struct MobilityEvaluator;

impl Evaluator for MobilityEvaluator {
    fn evaluate(&self, board: &SimBoard, perspective: Color) -> i32 {
        if board.is_terminal() {
            return terminal_score(board, perspective);
        }
        if board.empty_count() <= ENDGAME_EMPTIES {
            return disc_margin(board, perspective);
        }
        let ours = board.legal_moves(perspective).count_ones() as i32;
        let theirs = board.legal_moves(perspective.opposite()).count_ones() as i32;
        ours - theirs
    }
}

/// Plain disc difference.
#[derive(Clone, Copy, Debug, Default)]
pub struct PieceCountEvaluator;

impl Evaluator for PieceCountEvaluator {
    fn evaluate(&self, board: &SimBoard, perspective: Color) -> i32 {
        if board.is_terminal() {
            return terminal_score(board, perspective);
        }
        disc_margin(board, perspective)
    }
}

/// Evaluators selectable by name through the `evaluator` parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluatorKind {
    /// [`MobilityEvaluator`], spelled `mobility`.
    #[default]
    Mobility,
    /// [`PieceCountEvaluator`], spelled `count`.
    PieceCount,
}

impl EvaluatorKind {
    /// Instantiate the evaluator.
    #[must_use]
    pub fn build(self) -> Box<dyn Evaluator> {
        match self {
            Self::Mobility => Box::new(MobilityEvaluator),
            Self::PieceCount => Box::new(PieceCountEvaluator),
        }
    }
}

impl FromStr for EvaluatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mobility" => Ok(Self::Mobility),
            "count" | "piececount" | "pieces" => Ok(Self::PieceCount),
            other => Err(format!("unknown evaluator {other:?}, expected mobility or count")),
        }
    }
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mobility => write!(f, "mobility"),
            Self::PieceCount => write!(f, "count"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Board;

    fn sim(cells: &str) -> SimBoard {
        SimBoard::from_board(&cells.parse::<Board>().unwrap())
    }

    #[test]
    fn test_opening_mobility_is_even() {
        let board = SimBoard::from_board(&Board::standard());
        assert_eq!(MobilityEvaluator.evaluate(&board, Color::Black), 0);
        assert_eq!(PieceCountEvaluator.evaluate(&board, Color::White), 0);
    }

    #[test]
    fn test_scores_are_antisymmetric() {
        let mut board = SimBoard::from_board(&Board::standard());
        board.play(Color::Black, 19); // d3

        for evaluator in [EvaluatorKind::Mobility.build(), EvaluatorKind::PieceCount.build()] {
            let black = evaluator.evaluate(&board, Color::Black);
            let white = evaluator.evaluate(&board, Color::White);
            assert_eq!(black, -white);
        }
        assert_eq!(PieceCountEvaluator.evaluate(&board, Color::Black), 3);
    }

    #[test]
    fn test_terminal_dominates() {
        let mut cells = "B".repeat(37);
        cells.push_str(&"W".repeat(27));
        let board = sim(&cells);

        assert_eq!(MobilityEvaluator.evaluate(&board, Color::Black), WIN_SCORE + 10);
        assert_eq!(MobilityEvaluator.evaluate(&board, Color::White), -WIN_SCORE - 10);
    }

    #[test]
    fn test_endgame_switches_to_discs() {
        // Black rows over a White row, bottom row empty: Black can still move.
        let cells = format!("{}{}{}", "B".repeat(48), "W".repeat(8), ".".repeat(8));
        let board = sim(&cells);
        assert!(!board.is_terminal());
        assert!(board.empty_count() <= ENDGAME_EMPTIES);

        assert_eq!(MobilityEvaluator.evaluate(&board, Color::Black), 40);
        assert_eq!(MobilityEvaluator.evaluate(&board, Color::White), -40);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("mobility".parse::<EvaluatorKind>().unwrap(), EvaluatorKind::Mobility);
        assert_eq!("Count".parse::<EvaluatorKind>().unwrap(), EvaluatorKind::PieceCount);
        assert!("greedy".parse::<EvaluatorKind>().is_err());
        assert_eq!(EvaluatorKind::PieceCount.to_string(), "count");
    }
}
