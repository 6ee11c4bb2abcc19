//! The strict, authoritative game board.
//!
//! ## State machine
//!
//! `InProgress(mover)` advances to `InProgress(opponent)` on every accepted
//! placement or pass, and to `Finished` once neither color can place.
//! A move is refused, before any mutation, when:
//! - the game is already finished,
//! - it comes from the color not on move,
//! - it places where no direction counts,
//! - it passes while a legal placement exists.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::engine::{self, FlipSet};
use crate::core::{Board, Color, Move};
use crate::error::RuleViolation;

/// Whose move it is, or that the game is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Waiting for this color's move.
    InProgress(Color),
    /// Neither color can place.
    Finished,
}

/// A board that enforces turn order and legality and records history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameBoard {
    board: Board,
    status: Status,
    history: Vector<Move>,
}

impl Default for GameBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoard {
    /// The standard starting position, Black to move.
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Board::standard(), Color::Black)
    }

    /// Start from an arbitrary position with `mover` to move.
    ///
    /// The status is `Finished` when neither color can place.
    #[must_use]
    pub fn from_position(board: Board, mover: Color) -> Self {
        let status = if engine::is_ongoing(&board) {
            Status::InProgress(mover)
        } else {
            Status::Finished
        };
        Self {
            board,
            status,
            history: Vector::new(),
        }
    }

    /// Current cell contents.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// A value copy of the cells, safe to hand to an agent.
    #[must_use]
    pub fn snapshot(&self) -> Board {
        self.board
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// The color to move, `None` once finished.
    #[must_use]
    pub fn mover(&self) -> Option<Color> {
        match self.status {
            Status::InProgress(color) => Some(color),
            Status::Finished => None,
        }
    }

    /// Check if the game is over.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == Status::Finished
    }

    /// Accepted moves in order, passes included.
    #[must_use]
    pub fn history(&self) -> &Vector<Move> {
        &self.history
    }

    /// Validate and apply a move. Returns the cells it flipped.
    pub fn apply(&mut self, mv: Move) -> Result<FlipSet, RuleViolation> {
        self.check(mv)?;

        let flips = match mv.at {
            Some(at) => engine::apply_placement(&mut self.board, mv.color, at),
            None => FlipSet::new(),
        };
        self.history.push_back(mv);
        self.status = match engine::next_mover(&self.board, mv.color) {
            Some(next) => Status::InProgress(next),
            None => Status::Finished,
        };

        trace!(%mv, flipped = flips.len(), status = ?self.status, "applied move");
        Ok(flips)
    }

    /// Check a move against the current state without applying it.
    pub fn check(&self, mv: Move) -> Result<(), RuleViolation> {
        let color = mv.color;
        let expected = match self.status {
            Status::Finished => return Err(RuleViolation::GameOver { color }),
            Status::InProgress(expected) => expected,
        };
        if color != expected {
            return Err(RuleViolation::OutOfTurn { color, expected });
        }
        match mv.at {
            Some(at) if !engine::can_place(&self.board, color, at) => {
                Err(RuleViolation::IllegalPlacement { color, at })
            }
            None if engine::can_move(&self.board, color) => {
                Err(RuleViolation::IllegalPass { color })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coord;

    fn c(s: &str) -> Coord {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = GameBoard::new();
        assert_eq!(game.mover(), Some(Color::Black));
        assert!(game.history().is_empty());
        assert_eq!(game.snapshot(), Board::standard());
    }

    #[test]
    fn test_apply_advances_mover() {
        let mut game = GameBoard::new();
        let flips = game.apply(Move::place(Color::Black, c("f5"))).unwrap();

        assert_eq!(flips.as_slice(), &[c("e5")]);
        assert_eq!(game.mover(), Some(Color::White));
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.board().count(Color::Black), 4);
    }

    #[test]
    fn test_out_of_turn_rejected_without_mutation() {
        let mut game = GameBoard::new();
        let before = game.clone();

        let err = game.apply(Move::place(Color::White, c("e6"))).unwrap_err();
        assert_eq!(
            err,
            RuleViolation::OutOfTurn {
                color: Color::White,
                expected: Color::Black
            }
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_illegal_placement_and_pass() {
        let mut game = GameBoard::new();

        assert_eq!(
            game.apply(Move::place(Color::Black, c("a1"))),
            Err(RuleViolation::IllegalPlacement {
                color: Color::Black,
                at: c("a1")
            })
        );
        assert_eq!(
            game.apply(Move::pass(Color::Black)),
            Err(RuleViolation::IllegalPass {
                color: Color::Black
            })
        );
        assert_eq!(
            game.apply(Move::place(Color::Black, c("d4"))),
            Err(RuleViolation::IllegalPlacement {
                color: Color::Black,
                at: c("d4")
            })
        );
    }

    #[test]
    fn test_finished_board_rejects_moves() {
        let full: Board = "B".repeat(64).parse().unwrap();
        let mut game = GameBoard::from_position(full, Color::White);

        assert!(game.is_finished());
        assert_eq!(
            game.apply(Move::pass(Color::White)),
            Err(RuleViolation::GameOver {
                color: Color::White
            })
        );
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut game = GameBoard::new();
        let snapshot = game.snapshot();
        game.apply(Move::place(Color::Black, c("d3"))).unwrap();

        assert_eq!(snapshot, Board::standard());
        assert_ne!(game.snapshot(), snapshot);
    }
}
