//! The immutable record of a finished game.

use std::time::Duration;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Board, Color, ColorMap, Move};
use crate::error::{ResultCodecError, Violation};
use crate::rules;

/// Outcome of one game, produced once when it ends.
///
/// Fields are read-only. Encode with [`GameResult::to_bytes`] to hand it to
/// downstream aggregation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    board: Board,
    remaining: ColorMap<Duration>,
    winner: Option<Color>,
    violation: Option<Violation>,
    history: Vector<Move>,
}

impl GameResult {
    /// Result of a game that ended on the board, or by forfeit when
    /// `violation` is set. A forfeit hands the win to the other color.
    #[must_use]
    pub fn new(
        board: Board,
        remaining: ColorMap<Duration>,
        history: Vector<Move>,
        violation: Option<Violation>,
    ) -> Self {
        let winner = match &violation {
            Some(v) => Some(v.offender.opposite()),
            None => rules::winner(&board),
        };
        Self {
            board,
            remaining,
            winner,
            violation,
            history,
        }
    }

    /// Final board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Pool left per color.
    #[must_use]
    pub fn remaining(&self) -> &ColorMap<Duration> {
        &self.remaining
    }

    /// Winner, `None` for a draw.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Check if the game was drawn.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    /// The forfeit, if the game ended abnormally.
    #[must_use]
    pub fn violation(&self) -> Option<&Violation> {
        self.violation.as_ref()
    }

    /// Every accepted move, passes included.
    #[must_use]
    pub fn history(&self) -> &Vector<Move> {
        &self.history
    }

    /// Discs of `color` on the final board.
    #[must_use]
    pub fn score(&self, color: Color) -> u32 {
        self.board.count(color)
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ResultCodecError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode bytes from [`GameResult::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ResultCodecError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
