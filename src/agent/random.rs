//! The unbiased baseline strategy.
//!
//! [`uniform_choice`] is also the fallback every search uses once its
//! deadline passes.

use crate::agent::{Agent, AgentParams, TurnBudget};
use crate::core::{Board, Color, Coord, GameRng};
use crate::error::{AgentError, ConfigError};
use crate::sim::SimBoard;

/// Pick a legal placement for `color` uniformly at random.
///
/// Returns `None` when the mover has to pass.
pub fn uniform_choice(board: &SimBoard, color: Color, rng: &mut GameRng) -> Option<Coord> {
    rng.pick_bit(board.legal_moves(color))
        .and_then(|bit| Coord::from_index(bit as usize))
}

/// Plays a uniformly random legal move every turn.
#[derive(Clone, Debug)]
pub struct UniformRandom {
    rng: GameRng,
}

impl UniformRandom {
    /// Registry name.
    pub const NAME: &'static str = "UniformRandom";

    /// Create with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }

    /// Build from execution parameters; honors `seed`.
    pub fn from_params(_color: Color, params: &AgentParams) -> Result<Self, ConfigError> {
        let seed = params.scope(Self::NAME).get::<u64>("seed")?;
        Ok(Self {
            rng: GameRng::seeded_or_random(seed),
        })
    }
}

impl Default for UniformRandom {
    fn default() -> Self {
        Self {
            rng: GameRng::seeded_or_random(None),
        }
    }
}

impl Agent for UniformRandom {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn decide(
        &mut self,
        board: &Board,
        color: Color,
        _budget: &TurnBudget,
    ) -> Result<Option<Coord>, AgentError> {
        Ok(uniform_choice(&SimBoard::from_board(board), color, &mut self.rng))
    }
}
