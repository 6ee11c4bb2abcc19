//! The decision-agent contract.
//!
//! An [`Agent`] is asked for one move per turn of its color. It receives a
//! copy of the authoritative board, never the board itself, together with a
//! [`TurnBudget`] describing how long it may think. Returning an illegal
//! move, overrunning the budget, failing or panicking all forfeit the game;
//! enforcement lives in [`crate::clock`] and [`crate::rules`], not here.
//!
//! ## Construction
//!
//! Strategies are built once per game from `(color, params)` through an
//! [`AgentRegistry`], which also offers a no-argument path for agents that
//! only implement `Default`.

pub mod budget;
pub mod params;
pub mod random;
pub mod registry;

pub use budget::{CancelToken, Deadline, TurnBudget};
pub use params::{AgentParams, ParamScope};
pub use random::{uniform_choice, UniformRandom};
pub use registry::{AgentBuilder, AgentRegistry};

use crate::core::{Board, Color, Coord};
use crate::error::AgentError;
use crate::session::GameResult;

/// A move-decision strategy for one color.
///
/// Agents are moved onto a worker thread for each decision and handed back
/// afterwards, hence the `Send + 'static` bound.
pub trait Agent: Send + 'static {
    /// Name used in logs and by the registry.
    fn name(&self) -> &str;

    /// Choose a placement, or `None` to pass.
    ///
    /// `board` is a private snapshot. Implementations should poll
    /// `budget` and return a fallback move before its limit.
    fn decide(
        &mut self,
        board: &Board,
        color: Color,
        budget: &TurnBudget,
    ) -> Result<Option<Coord>, AgentError>;

    /// Advisory notification once the game is over.
    ///
    /// Errors are logged by the session and otherwise ignored.
    fn game_over(&mut self, _result: &GameResult) -> Result<(), AgentError> {
        Ok(())
    }
}
