//! # reversi-arena
//!
//! A rule-enforced, time-budgeted engine for two-player Reversi games, with
//! search-based agents that decide within the same budgets.
//!
//! ## Design Principles
//!
//! 1. **One Source of Truth**: Only [`rules::GameBoard`] decides legality
//!    and termination. Agents see value snapshots and cannot touch it.
//!
//! 2. **Budgets Are Enforced, Not Trusted**: Every decision runs on its own
//!    thread under `min(per_turn, remaining)`. Overruns, failures and panics
//!    forfeit the game; cancellation is cooperative and never relied upon.
//!
//! 3. **Searches Degrade, Never Fail**: Strategies poll their deadline and
//!    fall back to a uniform legal move under time pressure.
//!
//! ## Architecture
//!
//! - **Bitboards**: Both boards are two `u64` masks. The strict board walks
//!   directions cell by cell; the simulation board shifts whole masks.
//!
//! - **Tree Reuse**: The incremental tree search keeps its arena across
//!   turns and compacts it on re-root, so dead nodes are freed at once.
//!
//! - **Persistent History**: Move history is an `im::Vector`, cheap to clone
//!   into the result.
//!
//! ## Modules
//!
//! - `core`: Coordinates, colors, boards, moves, RNG, per-color storage
//! - `rules`: Pure rule functions and the strict game board
//! - `sim`: Unchecked simulation board and random playouts
//! - `agent`: Decision-agent contract, budgets, parameters, registry
//! - `clock`: Game clock and the isolated turn executor
//! - `search`: The three search strategies
//! - `session`: Full games and their results
//! - `error`: Error taxonomy

pub mod agent;
pub mod clock;
pub mod core;
pub mod error;
pub mod rules;
pub mod search;
pub mod session;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{Board, Color, ColorMap, Coord, Direction, GameRng, Move};

pub use crate::rules::{GameBoard, Outcome, Status};

pub use crate::sim::SimBoard;

pub use crate::agent::{
    Agent, AgentParams, AgentRegistry, CancelToken, Deadline, TurnBudget, UniformRandom,
};

pub use crate::clock::{run_turn, GameClock, TurnOutcome};

pub use crate::search::{
    EvaluatorKind, ExhaustiveProofSearch, IncrementalTreeSearch, SearchStats,
    StochasticPlayoutSearch, Verdict,
};

pub use crate::session::{GameResult, GameSession, SessionConfig};

pub use crate::error::{
    AgentError, BoardParseError, ConfigError, ParseCoordError, ResultCodecError, RuleViolation,
    TimeUp, Violation, ViolationKind,
};
