//! Error taxonomy.
//!
//! Only three kinds of failure end a game: a [`RuleViolation`] caught by the
//! rules engine, a [`TimeUp`] caught by the turn executor, and an agent fault
//! (an [`AgentError`] or panic surfaced during a decision). They are bundled
//! into a [`Violation`] that names the offending color.
//!
//! The remaining types cover parsing and configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Color, Coord};

/// A coordinate string or index that does not name a cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCoordError {
    #[error("coordinate index {0} is off the board")]
    OutOfRange(usize),
    #[error("malformed coordinate {0:?}, expected a1..h8")]
    Malformed(String),
}

/// A canonical cell string that does not describe a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardParseError {
    #[error("board string has {0} cells, expected 64")]
    WrongLength(usize),
    #[error("unexpected cell {ch:?} at position {index}")]
    BadCell { ch: char, index: usize },
    #[error("cells {0:#018x} are claimed by both colors")]
    Overlap(u64),
}

/// A move the rules engine refused. Detected before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum RuleViolation {
    #[error("{color} moved after the game ended")]
    GameOver { color: Color },
    #[error("{color} moved out of turn, {expected} is to move")]
    OutOfTurn { color: Color, expected: Color },
    #[error("{color} cannot place at {at}")]
    IllegalPlacement { color: Color, at: Coord },
    #[error("{color} passed while holding a legal placement")]
    IllegalPass { color: Color },
}

/// A decision that did not fit its time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum TimeUp {
    #[error("per-turn limit of {limit:?} exceeded after {elapsed:?}")]
    PerTurn { limit: Duration, elapsed: Duration },
    #[error("game pool of {remaining:?} exhausted after {elapsed:?}")]
    GamePool { remaining: Duration, elapsed: Duration },
}

/// Failure raised by a decision agent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("agent failed: {0}")]
    Failed(String),
    #[error("agent panicked: {0}")]
    Panicked(String),
    #[error("agent was lost: {0}")]
    Lost(String),
}

impl AgentError {
    /// Creates a failure with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Invalid agent construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("unknown strategy {0:?}")]
    UnknownStrategy(String),
}

/// Failure encoding or decoding a game result.
#[derive(Debug, Error)]
#[error("result codec error: {0}")]
pub struct ResultCodecError(#[from] pub bincode::Error);

/// Why a game ended abnormally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ViolationKind {
    #[error("rule violation: {0}")]
    Rule(RuleViolation),
    #[error("time up: {0}")]
    TimeUp(TimeUp),
    /// The rendered cause, kept for diagnostics.
    #[error("agent fault: {0}")]
    AgentFault(String),
}

impl From<RuleViolation> for ViolationKind {
    fn from(v: RuleViolation) -> Self {
        Self::Rule(v)
    }
}

impl From<TimeUp> for ViolationKind {
    fn from(t: TimeUp) -> Self {
        Self::TimeUp(t)
    }
}

impl From<AgentError> for ViolationKind {
    fn from(e: AgentError) -> Self {
        Self::AgentFault(e.to_string())
    }
}

/// A game-ending violation attributed to one color, who loses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{offender} forfeits: {kind}")]
pub struct Violation {
    pub offender: Color,
    pub kind: ViolationKind,
}

impl Violation {
    /// Attribute a violation to `offender`.
    pub fn new(offender: Color, kind: impl Into<ViolationKind>) -> Self {
        Self {
            offender,
            kind: kind.into(),
        }
    }

    /// Check whether this is a timing violation.
    #[must_use]
    pub fn is_time_up(&self) -> bool {
        matches!(self.kind, ViolationKind::TimeUp(_))
    }
}
