//! Game clock and turn execution.
//!
//! Each color is judged against two budgets every turn: a fixed per-turn
//! cap and its own game pool. The pool only ever shrinks, and never by
//! more than the turn's hard limit.

pub mod executor;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use executor::{run_turn, TurnOutcome};

use crate::agent::TurnBudget;
use crate::core::{Color, ColorMap};
use crate::session::SessionConfig;

/// Remaining game pool per color plus the shared per-turn cap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    per_turn: Duration,
    remaining: ColorMap<Duration>,
}

impl GameClock {
    /// Both colors start with `game_pool`.
    #[must_use]
    pub fn new(per_turn: Duration, game_pool: Duration) -> Self {
        Self {
            per_turn,
            remaining: ColorMap::with_value(game_pool),
        }
    }

    /// Clock for a session configuration.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.per_turn, config.game_pool)
    }

    /// The per-turn cap.
    #[must_use]
    pub fn per_turn(&self) -> Duration {
        self.per_turn
    }

    /// Pool left for `color`.
    #[must_use]
    pub fn remaining(&self, color: Color) -> Duration {
        self.remaining[color]
    }

    /// Pools left for both colors.
    #[must_use]
    pub fn remaining_all(&self) -> &ColorMap<Duration> {
        &self.remaining
    }

    /// Hard limit of `color`'s next turn: `min(per_turn, remaining)`.
    #[must_use]
    pub fn limit(&self, color: Color) -> Duration {
        self.per_turn.min(self.remaining[color])
    }

    /// A budget for `color`'s turn, starting now.
    #[must_use]
    pub fn budget(&self, color: Color) -> TurnBudget {
        TurnBudget::new(self.per_turn, self.remaining[color])
    }

    /// Subtract `elapsed`, capped at the turn limit, from `color`'s pool.
    ///
    /// Returns the amount actually charged.
    pub fn charge(&mut self, color: Color, elapsed: Duration) -> Duration {
        let charged = elapsed.min(self.limit(color));
        let pool = &mut self.remaining[color];
        *pool = pool.saturating_sub(charged);
        charged
    }

    /// Check if `color` has no time left.
    #[must_use]
    pub fn is_exhausted(&self, color: Color) -> bool {
        self.remaining[color].is_zero()
    }
}
