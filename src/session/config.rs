//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Time budgets shared by both colors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hard cap on a single decision.
    pub per_turn: Duration,

    /// Each color's total thinking time for the game.
    pub game_pool: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            per_turn: Duration::from_secs(1),
            game_pool: Duration::from_secs(60),
        }
    }
}

impl SessionConfig {
    /// Set the per-turn cap.
    #[must_use]
    pub fn with_per_turn(mut self, per_turn: Duration) -> Self {
        self.per_turn = per_turn;
        self
    }

    /// Set the game pool.
    #[must_use]
    pub fn with_game_pool(mut self, game_pool: Duration) -> Self {
        self.game_pool = game_pool;
        self
    }
}
