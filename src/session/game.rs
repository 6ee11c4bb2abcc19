//! One full game between two agents.
//!
//! The session owns the authoritative [`GameBoard`] and the [`GameClock`].
//! Each turn it hands the mover's agent a board snapshot through
//! [`run_turn`], applies the answer through the rules engine and moves on.
//! The first violation from either step ends the game; nothing is retried.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, instrument, warn};

use super::{GameResult, SessionConfig};
use crate::agent::{Agent, AgentParams, AgentRegistry};
use crate::clock::{run_turn, GameClock};
use crate::core::{Color, ColorMap, Move};
use crate::error::{AgentError, ConfigError, Violation};
use crate::rules::GameBoard;

/// A game in progress.
pub struct GameSession {
    board: GameBoard,
    clock: GameClock,
    agents: ColorMap<Option<Box<dyn Agent>>>,
    names: ColorMap<String>,
}

impl GameSession {
    /// A game from the standard opening, Black first.
    #[must_use]
    pub fn new(config: &SessionConfig, black: Box<dyn Agent>, white: Box<dyn Agent>) -> Self {
        Self::from_position(config, GameBoard::new(), black, white)
    }

    /// A game continuing from `board`.
    #[must_use]
    pub fn from_position(
        config: &SessionConfig,
        board: GameBoard,
        black: Box<dyn Agent>,
        white: Box<dyn Agent>,
    ) -> Self {
        let names = ColorMap::from_pair(black.name().to_string(), white.name().to_string());
        Self {
            board,
            clock: GameClock::from_config(config),
            agents: ColorMap::from_pair(Some(black), Some(white)),
            names,
        }
    }

    /// Build both agents by strategy name.
    pub fn from_registry(
        config: &SessionConfig,
        registry: &AgentRegistry,
        black: &str,
        white: &str,
        params: &AgentParams,
    ) -> Result<Self, ConfigError> {
        let black = registry.build(black, Color::Black, params)?;
        let white = registry.build(white, Color::White, params)?;
        Ok(Self::new(config, black, white))
    }

    /// The authoritative board.
    #[must_use]
    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    /// The clock.
    #[must_use]
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Play one turn.
    ///
    /// Returns `Ok(false)` once the game is over, `Err` with the violation
    /// that ends it.
    pub fn play_turn(&mut self) -> Result<bool, Violation> {
        let Some(mover) = self.board.mover() else {
            return Ok(false);
        };
        let Some(agent) = self.agents[mover].take() else {
            return Err(Violation::new(
                mover,
                AgentError::Lost("agent was not returned by a previous turn".to_string()),
            ));
        };

        let outcome = run_turn(agent, self.board.snapshot(), mover, &mut self.clock);
        self.agents[mover] = outcome.agent;
        let mv = Move::new(mover, outcome.decision?);

        if let Err(rule) = self.board.apply(mv) {
            warn!(%mv, %rule, "move rejected");
            return Err(Violation::new(mover, rule));
        }
        debug!(
            %mv,
            elapsed = ?outcome.elapsed,
            black = self.board.board().count(Color::Black),
            white = self.board.board().count(Color::White),
            "move applied"
        );
        Ok(!self.board.is_finished())
    }

    /// Play to the end and report the result.
    #[instrument(skip_all, fields(black = %self.names[Color::Black], white = %self.names[Color::White]))]
    pub fn play(mut self) -> GameResult {
        info!(
            per_turn = ?self.clock.per_turn(),
            pool = ?self.clock.remaining(Color::Black),
            "game started"
        );

        let violation = loop {
            match self.play_turn() {
                Ok(true) => {}
                Ok(false) => break None,
                Err(violation) => {
                    warn!(%violation, "game forfeited");
                    break Some(violation);
                }
            }
        };

        let result = GameResult::new(
            self.board.snapshot(),
            self.clock.remaining_all().clone(),
            self.board.history().clone(),
            violation,
        );
        self.notify(&result);

        info!(
            winner = ?result.winner(),
            black = result.score(Color::Black),
            white = result.score(Color::White),
            moves = result.history().len(),
            "game over"
        );
        result
    }

    /// Tell every surviving agent the result; failures are only logged.
    fn notify(&mut self, result: &GameResult) {
        for (color, slot) in self.agents.iter_mut() {
            let Some(agent) = slot.as_mut() else {
                continue;
            };
            match panic::catch_unwind(AssertUnwindSafe(|| agent.game_over(result))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(%color, error = %err, "result notification failed"),
                Err(_) => warn!(%color, "result notification panicked"),
            }
        }
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("board", &self.board)
            .field("clock", &self.clock)
            .field("names", &self.names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{TurnBudget, UniformRandom};
    use crate::core::{Board, Coord};
    use crate::error::ViolationKind;
    use std::time::Duration;

    struct Fixed(Option<Coord>);

    impl Agent for Fixed {
        fn name(&self) -> &str {
            "Fixed"
        }

        fn decide(
            &mut self,
            _board: &Board,
            _color: Color,
            _budget: &TurnBudget,
        ) -> Result<Option<Coord>, AgentError> {
            Ok(self.0)
        }
    }

    fn config() -> SessionConfig {
        SessionConfig::default()
            .with_per_turn(Duration::from_millis(500))
            .with_game_pool(Duration::from_secs(30))
    }

    #[test]
    fn test_random_game_finishes() {
        let session = GameSession::new(
            &config(),
            Box::new(UniformRandom::new(1)),
            Box::new(UniformRandom::new(2)),
        );
        let result = session.play();

        assert!(result.violation().is_none());
        assert!(!crate::rules::is_ongoing(result.board()));
        assert_eq!(result.winner(), crate::rules::winner(result.board()));
        assert!(result.history().len() >= 9);
    }

    #[test]
    fn test_illegal_move_forfeits() {
        let session = GameSession::new(
            &config(),
            Box::new(Fixed(Some("a1".parse().unwrap()))),
            Box::new(UniformRandom::new(2)),
        );
        let result = session.play();

        let violation = result.violation().unwrap();
        assert_eq!(violation.offender, Color::Black);
        assert!(matches!(violation.kind, ViolationKind::Rule(_)));
        assert_eq!(result.winner(), Some(Color::White));
        assert!(result.history().is_empty());
        assert_eq!(result.board(), &Board::standard());
    }

    #[test]
    fn test_play_turn_steps() {
        let mut session = GameSession::new(
            &config(),
            Box::new(UniformRandom::new(3)),
            Box::new(UniformRandom::new(4)),
        );
        assert_eq!(session.board().mover(), Some(Color::Black));
        assert!(session.play_turn().unwrap());
        assert_eq!(session.board().mover(), Some(Color::White));
        assert_eq!(session.board().history().len(), 1);
        assert!(session.clock().remaining(Color::Black) < Duration::from_secs(30));
    }
}
