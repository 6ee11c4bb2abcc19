//! Runs one agent decision on its own thread under the turn's hard limit.
//!
//! The agent is moved onto a fresh worker thread together with a snapshot
//! of the board and handed back through a channel when it answers. If no
//! answer arrives within `min(per_turn, remaining)` the executor cancels
//! the decision's token and returns without it; the worker is detached and
//! the turn is lost whether or not the agent ever stops.
//!
//! ## Verdicts
//!
//! Checked in this order, including after an answer that arrived in time,
//! since it can complete an instant past a budget:
//! 1. elapsed reached the remaining pool: [`TimeUp::GamePool`]
//! 2. elapsed exceeded the per-turn cap: [`TimeUp::PerTurn`]
//! 3. the agent failed or panicked: an agent fault
//!
//! The pool is charged the elapsed time capped at the hard limit.

use std::any::Any;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::GameClock;
use crate::agent::Agent;
use crate::core::{Board, Color, Coord};
use crate::error::{AgentError, TimeUp, Violation};

/// What came out of one turn.
pub struct TurnOutcome {
    pub color: Color,

    /// The agent's move, or the violation that forfeits the game.
    pub decision: Result<Option<Coord>, Violation>,

    /// Wall-clock time until the answer or the timeout.
    pub elapsed: Duration,

    /// Amount taken from the mover's pool.
    pub charged: Duration,

    /// The agent, returned when its thread handed it back.
    pub agent: Option<Box<dyn Agent>>,
}

impl std::fmt::Debug for TurnOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnOutcome")
            .field("color", &self.color)
            .field("decision", &self.decision)
            .field("elapsed", &self.elapsed)
            .field("charged", &self.charged)
            .field("agent", &self.agent.as_ref().map(|a| a.name().to_string()))
            .finish()
    }
}

type Answer = (Box<dyn Agent>, Result<Option<Coord>, AgentError>);

/// Ask `agent` for `color`'s move on `board`, charging `clock`.
#[instrument(level = "debug", skip_all, fields(color = %color, agent = %agent.name()))]
pub fn run_turn(
    agent: Box<dyn Agent>,
    board: Board,
    color: Color,
    clock: &mut GameClock,
) -> TurnOutcome {
    let budget = clock.budget(color);
    let limit = budget.limit();
    let per_turn = budget.per_turn();
    let remaining = budget.remaining();
    let cancel = budget.cancel_token().clone();
    let started = budget.started();

    let (tx, rx) = mpsc::channel::<Answer>();
    let spawned = thread::Builder::new()
        .name(format!("agent-{color}"))
        .spawn(move || {
            let mut agent = agent;
            let result = agent.decide(&board, color, &budget);
            // Receiver is gone after a timeout; the agent is dropped here.
            let _ = tx.send((agent, result));
        });
    let handle = match spawned {
        Ok(handle) => handle,
        Err(err) => {
            warn!(%color, error = %err, "could not start agent thread");
            return TurnOutcome {
                color,
                decision: Err(Violation::new(color, AgentError::Lost(err.to_string()))),
                elapsed: Duration::ZERO,
                charged: Duration::ZERO,
                agent: None,
            };
        }
    };

    // `None` when the limit passed first. A panic or a vanished thread
    // still answers, with a fault and no agent to hand back.
    let (reply, elapsed) = match rx.recv_timeout(limit) {
        Ok((agent, result)) => {
            let elapsed = started.elapsed();
            let _ = handle.join();
            (Some((Some(agent), result)), elapsed)
        }
        Err(RecvTimeoutError::Timeout) => {
            cancel.cancel();
            (None, started.elapsed())
        }
        Err(RecvTimeoutError::Disconnected) => {
            let elapsed = started.elapsed();
            let cause = match handle.join() {
                Err(payload) => AgentError::Panicked(panic_message(payload.as_ref())),
                Ok(()) => AgentError::Lost("agent thread ended without answering".to_string()),
            };
            (Some((None, Err(cause))), elapsed)
        }
    };

    let charged = clock.charge(color, elapsed);
    let time_up = if elapsed >= remaining {
        Some(TimeUp::GamePool { remaining, elapsed })
    } else if elapsed > per_turn || reply.is_none() {
        Some(TimeUp::PerTurn {
            limit: per_turn,
            elapsed,
        })
    } else {
        None
    };

    let (agent, result) = match reply {
        Some((agent, result)) => (agent, Some(result)),
        None => (None, None),
    };

    let decision = match (time_up, result) {
        (Some(time_up), _) => {
            warn!(%color, ?elapsed, %time_up, "turn over budget");
            Err(Violation::new(color, time_up))
        }
        (None, Some(Ok(choice))) => {
            debug!(%color, ?elapsed, choice = ?choice, "agent answered");
            Ok(choice)
        }
        (None, Some(Err(cause))) => {
            warn!(%color, ?elapsed, %cause, "agent fault");
            Err(Violation::new(color, cause))
        }
        (None, None) => Err(Violation::new(
            color,
            AgentError::Lost("no answer".to_string()),
        )),
    };

    TurnOutcome {
        color,
        decision,
        elapsed,
        charged,
        agent,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{TurnBudget, UniformRandom};
    use crate::error::ViolationKind;

    struct Sleeper(Duration);

    impl Agent for Sleeper {
        fn name(&self) -> &str {
            "Sleeper"
        }

        fn decide(
            &mut self,
            _board: &Board,
            _color: Color,
            _budget: &TurnBudget,
        ) -> Result<Option<Coord>, AgentError> {
            thread::sleep(self.0);
            Ok(None)
        }
    }

    #[test]
    fn test_fast_agent_is_charged_and_returned() {
        let mut clock = GameClock::new(Duration::from_secs(1), Duration::from_secs(10));
        let outcome = run_turn(
            Box::new(UniformRandom::new(1)),
            Board::standard(),
            Color::Black,
            &mut clock,
        );

        assert!(outcome.decision.unwrap().is_some());
        assert!(outcome.agent.is_some());
        assert_eq!(outcome.charged, outcome.elapsed);
        assert_eq!(clock.remaining(Color::Black), Duration::from_secs(10) - outcome.charged);
        assert_eq!(clock.remaining(Color::White), Duration::from_secs(10));
    }

    #[test]
    fn test_slow_agent_times_out_per_turn() {
        let mut clock = GameClock::new(Duration::from_millis(30), Duration::from_secs(10));
        let outcome = run_turn(
            Box::new(Sleeper(Duration::from_millis(400))),
            Board::standard(),
            Color::White,
            &mut clock,
        );

        let violation = outcome.decision.unwrap_err();
        assert_eq!(violation.offender, Color::White);
        assert!(matches!(violation.kind, ViolationKind::TimeUp(TimeUp::PerTurn { .. })));
        assert!(outcome.agent.is_none());
        assert!(outcome.elapsed < Duration::from_millis(300));
        assert_eq!(outcome.charged, Duration::from_millis(30));
    }

    #[test]
    fn test_small_pool_times_out_game_pool() {
        let mut clock = GameClock::new(Duration::from_secs(5), Duration::from_millis(30));
        let outcome = run_turn(
            Box::new(Sleeper(Duration::from_millis(400))),
            Board::standard(),
            Color::Black,
            &mut clock,
        );

        let violation = outcome.decision.unwrap_err();
        assert!(matches!(violation.kind, ViolationKind::TimeUp(TimeUp::GamePool { .. })));
        assert!(clock.is_exhausted(Color::Black));
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
