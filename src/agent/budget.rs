//! Per-turn time budgets and cooperative cancellation.
//!
//! The turn executor hands every decision a [`TurnBudget`]. Strategies
//! derive a [`Deadline`] from it (optionally minus a safety margin) and poll
//! it; the executor flips the shared [`CancelToken`] when it gives up on a
//! decision, so a poll after that point reports the deadline as passed
//! even if wall-clock time alone would not.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag set once a decision has been abandoned.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, unset token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Advisory: the decision must poll to notice.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Check if cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The two budgets a decision is judged against, plus its start time.
#[derive(Clone, Debug)]
pub struct TurnBudget {
    per_turn: Duration,
    remaining: Duration,
    started: Instant,
    cancel: CancelToken,
}

impl TurnBudget {
    /// A budget starting now with a fresh cancel token.
    #[must_use]
    pub fn new(per_turn: Duration, remaining: Duration) -> Self {
        Self {
            per_turn,
            remaining,
            started: Instant::now(),
            cancel: CancelToken::new(),
        }
    }

    /// Share an existing cancel token.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Restart the clock at `started`.
    #[must_use]
    pub fn started_at(mut self, started: Instant) -> Self {
        self.started = started;
        self
    }

    /// Per-turn cap.
    #[must_use]
    pub fn per_turn(&self) -> Duration {
        self.per_turn
    }

    /// Remaining game pool for the mover.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// When the decision started.
    #[must_use]
    pub fn started(&self) -> Instant {
        self.started
    }

    /// The hard limit for this turn: `min(per_turn, remaining)`.
    #[must_use]
    pub fn limit(&self) -> Duration {
        self.per_turn.min(self.remaining)
    }

    /// The cancel token shared with the executor.
    #[must_use]
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Check if the executor abandoned this decision.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A deadline `margin` before the hard limit.
    #[must_use]
    pub fn deadline(&self, margin: Duration) -> Deadline {
        self.deadline_after(self.limit().saturating_sub(margin))
    }

    /// A deadline `allotted` after the start, capped by the hard limit.
    #[must_use]
    pub fn deadline_after(&self, allotted: Duration) -> Deadline {
        Deadline {
            at: self.started + allotted.min(self.limit()),
            cancel: self.cancel.clone(),
        }
    }
}

/// An instant after which a computation must stop and fall back.
#[derive(Clone, Debug)]
pub struct Deadline {
    at: Instant,
    cancel: CancelToken,
}

impl Deadline {
    /// A deadline `after` from now with its own token.
    #[must_use]
    pub fn after(after: Duration) -> Self {
        Self {
            at: Instant::now() + after,
            cancel: CancelToken::new(),
        }
    }

    /// A deadline that never passes unless cancelled.
    #[must_use]
    pub fn never() -> Self {
        Self::after(Duration::from_secs(60 * 60 * 24 * 365))
    }

    /// The instant itself.
    #[must_use]
    pub fn at(&self) -> Instant {
        self.at
    }

    /// Check if the deadline passed or the decision was cancelled.
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.cancel.is_cancelled() || Instant::now() >= self.at
    }
}
