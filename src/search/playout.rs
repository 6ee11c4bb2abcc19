//! Randomized-playout search with per-turn time allocation.
//!
//! Every legal candidate is applied once, then the remaining game is played
//! out at random from each successor in round-robin order until the turn's
//! allotted time is spent. Wins and losses are tallied per candidate (draws
//! count for neither); the most wins is chosen, then the fewest losses,
//! then a uniform pick.
//!
//! ## Allocation
//!
//! The remaining pool is split evenly over the mover's remaining turns and
//! scaled by a parabola over game progress, peaking at midgame. The result
//! is capped by the turn limit minus the safety margin. The first
//! `opening_skip` plies are answered without search.

use std::cmp::Reverse;
use std::time::{Duration, Instant};

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::config::PlayoutConfig;
use super::stats::SearchStats;
use crate::agent::{uniform_choice, Agent, AgentParams, TurnBudget};
use crate::core::{Board, Color, Coord, GameRng, CELLS};
use crate::error::{AgentError, ConfigError};
use crate::sim::{bits, random_playout, SimBoard};

/// Empty cells on the standard starting position.
const OPENING_EMPTIES: u32 = CELLS as u32 - 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Tally {
    wins: u32,
    losses: u32,
}

/// Thinking time for a turn with `empties` empty cells and `remaining`
/// left in the pool, before capping by the turn limit.
///
/// A weight too large to represent allots the whole pool.
#[must_use]
pub fn allotted_time(config: &PlayoutConfig, empties: u32, remaining: Duration) -> Duration {
    let turns_left = empties.div_ceil(2).max(1);
    let base = remaining / turns_left;
    let progress = f64::from(OPENING_EMPTIES.saturating_sub(empties)) / f64::from(OPENING_EMPTIES);
    let weight = config.floor_weight
        + (config.peak_weight - config.floor_weight) * 4.0 * progress * (1.0 - progress);
    Duration::try_from_secs_f64(base.as_secs_f64() * weight.max(0.0)).unwrap_or(remaining)
}

/// Monte Carlo playout agent.
#[derive(Debug)]
pub struct StochasticPlayoutSearch {
    config: PlayoutConfig,
    rng: GameRng,
    /// Separate stream so move choice does not depend on playout count.
    playout_rng: GameRng,
    stats: SearchStats,
}

impl StochasticPlayoutSearch {
    /// Registry name.
    pub const NAME: &'static str = PlayoutConfig::NAME;

    /// Create from a config.
    #[must_use]
    pub fn new(config: PlayoutConfig) -> Self {
        let mut rng = GameRng::seeded_or_random(config.seed);
        Self {
            playout_rng: rng.fork(),
            rng,
            config,
            stats: SearchStats::new(),
        }
    }

    /// Build from execution parameters.
    pub fn from_params(_color: Color, params: &AgentParams) -> Result<Self, ConfigError> {
        Ok(Self::new(PlayoutConfig::from_params(params)?))
    }

    /// Statistics of the last decision.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn search(&mut self, board: &SimBoard, color: Color, budget: &TurnBudget) -> Option<Coord> {
        let candidates: SmallVec<[(u32, SimBoard); 32]> = bits(board.legal_moves(color))
            .map(|cell| (cell, board.after(color, cell)))
            .collect();
        if candidates.len() == 1 {
            return Coord::from_index(candidates[0].0 as usize);
        }

        let allotted = allotted_time(&self.config, board.empty_count(), budget.remaining())
            .min(budget.limit().saturating_sub(self.config.margin));
        let deadline = budget.deadline_after(allotted);

        let mut tallies = vec![Tally::default(); candidates.len()];
        'rounds: loop {
            for (i, (_, successor)) in candidates.iter().enumerate() {
                if deadline.passed() {
                    break 'rounds;
                }
                match random_playout(*successor, color.opposite(), &mut self.playout_rng) {
                    Some(w) if w == color => tallies[i].wins += 1,
                    Some(_) => tallies[i].losses += 1,
                    None => {}
                }
                self.stats.playouts += 1;
            }
        }

        let best = tallies.iter().map(|t| (t.wins, Reverse(t.losses))).max()?;
        let tied: SmallVec<[u32; 32]> = candidates
            .iter()
            .zip(&tallies)
            .filter(|(_, t)| (t.wins, Reverse(t.losses)) == best)
            .map(|((cell, _), _)| *cell)
            .collect();
        self.rng
            .choose(&tied)
            .and_then(|&cell| Coord::from_index(cell as usize))
    }
}

impl Default for StochasticPlayoutSearch {
    fn default() -> Self {
        Self::new(PlayoutConfig::default())
    }
}

impl Agent for StochasticPlayoutSearch {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn decide(
        &mut self,
        board: &Board,
        color: Color,
        budget: &TurnBudget,
    ) -> Result<Option<Coord>, AgentError> {
        let start = Instant::now();
        self.stats.reset();

        let sim = SimBoard::from_board(board);
        if !sim.can_move(color) {
            return Ok(None);
        }

        let plies = OPENING_EMPTIES.saturating_sub(sim.empty_count());
        let choice = if plies < self.config.opening_skip {
            self.stats.skipped = true;
            uniform_choice(&sim, color, &mut self.rng)
        } else {
            match self.search(&sim, color, budget) {
                Some(at) => Some(at),
                None => uniform_choice(&sim, color, &mut self.rng),
            }
        };

        self.stats.time_us = start.elapsed().as_micros() as u64;
        if self.config.debug {
            debug!(
                agent = Self::NAME, %color, plies, playouts = self.stats.playouts,
                skipped = self.stats.skipped, time_us = self.stats.time_us,
                "playout search decided"
            );
        } else {
            trace!(agent = Self::NAME, %color, playouts = self.stats.playouts, "playout search decided");
        }
        Ok(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules;

    #[test]
    fn test_allocation_peaks_midgame() {
        let config = PlayoutConfig::default();
        let pool = Duration::from_secs(30);

        // Same per-turn base everywhere, so only the weight differs.
        let opening = allotted_time(&config, 60, pool * 2);
        let midgame = allotted_time(&config, 30, pool);
        assert!(midgame > opening);

        let base = pool / 15;
        assert_eq!(midgame, base.mul_f64(config.peak_weight));
        assert_eq!(opening, (pool * 2 / 30).mul_f64(config.floor_weight));
    }

    #[test]
    fn test_allocation_with_one_empty() {
        let config = PlayoutConfig::default();
        let remaining = Duration::from_secs(1);
        let allotted = allotted_time(&config, 1, remaining);
        assert!(allotted <= remaining);
    }

    #[test]
    fn test_allocation_survives_huge_weights() {
        let remaining = Duration::from_secs(10);
        for peak in [1e300, f64::INFINITY] {
            let config = PlayoutConfig::default().with_weights(0.5, peak);
            assert_eq!(allotted_time(&config, 30, remaining), remaining);
        }

        let config = PlayoutConfig::default().with_weights(f64::NAN, f64::NAN);
        assert_eq!(allotted_time(&config, 30, remaining), Duration::ZERO);
    }

    #[test]
    fn test_opening_is_skipped() {
        let mut agent = StochasticPlayoutSearch::new(PlayoutConfig::default().with_seed(1));
        let budget = TurnBudget::new(Duration::from_secs(1), Duration::from_secs(60));
        let board = Board::standard();

        let at = agent.decide(&board, Color::Black, &budget).unwrap().unwrap();
        assert!(rules::can_place(&board, Color::Black, at));
        assert!(agent.stats().skipped);
        assert_eq!(agent.stats().playouts, 0);
    }

    #[test]
    fn test_search_runs_playouts() {
        let mut agent = StochasticPlayoutSearch::new(
            PlayoutConfig::default().with_seed(2).with_opening_skip(0),
        );
        let budget = TurnBudget::new(Duration::from_millis(80), Duration::from_secs(10));
        let board = Board::standard();

        let at = agent.decide(&board, Color::Black, &budget).unwrap().unwrap();
        assert!(rules::can_place(&board, Color::Black, at));
        assert!(agent.stats().playouts > 0);
        assert!(budget.started().elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_single_move_answers_immediately() {
        // Black's only move is f8.
        let board: Board = format!("{}{}{}", "B".repeat(60), "W", "...").parse().unwrap();
        assert_eq!(rules::legal_placements(&board, Color::Black).len(), 1);

        let mut agent = StochasticPlayoutSearch::new(
            PlayoutConfig::default().with_seed(3).with_opening_skip(0),
        );
        let budget = TurnBudget::new(Duration::from_secs(5), Duration::from_secs(60));
        let at = agent.decide(&board, Color::Black, &budget).unwrap();
        assert_eq!(at, Some("f8".parse().unwrap()));
        assert_eq!(agent.stats().playouts, 0);
    }
}
