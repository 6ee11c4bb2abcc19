//! Exhaustive forced-outcome search.
//!
//! Classifies every first-level candidate as a forced win, draw or loss for
//! the searching color by full minimax over the ternary outcome, with no
//! static evaluation. Flip counts never matter, only who ends up ahead.
//!
//! ## Skipping futile searches
//!
//! The deepest position resolved last turn (the *high-water mark*) predicts
//! whether a search can finish now. When it falls more than one ply short of
//! the current empty-cell count the search is skipped in favor of a uniform
//! move, except every `force_every` skipped turns, when it runs anyway to
//! refresh the mark.
//!
//! ## Cancellation
//!
//! The deadline is polled on every recursive entry. Once it passes the
//! search unwinds through `?` and the turn falls back to a uniform move.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::config::ProofSearchConfig;
use super::stats::SearchStats;
use crate::agent::{uniform_choice, Agent, AgentParams, Deadline, TurnBudget};
use crate::core::{Board, Color, Coord, GameRng};
use crate::error::{AgentError, ConfigError};
use crate::sim::{bits, SimBoard};

/// Forced outcome for the searching color, ordered worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Loss,
    Draw,
    Win,
}

impl Verdict {
    /// Verdict of a finished game for `searcher`.
    #[must_use]
    pub fn of(winner: Option<Color>, searcher: Color) -> Self {
        match winner {
            Some(c) if c == searcher => Verdict::Win,
            Some(_) => Verdict::Loss,
            None => Verdict::Draw,
        }
    }
}

/// The deadline passed mid-search.
#[derive(Debug)]
struct Cancelled;

struct ProofContext<'a> {
    deadline: &'a Deadline,
    searcher: Color,
    nodes: u64,
    /// Most empty cells of any position fully resolved so far.
    resolved: u32,
}

fn prove(board: &SimBoard, to_move: Color, ctx: &mut ProofContext<'_>) -> Result<Verdict, Cancelled> {
    ctx.nodes += 1;
    if ctx.deadline.passed() {
        return Err(Cancelled);
    }

    let moves = board.legal_moves(to_move);
    let verdict = if moves == 0 {
        if board.can_move(to_move.opposite()) {
            // Pass: same remaining cells, other mover.
            prove(board, to_move.opposite(), ctx)?
        } else {
            Verdict::of(board.winner(), ctx.searcher)
        }
    } else if to_move == ctx.searcher {
        let mut best = Verdict::Loss;
        for cell in bits(moves) {
            best = best.max(prove(&board.after(to_move, cell), to_move.opposite(), ctx)?);
            if best == Verdict::Win {
                break;
            }
        }
        best
    } else {
        let mut worst = Verdict::Win;
        for cell in bits(moves) {
            worst = worst.min(prove(&board.after(to_move, cell), to_move.opposite(), ctx)?);
            if worst == Verdict::Loss {
                break;
            }
        }
        worst
    };

    ctx.resolved = ctx.resolved.max(board.empty_count());
    Ok(verdict)
}

/// Forced outcome of `board` with `to_move` to play, seen by `searcher`.
///
/// Runs to completion; meant for small endgames and tests.
#[must_use]
pub fn solve(board: &SimBoard, to_move: Color, searcher: Color) -> Verdict {
    let deadline = Deadline::never();
    let mut ctx = ProofContext {
        deadline: &deadline,
        searcher,
        nodes: 0,
        resolved: 0,
    };
    // A never-passing deadline cannot cancel, but stay total anyway.
    prove(board, to_move, &mut ctx).unwrap_or(Verdict::Draw)
}

/// Plays a forced win when one exists, else a forced draw, else a uniform
/// legal move.
#[derive(Debug)]
pub struct ExhaustiveProofSearch {
    config: ProofSearchConfig,
    rng: GameRng,
    high_water: u32,
    skipped_turns: u32,
    last_verdict: Option<Verdict>,
    stats: SearchStats,
}

impl ExhaustiveProofSearch {
    /// Registry name.
    pub const NAME: &'static str = ProofSearchConfig::NAME;

    /// Create from a config.
    #[must_use]
    pub fn new(config: ProofSearchConfig) -> Self {
        Self {
            rng: GameRng::seeded_or_random(config.seed),
            config,
            high_water: 0,
            skipped_turns: 0,
            last_verdict: None,
            stats: SearchStats::new(),
        }
    }

    /// Build from execution parameters.
    pub fn from_params(_color: Color, params: &AgentParams) -> Result<Self, ConfigError> {
        Ok(Self::new(ProofSearchConfig::from_params(params)?))
    }

    /// Deepest empty-cell count resolved by the last search that ran.
    #[must_use]
    pub fn high_water(&self) -> u32 {
        self.high_water
    }

    /// Best forced outcome found last turn, `None` if it was skipped,
    /// cut short or the turn was a pass.
    #[must_use]
    pub fn last_verdict(&self) -> Option<Verdict> {
        self.last_verdict
    }

    /// Statistics of the last decision.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Whether the search should be skipped at `empties`, advancing the
    /// force counter.
    fn should_skip(&mut self, empties: u32) -> bool {
        if self.high_water + 1 >= empties {
            self.skipped_turns = 0;
            return false;
        }
        self.skipped_turns += 1;
        if self.config.force_every > 0 && self.skipped_turns >= self.config.force_every {
            self.skipped_turns = 0;
            return false;
        }
        true
    }

    fn search(&mut self, board: &SimBoard, color: Color, deadline: &Deadline) -> Option<u32> {
        let mut candidates: SmallVec<[u32; 32]> = bits(board.legal_moves(color)).collect();
        self.rng.shuffle(&mut candidates);

        let mut ctx = ProofContext {
            deadline,
            searcher: color,
            nodes: 0,
            resolved: 0,
        };
        let mut best: Option<(Verdict, u32)> = None;
        let mut completed = true;

        for &cell in &candidates {
            match prove(&board.after(color, cell), color.opposite(), &mut ctx) {
                Ok(verdict) => {
                    if best.map_or(true, |(b, _)| verdict > b) {
                        best = Some((verdict, cell));
                    }
                    if verdict == Verdict::Win {
                        break;
                    }
                }
                Err(Cancelled) => {
                    completed = false;
                    break;
                }
            }
        }

        self.stats.proof_nodes = ctx.nodes;
        self.high_water = if completed { board.empty_count() } else { ctx.resolved };

        if !completed {
            self.stats.timed_out = true;
            return None;
        }
        self.last_verdict = best.map(|(v, _)| v);
        match best {
            Some((Verdict::Win | Verdict::Draw, cell)) => Some(cell),
            _ => None,
        }
    }
}

impl Default for ExhaustiveProofSearch {
    fn default() -> Self {
        Self::new(ProofSearchConfig::default())
    }
}

impl Agent for ExhaustiveProofSearch {
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
        self.last_verdict = None;

        let sim = SimBoard::from_board(board);
        if !sim.can_move(color) {
            return Ok(None);
        }

        let empties = sim.empty_count();
        let proven = if self.should_skip(empties) {
            self.stats.skipped = true;
            None
        } else {
            let deadline = budget.deadline(self.config.margin);
            self.search(&sim, color, &deadline)
        };

        let choice = match proven {
            Some(cell) => Coord::from_index(cell as usize),
            None => uniform_choice(&sim, color, &mut self.rng),
        };

        self.stats.time_us = start.elapsed().as_micros() as u64;
        if self.config.debug {
            debug!(
                agent = Self::NAME, %color, empties, high_water = self.high_water,
                verdict = ?self.last_verdict, skipped = self.stats.skipped,
                timed_out = self.stats.timed_out, nodes = self.stats.proof_nodes,
                "proof search decided"
            );
        } else {
            trace!(
                agent = Self::NAME, %color, empties, verdict = ?self.last_verdict,
                nodes = self.stats.proof_nodes, "proof search decided"
            );
        }
        Ok(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules;
    use std::time::Duration;

    /// Black to move with three empties in the corner region.
    fn small_endgame() -> Board {
        let mut cells = String::new();
        cells.push_str("...WBBBB");
        cells.push_str(&"B".repeat(24));
        cells.push_str(&"W".repeat(32));
        cells.parse().unwrap()
    }

    #[test]
    fn test_verdict_ordering() {
        assert!(Verdict::Loss < Verdict::Draw);
        assert!(Verdict::Draw < Verdict::Win);
        assert_eq!(Verdict::of(Some(Color::White), Color::White), Verdict::Win);
        assert_eq!(Verdict::of(None, Color::White), Verdict::Draw);
    }

    #[test]
    fn test_solve_terminal_positions() {
        let full: Board = format!("{}{}", "B".repeat(37), "W".repeat(27)).parse().unwrap();
        let sim = SimBoard::from_board(&full);
        assert_eq!(solve(&sim, Color::Black, Color::Black), Verdict::Win);
        assert_eq!(solve(&sim, Color::White, Color::White), Verdict::Loss);

        let tie: Board = format!("{}{}", "B".repeat(32), "W".repeat(32)).parse().unwrap();
        assert_eq!(solve(&SimBoard::from_board(&tie), Color::Black, Color::White), Verdict::Draw);
    }

    #[test]
    fn test_forced_search_plays_legal_move() {
        let board = small_endgame();
        assert!(rules::can_move(&board, Color::Black));

        let mut agent = ExhaustiveProofSearch::new(
            ProofSearchConfig::default().with_seed(1).with_force_every(1),
        );
        let budget = TurnBudget::new(Duration::from_secs(5), Duration::from_secs(5));
        let at = agent.decide(&board, Color::Black, &budget).unwrap().unwrap();

        assert!(rules::can_place(&board, Color::Black, at));
        assert!(!agent.stats().skipped);
        assert_eq!(agent.high_water(), board.empty_count());
        assert!(agent.last_verdict().is_some());
    }

    #[test]
    fn test_skips_when_high_water_is_short() {
        let mut agent = ExhaustiveProofSearch::new(
            ProofSearchConfig::default().with_seed(1).with_force_every(3),
        );
        let budget = TurnBudget::new(Duration::from_millis(50), Duration::from_secs(5));
        let board = Board::standard();

        agent.decide(&board, Color::Black, &budget).unwrap();
        assert!(agent.stats().skipped);
        agent.decide(&board, Color::Black, &budget).unwrap();
        assert!(agent.stats().skipped);

        // Third skip comes due: the search runs and times out on 60 empties.
        let at = agent.decide(&board, Color::Black, &budget).unwrap().unwrap();
        assert!(!agent.stats().skipped);
        assert!(agent.stats().timed_out);
        assert!(rules::can_place(&board, Color::Black, at));
        assert!(agent.high_water() < 60);
    }

    #[test]
    fn test_cancel_token_stops_search() {
        let mut agent = ExhaustiveProofSearch::new(
            ProofSearchConfig::default().with_seed(2).with_force_every(1),
        );
        let budget = TurnBudget::new(Duration::from_secs(60), Duration::from_secs(60));
        budget.cancel_token().cancel();

        let started = Instant::now();
        let at = agent.decide(&Board::standard(), Color::Black, &budget).unwrap();
        assert!(at.is_some());
        assert!(agent.stats().timed_out);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_pass_when_no_moves() {
        let board: Board = "B".repeat(64).parse().unwrap();
        let mut agent = ExhaustiveProofSearch::default();
        let budget = TurnBudget::new(Duration::from_secs(1), Duration::from_secs(1));
        assert_eq!(agent.decide(&board, Color::White, &budget).unwrap(), None);
    }
}
