//! Best-first minimax tree search with tree reuse across turns.
//!
//! Each decision first looks for the real position in last turn's tree.
//! When found, the tree is re-rooted there and everything already expanded
//! below it is kept; otherwise a fresh single-node tree is started. The
//! root is always expanded once, then frontier nodes are expanded oldest
//! first until the deadline or the node cap.
//!
//! Scores are from the searching color's perspective. An expanded node
//! holds the max over its children when the searcher moves there and the
//! min otherwise, so a node's score depends only on which nodes are
//! expanded. Re-rooting therefore never changes results, only cost.

use std::time::Instant;

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::config::TreeSearchConfig;
use super::eval::Evaluator;
use super::stats::SearchStats;
use super::tree::{Child, NodeId, SearchTree, TreeNode};
use crate::agent::{uniform_choice, Agent, AgentParams, TurnBudget};
use crate::core::{Board, Color, Coord, GameRng};
use crate::error::{AgentError, ConfigError};
use crate::session::GameResult;
use crate::sim::{bits, SimBoard};

/// Incremental tree search agent.
pub struct IncrementalTreeSearch {
    config: TreeSearchConfig,
    evaluator: Box<dyn Evaluator>,
    rng: GameRng,
    tree: Option<SearchTree>,
    searcher: Color,
    stats: SearchStats,
}

impl IncrementalTreeSearch {
    /// Registry name.
    pub const NAME: &'static str = TreeSearchConfig::NAME;

    /// Create from a config, using the evaluator it names.
    #[must_use]
    pub fn new(color: Color, config: TreeSearchConfig) -> Self {
        let evaluator = config.evaluator.build();
        Self {
            rng: GameRng::seeded_or_random(config.seed),
            config,
            evaluator,
            tree: None,
            searcher: color,
            stats: SearchStats::new(),
        }
    }

    /// Build from execution parameters.
    pub fn from_params(color: Color, params: &AgentParams) -> Result<Self, ConfigError> {
        Ok(Self::new(color, TreeSearchConfig::from_params(params)?))
    }

    /// Replace the evaluator.
    #[must_use]
    pub fn with_evaluator<E: Evaluator + 'static>(mut self, evaluator: E) -> Self {
        self.evaluator = Box::new(evaluator);
        self.tree = None;
        self
    }

    /// The current tree, if any.
    #[must_use]
    pub fn tree(&self) -> Option<&SearchTree> {
        self.tree.as_ref()
    }

    /// Statistics of the last decision.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Root the tree at `board` with `color` to move and expand the root if
    /// needed. Returns whether an existing node was reused.
    pub fn prepare(&mut self, board: &Board, color: Color) -> bool {
        let sim = SimBoard::from_board(board);
        if color != self.searcher {
            self.searcher = color;
            self.tree = None;
        }

        let reused = match self.tree.as_mut() {
            Some(tree) => match tree.find(&sim, color) {
                Some(id) => {
                    let kept = tree.reroot(id);
                    self.stats.nodes_reused = kept as u32;
                    true
                }
                None => false,
            },
            None => false,
        };
        if !reused {
            let score = self.evaluator.evaluate(&sim, self.searcher);
            self.tree = Some(SearchTree::new(sim, color, score));
        }

        let unexpanded_root = self
            .tree
            .as_ref()
            .filter(|t| !t.root_node().expanded)
            .map(SearchTree::root);
        if let Some(root) = unexpanded_root {
            self.expand(root);
        }
        reused
    }

    /// Expand the oldest unexpanded frontier node.
    ///
    /// Returns false when the frontier is empty or the node cap is reached.
    pub fn expand_next(&mut self) -> bool {
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        if tree.len() >= self.config.max_nodes {
            return false;
        }
        let next = loop {
            match tree.pop_frontier() {
                Some(id) if tree.get(id).expanded => continue,
                Some(id) => break id,
                None => return false,
            }
        };
        self.expand(next);
        true
    }

    /// Generate children of `id`, score them and propagate upward.
    fn expand(&mut self, id: NodeId) {
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        let node = tree.get(id);
        if node.expanded {
            return;
        }
        let (board, to_move, depth) = (node.board, node.to_move, node.depth);
        let next = to_move.opposite();

        let mut successors: SmallVec<[(Option<Coord>, SimBoard); 16]> = SmallVec::new();
        let moves = board.legal_moves(to_move);
        if moves != 0 {
            for cell in bits(moves) {
                successors.push((Coord::from_index(cell as usize), board.after(to_move, cell)));
            }
        } else if board.can_move(next) {
            successors.push((None, board));
        }

        for (mv, child_board) in successors {
            let score = self.evaluator.evaluate(&child_board, self.searcher);
            let child = tree.alloc(TreeNode::new(child_board, next, id, score, depth + 1));
            tree.get_mut(id).children.push(Child { mv, node: child });
            if !child_board.is_terminal() {
                tree.enqueue(child);
            }
        }
        tree.get_mut(id).expanded = true;
        self.stats.nodes_expanded += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth + 1);

        propagate(tree, id, self.searcher);
    }

    /// Best root move, ties broken uniformly.
    fn best_move(&mut self) -> Option<Coord> {
        let tree = self.tree.as_ref()?;
        let root = tree.root_node();
        let best = root.children.iter().map(|c| tree.get(c.node).score).max()?;
        let tied: SmallVec<[Option<Coord>; 8]> = root
            .children
            .iter()
            .filter(|c| tree.get(c.node).score == best)
            .map(|c| c.mv)
            .collect();
        self.rng.choose(&tied).copied().flatten()
    }
}

/// Recompute minimax scores from `id` upward, stopping at the first node
/// whose score does not change.
fn propagate(tree: &mut SearchTree, mut id: NodeId, searcher: Color) {
    while !id.is_none() {
        let node = tree.get(id);
        let scores = node.children.iter().map(|c| tree.get(c.node).score);
        let value = if node.to_move == searcher {
            scores.max()
        } else {
            scores.min()
        };
        let Some(value) = value else {
            return;
        };
        if value == node.score {
            return;
        }
        let parent = node.parent;
        tree.get_mut(id).score = value;
        id = parent;
    }
}

impl Default for IncrementalTreeSearch {
    fn default() -> Self {
        Self::new(Color::Black, TreeSearchConfig::default())
    }
}

impl std::fmt::Debug for IncrementalTreeSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncrementalTreeSearch")
            .field("config", &self.config)
            .field("searcher", &self.searcher)
            .field("nodes", &self.tree.as_ref().map_or(0, SearchTree::len))
            .finish()
    }
}

impl Agent for IncrementalTreeSearch {
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

        let deadline = budget.deadline(self.config.margin);
        let reused = self.prepare(board, color);
        while !deadline.passed() {
            if !self.expand_next() {
                break;
            }
        }
        self.stats.timed_out = deadline.passed();

        let choice = match self.best_move() {
            Some(at) => Some(at),
            None => uniform_choice(&sim, color, &mut self.rng),
        };

        self.stats.time_us = start.elapsed().as_micros() as u64;
        let nodes = self.tree.as_ref().map_or(0, SearchTree::len);
        let root_score = self.tree.as_ref().map(|t| t.root_node().score);
        if self.config.debug {
            debug!(
                agent = Self::NAME, %color, reused, nodes,
                reused_nodes = self.stats.nodes_reused,
                expanded = self.stats.nodes_expanded,
                root_score, "tree search decided"
            );
        } else {
            trace!(agent = Self::NAME, %color, reused, nodes, root_score, "tree search decided");
        }
        Ok(choice)
    }

    fn game_over(&mut self, _result: &GameResult) -> Result<(), AgentError> {
        self.tree = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules;
    use crate::search::eval::{EvaluatorKind, PieceCountEvaluator};
    use std::time::Duration;

    fn agent() -> IncrementalTreeSearch {
        IncrementalTreeSearch::new(Color::Black, TreeSearchConfig::default().with_seed(3))
    }

    #[test]
    fn test_root_expanded_unconditionally() {
        let mut agent = agent();
        assert!(!agent.prepare(&Board::standard(), Color::Black));

        let tree = agent.tree().unwrap();
        assert!(tree.root_node().expanded);
        assert_eq!(tree.root_node().children.len(), 4);
        assert_eq!(tree.frontier_len(), 4);
    }

    #[test]
    fn test_scores_follow_minimax() {
        let mut agent = agent().with_evaluator(PieceCountEvaluator);
        agent.prepare(&Board::standard(), Color::Black);
        for _ in 0..4 {
            assert!(agent.expand_next());
        }

        let tree = agent.tree().unwrap();
        for (_, node) in tree.iter().filter(|(_, n)| !n.children.is_empty()) {
            let scores = node.children.iter().map(|c| tree.get(c.node).score);
            let expected = if node.to_move == Color::Black {
                scores.max()
            } else {
                scores.min()
            };
            assert_eq!(Some(node.score), expected);
        }
    }

    #[test]
    fn test_reroot_after_two_plies() {
        let mut agent = agent();
        let mut board = rules::GameBoard::new();
        agent.prepare(board.board(), Color::Black);
        for _ in 0..20 {
            agent.expand_next();
        }

        let d3 = "d3".parse().unwrap();
        board.apply(crate::core::Move::place(Color::Black, d3)).unwrap();
        let reply = rules::legal_placements(board.board(), Color::White)[0];
        board.apply(crate::core::Move::place(Color::White, reply)).unwrap();

        assert!(agent.prepare(board.board(), Color::Black));
        let tree = agent.tree().unwrap();
        assert_eq!(tree.root_node().board, SimBoard::from_board(board.board()));
        assert!(tree.iter().all(|(id, _)| tree.is_alive(id)));
    }

    #[test]
    fn test_opponent_pass_gets_single_pass_child() {
        // Either black capture leaves White with a disc but no placement.
        let start: Board = format!("BW......{}BW......", ".".repeat(48)).parse().unwrap();
        let mut agent = agent();
        agent.prepare(&start, Color::Black);
        assert_eq!(agent.tree().unwrap().root_node().children.len(), 2);
        assert!(agent.expand_next());
        assert!(agent.expand_next());

        let tree = agent.tree().unwrap();
        for reply in &tree.root_node().children {
            let node = tree.get(reply.node);
            assert_eq!(node.to_move, Color::White);
            assert_eq!(node.children.len(), 1);
            let pass = node.children[0];
            assert_eq!(pass.mv, None);
            assert_eq!(tree.get(pass.node).to_move, Color::Black);
            assert_eq!(tree.get(pass.node).board, node.board);
        }

        let mut game = rules::GameBoard::from_position(start, Color::Black);
        game.apply(crate::core::Move::place(Color::Black, "c1".parse().unwrap())).unwrap();
        game.apply(crate::core::Move::pass(Color::White)).unwrap();
        assert_eq!(game.mover(), Some(Color::Black));

        assert!(agent.prepare(game.board(), Color::Black));
        let tree = agent.tree().unwrap();
        assert_eq!(tree.root_node().to_move, Color::Black);
        assert_eq!(tree.root_node().board, SimBoard::from_board(game.board()));
        assert_eq!(tree.root_node().depth, 0);
    }

    #[test]
    fn test_unknown_position_starts_fresh() {
        let mut agent = agent();
        agent.prepare(&Board::standard(), Color::Black);
        let other: Board = format!("{}{}", "B".repeat(60), "W.W.").parse().unwrap();
        assert!(!agent.prepare(&other, Color::Black));
        assert_eq!(agent.tree().unwrap().root_node().parent, NodeId::NONE);
    }

    #[test]
    fn test_decide_returns_legal_move() {
        let mut agent = IncrementalTreeSearch::new(
            Color::White,
            TreeSearchConfig::default()
                .with_seed(1)
                .with_evaluator(EvaluatorKind::Mobility),
        );
        let mut board = rules::GameBoard::new();
        board.apply(crate::core::Move::place(Color::Black, "f5".parse().unwrap())).unwrap();

        let budget = TurnBudget::new(Duration::from_millis(60), Duration::from_secs(10));
        let at = agent.decide(board.board(), Color::White, &budget).unwrap().unwrap();
        assert!(rules::can_place(board.board(), Color::White, at));
        assert!(agent.stats().nodes_expanded >= 1);
    }

    #[test]
    fn test_node_cap_stops_expansion() {
        let mut agent = IncrementalTreeSearch::new(
            Color::Black,
            TreeSearchConfig::default().with_seed(1).with_max_nodes(10),
        );
        agent.prepare(&Board::standard(), Color::Black);
        let mut steps = 0;
        while agent.expand_next() {
            steps += 1;
            assert!(steps < 100);
        }
        assert!(agent.tree().unwrap().len() >= 10);
    }
}
