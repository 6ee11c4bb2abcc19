//! Arena-based search tree that survives across turns.
//!
//! Nodes live in a flat `Vec<TreeNode>` and refer to each other by
//! [`NodeId`] indices. A breadth-first frontier of not-yet-expanded nodes
//! is kept alongside.
//!
//! ## Re-rooting
//!
//! [`SearchTree::reroot`] moves the root to a descendant and compacts the
//! arena so that only the new root's subtree remains. Every node in the
//! arena is therefore alive (reachable from the root) at all times, dead
//! nodes are freed rather than flagged, and the frontier is filtered in
//! the same pass. Compaction walks the subtree breadth first, so arena
//! order stays shallowest-first.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Color, Coord};
use crate::sim::SimBoard;

/// Index into the [`SearchTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// Link from a node to the child reached by one move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    /// The placement, `None` for a pass.
    pub mv: Option<Coord>,
    pub node: NodeId,
}

/// A position in the search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeNode {
    pub board: SimBoard,

    /// Color to move at this position.
    pub to_move: Color,

    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Children in move order. Empty until expanded, and for terminals.
    pub children: SmallVec<[Child; 8]>,

    /// Score from the searching color's perspective: the static evaluation
    /// for a leaf, the minimax over children once expanded.
    pub score: i32,

    /// Children have been generated.
    pub expanded: bool,

    /// Depth below the root (root = 0).
    pub depth: u16,
}

impl TreeNode {
    /// Create an unexpanded node.
    pub fn new(board: SimBoard, to_move: Color, parent: NodeId, score: i32, depth: u16) -> Self {
        Self {
            board,
            to_move,
            parent,
            children: SmallVec::new(),
            score,
            expanded: false,
            depth,
        }
    }

    /// Check if neither color can move.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.board.is_terminal()
    }
}

/// Arena tree with a FIFO expansion frontier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
    frontier: VecDeque<NodeId>,
}

impl SearchTree {
    /// Create a tree holding a single root.
    pub fn new(board: SimBoard, to_move: Color, score: i32) -> Self {
        let mut nodes = Vec::with_capacity(1024);
        nodes.push(TreeNode::new(board, to_move, NodeId::NONE, score, 0));
        Self {
            nodes,
            root: NodeId::new(0),
            frontier: VecDeque::new(),
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &TreeNode {
        self.get(self.root)
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.index()]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: TreeNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Queue a node for expansion.
    pub fn enqueue(&mut self, id: NodeId) {
        self.frontier.push_back(id);
    }

    /// Oldest queued node.
    pub fn pop_frontier(&mut self) -> Option<NodeId> {
        self.frontier.pop_front()
    }

    /// Oldest queued node, left in place.
    #[must_use]
    pub fn peek_frontier(&self) -> Option<NodeId> {
        self.frontier.front().copied()
    }

    /// Number of queued nodes.
    #[must_use]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// First node, shallowest first, holding `board` with `to_move` to play.
    #[must_use]
    pub fn find(&self, board: &SimBoard, to_move: Color) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.to_move == to_move && n.board == *board)
            .map(|i| NodeId::new(i as u32))
    }

    /// Check reachability from the root by walking parent links.
    ///
    /// O(depth). After compaction this holds for every node in the arena.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        let mut current = id;
        while !current.is_none() {
            if current == self.root {
                return true;
            }
            current = self.get(current).parent;
        }
        false
    }

    /// Make `new_root` the root, dropping every node outside its subtree.
    ///
    /// Returns the number of nodes kept.
    pub fn reroot(&mut self, new_root: NodeId) -> usize {
        if new_root == self.root {
            return self.nodes.len();
        }

        // Old index to new id, NONE for dropped nodes.
        let mut remap = vec![NodeId::NONE; self.nodes.len()];
        let mut order = vec![new_root];
        remap[new_root.index()] = NodeId::new(0);
        let mut i = 0;
        while i < order.len() {
            for child in &self.get(order[i]).children {
                remap[child.node.index()] = NodeId::new(order.len() as u32);
                order.push(child.node);
            }
            i += 1;
        }
        let moved = |id: NodeId| if id.is_none() { id } else { remap[id.index()] };

        let base_depth = self.get(new_root).depth;
        let mut nodes = Vec::with_capacity(order.len().max(1024));
        for &old in &order {
            let mut node = self.get(old).clone();
            node.parent = if old == new_root {
                NodeId::NONE
            } else {
                moved(node.parent)
            };
            for child in &mut node.children {
                child.node = moved(child.node);
            }
            node.depth -= base_depth;
            nodes.push(node);
        }

        self.frontier = self
            .frontier
            .iter()
            .map(|&id| moved(id))
            .filter(|id| !id.is_none())
            .collect();
        self.nodes = nodes;
        self.root = NodeId::new(0);
        self.nodes.len()
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Deepest node below the root.
    #[must_use]
    pub fn max_depth(&self) -> u16 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}
