//! Move-search strategies.
//!
//! Three [`Agent`](crate::agent::Agent) implementations share the
//! simulation board, the turn budget contract and the uniform fallback:
//!
//! - [`ExhaustiveProofSearch`]: forced win/draw/loss classification with
//!   adaptive skipping of futile searches
//! - [`IncrementalTreeSearch`]: breadth-first minimax over a tree reused
//!   across turns
//! - [`StochasticPlayoutSearch`]: random playouts with per-turn time
//!   allocation
//!
//! Each strategy searches on a single thread. All three are parallelizable,
//! but a single thread keeps seeded games reproducible.

pub mod config;
pub mod eval;
pub mod incremental;
pub mod playout;
pub mod proof;
pub mod stats;
pub mod tree;

pub use config::{PlayoutConfig, ProofSearchConfig, TreeSearchConfig};
pub use eval::{Evaluator, EvaluatorKind, MobilityEvaluator, PieceCountEvaluator};
pub use incremental::IncrementalTreeSearch;
pub use playout::StochasticPlayoutSearch;
pub use proof::{solve, ExhaustiveProofSearch, Verdict};
pub use stats::SearchStats;
pub use tree::{NodeId, SearchTree, TreeNode};
