//! Search strategy configuration.
//!
//! Each strategy has its own config with defaults, `with_*` builders and
//! serde support. `from_params` overlays an [`AgentParams`] map under the
//! strategy's own namespace.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::eval::EvaluatorKind;
use crate::agent::{AgentParams, ParamScope};
use crate::error::ConfigError;

/// Default safety margin kept between a search deadline and the hard limit.
pub const DEFAULT_MARGIN: Duration = Duration::from_millis(20);

/// ExhaustiveProofSearch configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProofSearchConfig {
    /// Seed for candidate ordering and fallbacks. `None` draws from entropy.
    pub seed: Option<u64>,

    /// Time kept in reserve before the turn limit.
    pub margin: Duration,

    /// Run the search anyway every this many skipped turns (0 = never force).
    pub force_every: u32,

    /// Log per-turn summaries at debug level.
    pub debug: bool,
}

impl Default for ProofSearchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            margin: DEFAULT_MARGIN,
            force_every: 8,
            debug: false,
        }
    }
}

impl ProofSearchConfig {
    /// Registry and parameter namespace.
    pub const NAME: &'static str = "ExhaustiveProofSearch";

    /// Overlay parameters onto the defaults.
    pub fn from_params(params: &AgentParams) -> Result<Self, ConfigError> {
        let scope = params.scope(Self::NAME);
        let defaults = Self::default();
        Ok(Self {
            seed: scope.get("seed")?,
            margin: scope.millis("margin_ms", defaults.margin)?,
            force_every: scope.get_or("force_every", defaults.force_every)?,
            debug: scope.flag("debug", defaults.debug)?,
        })
    }

    /// Set a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the safety margin.
    #[must_use]
    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    /// Set the forced-search period.
    #[must_use]
    pub fn with_force_every(mut self, turns: u32) -> Self {
        self.force_every = turns;
        self
    }

    /// Enable debug summaries.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// IncrementalTreeSearch configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeSearchConfig {
    /// Seed for tie-breaking. `None` draws from entropy.
    pub seed: Option<u64>,

    /// Time kept in reserve before the turn limit.
    pub margin: Duration,

    /// Maximum nodes to allocate in the tree.
    /// Expansion stops once reached; the tree is compacted on reroot.
    pub max_nodes: usize,

    /// Position evaluator.
    pub evaluator: EvaluatorKind,

    /// Log per-turn summaries at debug level.
    pub debug: bool,
}

impl Default for TreeSearchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            margin: DEFAULT_MARGIN,
            max_nodes: 500_000,
            evaluator: EvaluatorKind::Mobility,
            debug: false,
        }
    }
}

impl TreeSearchConfig {
    /// Registry and parameter namespace.
    pub const NAME: &'static str = "IncrementalTreeSearch";

    /// Overlay parameters onto the defaults.
    pub fn from_params(params: &AgentParams) -> Result<Self, ConfigError> {
        let scope = params.scope(Self::NAME);
        let defaults = Self::default();
        Ok(Self {
            seed: scope.get("seed")?,
            margin: scope.millis("margin_ms", defaults.margin)?,
            max_nodes: scope.get_or("max_nodes", defaults.max_nodes)?,
            evaluator: scope.get_or("evaluator", defaults.evaluator)?,
            debug: scope.flag("debug", defaults.debug)?,
        })
    }

    /// Set a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the safety margin.
    #[must_use]
    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    /// Set the node cap.
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Select the evaluator.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: EvaluatorKind) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Enable debug summaries.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// StochasticPlayoutSearch configuration.
///
/// The thinking time for a turn is the remaining pool split evenly over the
/// mover's remaining turns, scaled by a parabola over game progress that is
/// `floor_weight` at the opening and the end and `peak_weight` at midgame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayoutConfig {
    /// Seed for playouts and tie-breaking. `None` draws from entropy.
    pub seed: Option<u64>,

    /// Time kept in reserve before the turn limit.
    pub margin: Duration,

    /// Plies at the start of the game answered without search.
    pub opening_skip: u32,

    /// Allocation weight at the ends of the game.
    pub floor_weight: f64,

    /// Allocation weight at midgame.
    pub peak_weight: f64,

    /// Log per-turn summaries at debug level.
    pub debug: bool,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            seed: None,
            margin: DEFAULT_MARGIN,
            opening_skip: 1,
            floor_weight: 0.5,
            peak_weight: 2.0,
            debug: false,
        }
    }
}

impl PlayoutConfig {
    /// Registry and parameter namespace.
    pub const NAME: &'static str = "StochasticPlayoutSearch";

    /// Overlay parameters onto the defaults.
    pub fn from_params(params: &AgentParams) -> Result<Self, ConfigError> {
        let scope = params.scope(Self::NAME);
        let defaults = Self::default();
        Ok(Self {
            seed: scope.get("seed")?,
            margin: scope.millis("margin_ms", defaults.margin)?,
            opening_skip: scope.get_or("opening_skip", defaults.opening_skip)?,
            floor_weight: weight(&scope, "floor_weight", defaults.floor_weight)?,
            peak_weight: weight(&scope, "peak_weight", defaults.peak_weight)?,
            debug: scope.flag("debug", defaults.debug)?,
        })
    }

    /// Set a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the safety margin.
    #[must_use]
    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    /// Set the number of unsearched opening plies.
    #[must_use]
    pub fn with_opening_skip(mut self, plies: u32) -> Self {
        self.opening_skip = plies;
        self
    }

    /// Set the allocation parabola.
    #[must_use]
    pub fn with_weights(mut self, floor: f64, peak: f64) -> Self {
        self.floor_weight = floor;
        self.peak_weight = peak;
        self
    }

    /// Enable debug summaries.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// A finite, non-negative allocation weight.
fn weight(scope: &ParamScope<'_>, key: &str, default: f64) -> Result<f64, ConfigError> {
    let value: f64 = scope.get_or(key, default)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "weight must be finite and non-negative".to_string(),
        })
    }
}
