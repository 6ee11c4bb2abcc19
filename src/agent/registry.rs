//! Named agent factories.
//!
//! A registry maps strategy names to builders taking `(color, params)`.
//! Agents that only know how to build themselves with no arguments can be
//! registered through [`AgentRegistry::register_default`].
//!
//! ```
//! use reversi_arena::agent::{AgentParams, AgentRegistry};
//! use reversi_arena::core::Color;
//!
//! let registry = AgentRegistry::with_builtin();
//! let params = AgentParams::new().with("seed", "1");
//! let agent = registry.build("IncrementalTreeSearch", Color::Black, &params).unwrap();
//! assert_eq!(agent.name(), "IncrementalTreeSearch");
//! ```

use rustc_hash::FxHashMap;

use super::{Agent, AgentParams, UniformRandom};
use crate::core::Color;
use crate::error::ConfigError;
use crate::search::{ExhaustiveProofSearch, IncrementalTreeSearch, StochasticPlayoutSearch};

/// Builds one agent for one game.
pub type AgentBuilder =
    Box<dyn Fn(Color, &AgentParams) -> Result<Box<dyn Agent>, ConfigError> + Send + Sync>;

/// Strategy name to builder map.
#[derive(Default)]
pub struct AgentRegistry {
    builders: FxHashMap<String, AgentBuilder>,
}

impl AgentRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in strategies.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ExhaustiveProofSearch::NAME, |color, params| {
            Ok(Box::new(ExhaustiveProofSearch::from_params(color, params)?))
        });
        registry.register(IncrementalTreeSearch::NAME, |color, params| {
            Ok(Box::new(IncrementalTreeSearch::from_params(color, params)?))
        });
        registry.register(StochasticPlayoutSearch::NAME, |color, params| {
            Ok(Box::new(StochasticPlayoutSearch::from_params(color, params)?))
        });
        registry.register(UniformRandom::NAME, |color, params| {
            Ok(Box::new(UniformRandom::from_params(color, params)?))
        });
        registry
    }

    /// Register a `(color, params)` builder, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, builder: F)
    where
        F: Fn(Color, &AgentParams) -> Result<Box<dyn Agent>, ConfigError> + Send + Sync + 'static,
    {
        self.builders.insert(name.into(), Box::new(builder));
    }

    /// Register an agent built through `Default`, ignoring color and params.
    pub fn register_default<A: Agent + Default>(&mut self, name: impl Into<String>) {
        self.register(name, |_, _| Ok(Box::new(A::default())));
    }

    /// Build the named strategy for `color`.
    pub fn build(
        &self,
        name: &str,
        color: Color,
        params: &AgentParams,
    ) -> Result<Box<dyn Agent>, ConfigError> {
        let builder = self
            .builders
            .get(name)
            .ok_or_else(|| ConfigError::UnknownStrategy(name.to_string()))?;
        builder(color, params)
    }

    /// Check if a strategy is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::TurnBudget;
    use crate::core::{Board, Coord};
    use crate::error::AgentError;

    #[derive(Default)]
    struct AlwaysPass;

    impl Agent for AlwaysPass {
        fn name(&self) -> &str {
            "AlwaysPass"
        }

        fn decide(
            &mut self,
            _board: &Board,
            _color: Color,
            _budget: &TurnBudget,
        ) -> Result<Option<Coord>, AgentError> {
            Ok(None)
        }
    }

    #[test]
    fn test_builtin_names() {
        let registry = AgentRegistry::with_builtin();
        assert_eq!(
            registry.names(),
            vec![
                "ExhaustiveProofSearch",
                "IncrementalTreeSearch",
                "StochasticPlayoutSearch",
                "UniformRandom"
            ]
        );
    }

    #[test]
    fn test_build_each_builtin() {
        let registry = AgentRegistry::with_builtin();
        let params = AgentParams::new().with("seed", "7");
        for name in registry.names() {
            let agent = registry.build(name, Color::White, &params).unwrap();
            assert_eq!(agent.name(), name);
        }
    }

    #[test]
    fn test_unknown_strategy() {
        let registry = AgentRegistry::with_builtin();
        let err = registry
            .build("Nope", Color::Black, &AgentParams::new())
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::UnknownStrategy("Nope".to_string()));
    }

    #[test]
    fn test_bad_params_fail_construction() {
        let registry = AgentRegistry::with_builtin();
        let params = AgentParams::new().with("UniformRandom.seed", "-1");
        assert!(registry.build("UniformRandom", Color::Black, &params).is_err());
    }

    #[test]
    fn test_register_default() {
        let mut registry = AgentRegistry::new();
        registry.register_default::<AlwaysPass>("AlwaysPass");
        assert!(registry.contains("AlwaysPass"));

        let mut agent = registry.build("AlwaysPass", Color::Black, &AgentParams::new()).unwrap();
        let budget = TurnBudget::new(
            std::time::Duration::from_secs(1),
            std::time::Duration::from_secs(1),
        );
        assert_eq!(agent.decide(&Board::standard(), Color::Black, &budget).unwrap(), None);
    }
}
