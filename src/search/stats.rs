//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected by a strategy over one decision.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Tree nodes expanded (children generated).
    pub nodes_expanded: u32,

    /// Tree nodes carried over from the previous turn.
    pub nodes_reused: u32,

    /// Random playouts completed.
    pub playouts: u32,

    /// Positions visited by the proof search.
    pub proof_nodes: u64,

    /// Set when the proof search was skipped as futile.
    pub skipped: bool,

    /// Set when the deadline cut the search short.
    pub timed_out: bool,

    /// Maximum depth reached below the root.
    pub max_depth: u16,

    /// Time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Playouts per second.
    #[must_use]
    pub fn playouts_per_second(&self) -> f64 {
        per_second(u64::from(self.playouts), self.time_us)
    }

    /// Proof nodes per second.
    #[must_use]
    pub fn proof_nodes_per_second(&self) -> f64 {
        per_second(self.proof_nodes, self.time_us)
    }

    /// Node expansions per second.
    #[must_use]
    pub fn expansions_per_second(&self) -> f64 {
        per_second(u64::from(self.nodes_expanded), self.time_us)
    }
}

fn per_second(count: u64, time_us: u64) -> f64 {
    if time_us == 0 {
        0.0
    } else {
        count as f64 / (time_us as f64 / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = SearchStats::new();
        assert_eq!(stats.playouts, 0);
        assert!(!stats.skipped);
        assert_eq!(stats.playouts_per_second(), 0.0);
    }

    #[test]
    fn test_stats_rates() {
        let mut stats = SearchStats::new();
        stats.playouts = 500;
        stats.proof_nodes = 2000;
        stats.time_us = 500_000;

        assert_eq!(stats.playouts_per_second(), 1000.0);
        assert_eq!(stats.proof_nodes_per_second(), 4000.0);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = SearchStats::new();
        stats.nodes_expanded = 10;
        stats.timed_out = true;

        stats.reset();

        assert_eq!(stats, SearchStats::default());
    }
}
