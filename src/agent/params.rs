//! Flat key/value execution parameters for agent construction.
//!
//! Every strategy reads its optional tunables (seed, time margin,
//! evaluator, debug flag) from an [`AgentParams`] map. Lookups try the
//! namespaced key `"<TypeName>.<key>"` first and fall back to the bare
//! `"<key>"`, so one map can configure both colors' strategies with shared
//! defaults and per-strategy overrides.
//!
//! ```
//! use reversi_arena::agent::AgentParams;
//!
//! let params = AgentParams::new()
//!     .with("seed", "1")
//!     .with("IncrementalTreeSearch.seed", "2");
//!
//! let tree = params.scope("IncrementalTreeSearch");
//! let proof = params.scope("ExhaustiveProofSearch");
//! assert_eq!(tree.get::<u64>("seed").unwrap(), Some(2));
//! assert_eq!(proof.get::<u64>("seed").unwrap(), Some(1));
//! ```

use std::str::FromStr;
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Flat key to string parameter map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentParams {
    values: FxHashMap<String, String>,
}

impl AgentParams {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw lookup: `"<namespace>.<key>"`, then `"<key>"`.
    #[must_use]
    pub fn lookup(&self, namespace: &str, key: &str) -> Option<&str> {
        self.values
            .get(&format!("{namespace}.{key}"))
            .or_else(|| self.values.get(key))
            .map(String::as_str)
    }

    /// View of this map under one namespace.
    #[must_use]
    pub fn scope<'a>(&'a self, namespace: &'a str) -> ParamScope<'a> {
        ParamScope {
            params: self,
            namespace,
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AgentParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Namespaced, typed view of an [`AgentParams`] map.
#[derive(Clone, Copy, Debug)]
pub struct ParamScope<'a> {
    params: &'a AgentParams,
    namespace: &'a str,
}

impl<'a> ParamScope<'a> {
    /// The namespace lookups try first.
    #[must_use]
    pub fn namespace(&self) -> &'a str {
        self.namespace
    }

    /// Raw string value, if present.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&'a str> {
        self.params.lookup(self.namespace, key)
    }

    /// Parse a value, `Ok(None)` when absent.
    pub fn get<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.raw(key)
            .map(|value| {
                value.trim().parse::<T>().map_err(|err| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: err.to_string(),
                })
            })
            .transpose()
    }

    /// Parse a value, or `default` when absent.
    pub fn get_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Parse a flag; accepts `true/false`, `yes/no`, `on/off`, `1/0`.
    pub fn flag(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        let Some(value) = self.raw(key) else {
            return Ok(default);
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                reason: "expected a boolean".to_string(),
            }),
        }
    }

    /// Parse a millisecond count into a `Duration`.
    pub fn millis(&self, key: &str, default: Duration) -> Result<Duration, ConfigError> {
        Ok(self
            .get::<u64>(key)?
            .map(Duration::from_millis)
            .unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_key_wins() {
        let params = AgentParams::new()
            .with("margin_ms", "10")
            .with("StochasticPlayoutSearch.margin_ms", "25");

        let scope = params.scope("StochasticPlayoutSearch");
        assert_eq!(scope.millis("margin_ms", Duration::ZERO).unwrap(), Duration::from_millis(25));

        let other = params.scope("IncrementalTreeSearch");
        assert_eq!(other.millis("margin_ms", Duration::ZERO).unwrap(), Duration::from_millis(10));
    }

    #[test]
    fn test_missing_and_default() {
        let params = AgentParams::new();
        let scope = params.scope("X");

        assert_eq!(scope.get::<u64>("seed").unwrap(), None);
        assert_eq!(scope.get_or("seed", 9u64).unwrap(), 9);
        assert!(!scope.flag("debug", false).unwrap());
    }

    #[test]
    fn test_invalid_value_reports_key() {
        let params: AgentParams = [("seed", "abc"), ("debug", "maybe")].into_iter().collect();
        let scope = params.scope("X");

        match scope.get::<u64>("seed") {
            Err(ConfigError::InvalidValue { key, value, .. }) => {
                assert_eq!(key, "seed");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(scope.flag("debug", false).is_err());
    }

    #[test]
    fn test_flag_spellings() {
        let params = AgentParams::new().with("a", "Yes").with("b", "0").with("c", " on ");
        let scope = params.scope("X");
        assert!(scope.flag("a", false).unwrap());
        assert!(!scope.flag("b", true).unwrap());
        assert!(scope.flag("c", false).unwrap());
    }

    #[test]
    fn test_params_serialization() {
        let params = AgentParams::new().with("seed", "3");
        let json = serde_json::to_string(&params).unwrap();
        let deserialized: AgentParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, deserialized);
    }
}
