//! Moves: a color plus an optional cell. No cell means a pass.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::coord::Coord;

/// A placement or a pass by one color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The color moving.
    pub color: Color,

    /// Target cell, `None` for a pass.
    pub at: Option<Coord>,
}

impl Move {
    /// Create a move from a decision.
    #[must_use]
    pub const fn new(color: Color, at: Option<Coord>) -> Self {
        Self { color, at }
    }

    /// A placement at `at`.
    #[must_use]
    pub const fn place(color: Color, at: Coord) -> Self {
        Self { color, at: Some(at) }
    }

    /// A pass.
    #[must_use]
    pub const fn pass(color: Color) -> Self {
        Self { color, at: None }
    }

    /// Check if this move is a pass.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        self.at.is_none()
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.at {
            Some(at) => write!(f, "{} {}", self.color, at),
            None => write!(f, "{} pass", self.color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_constructors() {
        let at: Coord = "f5".parse().unwrap();
        let place = Move::place(Color::Black, at);
        let pass = Move::pass(Color::White);

        assert!(!place.is_pass());
        assert!(pass.is_pass());
        assert_eq!(Move::new(Color::Black, Some(at)), place);
        assert_eq!(place.to_string(), "Black f5");
        assert_eq!(pass.to_string(), "White pass");
    }

    #[test]
    fn test_move_serialization() {
        let mv = Move::place(Color::White, "h8".parse().unwrap());
        let json = serde_json::to_string(&mv).unwrap();
        let deserialized: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(mv, deserialized);
    }
}
