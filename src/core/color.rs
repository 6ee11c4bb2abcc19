//! Piece colors.

use serde::{Deserialize, Serialize};

/// One of the two piece colors.
///
/// Black always moves first from the standard starting position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    /// Moves first.
    Black,
    /// Moves second.
    White,
}

impl Color {
    /// Both colors in turn order.
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    /// The other color. `c.opposite().opposite() == c`.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Dense index (Black = 0, White = 1).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    /// Single-character cell symbol used by the canonical board string.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Color::Black => 'B',
            Color::White => 'W',
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for color in Color::ALL {
            assert_ne!(color.opposite(), color);
            assert_eq!(color.opposite().opposite(), color);
        }
    }

    #[test]
    fn test_index_and_symbol() {
        assert_eq!(Color::Black.index(), 0);
        assert_eq!(Color::White.index(), 1);
        assert_eq!(Color::Black.symbol(), 'B');
        assert_eq!(format!("{}", Color::White), "White");
    }
}
