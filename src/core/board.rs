//! The board: a total mapping from every cell to empty or a color.
//!
//! ## Representation
//!
//! Two disjoint 64-bit masks, one per color. A cell is empty when neither
//! mask has its bit. `Board` is `Copy`, so handing a snapshot to an agent is
//! a plain value copy that cannot alias the authoritative board.
//!
//! ## Canonical cell string
//!
//! 64 characters, row-major from `a1`: `B` black, `W` white, `.` empty.
//! Parsing ignores ASCII whitespace, so the 8-line `Display` output parses
//! back to an equal board.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::color::Color;
use super::coord::{Coord, CELLS, COLS};
use crate::error::BoardParseError;

/// Board cell contents for all 64 cells.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    black: u64,
    white: u64,
}

/// Wire shape of a [`Board`], checked for overlap before it becomes one.
#[derive(Deserialize)]
struct RawBoard {
    black: u64,
    white: u64,
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardParseError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        let both = raw.black & raw.white;
        if both != 0 {
            return Err(BoardParseError::Overlap(both));
        }
        Ok(Self {
            black: raw.black,
            white: raw.white,
        })
    }
}

impl Board {
    /// A board with every cell empty.
    #[must_use]
    pub const fn empty() -> Self {
        Self { black: 0, white: 0 }
    }

    /// The standard four-piece starting position.
    ///
    /// White on `d4` and `e5`, Black on `e4` and `d5`.
    #[must_use]
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for (row, col, color) in [
            (3, 3, Color::White),
            (4, 4, Color::White),
            (3, 4, Color::Black),
            (4, 3, Color::Black),
        ] {
            if let Some(coord) = Coord::at(row, col) {
                board.set(coord, Some(color));
            }
        }
        board
    }

    /// Build a board from raw color masks.
    ///
    /// Cells claimed by both masks are treated as black.
    #[must_use]
    pub const fn from_bits(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    /// Contents of a cell.
    #[inline]
    #[must_use]
    pub fn color_at(&self, coord: Coord) -> Option<Color> {
        let bit = coord.bit();
        if self.black & bit != 0 {
            Some(Color::Black)
        } else if self.white & bit != 0 {
            Some(Color::White)
        } else {
            None
        }
    }

    /// Overwrite a cell.
    #[inline]
    pub fn set(&mut self, coord: Coord, cell: Option<Color>) {
        let bit = coord.bit();
        self.black &= !bit;
        self.white &= !bit;
        match cell {
            Some(Color::Black) => self.black |= bit,
            Some(Color::White) => self.white |= bit,
            None => {}
        }
    }

    /// Occupancy mask of one color.
    #[inline]
    #[must_use]
    pub const fn bits(&self, color: Color) -> u64 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    /// Mask of empty cells.
    #[inline]
    #[must_use]
    pub const fn empty_bits(&self) -> u64 {
        !(self.black | self.white)
    }

    /// Number of cells holding `color`.
    #[must_use]
    pub const fn count(&self, color: Color) -> u32 {
        self.bits(color).count_ones()
    }

    /// Number of empty cells.
    #[must_use]
    pub const fn empty_count(&self) -> u32 {
        self.empty_bits().count_ones()
    }

    /// Check if every cell is occupied.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    /// Iterate over cells holding `color`.
    pub fn cells_of(&self, color: Color) -> impl Iterator<Item = Coord> + '_ {
        Coord::all()
            .iter()
            .copied()
            .filter(move |c| self.color_at(*c) == Some(color))
    }

    /// The 64-character canonical cell string.
    #[must_use]
    pub fn to_cell_string(&self) -> String {
        Coord::all().iter().map(|c| cell_char(self.color_at(*c))).collect()
    }
}

fn cell_char(cell: Option<Color>) -> char {
    cell.map_or('.', Color::symbol)
}

impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Board::empty();
        let mut index = 0;

        for ch in s.chars().filter(|ch| !ch.is_ascii_whitespace()) {
            let cell = match ch {
                'B' | 'b' | 'X' | 'x' => Some(Color::Black),
                'W' | 'w' | 'O' | 'o' => Some(Color::White),
                '.' | '-' => None,
                _ => return Err(BoardParseError::BadCell { ch, index }),
            };
            if let Some(coord) = Coord::from_index(index) {
                board.set(coord, cell);
            }
            index += 1;
        }

        if index != CELLS {
            return Err(BoardParseError::WrongLength(index));
        }
        Ok(board)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cells = self.to_cell_string();
        for (i, row) in cells.as_bytes().chunks(COLS).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            // Cell strings are pure ASCII.
            write!(f, "{}", String::from_utf8_lossy(row))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Board({})", self.to_cell_string())
    }
}
