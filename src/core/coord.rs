//! Board coordinates and directions.
//!
//! ## Canonical identity
//!
//! Every cell of the 8x8 grid has exactly one `Coord` value: a dense index
//! `row * 8 + col`. The full set lives in the static arena returned by
//! [`Coord::all`], and neighbor lookups go through a table computed at
//! compile time, so walking the board never allocates.
//!
//! ## Notation
//!
//! Columns are letters `a..h` from the left, rows are numbers `1..8` from the
//! top: `a1` is the top-left cell, `h8` the bottom-right.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ParseCoordError;

/// Number of rows on the board.
pub const ROWS: usize = 8;

/// Number of columns on the board.
pub const COLS: usize = 8;

/// Number of cells on the board.
pub const CELLS: usize = ROWS * COLS;

/// One of the 8 compass directions a line of flips can run along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All 8 directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Row and column delta of a single step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Dense index into [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A cell of the 8x8 board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Coord(u8);

const NO_NEIGHBOR: u8 = u8::MAX;

static ARENA: [Coord; CELLS] = {
    let mut cells = [Coord(0); CELLS];
    let mut i = 0;
    while i < CELLS {
        cells[i] = Coord(i as u8);
        i += 1;
    }
    cells
};

static NEIGHBORS: [[u8; 8]; CELLS] = {
    let mut table = [[NO_NEIGHBOR; 8]; CELLS];
    let mut i = 0;
    while i < CELLS {
        let row = (i / COLS) as i8;
        let col = (i % COLS) as i8;
        let mut d = 0;
        while d < 8 {
            let (dr, dc) = Direction::ALL[d].delta();
            let r = row + dr;
            let c = col + dc;
            if r >= 0 && r < ROWS as i8 && c >= 0 && c < COLS as i8 {
                table[i][d] = (r as usize * COLS + c as usize) as u8;
            }
            d += 1;
        }
        i += 1;
    }
    table
};

impl Coord {
    /// Look up the coordinate at (row, col), or `None` off the board.
    #[must_use]
    pub fn at(row: usize, col: usize) -> Option<Self> {
        if row < ROWS && col < COLS {
            Some(ARENA[row * COLS + col])
        } else {
            None
        }
    }

    /// Look up a coordinate by dense index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        ARENA.get(index).copied()
    }

    /// Every coordinate, row-major from `a1`.
    #[must_use]
    pub fn all() -> &'static [Coord; CELLS] {
        &ARENA
    }

    /// Zero-based row, counted from the top.
    #[inline]
    #[must_use]
    pub const fn row(self) -> usize {
        self.0 as usize / COLS
    }

    /// Zero-based column, counted from the left.
    #[inline]
    #[must_use]
    pub const fn col(self) -> usize {
        self.0 as usize % COLS
    }

    /// Dense index `row * 8 + col`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Single-bit mask of this cell, for bitboards.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }

    /// The adjacent coordinate in `dir`, or `None` at the edge of the board.
    #[inline]
    #[must_use]
    pub fn step(self, dir: Direction) -> Option<Self> {
        match NEIGHBORS[self.index()][dir.index()] {
            NO_NEIGHBOR => None,
            n => Some(ARENA[n as usize]),
        }
    }

    /// Cells strictly beyond this one in `dir`, nearest first.
    pub fn ray(self, dir: Direction) -> impl Iterator<Item = Coord> {
        std::iter::successors(self.step(dir), move |c| c.step(dir))
    }
}

impl TryFrom<u8> for Coord {
    type Error = ParseCoordError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Coord::from_index(value as usize).ok_or(ParseCoordError::OutOfRange(value as usize))
    }
}

impl From<Coord> for u8 {
    fn from(coord: Coord) -> u8 {
        coord.0
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = (b'a' + self.col() as u8) as char;
        write!(f, "{}{}", file, self.row() + 1)
    }
}

impl std::fmt::Debug for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Coord({self})")
    }
}

impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        let [file, rank] = bytes else {
            return Err(ParseCoordError::Malformed(s.to_string()));
        };
        let col = file.to_ascii_lowercase().wrapping_sub(b'a') as usize;
        let row = rank.wrapping_sub(b'1') as usize;
        Coord::at(row, col).ok_or_else(|| ParseCoordError::Malformed(s.to_string()))
    }
}
