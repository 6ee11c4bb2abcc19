//! Bit-parallel board for search.
//!
//! `SimBoard` mirrors a [`Board`] but works on whole masks at once: move
//! generation shifts a color's pieces along all 8 directions in parallel
//! instead of walking cell by cell.
//!
//! ## Contract
//!
//! Nothing here checks turn order or legality. [`SimBoard::play`] with a
//! cell outside [`SimBoard::legal_moves`] leaves the board in an unspecified
//! (but memory-safe) state; debug builds assert the precondition. Only
//! search strategies use this type, and their moves are re-validated by the
//! strict board before reaching a real game.

use serde::{Deserialize, Serialize};

use crate::core::{Board, Color, Coord};

const FILE_A: u64 = 0x0101_0101_0101_0101;
const FILE_H: u64 = 0x8080_8080_8080_8080;

/// Shift every bit one step along direction `dir` (index into
/// `Direction::ALL` order), dropping bits that leave the board.
#[inline(always)]
fn shift(bits: u64, dir: usize) -> u64 {
    match dir {
        0 => bits >> 8,             // north
        1 => (bits >> 7) & !FILE_A, // north-east
        2 => (bits << 1) & !FILE_A, // east
        3 => (bits << 9) & !FILE_A, // south-east
        4 => bits << 8,             // south
        5 => (bits << 7) & !FILE_H, // south-west
        6 => (bits >> 1) & !FILE_H, // west
        _ => (bits >> 9) & !FILE_H, // north-west
    }
}

/// Unchecked two-mask board used inside search.
///
/// Serialized as a [`Board`], so decoding checks the masks are disjoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Board", into = "Board")]
pub struct SimBoard {
    black: u64,
    white: u64,
}

impl From<Board> for SimBoard {
    fn from(board: Board) -> Self {
        Self::from_board(&board)
    }
}

impl From<SimBoard> for Board {
    fn from(sim: SimBoard) -> Self {
        sim.to_board()
    }
}

impl SimBoard {
    /// Copy a rules-engine board.
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        Self {
            black: board.bits(Color::Black),
            white: board.bits(Color::White),
        }
    }

    /// Convert back to a rules-engine board.
    #[must_use]
    pub fn to_board(self) -> Board {
        Board::from_bits(self.black, self.white)
    }

    #[inline]
    fn own_opp(&self, color: Color) -> (u64, u64) {
        match color {
            Color::Black => (self.black, self.white),
            Color::White => (self.white, self.black),
        }
    }

    /// Mask of every legal placement for `color`.
    #[must_use]
    pub fn legal_moves(&self, color: Color) -> u64 {
        let (own, opp) = self.own_opp(color);
        let empty = !(own | opp);
        let mut moves = 0;
        for dir in 0..8 {
            let mut run = shift(own, dir) & opp;
            for _ in 0..5 {
                run |= shift(run, dir) & opp;
            }
            moves |= shift(run, dir) & empty;
        }
        moves
    }

    /// Check if `color` has any legal placement.
    #[inline]
    #[must_use]
    pub fn can_move(&self, color: Color) -> bool {
        self.legal_moves(color) != 0
    }

    /// Check if neither color can place.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.can_move(Color::Black) && !self.can_move(Color::White)
    }

    /// Mask of cells `color` would flip by placing on `cell`.
    #[must_use]
    pub fn flips(&self, color: Color, cell: u32) -> u64 {
        let (own, opp) = self.own_opp(color);
        let placed = 1u64 << cell;
        let mut flips = 0;
        for dir in 0..8 {
            let mut run = 0;
            let mut probe = shift(placed, dir);
            while probe & opp != 0 {
                run |= probe;
                probe = shift(probe, dir);
            }
            if probe & own != 0 {
                flips |= run;
            }
        }
        flips
    }

    /// Place `color` on bit index `cell`, flipping every closed run.
    ///
    /// `cell` must be in `legal_moves(color)`.
    #[inline]
    pub fn play(&mut self, color: Color, cell: u32) {
        debug_assert!(
            self.legal_moves(color) & (1u64 << cell) != 0,
            "unchecked play of illegal cell {cell} for {color}"
        );
        let flips = self.flips(color, cell);
        let placed = (1u64 << cell) | flips;
        match color {
            Color::Black => {
                self.black |= placed;
                self.white &= !flips;
            }
            Color::White => {
                self.white |= placed;
                self.black &= !flips;
            }
        }
    }

    /// Copy of this board after `color` plays `cell`.
    #[must_use]
    pub fn after(&self, color: Color, cell: u32) -> Self {
        let mut next = *self;
        next.play(color, cell);
        next
    }

    /// Copy of this board after `color` plays `coord`.
    #[must_use]
    pub fn after_coord(&self, color: Color, coord: Coord) -> Self {
        self.after(color, coord.index() as u32)
    }

    /// Number of cells holding `color`.
    #[must_use]
    pub fn count(&self, color: Color) -> u32 {
        self.own_opp(color).0.count_ones()
    }

    /// Number of empty cells.
    #[must_use]
    pub fn empty_count(&self) -> u32 {
        (!(self.black | self.white)).count_ones()
    }

    /// Majority color, `None` on a tie. Meaningful once terminal.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        let black = self.black.count_ones();
        let white = self.white.count_ones();
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Some(Color::Black),
            std::cmp::Ordering::Less => Some(Color::White),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Iterate over set bit indices of a move mask, lowest first.
pub fn bits(mut mask: u64) -> impl Iterator<Item = u32> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let bit = mask.trailing_zeros();
        mask &= mask - 1;
        Some(bit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Move;
    use crate::rules;

    #[test]
    fn test_opening_moves_match_rules() {
        let board = Board::standard();
        let sim = SimBoard::from_board(&board);

        for color in Color::ALL {
            let expected: Vec<u32> = rules::legal_placements(&board, color)
                .into_iter()
                .map(|c| c.index() as u32)
                .collect();
            let actual: Vec<u32> = bits(sim.legal_moves(color)).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_play_matches_rules() {
        let mut board = Board::standard();
        let mut sim = SimBoard::from_board(&board);
        let mut color = Color::Black;

        // Walk a deterministic line, alternating first and last legal cell.
        for ply in 0..40 {
            let moves = rules::legal_placements(&board, color);
            if moves.is_empty() {
                if !rules::is_ongoing(&board) {
                    break;
                }
                color = color.opposite();
                continue;
            }
            let at = if ply % 2 == 0 { moves[0] } else { moves[moves.len() - 1] };
            let expected = rules::flipped_cells(&board, Move::place(color, at));
            let flips = sim.flips(color, at.index() as u32);
            assert_eq!(flips.count_ones() as usize, expected.len(), "ply {ply} at {at}");

            rules::apply_placement(&mut board, color, at);
            sim.play(color, at.index() as u32);
            assert_eq!(sim.to_board(), board, "after ply {ply}");
            color = color.opposite();
        }
    }

    #[test]
    fn test_no_wraparound_between_rows() {
        // White on h1 and black on a2 are adjacent in index order only.
        let board: Board = format!(".......W{}{}", "B.......", ".".repeat(48))
            .parse()
            .unwrap();
        let sim = SimBoard::from_board(&board);
        assert_eq!(sim.legal_moves(Color::Black), 0);
        assert_eq!(sim.legal_moves(Color::White), 0);
        assert!(sim.is_terminal());
    }

    #[test]
    fn test_counts_and_winner() {
        let board: Board = format!("{}{}", "B".repeat(37), "W".repeat(27)).parse().unwrap();
        let sim = SimBoard::from_board(&board);
        assert_eq!(sim.count(Color::Black), 37);
        assert_eq!(sim.count(Color::White), 27);
        assert_eq!(sim.empty_count(), 0);
        assert_eq!(sim.winner(), Some(Color::Black));
    }

    #[test]
    fn test_serde_goes_through_board() {
        let sim = SimBoard::from_board(&Board::standard());
        let json = serde_json::to_string(&sim).unwrap();
        assert_eq!(serde_json::from_str::<SimBoard>(&json).unwrap(), sim);
        assert!(serde_json::from_str::<SimBoard>(r#"{"black":6,"white":2}"#).is_err());
    }

    #[test]
    fn test_bits_iterator() {
        let collected: Vec<u32> = bits(0b1010_0001).collect();
        assert_eq!(collected, vec![0, 5, 7]);
        assert_eq!(bits(0).count(), 0);
    }
}
