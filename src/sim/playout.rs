//! Uniform random playouts to the end of the game.

use super::board::SimBoard;
use crate::core::{Color, GameRng};

/// Play uniformly random legal moves for both sides until neither can
/// place. Returns the winner, `None` on a draw.
///
/// The board is consumed by value; the caller's copy is untouched.
pub fn random_playout(mut board: SimBoard, mut to_move: Color, rng: &mut GameRng) -> Option<Color> {
    let mut passed = false;
    loop {
        let moves = board.legal_moves(to_move);
        match rng.pick_bit(moves) {
            Some(cell) => {
                board.play(to_move, cell);
                passed = false;
            }
            None if passed => return board.winner(),
            None => passed = true,
        }
        to_move = to_move.opposite();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Board;

    #[test]
    fn test_playouts_finish_with_winners() {
        let mut rng = GameRng::new(11);
        let board = SimBoard::from_board(&Board::standard());
        let decided = (0..20)
            .filter(|_| random_playout(board, Color::Black, &mut rng).is_some())
            .count();
        assert!(decided > 0);
    }

    #[test]
    fn test_playout_on_terminal_board() {
        let full: Board = format!("{}{}", "W".repeat(40), "B".repeat(24)).parse().unwrap();
        let mut rng = GameRng::new(0);
        assert_eq!(
            random_playout(SimBoard::from_board(&full), Color::Black, &mut rng),
            Some(Color::White)
        );
    }

    #[test]
    fn test_playout_is_deterministic_for_seed() {
        let board = SimBoard::from_board(&Board::standard());
        let a: Vec<_> = {
            let mut rng = GameRng::new(5);
            (0..10).map(|_| random_playout(board, Color::Black, &mut rng)).collect()
        };
        let b: Vec<_> = {
            let mut rng = GameRng::new(5);
            (0..10).map(|_| random_playout(board, Color::Black, &mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
