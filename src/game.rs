use tracing::{debug, instrument};

use crate::board::{Board, Color, Piece, Square};
use crate::config::RuleSet;
use crate::error::{GameError, MoveError, PromotionError};
use crate::executor::{self, MoveOutcome};
use crate::movegen::pseudo_legal_moves;
use crate::rules::{self, GameState};

/// One game in progress: the board, whose turn it is, and the rules in force.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Color,
    rules: RuleSet,
}

impl Game {
    pub fn new() -> Self {
        Self::with_rules(RuleSet::default())
    }

    pub fn with_rules(rules: RuleSet) -> Self {
        Self {
            board: Board::new(),
            turn: Color::White,
            rules,
        }
    }

    /// Starts from an arbitrary position. The board is not validated; see [`Board::validate`].
    pub fn from_board(board: Board, turn: Color, rules: RuleSet) -> Self {
        Self { board, turn, rules }
    }

    /// Resets to the starting position with white to move.
    pub fn new_game(&mut self) {
        self.board = Board::new();
        self.turn = Color::White;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn piece_owner(&self, square: Square) -> Option<Color> {
        self.board.get_piece_at(square).map(|piece| piece.color)
    }

    /// Legal targets for the piece on `square`, computed lazily.
    ///
    /// Clone the iterator to walk the same sequence again.
    pub fn legal_moves(&self, square: Square) -> impl Iterator<Item = Square> + Clone + '_ {
        let board = &self.board;
        let rules = &self.rules;
        pseudo_legal_moves(board, square)
            .into_iter()
            .filter(move |&to| rules::is_legal_move(board, square, to, rules))
    }

    /// Plays `from -> to` for the side to move; the turn passes only if the move is accepted.
    #[instrument(level = "debug", skip(self), fields(turn = %self.turn))]
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
        match executor::execute(&mut self.board, from, to, self.turn, &self.rules) {
            Ok(outcome) => {
                self.turn = self.turn.opposite();
                Ok(outcome)
            }
            Err(err) => {
                debug!(%err, "move rejected");
                Err(err)
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn promote(&mut self, square: Square) -> Result<Piece, PromotionError> {
        executor::promote(&mut self.board, square)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        rules::is_in_check(&self.board, color)
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        rules::is_checkmate(&self.board, color, &self.rules)
    }

    /// Stalemate for the side to move, or a dead draw on material.
    pub fn is_stalemate(&self) -> bool {
        rules::is_stalemate(&self.board, self.turn, &self.rules)
    }

    pub fn state(&self) -> Result<GameState, GameError> {
        rules::game_state(&self.board, self.turn, &self.rules)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_turns_alternate_only_on_acceptance() {
        let mut game = Game::new();
        assert_eq!(game.turn(), Color::White);

        assert!(game.apply_move(sq("E7"), sq("E5")).is_err());
        assert_eq!(game.turn(), Color::White);

        game.apply_move(sq("E2"), sq("E4")).unwrap();
        assert_eq!(game.turn(), Color::Black);
        assert!(game.apply_move(sq("D2"), sq("D4")).is_err());

        game.apply_move(sq("E7"), sq("E5")).unwrap();
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn test_piece_owner() {
        let game = Game::new();
        assert_eq!(game.piece_owner(sq("A1")), Some(Color::White));
        assert_eq!(game.piece_owner(sq("H7")), Some(Color::Black));
        assert_eq!(game.piece_owner(sq("D5")), None);
    }

    #[test]
    fn test_legal_moves_are_restartable() {
        let game = Game::new();
        let moves = game.legal_moves(sq("G1"));
        let first: Vec<Square> = moves.clone().collect();
        let second: Vec<Square> = moves.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(game.legal_moves(sq("E4")).count(), 0);
    }

    #[test]
    fn test_fools_mate() {
        let mut game = Game::new();
        for (from, to) in [("F2", "F3"), ("E7", "E5"), ("G2", "G4"), ("D8", "H4")] {
            game.apply_move(sq(from), sq(to)).unwrap();
        }
        assert!(game.is_in_check(Color::White));
        assert!(game.is_checkmate(Color::White));
        assert!(!game.is_stalemate());
        assert_eq!(
            game.state(),
            Ok(GameState::Checkmate {
                winner: Color::Black
            })
        );
        assert!(game.state().unwrap().is_over());
    }

    #[test]
    fn test_new_game_resets() {
        let mut game = Game::new();
        game.apply_move(sq("G1"), sq("F3")).unwrap();
        game.new_game();
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.state(), Ok(GameState::Ongoing));
    }

    #[test]
    fn test_promote_through_session() {
        let mut board = Board::empty();
        board.place(sq("A1"), Piece::new(Color::White, PieceKind::King));
        board.place(sq("C7"), Piece::new(Color::White, PieceKind::Pawn));
        board.place(sq("H5"), Piece::new(Color::Black, PieceKind::King));
        let mut game = Game::from_board(board, Color::White, RuleSet::new());

        let outcome = game.apply_move(sq("C7"), sq("C8")).unwrap();
        assert!(outcome.promotion_due);
        assert_eq!(game.promote(sq("C8")).unwrap().kind, PieceKind::Queen);
        assert!(game.promote(sq("C8")).is_err());
        assert_eq!(game.piece_owner(sq("C8")), Some(Color::White));
    }

    #[test]
    fn test_promote_mid_board_is_refused() {
        let mut game = Game::new();
        assert!(game.promote(sq("E2")).is_err());
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.turn(), Color::White);
    }
}
