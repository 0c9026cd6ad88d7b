use tracing::debug;

use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::config::RuleSet;
use crate::error::{MoveError, PromotionError};
use crate::movegen::{is_castling_move, pseudo_legal_moves};
use crate::rules::is_legal_move;

/// What an accepted move did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: Square,
    pub to: Square,
    /// The piece as it stands on `to` after the move.
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub castled: bool,
    /// A pawn reached its last rank; the caller should follow up with [`promote`].
    pub promotion_due: bool,
}

/// Validates `from -> to` for `color` and commits it to `board`.
///
/// Checks run in order: the mover owns the piece on `from`, `to` is one of its
/// pseudo-legal targets, and the move does not leave the mover's king attacked.
/// The board is only touched once all three hold. Turn order is the caller's business.
pub fn execute(
    board: &mut Board,
    from: Square,
    to: Square,
    color: Color,
    rules: &RuleSet,
) -> Result<MoveOutcome, MoveError> {
    let piece = match board.get_piece_at(from) {
        Some(piece) if piece.color == color => piece,
        _ => return Err(MoveError::IllegalMove { from, to }),
    };

    if !pseudo_legal_moves(board, from).contains(&to) {
        return Err(MoveError::IllegalMove { from, to });
    }

    if !is_legal_move(board, from, to, rules) {
        return Err(MoveError::ExposesKing { from, to });
    }

    let castled = is_castling_move(board, from, to);
    let captured = board.make_move(from, to);
    let moved = board.get_piece_at(to).unwrap_or(piece);
    let promotion_due = moved.kind == PieceKind::Pawn && to.y() == Board::promotion_rank(color);

    debug!(%from, %to, ?captured, castled, promotion_due, "move applied");
    Ok(MoveOutcome {
        from,
        to,
        piece: moved,
        captured,
        castled,
        promotion_due,
    })
}

/// Swaps the pawn on `square` for a queen of the same color.
///
/// Promotion always yields a queen, and only for a pawn standing on its last rank.
pub fn promote(board: &mut Board, square: Square) -> Result<Piece, PromotionError> {
    match board.get_piece_at(square) {
        Some(pawn) if pawn.kind == PieceKind::Pawn => {
            if square.y() != Board::promotion_rank(pawn.color) {
                return Err(PromotionError::NotOnLastRank(square));
            }
            let queen = Piece::new(pawn.color, PieceKind::Queen);
            board.place(square, queen);
            debug!(%square, color = %pawn.color, "pawn promoted");
            Ok(queen)
        }
        _ => Err(PromotionError::NotAPawn(square)),
    }
}
