use tracing::error;

use crate::board::{Board, Color, PieceKind, Square};
use crate::config::{CastlingSafety, RuleSet};
use crate::error::GameError;
use crate::movegen::{attacks, is_castling_move, pseudo_legal_moves};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    /// The side to move is in check but has a way out.
    Check,
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        matches!(
            self,
            GameState::Checkmate { .. } | GameState::Stalemate | GameState::InsufficientMaterial
        )
    }
}

/// Whether any piece of `attacker` could move onto `square`.
pub fn is_square_attacked(board: &Board, square: Square, attacker: Color) -> bool {
    board
        .pieces_of(attacker)
        .any(|(from, _)| attacks(board, from).contains(&square))
}

/// Recomputes every enemy piece's reach and tests it against `color`'s king.
///
/// A board without that king is never in check; the missing king is logged instead.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(king) => is_square_attacked(board, king, color.opposite()),
        None => {
            error!(%color, "no king on the board, treating as not in check");
            false
        }
    }
}

/// Plays `from -> to` on a scratch copy and reports whether the mover's king survives.
///
/// Under strict castling rules a castle also needs the king out of check and an
/// unattacked transit square.
pub fn is_legal_move(board: &Board, from: Square, to: Square, rules: &RuleSet) -> bool {
    let color = match board.get_piece_at(from) {
        Some(piece) => piece.color,
        None => return false,
    };

    if rules.castling == CastlingSafety::Strict && is_castling_move(board, from, to) {
        let step = if to.x() > from.x() { 1 } else { -1 };
        let transit_attacked = from
            .offset(step, 0)
            .map_or(true, |transit| is_square_attacked(board, transit, color.opposite()));
        if transit_attacked || is_in_check(board, color) {
            return false;
        }
    }

    let mut scratch = board.clone();
    scratch.make_move(from, to);
    !is_in_check(&scratch, color)
}

/// Pseudo-legal targets of the piece on `square` that pass the self-check filter.
pub fn legal_moves(board: &Board, square: Square, rules: &RuleSet) -> Vec<Square> {
    pseudo_legal_moves(board, square)
        .into_iter()
        .filter(|&to| is_legal_move(board, square, to, rules))
        .collect()
}

pub fn has_legal_move(board: &Board, color: Color, rules: &RuleSet) -> bool {
    board.pieces_of(color).any(|(from, _)| {
        pseudo_legal_moves(board, from)
            .into_iter()
            .any(|to| is_legal_move(board, from, to, rules))
    })
}

pub fn is_checkmate(board: &Board, color: Color, rules: &RuleSet) -> bool {
    is_in_check(board, color) && !has_legal_move(board, color, rules)
}

/// No legal move while not in check, or too little material left to mate.
pub fn is_stalemate(board: &Board, color: Color, rules: &RuleSet) -> bool {
    if is_insufficient_material(board) {
        return true;
    }
    board.king_square(color).is_some()
        && !is_in_check(board, color)
        && !has_legal_move(board, color, rules)
}

/// King vs king, or king vs king and a single knight or bishop.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut extras = Vec::new();
    for (_, piece) in board.pieces() {
        if piece.kind != PieceKind::King {
            extras.push(piece.kind);
        }
    }

    match extras.as_slice() {
        [] => true,
        [PieceKind::Knight] | [PieceKind::Bishop] => true,
        _ => false,
    }
}

/// Classifies the position for the side to move.
pub fn game_state(board: &Board, to_move: Color, rules: &RuleSet) -> Result<GameState, GameError> {
    board.validate()?;

    if is_insufficient_material(board) {
        return Ok(GameState::InsufficientMaterial);
    }

    let in_check = is_in_check(board, to_move);
    let can_move = has_legal_move(board, to_move, rules);
    Ok(match (in_check, can_move) {
        (true, false) => GameState::Checkmate {
            winner: to_move.opposite(),
        },
        (false, false) => GameState::Stalemate,
        (true, true) => GameState::Check,
        (false, true) => GameState::Ongoing,
    })
}
