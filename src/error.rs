use thiserror::Error;

use crate::board::{Color, Square};

/// Why a move was turned down. The board is left untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// No piece of the mover on `from`, or `to` is outside that piece's reach.
    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    /// The move fits the piece's geometry but would leave the mover's king attacked.
    #[error("move {from} -> {to} would leave the king in check")]
    ExposesKing { from: Square, to: Square },
}

impl MoveError {
    pub fn is_self_check(&self) -> bool {
        matches!(self, MoveError::ExposesKing { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PromotionError {
    #[error("no pawn to promote on {0}")]
    NotAPawn(Square),

    #[error("pawn on {0} has not reached the last rank")]
    NotOnLastRank(Square),
}

/// Broken board invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{0} has no king on the board")]
    MissingKing(Color),

    #[error("{0} has more than one king on the board")]
    DuplicateKing(Color),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSquareError {
    #[error("invalid square format: {0:?}")]
    Format(String),

    #[error("invalid file: {0}")]
    File(char),

    #[error("invalid rank: {0}")]
    Rank(char),
}
