pub mod board;
pub mod config;
pub mod console;
pub mod error;
pub mod executor;
pub mod game;
pub mod movegen;
pub mod rules;

pub use board::{Board, Color, Piece, PieceKind, Square};
pub use config::{CastlingSafety, RuleSet};
pub use error::{GameError, MoveError, PromotionError};
pub use executor::MoveOutcome;
pub use game::Game;
pub use rules::GameState;
