use crate::board::{Board, Color, PieceKind, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1), (1, 2), (-1, 2), (-2, 1),
    (-2, -1), (-1, -2), (1, -2), (2, -1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1),
    (-1, 0), (-1, -1), (0, -1), (1, -1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Target squares for the piece on `square` by movement geometry and occupancy alone.
///
/// Moves that would expose the mover's own king are included; see
/// [`crate::rules::legal_moves`] for the filtered set. Empty if `square` is empty.
pub fn pseudo_legal_moves(board: &Board, square: Square) -> Vec<Square> {
    let piece = match board.get_piece_at(square) {
        Some(piece) => piece,
        None => return Vec::new(),
    };

    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, square, piece.color),
        PieceKind::King => {
            let mut moves = step_moves(board, square, piece.color, &KING_OFFSETS);
            moves.extend(castling_targets(board, square));
            moves
        }
        _ => attacks(board, square),
    }
}

/// Squares the piece on `square` threatens.
///
/// Matches the pseudo-legal targets except that pawns threaten both forward
/// diagonals whether or not an enemy stands there, pawn pushes threaten nothing,
/// and castling never captures.
pub fn attacks(board: &Board, square: Square) -> Vec<Square> {
    let piece = match board.get_piece_at(square) {
        Some(piece) => piece,
        None => return Vec::new(),
    };

    match piece.kind {
        PieceKind::Pawn => {
            let forward = piece.color.forward();
            [-1, 1]
                .iter()
                .filter_map(|&dx| square.offset(dx, forward))
                .filter(|&target| board.is_open_to(target, piece.color))
                .collect()
        }
        PieceKind::Knight => step_moves(board, square, piece.color, &KNIGHT_OFFSETS),
        PieceKind::Bishop => slide_moves(board, square, piece.color, &DIAGONALS),
        PieceKind::Rook => slide_moves(board, square, piece.color, &ORTHOGONALS),
        PieceKind::Queen => {
            let mut moves = slide_moves(board, square, piece.color, &DIAGONALS);
            moves.extend(slide_moves(board, square, piece.color, &ORTHOGONALS));
            moves
        }
        PieceKind::King => step_moves(board, square, piece.color, &KING_OFFSETS),
    }
}

fn pawn_moves(board: &Board, from: Square, color: Color) -> Vec<Square> {
    let mut moves = Vec::new();
    let forward = color.forward();

    // Pushes
    if let Some(one) = from.offset(0, forward).filter(|&s| board.is_empty(s)) {
        moves.push(one);
        let start_rank = (color.home_rank() as i8 + forward) as u8;
        if from.y() == start_rank {
            if let Some(two) = one.offset(0, forward).filter(|&s| board.is_empty(s)) {
                moves.push(two);
            }
        }
    }

    // Captures
    for dx in [-1, 1] {
        if let Some(target) = from.offset(dx, forward) {
            if board.is_enemy(target, color) {
                moves.push(target);
            }
        }
    }

    moves
}

fn step_moves(board: &Board, from: Square, color: Color, offsets: &[(i8, i8)]) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(dx, dy)| from.offset(dx, dy))
        .filter(|&target| board.is_open_to(target, color))
        .collect()
}

fn slide_moves(board: &Board, from: Square, color: Color, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut moves = Vec::new();
    for &(dx, dy) in directions {
        let mut current = from;
        while let Some(target) = current.offset(dx, dy) {
            match board.get_piece_at(target) {
                None => moves.push(target),
                Some(other) => {
                    if other.color != color {
                        moves.push(target);
                    }
                    break;
                }
            }
            current = target;
        }
    }
    moves
}

/// Castling targets that pass the unmoved-king, clear-path and unmoved-rook checks.
///
/// Whether the king is attacked on the way is left to the legality layer.
pub fn castling_targets(board: &Board, king_square: Square) -> Vec<Square> {
    let king = match board.get_piece_at(king_square) {
        Some(piece) if piece.kind == PieceKind::King => piece,
        _ => return Vec::new(),
    };
    let rank = king.color.home_rank();
    if king.moved || king_square.x() != 4 || king_square.y() != rank {
        return Vec::new();
    }

    let mut targets = Vec::new();
    // (rook file, squares that must be empty, king destination file)
    let sides: [(u8, &[u8], u8); 2] = [(7, &[5, 6], 6), (0, &[1, 2, 3], 2)];
    for (rook_x, between, target_x) in sides {
        let path_clear = between
            .iter()
            .filter_map(|&x| Square::new(x, rank))
            .all(|s| board.is_empty(s));
        if !path_clear {
            continue;
        }
        let rook_ready = Square::new(rook_x, rank)
            .and_then(|s| board.get_piece_at(s))
            .map_or(false, |rook| {
                rook.kind == PieceKind::Rook && rook.color == king.color && !rook.moved
            });
        if rook_ready {
            targets.extend(Square::new(target_x, rank));
        }
    }
    targets
}

/// Whether moving the piece on `from` to `to` is a castle.
pub fn is_castling_move(board: &Board, from: Square, to: Square) -> bool {
    matches!(board.get_piece_at(from), Some(piece) if piece.kind == PieceKind::King)
        && from.y() == to.y()
        && (to.x() as i8 - from.x() as i8).abs() == 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn sorted(mut moves: Vec<Square>) -> Vec<Square> {
        moves.sort();
        moves
    }

    fn squares(names: &[&str]) -> Vec<Square> {
        sorted(names.iter().map(|s| sq(s)).collect())
    }

    #[test]
    fn test_initial_position_move_counts() {
        let board = Board::new();
        let total: usize = board
            .pieces_of(Color::White)
            .map(|(square, _)| pseudo_legal_moves(&board, square).len())
            .sum();
        // 16 pawn pushes + 4 knight moves
        assert_eq!(total, 20);
    }

    #[test]
    fn test_knight_in_corner() {
        let mut board = Board::empty();
        board.place(sq("B1"), Piece::new(Color::White, PieceKind::Knight));
        assert_eq!(sorted(pseudo_legal_moves(&board, sq("B1"))), squares(&["A3", "C3", "D2"]));

        board.place(sq("D2"), Piece::new(Color::White, PieceKind::Pawn));
        board.place(sq("C3"), Piece::new(Color::Black, PieceKind::Pawn));
        assert_eq!(sorted(pseudo_legal_moves(&board, sq("B1"))), squares(&["A3", "C3"]));
    }

    #[test]
    fn test_pawn_pushes_and_captures() {
        let mut board = Board::empty();
        board.place(sq("E2"), Piece::new(Color::White, PieceKind::Pawn));
        assert_eq!(sorted(pseudo_legal_moves(&board, sq("E2"))), squares(&["E3", "E4"]));

        // Blocked double push, diagonal capture only onto an enemy
        board.place(sq("E4"), Piece::new(Color::Black, PieceKind::Knight));
        board.place(sq("D3"), Piece::new(Color::Black, PieceKind::Bishop));
        board.place(sq("F3"), Piece::new(Color::White, PieceKind::Bishop));
        assert_eq!(sorted(pseudo_legal_moves(&board, sq("E2"))), squares(&["D3", "E3"]));

        // Fully blocked
        board.place(sq("E3"), Piece::new(Color::Black, PieceKind::Rook));
        assert_eq!(sorted(pseudo_legal_moves(&board, sq("E2"))), squares(&["D3"]));
    }

    #[test]
    fn test_black_pawn_moves_down() {
        let mut board = Board::empty();
        board.place(sq("D7"), Piece::new(Color::Black, PieceKind::Pawn));
        board.place(sq("C6"), Piece::new(Color::White, PieceKind::Pawn));
        assert_eq!(sorted(pseudo_legal_moves(&board, sq("D7"))), squares(&["C6", "D5", "D6"]));

        // Off the starting rank there is no double push
        board.place(sq("D5"), Piece::new(Color::Black, PieceKind::Pawn));
        assert_eq!(sorted(pseudo_legal_moves(&board, sq("D5"))), squares(&["D4"]));
    }

    #[test]
    fn test_rays_stop_at_blockers() {
        let mut board = Board::empty();
        board.place(sq("D4"), Piece::new(Color::White, PieceKind::Rook));
        board.place(sq("D6"), Piece::new(Color::Black, PieceKind::Pawn));
        board.place(sq("F4"), Piece::new(Color::White, PieceKind::Pawn));
        assert_eq!(
            sorted(pseudo_legal_moves(&board, sq("D4"))),
            squares(&["D5", "D6", "D3", "D2", "D1", "E4", "C4", "B4", "A4"])
        );

        board.place(sq("B2"), Piece::new(Color::White, PieceKind::Bishop));
        assert_eq!(
            sorted(pseudo_legal_moves(&board, sq("B2"))),
            squares(&["A1", "C1", "A3", "C3"])
        );
    }

    #[test]
    fn test_queen_on_empty_board() {
        let mut board = Board::empty();
        board.place(sq("D4"), Piece::new(Color::Black, PieceKind::Queen));
        assert_eq!(pseudo_legal_moves(&board, sq("D4")).len(), 27);
    }

    #[test]
    fn test_king_steps_and_castling() {
        let mut board = Board::empty();
        board.place(sq("E1"), Piece::new(Color::White, PieceKind::King));
        board.place(sq("H1"), Piece::new(Color::White, PieceKind::Rook));
        board.place(sq("A1"), Piece::new(Color::White, PieceKind::Rook));

        let moves = pseudo_legal_moves(&board, sq("E1"));
        assert!(moves.contains(&sq("G1")));
        assert!(moves.contains(&sq("C1")));
        assert_eq!(moves.len(), 7);
        assert!(!attacks(&board, sq("E1")).contains(&sq("G1")));
    }

    #[test]
    fn test_castling_preconditions() {
        let mut board = Board::empty();
        board.place(sq("E8"), Piece::new(Color::Black, PieceKind::King));
        board.place(sq("H8"), Piece::new(Color::Black, PieceKind::Rook));
        board.place(sq("A8"), Piece::new(Color::Black, PieceKind::Rook));
        assert_eq!(sorted(castling_targets(&board, sq("E8"))), squares(&["C8", "G8"]));

        // A piece on B8 blocks the long castle
        board.place(sq("B8"), Piece::new(Color::Black, PieceKind::Knight));
        assert_eq!(castling_targets(&board, sq("E8")), vec![sq("G8")]);

        // Moved rook
        let mut rook = Piece::new(Color::Black, PieceKind::Rook);
        rook.moved = true;
        board.place(sq("H8"), rook);
        assert!(castling_targets(&board, sq("E8")).is_empty());

        // Enemy rook on the corner does not count
        board.remove(sq("B8"));
        board.place(sq("A8"), Piece::new(Color::White, PieceKind::Rook));
        assert!(castling_targets(&board, sq("E8")).is_empty());
    }

    #[test]
    fn test_moved_king_cannot_castle() {
        let mut board = Board::empty();
        let mut king = Piece::new(Color::White, PieceKind::King);
        king.moved = true;
        board.place(sq("E1"), king);
        board.place(sq("H1"), Piece::new(Color::White, PieceKind::Rook));
        assert!(castling_targets(&board, sq("E1")).is_empty());
        assert!(!pseudo_legal_moves(&board, sq("E1")).contains(&sq("G1")));
    }

    #[test]
    fn test_pawn_attacks_cover_empty_diagonals() {
        let mut board = Board::empty();
        board.place(sq("E7"), Piece::new(Color::Black, PieceKind::Pawn));
        assert_eq!(sorted(attacks(&board, sq("E7"))), squares(&["D6", "F6"]));
        assert_eq!(sorted(pseudo_legal_moves(&board, sq("E7"))), squares(&["E5", "E6"]));
    }

    #[test]
    fn test_empty_square_has_no_moves() {
        assert!(pseudo_legal_moves(&Board::new(), sq("E4")).is_empty());
    }
}
