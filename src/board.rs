use std::fmt;
use std::str::FromStr;

use crate::error::{GameError, ParseSquareError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Rooks and kings remember whether they have moved, for castling.
    pub fn tracks_moves(&self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::King)
    }

    fn symbol(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank holding this side's king and rooks at the start of a game.
    pub fn home_rank(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank direction this side's pawns advance in.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    /// Set on the first successful move of a rook or king, never cleared.
    pub moved: bool,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self {
            color,
            kind,
            moved: false,
        }
    }

    fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.symbol(),
            Color::Black => self.kind.symbol().to_ascii_lowercase(),
        }
    }
}

/// A board coordinate. `x` is the file (A-H), `y` the rank (1-8), both in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    x: u8,
    y: u8,
}

impl Square {
    pub fn new(x: u8, y: u8) -> Option<Self> {
        if x < 8 && y < 8 {
            Some(Self { x, y })
        } else {
            None
        }
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    /// Compact integer key `x * 10 + y`. Only unique while both axes stay below 10.
    pub fn key(&self) -> u8 {
        self.x * 10 + self.y
    }

    /// The square `(dx, dy)` away, or `None` if that falls off the board.
    pub fn offset(&self, dx: i8, dy: i8) -> Option<Square> {
        let x = self.x as i8 + dx;
        let y = self.y as i8 + dy;
        if (0..8).contains(&x) && (0..8).contains(&y) {
            Some(Square {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..8).flat_map(|x| (0..8).map(move |y| Square { x, y }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.x) as char, self.y + 1)
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file.to_ascii_uppercase(), rank),
            _ => return Err(ParseSquareError::Format(s.to_string())),
        };
        if !('A'..='H').contains(&file) {
            return Err(ParseSquareError::File(file));
        }
        if !('1'..='8').contains(&rank) {
            return Err(ParseSquareError::Rank(rank));
        }
        Ok(Square {
            x: file as u8 - b'A',
            y: rank as u8 - b'1',
        })
    }
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Indexed `[x][y]`.
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for (x, &kind) in BACK_RANK.iter().enumerate() {
            board.squares[x][0] = Some(Piece::new(Color::White, kind));
            board.squares[x][1] = Some(Piece::new(Color::White, PieceKind::Pawn));
            board.squares[x][6] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            board.squares[x][7] = Some(Piece::new(Color::Black, kind));
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    pub fn get_piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.x as usize][square.y as usize]
    }

    /// Puts `piece` on `square`, returning whatever stood there. For setting up positions.
    pub fn place(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.squares[square.x as usize][square.y as usize].replace(piece)
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.x as usize][square.y as usize].take()
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get_piece_at(square).is_none()
    }

    pub fn is_enemy(&self, square: Square, color: Color) -> bool {
        matches!(self.get_piece_at(square), Some(piece) if piece.color != color)
    }

    /// Empty or held by the other side.
    pub fn is_open_to(&self, square: Square, color: Color) -> bool {
        self.get_piece_at(square).map_or(true, |piece| piece.color != color)
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| self.get_piece_at(square).map(|p| (square, p)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Rank a pawn of `color` promotes on.
    pub fn promotion_rank(color: Color) -> u8 {
        color.opposite().home_rank()
    }

    /// Checks that each side has exactly one king.
    pub fn validate(&self) -> Result<(), GameError> {
        for color in [Color::White, Color::Black] {
            let kings = self
                .pieces_of(color)
                .filter(|(_, piece)| piece.kind == PieceKind::King)
                .count();
            match kings {
                0 => return Err(GameError::MissingKing(color)),
                1 => {}
                _ => return Err(GameError::DuplicateKing(color)),
            }
        }
        Ok(())
    }

    /// Moves the piece on `from` to `to` without any rule checks, returning the captured piece.
    ///
    /// A king travelling two files is a castle and drags its rook along. Rooks and kings
    /// get their `moved` flag set. Used both to commit moves and to simulate them on clones.
    pub fn make_move(&mut self, from: Square, to: Square) -> Option<Piece> {
        let mut piece = self.remove(from)?;
        if piece.kind.tracks_moves() {
            piece.moved = true;
        }

        if piece.kind == PieceKind::King && (to.x as i8 - from.x as i8).abs() == 2 {
            let (rook_x, rook_to_x) = if to.x > from.x { (7, 5) } else { (0, 3) };
            if let (Some(rook_from), Some(rook_to)) =
                (Square::new(rook_x, from.y), Square::new(rook_to_x, from.y))
            {
                if let Some(mut rook) = self.remove(rook_from) {
                    rook.moved = true;
                    self.place(rook_to, rook);
                }
            }
        }

        self.place(to, piece)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..8u8).rev() {
            write!(f, "{} ", y + 1)?;
            for x in 0..8u8 {
                let symbol = self.squares[x as usize][y as usize].map_or('.', |p| p.symbol());
                write!(f, "{}", symbol)?;
                if x < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  A B C D E F G H")
    }
}
