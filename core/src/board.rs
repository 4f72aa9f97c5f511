//! Piece placement on the 64 squares.

use crate::types::*;

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Array-based board, indexed by `Square::index()`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    pub const fn empty() -> Self {
        Self {
            squares: [None; 64],
        }
    }

    /// Creates the standard starting position.
    pub fn starting_position() -> Self {
        let mut board = Self::empty();

        for (file_idx, &piece_type) in BACK_RANK.iter().enumerate() {
            let file = File::new(file_idx as u8).unwrap_or(File::A);
            for color in [Color::White, Color::Black] {
                board.set_piece(
                    Square::new(file, color.back_rank()),
                    Some(Piece::new(piece_type, color)),
                );
                board.set_piece(
                    Square::new(file, color.pawn_rank()),
                    Some(Piece::new(PieceType::Pawn, color)),
                );
            }
        }

        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index() as usize]
    }

    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index() as usize] = piece;
    }

    /// Moves whatever stands on `from` to `to`.
    /// Returns the piece previously on `to`, if any.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.squares[from.index() as usize].take();
        std::mem::replace(&mut self.squares[to.index() as usize], piece)
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Returns true if the square holds a piece of the given color.
    pub fn is_color(&self, square: Square, color: Color) -> bool {
        self.piece_at(square).is_some_and(|p| p.color == color)
    }

    /// Returns true if the square holds a piece of the opposing color.
    pub fn is_enemy(&self, square: Square, color: Color) -> bool {
        self.is_color(square, color.opponent())
    }

    /// Squares holding a piece of the given kind and color, a1 first.
    pub fn squares_of(
        &self,
        piece_type: PieceType,
        color: Color,
    ) -> impl Iterator<Item = Square> + '_ {
        let wanted = Piece::new(piece_type, color);
        Square::all().filter(move |&sq| self.piece_at(sq) == Some(wanted))
    }

    /// All pieces of one color, with their squares.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(piece) if piece.color == color => Some((sq, piece)),
            _ => None,
        })
    }

    /// Finds the king of the given color.
    /// Boards built through FEN parsing or the starting position always have one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.squares_of(PieceType::King, color).next()
    }
}
