//! A complete, immutable chess position.
//!
//! Positions are never modified in place: playing a move yields a new value.

use crate::board::Board;
use crate::types::*;

pub(crate) const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub(crate) const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub(crate) const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub(crate) const STRAIGHTS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) turn: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
}

impl Position {
    /// The standard starting position.
    pub fn new() -> Self {
        Self {
            board: Board::starting_position(),
            turn: Color::White,
            castling: CastlingRights::all(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.turn
    }

    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    /// Returns true if the game is drawn by the 50-move rule.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Neither side can ever mate: bare kings, a single minor piece, or
    /// any number of bishops that all stand on squares of one colour.
    pub fn is_insufficient_material(&self) -> bool {
        let material: Vec<(Square, Piece)> = Square::all()
            .filter_map(|square| self.board.piece_at(square).map(|piece| (square, piece)))
            .filter(|(_, piece)| piece.piece_type != PieceType::King)
            .collect();

        match material.as_slice() {
            [] => true,
            [(_, lone)] => matches!(lone.piece_type, PieceType::Knight | PieceType::Bishop),
            [(first, _), ..] => material.iter().all(|&(square, piece)| {
                piece.piece_type == PieceType::Bishop && square.is_light() == first.is_light()
            }),
        }
    }

    /// Plays a move without checking that it is legal.
    /// Returns the new position and the captured piece, if any.
    pub(crate) fn play_unchecked(&self, mv: Move) -> (Self, Option<Piece>) {
        let mut next = self.clone();
        let Some(piece) = self.board.piece_at(mv.from) else {
            return (next, None);
        };

        let mut captured = next.board.move_piece(mv.from, mv.to);

        if mv.is_castle(piece) {
            let rank = mv.from.rank();
            let (rook_from, rook_to) = if mv.to.file() > mv.from.file() {
                (Square::new(File::H, rank), Square::new(File::F, rank))
            } else {
                (Square::new(File::A, rank), Square::new(File::D, rank))
            };
            next.board.move_piece(rook_from, rook_to);
        }

        if piece.piece_type == PieceType::Pawn {
            if Some(mv.to) == self.en_passant && captured.is_none() {
                let victim = Square::new(mv.to.file(), mv.from.rank());
                captured = next.board.piece_at(victim);
                next.board.set_piece(victim, None);
            }
            if let Some(promotion) = mv.promotion {
                next.board
                    .set_piece(mv.to, Some(Piece::new(promotion, piece.color)));
            }
        }

        next.en_passant = None;
        if piece.piece_type == PieceType::Pawn && mv.from.distance(mv.to) == 2 {
            let mid = (mv.from.rank().index() + mv.to.rank().index()) / 2;
            next.en_passant = Rank::new(mid).map(|rank| Square::new(mv.from.file(), rank));
        }

        if piece.piece_type == PieceType::Pawn || captured.is_some() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        next.castling = self.castling.update_after_move(mv.from, mv.to);

        if self.turn == Color::Black {
            next.fullmove_number += 1;
        }
        next.turn = self.turn.opponent();

        (next, captured)
    }

    /// Returns true if the square is attacked by any piece of `attacker`.
    pub fn is_attacked_by(&self, square: Square, attacker: Color) -> bool {
        // A pawn of `attacker` attacks `square` from one rank behind it.
        let pawn_rank = -attacker.pawn_direction();
        let by_pawn = [-1, 1].iter().any(|&df| {
            square
                .offset(df, pawn_rank)
                .is_some_and(|from| self.holds(from, PieceType::Pawn, attacker))
        });
        if by_pawn {
            return true;
        }

        let by_leaper = |deltas: &[(i8, i8)], kind: PieceType| {
            deltas.iter().any(|&(df, dr)| {
                square
                    .offset(df, dr)
                    .is_some_and(|from| self.holds(from, kind, attacker))
            })
        };
        if by_leaper(&KNIGHT_DELTAS, PieceType::Knight) || by_leaper(&KING_DELTAS, PieceType::King)
        {
            return true;
        }

        let by_slider = |dirs: &[(i8, i8)], kind: PieceType| {
            dirs.iter().any(|&(df, dr)| {
                match self.first_piece_along(square, df, dr) {
                    Some(piece) => {
                        piece.color == attacker
                            && (piece.piece_type == kind || piece.piece_type == PieceType::Queen)
                    }
                    None => false,
                }
            })
        };
        by_slider(&DIAGONALS, PieceType::Bishop) || by_slider(&STRAIGHTS, PieceType::Rook)
    }

    fn holds(&self, square: Square, kind: PieceType, color: Color) -> bool {
        self.board.piece_at(square) == Some(Piece::new(kind, color))
    }

    fn first_piece_along(&self, from: Square, df: i8, dr: i8) -> Option<Piece> {
        let mut current = from;
        while let Some(next) = current.offset(df, dr) {
            if let Some(piece) = self.board.piece_at(next) {
                return Some(piece);
            }
            current = next;
        }
        None
    }

    /// Returns true if the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        self.is_side_in_check(self.turn)
    }

    /// Returns true if the given side's king is attacked.
    /// A side without a king is never in check.
    pub fn is_side_in_check(&self, color: Color) -> bool {
        self.board
            .king_square(color)
            .is_some_and(|king| self.is_attacked_by(king, color.opponent()))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_starting_position() {
        let position = Position::new();
        assert_eq!(position.side_to_move(), Color::White);
        assert_eq!(position.castling(), CastlingRights::all());
        assert!(position.en_passant().is_none());
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 1);
        assert!(!position.is_in_check());
    }

    #[test]
    fn test_play_pawn_double_push() {
        let position = Position::new();
        let (next, captured) = position.play_unchecked(Move::new(sq("e2"), sq("e4")));

        assert!(captured.is_none());
        assert_eq!(next.side_to_move(), Color::Black);
        assert_eq!(next.en_passant(), Some(sq("e3")));
        assert_eq!(next.halfmove_clock(), 0);
        assert_eq!(next.fullmove_number(), 1);
        // the starting position is untouched
        assert_eq!(position, Position::new());
    }

    #[test]
    fn test_en_passant_capture_removes_pawn() {
        let position = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let (next, captured) = position.play_unchecked(Move::new(sq("e5"), sq("d6")));

        assert_eq!(captured, Some(Piece::new(PieceType::Pawn, Color::Black)));
        assert!(next.piece_at(sq("d5")).is_none());
        assert_eq!(
            next.piece_at(sq("d6")),
            Some(Piece::new(PieceType::Pawn, Color::White))
        );
    }

    #[test]
    fn test_castle_moves_rook() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let (next, _) = position.play_unchecked(Move::new(sq("e1"), sq("g1")));

        assert_eq!(
            next.piece_at(sq("f1")),
            Some(Piece::new(PieceType::Rook, Color::White))
        );
        assert!(next.piece_at(sq("h1")).is_none());
        assert!(!next.castling().white.any());
        assert!(next.castling().black.any());
    }

    #[test]
    fn test_is_attacked() {
        let position = Position::from_fen("7k/8/8/8/4R3/8/8/K7 w - - 0 1").unwrap();

        assert!(position.is_attacked_by(sq("e1"), Color::White));
        assert!(position.is_attacked_by(sq("e8"), Color::White));
        assert!(position.is_attacked_by(sq("a4"), Color::White));
        assert!(position.is_attacked_by(sq("h4"), Color::White));
        assert!(!position.is_attacked_by(sq("d5"), Color::White));
    }

    #[test]
    fn test_pawn_attacks_point_forward() {
        let position = Position::from_fen("7k/8/8/8/4P3/8/8/K7 w - - 0 1").unwrap();
        assert!(position.is_attacked_by(sq("d5"), Color::White));
        assert!(position.is_attacked_by(sq("f5"), Color::White));
        assert!(!position.is_attacked_by(sq("d3"), Color::White));
    }

    #[test]
    fn test_insufficient_material() {
        let cases = [
            ("7k/8/8/8/8/8/8/K7 w - - 0 1", true),
            ("7k/8/8/8/8/8/8/KB6 w - - 0 1", true),
            // two knights can still mate an uncooperative king
            ("7k/8/8/8/8/8/8/KNN5 w - - 0 1", false),
            ("5b1k/8/8/8/8/8/8/K1B5 w - - 0 1", true),
            ("5b1k/8/8/8/8/8/8/KBB5 w - - 0 1", false),
            ("6bk/8/8/8/8/8/8/K1B5 w - - 0 1", false),
            ("7k/8/8/8/8/8/8/KR6 w - - 0 1", false),
            ("7k/8/8/8/8/8/P7/K7 w - - 0 1", false),
            ("7k/7n/8/8/8/8/8/KB6 w - - 0 1", false),
        ];
        for (fen, expected) in cases {
            let position = Position::from_fen(fen).unwrap();
            assert_eq!(position.is_insufficient_material(), expected, "{fen}");
        }
    }
}
