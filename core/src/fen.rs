//! Forsyth-Edwards Notation, the text form positions travel in.

use crate::board::Board;
use crate::position::Position;
use crate::types::{CastlingRights, Color, File, Piece, PieceType, Rank, Square};
use std::fmt::Write;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("invalid FEN format: {0}")]
    InvalidFormat(String),
    #[error("invalid piece character: '{0}'")]
    InvalidPiece(char),
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("invalid castling rights: {0}")]
    InvalidCastling(String),
    #[error("invalid en passant square: {0}")]
    InvalidEnPassant(String),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("{0} has {1} kings, expected exactly one")]
    KingCount(Color, usize),
}

impl Position {
    /// Parses all six FEN fields, e.g. [`positions::STARTING`].
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let [placement, side, castling, en_passant, halfmove, fullmove] = fields[..] else {
            return Err(FenError::InvalidFormat(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        };

        let board = parse_placement(placement)?;
        for color in [Color::White, Color::Black] {
            match board.squares_of(PieceType::King, color).count() {
                1 => {}
                kings => return Err(FenError::KingCount(color, kings)),
            }
        }

        Ok(Position {
            board,
            turn: parse_side(side)?,
            castling: parse_castling(castling)?,
            en_passant: parse_en_passant(en_passant)?,
            halfmove_clock: parse_counter(halfmove)?,
            fullmove_number: parse_counter(fullmove)?,
        })
    }

    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {}",
            self.repetition_key(),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// The FEN fields that identify a position for repetition purposes:
    /// placement, side to move, castling rights and en passant square.
    pub fn repetition_key(&self) -> String {
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |square| square.to_string());
        format!(
            "{} {} {} {}",
            write_placement(&self.board),
            match self.turn {
                Color::White => 'w',
                Color::Black => 'b',
            },
            write_castling(self.castling),
            en_passant
        )
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

fn parse_placement(placement: &str) -> Result<Board, FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::InvalidFormat(format!(
            "expected 8 ranks, got {}",
            rows.len()
        )));
    }

    let mut board = Board::empty();
    // rank 8 comes first
    for (rank, row) in (0..8u8).rev().filter_map(Rank::new).zip(rows) {
        let mut filled = 0u8;
        for ch in row.chars() {
            if let Some(run) = ch.to_digit(10) {
                filled = filled.saturating_add(run as u8);
                continue;
            }
            let file = File::new(filled).ok_or_else(|| {
                FenError::InvalidFormat(format!("too many squares in rank {}", rank.to_char()))
            })?;
            let piece = Piece::from_char(ch).ok_or(FenError::InvalidPiece(ch))?;
            board.set_piece(Square::new(file, rank), Some(piece));
            filled += 1;
        }
        if filled != 8 {
            return Err(FenError::InvalidFormat(format!(
                "rank {} covers {filled} squares",
                rank.to_char()
            )));
        }
    }
    Ok(board)
}

fn write_placement(board: &Board) -> String {
    let mut rows = Vec::with_capacity(8);
    for rank in (0..8u8).rev().filter_map(Rank::new) {
        let mut row = String::new();
        let mut gap = 0u8;
        for file in (0..8u8).filter_map(File::new) {
            let Some(piece) = board.piece_at(Square::new(file, rank)) else {
                gap += 1;
                continue;
            };
            if gap > 0 {
                let _ = write!(row, "{gap}");
                gap = 0;
            }
            row.push(piece.to_char());
        }
        if gap > 0 {
            let _ = write!(row, "{gap}");
        }
        rows.push(row);
    }
    rows.join("/")
}

fn parse_side(field: &str) -> Result<Color, FenError> {
    match field {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(FenError::InvalidColor(field.to_string())),
    }
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }
    for ch in field.chars() {
        let flag = match ch {
            'K' => &mut rights.white.kingside,
            'Q' => &mut rights.white.queenside,
            'k' => &mut rights.black.kingside,
            'q' => &mut rights.black.queenside,
            _ => return Err(FenError::InvalidCastling(field.to_string())),
        };
        *flag = true;
    }
    Ok(rights)
}

fn write_castling(rights: CastlingRights) -> String {
    let flags: String = [
        (rights.white.kingside, 'K'),
        (rights.white.queenside, 'Q'),
        (rights.black.kingside, 'k'),
        (rights.black.queenside, 'q'),
    ]
    .into_iter()
    .filter_map(|(set, letter)| set.then_some(letter))
    .collect();

    if flags.is_empty() {
        "-".to_string()
    } else {
        flags
    }
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    match field {
        "-" => Ok(None),
        _ => field
            .parse()
            .map(Some)
            .map_err(|_| FenError::InvalidEnPassant(field.to_string())),
    }
}

fn parse_counter(field: &str) -> Result<u16, FenError> {
    field
        .parse()
        .map_err(|_| FenError::InvalidNumber(field.to_string()))
}

/// Well-known FEN positions.
pub mod positions {
    pub const STARTING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Kiwipete, a move-generation stress position.
    pub const KIWIPETE: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    pub const AFTER_E4_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position_round_trips() {
        let position: Position = positions::STARTING.parse().unwrap();
        assert_eq!(position, Position::new());
        assert_eq!(position.to_fen(), positions::STARTING);
    }

    #[test]
    fn test_kiwipete_round_trips() {
        let position = Position::from_fen(positions::KIWIPETE).unwrap();
        assert_eq!(position.side_to_move(), Color::White);

        assert_eq!(
            position.piece_at("e1".parse().unwrap()),
            Some(Piece::new(PieceType::King, Color::White))
        );
        assert_eq!(position.to_fen(), positions::KIWIPETE);
    }

    #[test]
    fn test_en_passant_target() {
        let position = Position::from_fen(positions::AFTER_E4_E5).unwrap();
        assert_eq!(position.en_passant(), Some("e6".parse().unwrap()));
    }

    #[test]
    fn test_repetition_key_ignores_clocks() {
        let a = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let b = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 7 12").unwrap();
        assert_ne!(a.to_fen(), b.to_fen());
        assert_eq!(a.repetition_key(), b.repetition_key());
    }

    #[test]
    fn test_malformed_fen_is_rejected() {
        assert!(Position::from_fen("invalid").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").is_err());
        assert_eq!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenError::InvalidColor("x".to_string()))
        );
        assert_eq!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQ1BNR w - - 0 1"),
            Err(FenError::KingCount(Color::White, 0))
        );
        let nine_pawns = "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";
        assert!(Position::from_fen(nine_pawns).is_err());
    }
}
