//! Standard algebraic notation (SAN) for moves, as shown in move lists:
//! `e4`, `Nf3`, `exd5`, `Rad1`, `e8=Q+`, `O-O`, `Qh4#`.

use crate::movegen::{generate_legal_moves, is_checkmate};
use crate::position::Position;
use crate::types::{Move, PieceType};

/// Renders a legal move from `before` in SAN.
///
/// `after` is the position the move leads to; it decides the `+`/`#` suffix.
pub fn to_san(before: &Position, mv: Move, after: &Position) -> String {
    let Some(piece) = before.piece_at(mv.from) else {
        return mv.to_string();
    };

    let mut san = if mv.is_castle(piece) {
        if mv.to.file() > mv.from.file() {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        }
    } else {
        let is_capture = before.piece_at(mv.to).is_some()
            || (piece.piece_type == PieceType::Pawn && mv.from.file() != mv.to.file());
        let mut san = String::new();

        if piece.piece_type == PieceType::Pawn {
            if is_capture {
                san.push(mv.from.file().to_char());
            }
        } else {
            san.push(piece.piece_type.letter());
            san.push_str(&disambiguation(before, mv, piece.piece_type));
        }

        if is_capture {
            san.push('x');
        }
        san.push_str(&mv.to.to_string());

        if let Some(promotion) = mv.promotion {
            san.push('=');
            san.push(promotion.letter());
        }
        san
    };

    if is_checkmate(after) {
        san.push('#');
    } else if after.is_in_check() {
        san.push('+');
    }
    san
}

/// File, rank, or full square of the origin when another piece of the same
/// kind could also reach the destination.
fn disambiguation(before: &Position, mv: Move, kind: PieceType) -> String {
    let rivals: Vec<Move> = generate_legal_moves(before)
        .into_iter()
        .filter(|other| {
            other.to == mv.to
                && other.from != mv.from
                && before.piece_at(other.from).map(|p| p.piece_type) == Some(kind)
        })
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let shares_file = rivals.iter().any(|r| r.from.file() == mv.from.file());
    let shares_rank = rivals.iter().any(|r| r.from.rank() == mv.from.rank());

    if !shares_file {
        mv.from.file().to_char().to_string()
    } else if !shares_rank {
        mv.from.rank().to_char().to_string()
    } else {
        mv.from.to_string()
    }
}
