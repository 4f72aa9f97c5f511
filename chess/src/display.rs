//! Plain-text rendering shared by the line and full-screen front ends.

use arbiter_core::{Color, File, Piece, PieceType, Position, Rank, Square};
use arbiter_session::Snapshot;

pub fn piece_symbol(piece: Piece) -> char {
    match (piece.piece_type, piece.color) {
        (PieceType::King, Color::White) => '♔',
        (PieceType::Queen, Color::White) => '♕',
        (PieceType::Rook, Color::White) => '♖',
        (PieceType::Bishop, Color::White) => '♗',
        (PieceType::Knight, Color::White) => '♘',
        (PieceType::Pawn, Color::White) => '♙',
        (PieceType::King, Color::Black) => '♚',
        (PieceType::Queen, Color::Black) => '♛',
        (PieceType::Rook, Color::Black) => '♜',
        (PieceType::Bishop, Color::Black) => '♝',
        (PieceType::Knight, Color::Black) => '♞',
        (PieceType::Pawn, Color::Black) => '♟',
    }
}

/// Squares of one rank from the a-file to the h-file.
pub fn rank_squares(rank: Rank) -> impl Iterator<Item = Square> {
    (0..8).filter_map(File::new).map(move |file| Square::new(file, rank))
}

/// Ranks from the eighth down to the first, as White sees the board.
pub fn ranks_top_down() -> impl Iterator<Item = Rank> {
    (0..8).rev().filter_map(Rank::new)
}

pub fn board_lines(position: &Position) -> Vec<String> {
    let mut lines = vec!["  a b c d e f g h".to_string(), "  ---------------".to_string()];
    for rank in ranks_top_down() {
        let mut line = format!("{} ", rank.to_char());
        for square in rank_squares(rank) {
            line.push(position.piece_at(square).map_or('.', piece_symbol));
            line.push(' ');
        }
        line.push_str(&format!("| {}", rank.to_char()));
        lines.push(line);
    }
    lines.push("  ---------------".to_string());
    lines.push("  a b c d e f g h".to_string());
    lines
}

/// Numbered move list: `1. e4 e5 2. Nf3`.
pub fn format_history(history: &[String]) -> String {
    history
        .chunks(2)
        .enumerate()
        .map(|(n, pair)| format!("{}. {}", n + 1, pair.join(" ")))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn status_lines(snapshot: &Snapshot) -> Vec<String> {
    let mut lines = Vec::new();
    if snapshot.is_game_over() {
        lines.push(format!("{} ({})", snapshot.message, snapshot.termination));
    } else if snapshot.opponent_pending {
        lines.push("Computer is thinking...".to_string());
    } else {
        lines.push(format!("{} to move", snapshot.side_to_move));
    }
    lines.push(format!("Mode: {}", snapshot.mode));
    if !snapshot.history.is_empty() {
        lines.push(format!("Moves: {}", format_history(&snapshot.history)));
    }
    for side in [Color::White, Color::Black] {
        let names = snapshot.captured_names(side);
        if !names.is_empty() {
            lines.push(format!("{side} captured: {}", names.join(", ")));
        }
    }
    lines
}
