use crate::config::Mode;
use crate::record::CaptureLedger;
use crate::termination::Termination;
use arbiter_core::{Color, PieceType};
use serde::Serialize;

/// Read-only view of a session, rebuilt after every change and handed to
/// whatever draws the board.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    /// Current position in FEN.
    pub fen: String,
    pub side_to_move: Color,
    /// SAN of every move played, in order.
    pub history: Vec<String>,
    pub captured_by_white: Vec<PieceType>,
    pub captured_by_black: Vec<PieceType>,
    pub termination: Termination,
    /// Game-over banner, empty while the game runs.
    pub message: String,
    pub mode: Mode,
    /// True while a computer reply is scheduled but not yet played.
    pub opponent_pending: bool,
}

impl Snapshot {
    pub(crate) fn captures_from(ledger: &CaptureLedger) -> (Vec<PieceType>, Vec<PieceType>) {
        (
            ledger.captured_by(Color::White).to_vec(),
            ledger.captured_by(Color::Black).to_vec(),
        )
    }

    /// Piece names captured by `side`, for display.
    pub fn captured_names(&self, side: Color) -> Vec<&'static str> {
        let captured = match side {
            Color::White => &self.captured_by_white,
            Color::Black => &self.captured_by_black,
        };
        captured.iter().map(|kind| kind.name()).collect()
    }

    pub fn is_game_over(&self) -> bool {
        self.termination.is_terminal()
    }
}
