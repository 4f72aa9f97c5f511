use arbiter_core::{Color, PieceType};
use serde::Serialize;

/// One applied move, as it appears in the move list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MoveRecord {
    /// Standard algebraic notation, e.g. `exd5`.
    pub notation: String,
    /// Coordinate notation, e.g. `e4d5`.
    pub uci: String,
    pub mover: Color,
    pub captured: Option<PieceType>,
}

/// Piece kinds each side has taken, in capture order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CaptureLedger {
    white: Vec<PieceType>,
    black: Vec<PieceType>,
}

impl CaptureLedger {
    /// Credits a capture to the side that made it.
    pub fn record(&mut self, capturer: Color, kind: PieceType) {
        match capturer {
            Color::White => self.white.push(kind),
            Color::Black => self.black.push(kind),
        }
    }

    /// Pieces captured *by* `side`.
    pub fn captured_by(&self, side: Color) -> &[PieceType] {
        match side {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn total(&self) -> usize {
        self.white.len() + self.black.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_goes_to_capturer() {
        let mut ledger = CaptureLedger::default();
        ledger.record(Color::Black, PieceType::Knight);
        ledger.record(Color::Black, PieceType::Pawn);

        assert_eq!(
            ledger.captured_by(Color::Black),
            &[PieceType::Knight, PieceType::Pawn]
        );
        assert!(ledger.captured_by(Color::White).is_empty());
        assert_eq!(ledger.total(), 2);
    }
}
