//! Applies one proposed move through the rules oracle.
//!
//! The applier owns no legality logic: it forwards the move, and either
//! returns the oracle's new position with a [`MoveRecord`], or a rejection
//! with nothing changed.

use crate::error::{MoveRejected, SessionError};
use crate::record::MoveRecord;
use arbiter_core::{Move, PieceType, PositionOracle, Square};
use std::str::FromStr;

/// A move as proposed by a player: origin, destination, and an optional
/// promotion piece.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ProposedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl ProposedMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, kind: PieceType) -> Self {
        self.promotion = Some(kind);
        self
    }

    /// Parses the two square names a board hands over after a drag and drop.
    pub fn from_squares(from: &str, to: &str) -> Result<Self, SessionError> {
        let parse = |s: &str| {
            s.parse::<Square>()
                .map_err(|_| SessionError::InvalidSquare(s.to_string()))
        };
        Ok(Self::new(parse(from)?, parse(to)?))
    }

    /// The move sent to the oracle. Pawns reaching the last rank become a
    /// queen unless another piece was asked for.
    fn to_move(self) -> Move {
        Move::new_promotion(
            self.from,
            self.to,
            self.promotion.unwrap_or(PieceType::Queen),
        )
    }
}

/// Coordinate notation: `e2e4`, `e7e8n`.
impl FromStr for ProposedMove {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || SessionError::InvalidMoveText(s.to_string());
        if !(4..=5).contains(&s.len()) || !s.is_ascii() {
            return Err(invalid());
        }

        let mut proposed = Self::from_squares(&s[0..2], &s[2..4]).map_err(|_| invalid())?;
        if let Some(letter) = s[4..].chars().next() {
            proposed.promotion = Some(PieceType::from_letter(letter).ok_or_else(invalid)?);
        }
        Ok(proposed)
    }
}

impl From<Move> for ProposedMove {
    fn from(mv: Move) -> Self {
        Self {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        }
    }
}

/// A move the oracle accepted.
#[derive(Clone, Debug, PartialEq)]
pub struct Applied<P> {
    pub position: P,
    pub record: MoveRecord,
}

/// Validates and plays `proposed` against `position`.
///
/// `position` is never modified; on success the result carries a new one.
pub fn apply<O: PositionOracle>(
    oracle: &O,
    position: &O::Position,
    proposed: ProposedMove,
) -> Result<Applied<O::Position>, MoveRejected> {
    let applied = oracle.apply_move(position, proposed.to_move())?;

    Ok(Applied {
        record: MoveRecord {
            notation: applied.notation,
            uci: applied.mv.to_string(),
            mover: applied.mover,
            captured: applied.captured,
        },
        position: applied.position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::{Color, Position, RejectReason, StandardRules};

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_apply_legal_move() {
        let rules = StandardRules;
        let start = Position::new();
        let applied = apply(&rules, &start, ProposedMove::new(sq("g1"), sq("f3"))).unwrap();

        assert_eq!(applied.record.notation, "Nf3");
        assert_eq!(applied.record.uci, "g1f3");
        assert_eq!(applied.record.mover, Color::White);
        assert_eq!(applied.record.captured, None);
        assert_eq!(applied.position.side_to_move(), Color::Black);
    }

    #[test]
    fn test_rejected_move_leaves_position() {
        let rules = StandardRules;
        let start = Position::new();
        let err = apply(&rules, &start, ProposedMove::new(sq("e2"), sq("e5"))).unwrap_err();

        assert_eq!(err.reason, RejectReason::NotLegal);
        assert_eq!(start, Position::new());
    }

    #[test]
    fn test_default_promotion_is_queen() {
        let rules = StandardRules;
        let position = Position::from_fen("8/1P5k/8/8/8/8/8/K7 w - - 0 1").unwrap();

        let queen = apply(&rules, &position, ProposedMove::new(sq("b7"), sq("b8"))).unwrap();
        assert_eq!(queen.record.notation, "b8=Q");
        assert_eq!(queen.record.uci, "b7b8q");

        let rook = ProposedMove::new(sq("b7"), sq("b8")).with_promotion(PieceType::Rook);
        let applied = apply(&rules, &position, rook).unwrap();
        assert_eq!(applied.record.notation, "b8=R");
    }

    #[test]
    fn test_capture_is_recorded() {
        let rules = StandardRules;
        let position =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                .unwrap();
        let applied = apply(&rules, &position, "e4d5".parse().unwrap()).unwrap();

        assert_eq!(applied.record.notation, "exd5");
        assert_eq!(applied.record.captured, Some(PieceType::Pawn));
    }

    #[test]
    fn test_parse_proposed_move() {
        let mv: ProposedMove = "e7e8n".parse().unwrap();
        assert_eq!(mv.from, sq("e7"));
        assert_eq!(mv.to, sq("e8"));
        assert_eq!(mv.promotion, Some(PieceType::Knight));

        assert!("e2".parse::<ProposedMove>().is_err());
        assert!("e2e9".parse::<ProposedMove>().is_err());
        assert!("e7e8x".parse::<ProposedMove>().is_err());
        assert!(ProposedMove::from_squares("z1", "e4").is_err());
    }
}
