//! The rules boundary consumed by the game session.
//!
//! A [`PositionOracle`] answers every question about chess legality: which
//! moves are legal, what a move leads to, and whether a position is
//! terminal. Callers treat it as a black box and never second-guess it.

use crate::movegen::{generate_legal_moves, is_checkmate, is_stalemate};
use crate::position::Position;
use crate::san::to_san;
use crate::types::{Color, Move, PieceType, Square};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a position is drawn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    Stalemate,
    FiftyMoveRule,
    InsufficientMaterial,
    ThreefoldRepetition,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::FiftyMoveRule => "fifty-move rule",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::ThreefoldRepetition => "threefold repetition",
        };
        f.write_str(text)
    }
}

/// Why the oracle refused a move.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RejectReason {
    NoPieceOnSquare(Square),
    WrongSideToMove(Color),
    NotLegal,
    InvalidPromotion(PieceType),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoPieceOnSquare(square) => write!(f, "no piece on {square}"),
            RejectReason::WrongSideToMove(color) => write!(f, "it is {color}'s turn"),
            RejectReason::NotLegal => f.write_str("not a legal move"),
            RejectReason::InvalidPromotion(kind) => write!(f, "cannot promote to {kind}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("illegal move {mv}: {reason}")]
pub struct IllegalMove {
    pub mv: Move,
    pub reason: RejectReason,
}

/// Everything the oracle reports about a move it accepted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppliedMove<P> {
    pub position: P,
    /// The move as played, with the promotion piece resolved.
    pub mv: Move,
    /// Standard algebraic notation, e.g. `Nxe5+`.
    pub notation: String,
    pub captured: Option<PieceType>,
    pub mover: Color,
    pub next_to_move: Color,
}

pub trait PositionOracle {
    type Position: Clone + PartialEq + fmt::Debug;

    /// The canonical starting position.
    fn start_position(&self) -> Self::Position;

    fn legal_moves(&self, position: &Self::Position) -> Vec<Move>;

    /// Validates and plays `mv`.
    ///
    /// `mv.promotion` is only consulted when the move really is a pawn
    /// reaching the last rank; it is ignored for every other move.
    fn apply_move(
        &self,
        position: &Self::Position,
        mv: Move,
    ) -> Result<AppliedMove<Self::Position>, IllegalMove>;

    fn is_checkmate(&self, position: &Self::Position) -> bool;

    fn draw_reason(&self, position: &Self::Position) -> Option<DrawReason>;

    fn is_draw(&self, position: &Self::Position) -> bool {
        self.draw_reason(position).is_some()
    }

    fn is_game_over(&self, position: &Self::Position) -> bool {
        self.is_checkmate(position) || self.is_draw(position)
    }

    fn side_to_move(&self, position: &Self::Position) -> Color;

    /// Serialized form handed to the presentation layer (FEN).
    fn to_fen(&self, position: &Self::Position) -> String;

    /// Identifies positions that count as the same for repetition.
    fn repetition_key(&self, position: &Self::Position) -> String;
}

/// Standard chess rules backed by this crate's move generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

impl PositionOracle for StandardRules {
    type Position = Position;

    fn start_position(&self) -> Position {
        Position::new()
    }

    fn legal_moves(&self, position: &Position) -> Vec<Move> {
        generate_legal_moves(position)
    }

    fn apply_move(
        &self,
        position: &Position,
        mv: Move,
    ) -> Result<AppliedMove<Position>, IllegalMove> {
        let reject = |reason| IllegalMove { mv, reason };

        let piece = position
            .piece_at(mv.from)
            .ok_or_else(|| reject(RejectReason::NoPieceOnSquare(mv.from)))?;
        if piece.color != position.side_to_move() {
            return Err(reject(RejectReason::WrongSideToMove(position.side_to_move())));
        }

        let candidates: Vec<Move> = generate_legal_moves(position)
            .into_iter()
            .filter(|legal| legal.from == mv.from && legal.to == mv.to)
            .collect();

        let played = match candidates.as_slice() {
            [] => return Err(reject(RejectReason::NotLegal)),
            [only] if only.promotion.is_none() => *only,
            promotions => {
                let wanted = mv.promotion.unwrap_or(PieceType::Queen);
                promotions
                    .iter()
                    .copied()
                    .find(|legal| legal.promotion == Some(wanted))
                    .ok_or_else(|| reject(RejectReason::InvalidPromotion(wanted)))?
            }
        };

        let (next, captured) = position.play_unchecked(played);
        let notation = to_san(position, played, &next);

        Ok(AppliedMove {
            mover: position.side_to_move(),
            next_to_move: next.side_to_move(),
            position: next,
            mv: played,
            notation,
            captured: captured.map(|p| p.piece_type),
        })
    }

    fn is_checkmate(&self, position: &Position) -> bool {
        is_checkmate(position)
    }

    fn draw_reason(&self, position: &Position) -> Option<DrawReason> {
        if is_stalemate(position) {
            Some(DrawReason::Stalemate)
        } else if position.is_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if position.is_fifty_move_draw() {
            Some(DrawReason::FiftyMoveRule)
        } else {
            None
        }
    }

    fn side_to_move(&self, position: &Position) -> Color {
        position.side_to_move()
    }

    fn to_fen(&self, position: &Position) -> String {
        position.to_fen()
    }

    fn repetition_key(&self, position: &Position) -> String {
        position.repetition_key()
    }
}
