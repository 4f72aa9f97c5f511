use crate::termination::Termination;
use arbiter_core::{IllegalMove, Move, RejectReason};
use thiserror::Error;

/// A proposed move the rules refused. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("move {mv} rejected: {reason}")]
pub struct MoveRejected {
    pub mv: Move,
    pub reason: RejectReason,
}

impl From<IllegalMove> for MoveRejected {
    fn from(err: IllegalMove) -> Self {
        Self {
            mv: err.mv,
            reason: err.reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    IllegalMove(#[from] MoveRejected),
    #[error("game is over: {0}")]
    GameOver(Termination),
    #[error("the computer is about to move")]
    OpponentToMove,
    /// The rules reported no legal move in a position that is not terminal.
    #[error("no legal moves in a position that is not terminal")]
    NoLegalMoves,
    #[error("opponent turn scheduled at generation {scheduled} but session is at {current}")]
    StaleSessionAction { scheduled: u64, current: u64 },
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),
    #[error("invalid move text: {0:?}")]
    InvalidMoveText(String),
    #[error("unknown mode {0:?}, expected \"cpu\" or \"friend\"")]
    InvalidMode(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type SessionResult<T> = Result<T, SessionError>;
