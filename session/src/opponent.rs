//! The computer opponent: one uniformly random legal move per turn.

use crate::applier::{self, Applied, ProposedMove};
use crate::error::SessionError;
use arbiter_core::{Move, PositionOracle};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error};

/// Picks one move out of the legal moves of a position.
pub trait MoveSelector {
    fn select(&mut self, moves: &[Move]) -> Option<Move>;
}

impl<F> MoveSelector for F
where
    F: FnMut(&[Move]) -> Option<Move>,
{
    fn select(&mut self, moves: &[Move]) -> Option<Move> {
        self(moves)
    }
}

/// Every legal move is equally likely.
pub struct RandomSelector {
    rng: ChaCha8Rng,
}

impl RandomSelector {
    /// A selector seeded from the thread-local generator.
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    /// A reproducible selector.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveSelector for RandomSelector {
    fn select(&mut self, moves: &[Move]) -> Option<Move> {
        moves.choose(&mut self.rng).copied()
    }
}

pub struct OpponentDriver {
    selector: Box<dyn MoveSelector>,
}

impl OpponentDriver {
    pub fn new(selector: impl MoveSelector + 'static) -> Self {
        Self {
            selector: Box::new(selector),
        }
    }

    /// Chooses and plays one legal move for the side to move.
    ///
    /// A position without legal moves should already have ended the game;
    /// reaching one here is reported as [`SessionError::NoLegalMoves`].
    pub fn play_random_move<O: PositionOracle>(
        &mut self,
        oracle: &O,
        position: &O::Position,
    ) -> Result<Applied<O::Position>, SessionError> {
        let moves = oracle.legal_moves(position);
        if moves.is_empty() {
            error!("opponent asked to move in a position without legal moves");
            return Err(SessionError::NoLegalMoves);
        }

        let Some(choice) = self.selector.select(&moves) else {
            error!(candidates = moves.len(), "move selector returned nothing");
            return Err(SessionError::NoLegalMoves);
        };
        debug!(%choice, candidates = moves.len(), "opponent picked a move");

        Ok(applier::apply(oracle, position, ProposedMove::from(choice))?)
    }
}

impl Default for OpponentDriver {
    fn default() -> Self {
        Self::new(RandomSelector::new())
    }
}
