//! Game-state orchestration for a chess board shared by a human and either
//! the computer or a second human.
//!
//! [`GameManager`] owns the session. Moves go through the [`applier`], which
//! defers every legality question to an [`arbiter_core::PositionOracle`];
//! the [`opponent`] answers human moves in `cpu` mode after a short delay.

pub mod applier;
pub mod config;
pub mod error;
pub mod manager;
pub mod opponent;
pub mod record;
pub mod schedule;
pub mod snapshot;
pub mod termination;

pub use applier::{apply, Applied, ProposedMove};
pub use config::{Mode, SessionConfig, DEFAULT_OPPONENT_DELAY_MS};
pub use error::{MoveRejected, SessionError, SessionResult};
pub use manager::{GameManager, GameSession, MoveOutcome};
pub use opponent::{MoveSelector, OpponentDriver, RandomSelector};
pub use record::{CaptureLedger, MoveRecord};
pub use schedule::{Clock, FakeClock, PendingTurn, SystemClock};
pub use snapshot::Snapshot;
pub use termination::{evaluate, Termination, REPETITION_LIMIT};
