//! The game session and its only writer, [`GameManager`].
//!
//! Every change to a game goes through the manager: a human move, a computer
//! reply, a mode switch, or a reset. A rejected action leaves the session
//! exactly as it was.

use crate::applier::{self, Applied, ProposedMove};
use crate::config::{Mode, SessionConfig};
use crate::error::{SessionError, SessionResult};
use crate::opponent::{MoveSelector, OpponentDriver, RandomSelector};
use crate::record::{CaptureLedger, MoveRecord};
use crate::schedule::{Clock, PendingTurn, SystemClock};
use crate::snapshot::Snapshot;
use crate::termination::{self, Termination};
use arbiter_core::{Color, PositionOracle, StandardRules};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Everything that makes up one game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession<P> {
    position: P,
    history: Vec<MoveRecord>,
    captures: CaptureLedger,
    termination: Termination,
    mode: Mode,
    /// Bumped on every change; scheduled replies are keyed to it.
    generation: u64,
    pending: Option<PendingTurn>,
    repetitions: HashMap<String, usize>,
}

impl<P> GameSession<P> {
    fn start(position: P, key: String, mode: Mode, generation: u64) -> Self {
        Self {
            position,
            history: Vec::new(),
            captures: CaptureLedger::default(),
            termination: Termination::InProgress,
            mode,
            generation,
            pending: None,
            repetitions: HashMap::from([(key, 1)]),
        }
    }

    pub fn position(&self) -> &P {
        &self.position
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn captures(&self) -> &CaptureLedger {
        &self.captures
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_turn(&self) -> Option<PendingTurn> {
        self.pending
    }
}

/// Result of a move that was applied.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    pub termination: Termination,
    /// The computer reply scheduled by this move, if any.
    pub opponent_turn: Option<PendingTurn>,
}

type Observer = Box<dyn FnMut(&Snapshot)>;

pub struct GameManager<O: PositionOracle = StandardRules, C: Clock = SystemClock> {
    oracle: O,
    clock: C,
    opponent: OpponentDriver,
    opponent_delay: Duration,
    session: GameSession<O::Position>,
    observers: Vec<Observer>,
}

impl GameManager {
    /// Standard rules on the wall clock, configured from `config`.
    pub fn from_config(config: &SessionConfig) -> Self {
        let selector = match config.seed {
            Some(seed) => RandomSelector::seeded(seed),
            None => RandomSelector::new(),
        };
        GameManager::new(StandardRules, SystemClock::new(), selector, config)
    }
}

impl<O: PositionOracle, C: Clock> GameManager<O, C> {
    pub fn new(
        oracle: O,
        clock: C,
        selector: impl MoveSelector + 'static,
        config: &SessionConfig,
    ) -> Self {
        let start = oracle.start_position();
        let key = oracle.repetition_key(&start);
        let session = GameSession::start(start, key, config.mode, 0);
        info!(mode = %config.mode, delay_ms = config.opponent_delay_ms, "new game session");

        Self {
            oracle,
            clock,
            opponent: OpponentDriver::new(selector),
            opponent_delay: config.opponent_delay(),
            session,
            observers: Vec::new(),
        }
    }

    pub fn session(&self) -> &GameSession<O::Position> {
        &self.session
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn side_to_move(&self) -> Color {
        self.oracle.side_to_move(&self.session.position)
    }

    /// Registers a callback that receives a fresh snapshot after every change.
    pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn snapshot(&self) -> Snapshot {
        let session = &self.session;
        let (captured_by_white, captured_by_black) = Snapshot::captures_from(&session.captures);
        Snapshot {
            fen: self.oracle.to_fen(&session.position),
            side_to_move: self.side_to_move(),
            history: session.history.iter().map(|r| r.notation.clone()).collect(),
            captured_by_white,
            captured_by_black,
            termination: session.termination,
            message: session.termination.message(),
            mode: session.mode,
            opponent_pending: session.pending.is_some(),
        }
    }

    /// Applies a human move.
    ///
    /// In `cpu` mode a successful move that does not end the game schedules
    /// exactly one computer reply.
    #[instrument(level = "debug", skip(self), fields(generation = self.session.generation))]
    pub fn propose_move(&mut self, proposed: ProposedMove) -> SessionResult<MoveOutcome> {
        if self.session.termination.is_terminal() {
            debug!(termination = %self.session.termination, "move after game end ignored");
            return Err(SessionError::GameOver(self.session.termination));
        }
        if self.session.pending.is_some() {
            debug!("move ignored while the computer reply is pending");
            return Err(SessionError::OpponentToMove);
        }

        let applied = applier::apply(&self.oracle, &self.session.position, proposed)
            .inspect_err(|rejected| debug!(%rejected, "move rejected"))?;
        let record = self.commit(applied);

        if self.session.mode == Mode::Cpu && !self.session.termination.is_terminal() {
            let turn = PendingTurn {
                generation: self.session.generation,
                due: self.clock.now() + self.opponent_delay,
            };
            debug!(?turn, "computer reply scheduled");
            self.session.pending = Some(turn);
        }

        self.notify();
        Ok(MoveOutcome {
            record,
            termination: self.session.termination,
            opponent_turn: self.session.pending,
        })
    }

    /// The scheduled computer reply, if one is waiting.
    pub fn pending_turn(&self) -> Option<PendingTurn> {
        self.session.pending
    }

    /// Time left before the pending reply may be played.
    pub fn time_until_opponent(&self) -> Option<Duration> {
        self.session
            .pending
            .map(|turn| turn.remaining(self.clock.now()))
    }

    /// Plays the pending computer reply once its delay has passed.
    /// Returns `Ok(None)` when nothing is due yet.
    pub fn poll_opponent(&mut self) -> SessionResult<Option<MoveOutcome>> {
        match self.session.pending {
            Some(turn) if turn.is_due(self.clock.now()) => self.play_opponent_turn(turn).map(Some),
            _ => Ok(None),
        }
    }

    /// Plays the computer reply described by `turn`, whether or not its delay
    /// has passed.
    ///
    /// A turn scheduled against an earlier generation of the session (before
    /// a reset, mode switch or another move) is discarded.
    #[instrument(level = "debug", skip(self))]
    pub fn play_opponent_turn(&mut self, turn: PendingTurn) -> SessionResult<MoveOutcome> {
        if self.session.termination.is_terminal() {
            return Err(SessionError::GameOver(self.session.termination));
        }
        if turn.generation != self.session.generation || self.session.pending != Some(turn) {
            warn!(
                scheduled = turn.generation,
                current = self.session.generation,
                "discarding stale computer turn"
            );
            return Err(SessionError::StaleSessionAction {
                scheduled: turn.generation,
                current: self.session.generation,
            });
        }

        self.session.pending = None;
        let applied = self
            .opponent
            .play_random_move(&self.oracle, &self.session.position)?;
        let record = self.commit(applied);

        self.notify();
        Ok(MoveOutcome {
            record,
            termination: self.session.termination,
            opponent_turn: None,
        })
    }

    /// Switches between playing the computer and playing a friend.
    /// Leaving `cpu` mode cancels a pending reply.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.session.mode == mode {
            return;
        }
        info!(from = %self.session.mode, to = %mode, "mode changed");
        self.session.mode = mode;
        // Only cpu mode can have a reply pending, and it is being left.
        self.session.pending = None;
        self.session.generation += 1;
        self.notify();
    }

    /// Starts a new game in the current mode.
    pub fn reset(&mut self) {
        let start = self.oracle.start_position();
        let key = self.oracle.repetition_key(&start);
        let generation = self.session.generation + 1;
        self.session = GameSession::start(start, key, self.session.mode, generation);
        info!(generation, "game reset");
        self.notify();
    }

    /// Drag-and-drop entry point: true if the move was played.
    pub fn on_move_proposed(&mut self, from: &str, to: &str) -> bool {
        ProposedMove::from_squares(from, to)
            .and_then(|proposed| self.propose_move(proposed))
            .is_ok()
    }

    pub fn on_mode_changed(&mut self, mode: Mode) {
        self.set_mode(mode);
    }

    pub fn on_reset_requested(&mut self) {
        self.reset();
    }

    /// Folds an accepted move into the session.
    fn commit(&mut self, applied: Applied<O::Position>) -> MoveRecord {
        let Applied { position, record } = applied;
        let session = &mut self.session;

        if let Some(kind) = record.captured {
            session.captures.record(record.mover, kind);
        }

        let occurrences = session
            .repetitions
            .entry(self.oracle.repetition_key(&position))
            .and_modify(|seen| *seen += 1)
            .or_insert(1);
        let occurrences = *occurrences;

        session.termination = termination::evaluate(&self.oracle, &position, occurrences);
        session.position = position;
        session.history.push(record.clone());
        session.generation += 1;

        info!(
            mv = %record.notation,
            side = %record.mover,
            captured = ?record.captured,
            generation = session.generation,
            "move applied"
        );
        if session.termination.is_terminal() {
            info!(termination = %session.termination, "game over");
        }
        record
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}
