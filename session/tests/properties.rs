//! Properties that hold for every sequence of player actions.

use arbiter_core::{Color, Move, PositionOracle, Square, StandardRules};
use arbiter_session::{FakeClock, GameManager, Mode, ProposedMove, SessionConfig, SessionError};
use proptest::prelude::*;
use std::time::Duration;

#[derive(Clone, Debug)]
enum Step {
    /// Plays the legal move at this index (modulo the number of moves).
    Legal(usize),
    /// Proposes an arbitrary pair of squares.
    Raw(u8, u8),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => any::<usize>().prop_map(Step::Legal),
        1 => (0u8..64, 0u8..64).prop_map(|(from, to)| Step::Raw(from, to)),
    ]
}

#[derive(Clone, Debug)]
enum Action {
    Human(usize),
    Wait(u64),
    ToggleMode,
    Reset,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => any::<usize>().prop_map(Action::Human),
        4 => (0u64..600).prop_map(Action::Wait),
        1 => Just(Action::ToggleMode),
        1 => Just(Action::Reset),
    ]
}

fn pick(manager: &GameManager<StandardRules, FakeClock>, index: usize) -> Option<Move> {
    let moves = manager.oracle().legal_moves(manager.session().position());
    if moves.is_empty() {
        None
    } else {
        Some(moves[index % moves.len()])
    }
}

fn first_move(moves: &[Move]) -> Option<Move> {
    moves.first().copied()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_friend_games_keep_their_books(steps in prop::collection::vec(step(), 0..80)) {
        let config = SessionConfig::default().with_mode(Mode::Friend);
        let mut manager = GameManager::new(StandardRules, FakeClock::new(), first_move, &config);
        let mut applied = 0;

        for step in steps {
            let before = manager.session().clone();
            let mover = manager.side_to_move();
            let proposed = match step {
                Step::Legal(index) => match pick(&manager, index) {
                    Some(mv) => ProposedMove::from(mv),
                    None => break,
                },
                Step::Raw(from, to) => match (Square::from_index(from), Square::from_index(to)) {
                    (Some(from), Some(to)) => ProposedMove::new(from, to),
                    _ => continue,
                },
            };

            match manager.propose_move(proposed) {
                Ok(outcome) => {
                    applied += 1;
                    prop_assert!(!before.termination().is_terminal());
                    prop_assert_eq!(outcome.record.mover, mover);
                    prop_assert_eq!(manager.side_to_move(), mover.opponent());
                }
                Err(_) => prop_assert_eq!(manager.session(), &before),
            }

            let session = manager.session();
            prop_assert_eq!(session.history().len(), applied);
            let captures = session.history().iter().filter(|r| r.captured.is_some()).count();
            prop_assert_eq!(session.captures().total(), captures);
            for side in [Color::White, Color::Black] {
                prop_assert!(session.captures().captured_by(side).len() <= 15);
            }
            prop_assert_eq!(session.pending_turn(), None);
        }
    }

    #[test]
    fn prop_computer_never_moves_twice(actions in prop::collection::vec(action(), 0..60)) {
        let clock = FakeClock::new();
        let config = SessionConfig::default();
        let mut manager = GameManager::new(StandardRules, clock.clone(), first_move, &config);
        // true where the computer made the move
        let mut by_computer: Vec<bool> = Vec::new();

        for action in actions {
            match action {
                Action::Human(index) => {
                    let Some(mv) = pick(&manager, index) else { continue };
                    let pending = manager.pending_turn().is_some();
                    match manager.propose_move(mv.into()) {
                        Ok(_) => by_computer.push(false),
                        Err(err) => {
                            prop_assert!(pending || manager.session().termination().is_terminal());
                            prop_assert!(matches!(
                                err,
                                SessionError::OpponentToMove | SessionError::GameOver(_)
                            ));
                        }
                    }
                }
                Action::Wait(ms) => {
                    clock.advance(Duration::from_millis(ms));
                    if manager.poll_opponent()?.is_some() {
                        by_computer.push(true);
                    }
                }
                Action::ToggleMode => {
                    let next = match manager.session().mode() {
                        Mode::Cpu => Mode::Friend,
                        Mode::Friend => Mode::Cpu,
                    };
                    manager.set_mode(next);
                }
                Action::Reset => {
                    manager.reset();
                    by_computer.clear();
                    prop_assert!(manager.session().history().is_empty());
                }
            }

            prop_assert_eq!(manager.session().history().len(), by_computer.len());
            prop_assert!(!by_computer.windows(2).any(|pair| pair[0] && pair[1]));
            if manager.pending_turn().is_some() {
                prop_assert_eq!(manager.session().mode(), Mode::Cpu);
                prop_assert!(!manager.session().termination().is_terminal());
            }
        }
    }
}
