use arbiter_core::{Color, DrawReason, PositionOracle};
use serde::Serialize;
use std::fmt;

/// A position repeated this many times is drawn.
pub const REPETITION_LIMIT: usize = 3;

/// Where the game stands. Only `InProgress` accepts further moves.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum Termination {
    #[default]
    InProgress,
    /// The named side delivered mate.
    CheckmateWon(Color),
    Draw(DrawReason),
    /// The rules report the game over for a reason that is neither mate nor draw.
    OtherTerminal,
}

impl Termination {
    pub fn is_terminal(self) -> bool {
        self != Termination::InProgress
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            Termination::CheckmateWon(side) => Some(side),
            _ => None,
        }
    }

    /// Banner shown when the game ends; empty while it is still running.
    pub fn message(self) -> String {
        match self {
            Termination::InProgress => String::new(),
            Termination::CheckmateWon(side) => format!("{side} wins!"),
            Termination::Draw(_) => "Draw!".to_string(),
            Termination::OtherTerminal => "Game over".to_string(),
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::InProgress => f.write_str("in progress"),
            Termination::CheckmateWon(side) => write!(f, "checkmate, {side} wins"),
            Termination::Draw(reason) => write!(f, "draw by {reason}"),
            Termination::OtherTerminal => f.write_str("game over"),
        }
    }
}

/// Classifies the position reached by the last move.
///
/// `occurrences` is how many times this position has now been seen in the
/// game, counting the current one.
pub fn evaluate<O: PositionOracle>(
    oracle: &O,
    position: &O::Position,
    occurrences: usize,
) -> Termination {
    if oracle.is_checkmate(position) {
        // the mated side is the one to move
        return Termination::CheckmateWon(oracle.side_to_move(position).opponent());
    }
    if let Some(reason) = oracle.draw_reason(position) {
        return Termination::Draw(reason);
    }
    if occurrences >= REPETITION_LIMIT {
        return Termination::Draw(DrawReason::ThreefoldRepetition);
    }
    if oracle.is_game_over(position) {
        return Termination::OtherTerminal;
    }
    Termination::InProgress
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::{Position, StandardRules};

    #[test]
    fn test_checkmate_names_the_mating_side() {
        let mated =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let termination = evaluate(&StandardRules, &mated, 1);

        assert_eq!(termination, Termination::CheckmateWon(Color::Black));
        assert_eq!(termination.winner(), Some(Color::Black));
        assert_eq!(termination.message(), "Black wins!");
    }

    #[test]
    fn test_draws() {
        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(
            evaluate(&StandardRules, &stalemate, 1),
            Termination::Draw(DrawReason::Stalemate)
        );

        let start = Position::new();
        assert_eq!(evaluate(&StandardRules, &start, 2), Termination::InProgress);
        assert_eq!(
            evaluate(&StandardRules, &start, 3),
            Termination::Draw(DrawReason::ThreefoldRepetition)
        );
        assert_eq!(Termination::Draw(DrawReason::Stalemate).message(), "Draw!");
    }

    #[test]
    fn test_in_progress_is_not_terminal() {
        assert!(!Termination::InProgress.is_terminal());
        assert!(Termination::OtherTerminal.is_terminal());
        assert_eq!(Termination::InProgress.message(), "");
    }
}
