//! Session configuration: who plays the second side, and how the computer
//! opponent is paced and seeded.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Delay before the computer replies, so the human's move is drawn first.
pub const DEFAULT_OPPONENT_DELAY_MS: u64 = 300;

/// Who plays against the human.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The computer answers every human move.
    #[default]
    Cpu,
    /// Two humans share the board.
    Friend,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Cpu => "cpu",
            Mode::Friend => "friend",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Mode::Cpu),
            "friend" => Ok(Mode::Friend),
            _ => Err(SessionError::InvalidMode(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub mode: Mode,
    pub opponent_delay_ms: u64,
    /// Seed for the opponent's move choice. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Cpu,
            opponent_delay_ms: DEFAULT_OPPONENT_DELAY_MS,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, SessionError> {
        serde_json::from_str(text).map_err(|e| SessionError::Config(e.to_string()))
    }

    pub fn opponent_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_delay_ms)
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_opponent_delay(mut self, delay: Duration) -> Self {
        self.opponent_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
