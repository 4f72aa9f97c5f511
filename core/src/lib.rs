pub mod board;
pub mod fen;
pub mod movegen;
pub mod oracle;
pub mod position;
pub mod san;
pub mod types;

pub use board::Board;
pub use fen::{positions, FenError};
pub use movegen::{generate_legal_moves, is_checkmate, is_stalemate};
pub use oracle::{AppliedMove, DrawReason, IllegalMove, PositionOracle, RejectReason, StandardRules};
pub use position::Position;
pub use san::to_san;
pub use types::*;
