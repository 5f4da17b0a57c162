//! Two-player chess rules engine: move generation, check and checkmate
//! detection, a turn controller with a replayable move log, and file-backed
//! persistence of games between sessions.
//!
//! Castling, en passant, draws and time control are not part of the rules.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod board;
pub mod board_display;
pub mod error;
pub mod fuzz;
pub mod game;
pub mod piece;
pub mod position;
pub mod record;
pub mod session;
pub mod side;
pub mod store;

pub use board::Board;
pub use game::{Game, Phase, Players, Status, Transition};
pub use piece::{PieceState, Rank};
pub use position::Position;
pub use record::LogEntry;
pub use side::Side;
