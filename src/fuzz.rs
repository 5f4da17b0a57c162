//! Randomized cross-check of move legality against the `chess` crate.
//!
//! Castling and en passant never arise here, so FEN records are written
//! without either and the two move generators must agree exactly.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rustc_hash::FxHashSet;

use crate::{
    board::Board,
    game::{Game, Players, Transition},
    piece::{PieceState, Rank},
    position::Position,
    side::Side,
};

/// Games running longer than this are abandoned.
pub const MAX_PLIES: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FuzzReport {
    pub games: usize,
    pub plies: usize,
    pub checkmates: usize,
    pub stalemates: usize,
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchKind {
    Unparsable,
    Illegal { origin: Position, destination: Position },
    Missing { origin: Position, destination: Position },
    Checkmate { ours: bool },
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub fen: String,
    pub kind: MismatchKind,
}
impl Display for Mismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            MismatchKind::Unparsable => write!(f, "the oracle rejected the position")?,
            MismatchKind::Illegal {
                origin,
                destination,
            } => write!(
                f,
                "found {}{} but it's not a legal move",
                origin.algebraic(),
                destination.algebraic(),
            )?,
            MismatchKind::Missing {
                origin,
                destination,
            } => write!(
                f,
                "{}{} not found",
                origin.algebraic(),
                destination.algebraic(),
            )?,
            MismatchKind::Checkmate { ours: true } => {
                write!(f, "reported checkmate where there is none")?;
            }
            MismatchKind::Checkmate { ours: false } => write!(f, "missed a checkmate")?,
        }
        write!(f, " in {}", self.fen)?;
        Ok(())
    }
}
impl Error for Mismatch {}

pub fn fen(board: &Board, active_side: Side) -> String {
    let side = match active_side {
        Side::White => 'w',
        Side::Black => 'b',
    };
    format!("{} {side} - - 0 1", board.placement())
}
fn from_square(square: chess::Square) -> Option<Position> {
    let row = 7 - u8::try_from(square.get_rank().to_index()).ok()?;
    let col = u8::try_from(square.get_file().to_index()).ok()?;
    Position::new_checked(row, col)
}
fn legal_moves(board: &mut Board, side: Side) -> FxHashSet<(Position, Position)> {
    let origins: Vec<_> = board.pieces_of(side).map(PieceState::position).collect();
    origins
        .into_iter()
        .flat_map(|origin| {
            board
                .legal_moves(origin)
                .into_iter()
                .map(move |destination| (origin, destination))
                .collect::<Vec<_>>()
        })
        .collect()
}
/// Compares the legal moves and checkmate status of one position with the
/// oracle's, returning our legal moves.
pub fn check_position(
    board: &mut Board,
    active_side: Side,
) -> Result<FxHashSet<(Position, Position)>, Mismatch> {
    let fen = fen(board, active_side);
    let Ok(oracle) = chess::Board::from_str(&fen) else {
        return Err(Mismatch {
            fen,
            kind: MismatchKind::Unparsable,
        });
    };
    let moves = legal_moves(board, active_side);
    let oracle_moves: FxHashSet<_> = chess::MoveGen::new_legal(&oracle)
        .filter_map(|movement| {
            Some((
                from_square(movement.get_source())?,
                from_square(movement.get_dest())?,
            ))
        })
        .collect();
    if let Some(&(origin, destination)) = moves.difference(&oracle_moves).next() {
        return Err(Mismatch {
            fen,
            kind: MismatchKind::Illegal {
                origin,
                destination,
            },
        });
    }
    if let Some(&(origin, destination)) = oracle_moves.difference(&moves).next() {
        return Err(Mismatch {
            fen,
            kind: MismatchKind::Missing {
                origin,
                destination,
            },
        });
    }
    let ours = board.is_checkmate(active_side);
    if ours != (oracle.status() == chess::BoardStatus::Checkmate) {
        return Err(Mismatch {
            fen,
            kind: MismatchKind::Checkmate { ours },
        });
    }
    Ok(moves)
}
/// Plays `games` random games through the turn controller, checking every
/// position on the way.
pub fn fuzz(games: usize, seed: u64) -> Result<FuzzReport, Mismatch> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut report = FuzzReport::default();
    for _ in 0..games {
        let mut game = Game::new(Players::new("fuzz white", "fuzz black"));
        for _ in 0..MAX_PLIES {
            let active_side = game.active_side();
            let mut board = game.board().clone();
            let mut moves: Vec<_> = check_position(&mut board, active_side)?
                .into_iter()
                .collect();
            if moves.is_empty() {
                if board.is_checked(active_side) {
                    report.checkmates += 1;
                } else {
                    report.stalemates += 1;
                }
                break;
            }
            moves.sort_unstable();
            let (origin, destination) = moves[rng.random_range(0..moves.len())];
            let rank = Rank::PROMOTION_CHOICES[rng.random_range(0..Rank::PROMOTION_CHOICES.len())];
            game.handle_interaction(origin, |_: Side| rank);
            let transition = game.handle_interaction(destination, |_: Side| rank);
            debug_assert!(matches!(transition, Transition::Moved { .. }));
            report.plies += 1;
        }
        report.games += 1;
        debug!("fuzz game {} done, {} plies so far", report.games, report.plies);
    }
    info!(
        "fuzzed {} games, {} plies, {} checkmates, {} stalemates",
        report.games, report.plies, report.checkmates, report.stalemates,
    );
    Ok(report)
}
