use std::{array, ops::Index};

use log::{debug, warn};

use crate::{
    piece::{PieceState, Rank},
    position::Position,
    side::Side,
};

mod movegen;
mod placement;
mod rules;

pub use placement::ParsePlacementError;

/// 8×8 grid of pieces plus the king lookup and the picked-up piece.
///
/// Every piece lives in exactly one cell. The selected piece stays in its
/// cell while selected, `selected` only names the square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<PieceState>; 8]; 8],
    kings: [Option<Position>; 2],
    selected: Option<Position>,
}
impl Default for Board {
    fn default() -> Self {
        Board {
            grid: array::from_fn(|_| array::from_fn(|_| None)),
            kings: [None; 2],
            selected: None,
        }
    }
}
impl Board {
    pub fn new() -> Self {
        Board::default()
    }
    pub fn starting_position() -> Self {
        let mut board = Board::new();
        board.reset();
        board
    }
    /// Clears the board in place and sets up the standard opening position.
    pub fn reset(&mut self) {
        self.clear();
        for side in Side::BOTH {
            let back_row = side.back_row();
            for (col, rank) in (0..).zip(Rank::STARTING_CONFIGURATION) {
                self.place(side, rank, back_row, col);
                self.place(side, Rank::Pawn, side.pawn_home_row(), col);
            }
        }
        self.regenerate_all();
    }
    fn place(&mut self, side: Side, rank: Rank, row: u8, col: u8) {
        if let Some(position) = Position::new_checked(row, col) {
            self.set_piece(PieceState::new(side, rank, position));
        }
    }
    pub fn clear(&mut self) {
        for cell in self.grid.iter_mut().flatten() {
            *cell = None;
        }
        self.kings = [None; 2];
        self.selected = None;
    }
    pub fn piece_at(&self, position: Position) -> Option<&PieceState> {
        self[position].as_ref()
    }
    fn cell_mut(&mut self, position: Position) -> &mut Option<PieceState> {
        &mut self.grid[position.row() as usize][position.col() as usize]
    }
    /// Puts `piece` on its own square, returning whatever was there.
    ///
    /// A king becomes its side's king reference.
    pub fn set_piece(&mut self, piece: PieceState) -> Option<PieceState> {
        let position = piece.position();
        let king = (piece.rank() == Rank::King).then_some(piece.side());
        let displaced = self.cell_mut(position).replace(piece);
        self.forget_king(displaced.as_ref(), position);
        if let Some(side) = king {
            self.kings[side.index()] = Some(position);
        }
        displaced
    }
    pub fn take_piece(&mut self, position: Position) -> Option<PieceState> {
        let taken = self.cell_mut(position).take();
        self.forget_king(taken.as_ref(), position);
        if self.selected == Some(position) {
            self.selected = None;
        }
        taken
    }
    fn forget_king(&mut self, removed: Option<&PieceState>, position: Position) {
        if let Some(piece) = removed
            && piece.rank() == Rank::King
            && self.kings[piece.side().index()] == Some(position)
        {
            self.kings[piece.side().index()] = None;
        }
    }
    /// All pieces in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &PieceState> {
        self.grid.iter().flatten().flatten()
    }
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = &PieceState> {
        self.pieces().filter(move |piece| piece.side() == side)
    }
    pub fn king(&self, side: Side) -> Option<&PieceState> {
        self.king_position(side)
            .and_then(|position| self.piece_at(position))
    }
    pub fn king_position(&self, side: Side) -> Option<Position> {
        self.kings[side.index()]
    }
    pub fn selected(&self) -> Option<&PieceState> {
        self.selected.and_then(|position| self.piece_at(position))
    }
    pub fn selected_position(&self) -> Option<Position> {
        self.selected
    }
    /// Picks up the piece on `position`, or drops the selection with `None`.
    /// Selecting an empty square clears the selection.
    pub fn set_selected(&mut self, position: Option<Position>) {
        self.selected = position.filter(|position| self[*position].is_some());
    }
    /// Relocates the selected piece to `destination` and returns the captured
    /// piece. Legality is the caller's business.
    pub fn move_piece(&mut self, destination: Position) -> Option<PieceState> {
        let Some(origin) = self.selected else {
            warn!("move to {destination} requested with no piece selected");
            return None;
        };
        let Some(mut piece) = self.cell_mut(origin).take() else {
            warn!("selected square {origin} is empty");
            self.selected = None;
            return None;
        };
        debug!("{piece} moves to {destination}");
        piece.set_position(destination);
        if piece.rank() == Rank::King {
            self.kings[piece.side().index()] = Some(destination);
        }
        let captured = self.cell_mut(destination).replace(piece);
        self.forget_king(captured.as_ref(), destination);
        self.selected = Some(destination);
        captured
    }
    /// Turns the selected side's pawn standing on the far row into `rank`.
    ///
    /// Returns the promoted square, or `None` when there is no such pawn,
    /// which correct sequencing never produces.
    pub fn promote(&mut self, rank: Rank) -> Option<Position> {
        let Some(side) = self.selected().map(PieceState::side) else {
            warn!("promotion to {rank} requested with no piece selected");
            return None;
        };
        let row = side.promotion_row();
        let Some(position) = (0..8)
            .filter_map(|col| Position::new_checked(row, col))
            .find(|position| {
                self[*position]
                    .as_ref()
                    .is_some_and(|piece| piece.side() == side && piece.rank() == Rank::Pawn)
            })
        else {
            warn!("no {side} pawn on row {row} to promote to {rank}");
            return None;
        };
        if let Some(pawn) = self.cell_mut(position) {
            pawn.set_rank(rank);
        }
        self.generate_candidates(position);
        debug!("{side} pawn on {position} promoted to {rank}");
        Some(position)
    }
}
impl Index<Position> for Board {
    type Output = Option<PieceState>;

    fn index(&self, index: Position) -> &Self::Output {
        &self.grid[index.row() as usize][index.col() as usize]
    }
}
